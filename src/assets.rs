//! Asset loading with placeholder fallback
//!
//! Loading is fallible, but a missing or broken file is never fatal: images
//! become flat-colored placeholder rectangles and sounds become silence. The
//! decision is made once, when the sprite set is built.

use crate::catalog::ItemCatalog;
use crate::consts::*;
use crate::sim::Rect;

pub const BACKGROUND_PATH: &str = "assets/farm_bg.png";
pub const PLAYER_SHEET_PATH: &str = "assets/player_sheet.png";
pub const VICTORY_BACKGROUND_PATH: &str = "assets/victory_bg.png";
pub const VICTORY_SHEET_PATH: &str = "assets/victory_sheet.png";
pub const MUSIC_PATH: &str = "assets/music.ogg";

/// Victory animation frame size within its sheet
pub const VICTORY_FRAME_WIDTH: f32 = 300.0;
pub const VICTORY_FRAME_HEIGHT: f32 = 300.0;

/// Asset load failure
#[derive(Debug, Clone, PartialEq)]
pub enum AssetError {
    NotFound(String),
    Decode { path: String, reason: String },
    Unsupported(String),
}

impl std::fmt::Display for AssetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetError::NotFound(path) => write!(f, "Asset not found: {}", path),
            AssetError::Decode { path, reason } => {
                write!(f, "Could not decode {}: {}", path, reason)
            }
            AssetError::Unsupported(path) => write!(f, "Unsupported asset format: {}", path),
        }
    }
}

impl std::error::Error for AssetError {}

/// RGBA color, 0-255 per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// CSS color string for canvas fill styles
    pub fn css(&self) -> String {
        format!(
            "rgba({},{},{},{:.3})",
            self.r,
            self.g,
            self.b,
            self.a as f32 / 255.0
        )
    }
}

/// Colors for game elements
pub mod colors {
    use super::Color;

    pub const FIELD: Color = Color::rgb(120, 180, 90);
    pub const PLAYER: Color = Color::rgb(0, 255, 0);
    pub const ITEM: Color = Color::rgb(200, 0, 0);
    pub const BAD_ITEM: Color = Color::rgb(90, 60, 20);
    pub const VICTORY_FIELD: Color = Color::rgb(250, 220, 120);
    pub const VICTORY_FIGURE: Color = Color::rgb(255, 170, 0);
    pub const TEXT: Color = Color::rgb(0, 0, 0);
    pub const TEXT_LIGHT: Color = Color::rgb(255, 255, 255);
    pub const OVERLAY: Color = Color::rgba(0, 0, 0, 140);
    pub const BUTTON: Color = Color::rgb(70, 110, 60);
    pub const BUTTON_HOVER: Color = Color::rgb(110, 160, 90);
    pub const PANEL: Color = Color::rgba(255, 255, 240, 230);
}

/// Generated stand-in for a missing image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placeholder {
    pub width: f32,
    pub height: f32,
    pub color: Color,
}

impl Placeholder {
    pub const fn new(width: f32, height: f32, color: Color) -> Self {
        Self {
            width,
            height,
            color,
        }
    }
}

/// Something with pixel dimensions
pub trait ImageSource {
    fn dimensions(&self) -> (u32, u32);
}

/// Platform asset backend
pub trait AssetLoader {
    type Image: ImageSource;
    type Sound;

    fn load_image(&mut self, path: &str) -> Result<Self::Image, AssetError>;
    fn load_sound(&mut self, path: &str) -> Result<Self::Sound, AssetError>;
}

/// A loaded image, or the placeholder standing in for it
#[derive(Debug, Clone)]
pub enum Sprite<I> {
    Image(I),
    Placeholder(Placeholder),
}

impl<I> Sprite<I> {
    /// Settle a load result: keep the image or fall back to `placeholder`
    pub fn resolve(result: Result<I, AssetError>, placeholder: Placeholder) -> Self {
        match result {
            Ok(image) => Sprite::Image(image),
            Err(e) => {
                log::warn!("{} - using placeholder", e);
                Sprite::Placeholder(placeholder)
            }
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Sprite::Placeholder(_))
    }
}

/// Settle a sound load result: failures are silent
pub fn resolve_sound<S>(result: Result<S, AssetError>) -> Option<S> {
    match result {
        Ok(sound) => Some(sound),
        Err(e) => {
            log::warn!("{} - sound disabled", e);
            None
        }
    }
}

/// Equal-sized frames cut from one sheet, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteSheet {
    pub frames: Vec<Rect>,
}

impl SpriteSheet {
    /// Slice a `sheet_w` x `sheet_h` sheet into `frame_w` x `frame_h` cells.
    /// Partial cells at the right/bottom edges are ignored.
    pub fn slice(sheet_w: f32, sheet_h: f32, frame_w: f32, frame_h: f32) -> Self {
        if frame_w <= 0.0 || frame_h <= 0.0 {
            return Self { frames: Vec::new() };
        }
        let cols = (sheet_w / frame_w).floor() as usize;
        let rows = (sheet_h / frame_h).floor() as usize;

        let frames = (0..rows)
            .flat_map(|row| {
                (0..cols).map(move |col| {
                    Rect::new(col as f32 * frame_w, row as f32 * frame_h, frame_w, frame_h)
                })
            })
            .collect();
        Self { frames }
    }

    /// One frame covering the whole image
    pub fn single(w: f32, h: f32) -> Self {
        Self {
            frames: vec![Rect::new(0.0, 0.0, w, h)],
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame `index`, wrapping around the sheet
    pub fn frame(&self, index: usize) -> Option<Rect> {
        if self.frames.is_empty() {
            None
        } else {
            Some(self.frames[index % self.frames.len()])
        }
    }
}

/// Sheet for a sprite: sliced if it is a real image, one frame otherwise
fn sheet_for<I: ImageSource>(sprite: &Sprite<I>, frame_w: f32, frame_h: f32) -> SpriteSheet {
    match sprite {
        Sprite::Image(image) => {
            let (w, h) = image.dimensions();
            let sheet = SpriteSheet::slice(w as f32, h as f32, frame_w, frame_h);
            if sheet.is_empty() {
                SpriteSheet::single(w as f32, h as f32)
            } else {
                sheet
            }
        }
        Sprite::Placeholder(p) => SpriteSheet::single(p.width, p.height),
    }
}

/// Every image path `SpriteSet::load` will ask for, without duplicates
pub fn image_paths(catalog: &ItemCatalog) -> Vec<String> {
    let mut paths: Vec<String> = [
        BACKGROUND_PATH,
        PLAYER_SHEET_PATH,
        VICTORY_BACKGROUND_PATH,
        VICTORY_SHEET_PATH,
    ]
    .iter()
    .map(|p| p.to_string())
    .collect();
    for kind in catalog.kinds() {
        if !paths.contains(&kind.asset_path) {
            paths.push(kind.asset_path.clone());
        }
    }
    paths
}

/// Every image the renderer needs
#[derive(Debug, Clone)]
pub struct SpriteSet<I> {
    pub background: Sprite<I>,
    pub player: Sprite<I>,
    /// Right-facing walk cycle; left-facing frames are drawn mirrored
    pub player_frames: SpriteSheet,
    /// Parallel to the catalog's kinds
    pub items: Vec<Sprite<I>>,
    pub victory_background: Sprite<I>,
    pub victory: Sprite<I>,
    pub victory_frames: SpriteSheet,
}

impl<I: ImageSource> SpriteSet<I> {
    pub fn load<L>(loader: &mut L, catalog: &ItemCatalog) -> Self
    where
        L: AssetLoader<Image = I>,
    {
        let mut load = |path: &str, placeholder: Placeholder| {
            Sprite::resolve(loader.load_image(path), placeholder)
        };

        let background = load(
            BACKGROUND_PATH,
            Placeholder::new(FIELD_WIDTH, FIELD_HEIGHT, colors::FIELD),
        );
        let player = load(
            PLAYER_SHEET_PATH,
            Placeholder::new(PLAYER_WIDTH, PLAYER_HEIGHT, colors::PLAYER),
        );
        let items = catalog
            .kinds()
            .iter()
            .map(|kind| {
                let color = if kind.is_bad() {
                    colors::BAD_ITEM
                } else {
                    colors::ITEM
                };
                load(&kind.asset_path, Placeholder::new(ITEM_SIZE, ITEM_SIZE, color))
            })
            .collect();
        let victory_background = load(
            VICTORY_BACKGROUND_PATH,
            Placeholder::new(FIELD_WIDTH, FIELD_HEIGHT, colors::VICTORY_FIELD),
        );
        let victory = load(
            VICTORY_SHEET_PATH,
            Placeholder::new(
                VICTORY_FRAME_WIDTH,
                VICTORY_FRAME_HEIGHT,
                colors::VICTORY_FIGURE,
            ),
        );

        let player_frames = sheet_for(&player, PLAYER_WIDTH, PLAYER_HEIGHT);
        let victory_frames = sheet_for(&victory, VICTORY_FRAME_WIDTH, VICTORY_FRAME_HEIGHT);

        let set = Self {
            background,
            player,
            player_frames,
            items,
            victory_background,
            victory,
            victory_frames,
        };
        log::info!(
            "Sprites ready ({} placeholders)",
            set.placeholder_count()
        );
        set
    }

    /// Number of sprites that fell back to placeholders
    pub fn placeholder_count(&self) -> usize {
        [
            &self.background,
            &self.player,
            &self.victory_background,
            &self.victory,
        ]
        .into_iter()
        .chain(self.items.iter())
        .filter(|s| s.is_placeholder())
        .count()
    }
}

/// Every sound the audio layer needs (None = silent)
#[derive(Debug, Clone)]
pub struct SoundSet<S> {
    /// Parallel to the catalog's kinds
    pub catches: Vec<Option<S>>,
    pub music: Option<S>,
}

impl<S> SoundSet<S> {
    pub fn load<L>(loader: &mut L, catalog: &ItemCatalog) -> Self
    where
        L: AssetLoader<Sound = S>,
    {
        let catches = catalog
            .kinds()
            .iter()
            .map(|kind| {
                kind.sound_path
                    .as_deref()
                    .and_then(|path| resolve_sound(loader.load_sound(path)))
            })
            .collect();
        let music = resolve_sound(loader.load_sound(MUSIC_PATH));
        Self { catches, music }
    }
}

/// Filesystem loader for the native runner. Only validates that assets are
/// present and readable; images are probed for their PNG dimensions.
#[cfg(not(target_arch = "wasm32"))]
pub mod fs {
    use std::path::{Path, PathBuf};

    use super::{AssetError, AssetLoader, ImageSource};

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    /// Image metadata read from disk
    #[derive(Debug, Clone, PartialEq)]
    pub struct ImageInfo {
        pub path: PathBuf,
        pub width: u32,
        pub height: u32,
    }

    impl ImageSource for ImageInfo {
        fn dimensions(&self) -> (u32, u32) {
            (self.width, self.height)
        }
    }

    /// Read PNG dimensions from the IHDR chunk
    pub fn png_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
        if bytes.len() < 24 || bytes[..8] != PNG_SIGNATURE || &bytes[12..16] != b"IHDR" {
            return None;
        }
        let width = u32::from_be_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
        let height = u32::from_be_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]);
        Some((width, height))
    }

    pub struct FsAssetLoader {
        root: PathBuf,
    }

    impl FsAssetLoader {
        /// Asset paths are resolved relative to `root`
        pub fn new(root: impl AsRef<Path>) -> Self {
            Self {
                root: root.as_ref().to_path_buf(),
            }
        }

        fn read(&self, path: &str) -> Result<(PathBuf, Vec<u8>), AssetError> {
            let full = self.root.join(path);
            let bytes =
                std::fs::read(&full).map_err(|_| AssetError::NotFound(full.display().to_string()))?;
            Ok((full, bytes))
        }
    }

    impl AssetLoader for FsAssetLoader {
        type Image = ImageInfo;
        type Sound = PathBuf;

        fn load_image(&mut self, path: &str) -> Result<ImageInfo, AssetError> {
            if !path.to_lowercase().ends_with(".png") {
                return Err(AssetError::Unsupported(path.to_string()));
            }
            let (full, bytes) = self.read(path)?;
            let (width, height) = png_dimensions(&bytes).ok_or_else(|| AssetError::Decode {
                path: full.display().to_string(),
                reason: "not a PNG file".to_string(),
            })?;
            Ok(ImageInfo {
                path: full,
                width,
                height,
            })
        }

        fn load_sound(&mut self, path: &str) -> Result<PathBuf, AssetError> {
            let (full, bytes) = self.read(path)?;
            if bytes.is_empty() {
                return Err(AssetError::Decode {
                    path: full.display().to_string(),
                    reason: "empty file".to_string(),
                });
            }
            Ok(full)
        }
    }
}
