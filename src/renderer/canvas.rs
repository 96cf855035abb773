//! Canvas 2D backend
//!
//! Executes draw commands on a `CanvasRenderingContext2d`. Images are
//! preloaded asynchronously before the game starts, so the synchronous
//! `AssetLoader` calls only look them up.

use std::collections::HashMap;

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, HtmlAudioElement, HtmlCanvasElement, HtmlImageElement};

use super::scene::{DrawCmd, SpriteRef, TextAlign};
use crate::assets::{AssetError, AssetLoader, ImageSource, Sprite, SpriteSet};
use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::sim::Rect;

impl ImageSource for HtmlImageElement {
    fn dimensions(&self) -> (u32, u32) {
        (self.natural_width(), self.natural_height())
    }
}

/// Images decoded up front, keyed by path
pub struct WebAssets {
    images: HashMap<String, Result<HtmlImageElement, AssetError>>,
}

impl WebAssets {
    /// Fetch and decode every image; failures are kept for the loader to report
    pub async fn preload(paths: &[String]) -> Self {
        let mut images = HashMap::new();
        for path in paths {
            images.insert(path.clone(), load_image(path).await);
        }
        Self { images }
    }
}

async fn load_image(path: &str) -> Result<HtmlImageElement, AssetError> {
    let img = HtmlImageElement::new().map_err(|_| AssetError::Unsupported(path.to_string()))?;
    img.set_src(path);
    JsFuture::from(img.decode())
        .await
        .map_err(|e| AssetError::Decode {
            path: path.to_string(),
            reason: e.as_string().unwrap_or_else(|| "image failed to load".to_string()),
        })?;
    Ok(img)
}

impl AssetLoader for WebAssets {
    type Image = HtmlImageElement;
    type Sound = HtmlAudioElement;

    fn load_image(&mut self, path: &str) -> Result<HtmlImageElement, AssetError> {
        self.images
            .get(path)
            .cloned()
            .unwrap_or_else(|| Err(AssetError::NotFound(path.to_string())))
    }

    fn load_sound(&mut self, path: &str) -> Result<HtmlAudioElement, AssetError> {
        let audio = HtmlAudioElement::new_with_src(path)
            .map_err(|_| AssetError::Unsupported(path.to_string()))?;
        audio.set_preload("auto");
        Ok(audio)
    }
}

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        canvas.set_width(FIELD_WIDTH as u32);
        canvas.set_height(FIELD_HEIGHT as u32);
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        ctx.set_text_baseline("top");
        Some(Self { ctx })
    }

    pub fn render(&self, commands: &[DrawCmd], sprites: &SpriteSet<HtmlImageElement>) {
        for cmd in commands {
            match cmd {
                DrawCmd::Clear(color) => {
                    self.ctx.set_fill_style_str(&color.css());
                    self.ctx.fill_rect(0.0, 0.0, FIELD_WIDTH as f64, FIELD_HEIGHT as f64);
                }
                DrawCmd::Rect { rect, color } => {
                    self.ctx.set_fill_style_str(&color.css());
                    self.ctx.fill_rect(
                        rect.x as f64,
                        rect.y as f64,
                        rect.w as f64,
                        rect.h as f64,
                    );
                }
                DrawCmd::Text {
                    text,
                    pos,
                    size,
                    color,
                    align,
                } => {
                    self.ctx.set_fill_style_str(&color.css());
                    self.ctx.set_font(&format!("{}px sans-serif", size));
                    self.ctx.set_text_align(match align {
                        TextAlign::Left => "left",
                        TextAlign::Center => "center",
                    });
                    self.ctx.fill_text(text, pos.x as f64, pos.y as f64).ok();
                }
                DrawCmd::Image {
                    sprite,
                    src,
                    dest,
                    mirrored,
                } => {
                    if let Some(img) = image_for(sprites, *sprite) {
                        self.draw_image(img, *src, *dest, *mirrored);
                    }
                }
            }
        }
    }

    fn draw_image(&self, img: &HtmlImageElement, src: Rect, dest: Rect, mirrored: bool) {
        let ctx = &self.ctx;
        if mirrored {
            ctx.save();
            ctx.translate((dest.x + dest.w) as f64, dest.y as f64).ok();
            ctx.scale(-1.0, 1.0).ok();
        }
        let (dx, dy) = if mirrored {
            (0.0, 0.0)
        } else {
            (dest.x as f64, dest.y as f64)
        };
        ctx.draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
            img,
            src.x as f64,
            src.y as f64,
            src.w as f64,
            src.h as f64,
            dx,
            dy,
            dest.w as f64,
            dest.h as f64,
        )
        .ok();
        if mirrored {
            ctx.restore();
        }
    }
}

fn image_for(sprites: &SpriteSet<HtmlImageElement>, sprite: SpriteRef) -> Option<&HtmlImageElement> {
    let sprite = match sprite {
        SpriteRef::Background => &sprites.background,
        SpriteRef::Player => &sprites.player,
        SpriteRef::Item(kind) => sprites.items.get(kind)?,
        SpriteRef::VictoryBackground => &sprites.victory_background,
        SpriteRef::Victory => &sprites.victory,
    };
    match sprite {
        Sprite::Image(img) => Some(img),
        Sprite::Placeholder(_) => None,
    }
}
