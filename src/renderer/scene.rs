//! Draw command generation
//!
//! Turns the app state into a flat list of backend-neutral draw commands.
//! Placeholders are resolved here, so backends only ever see real images or
//! colored rectangles.

use glam::Vec2;

use crate::app::App;
use crate::assets::{Color, ImageSource, Sprite, SpriteSet, colors};
use crate::consts::*;
use crate::sim::{Facing, FallingItem, GamePhase, Player, Rect, VictoryStage};
use crate::ui::{Button, Screen};

const HUD_TEXT_SIZE: f32 = 36.0;
const TITLE_TEXT_SIZE: f32 = 64.0;
const BODY_TEXT_SIZE: f32 = 24.0;

/// Which loaded image a command refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteRef {
    Background,
    Player,
    /// Catalog index
    Item(usize),
    VictoryBackground,
    Victory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Clear(Color),
    /// Copy `src` of an image into `dest`, optionally flipped horizontally
    Image {
        sprite: SpriteRef,
        src: Rect,
        dest: Rect,
        mirrored: bool,
    },
    Rect {
        rect: Rect,
        color: Color,
    },
    /// `pos` is the top of the text; x is the left edge or the center per `align`
    Text {
        text: String,
        pos: Vec2,
        size: f32,
        color: Color,
        align: TextAlign,
    },
}

/// Command list under construction
#[derive(Debug, Default)]
pub struct Scene {
    pub commands: Vec<DrawCmd>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self, color: Color) {
        self.commands.push(DrawCmd::Clear(color));
    }

    pub fn rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCmd::Rect { rect, color });
    }

    pub fn text(&mut self, text: impl Into<String>, pos: Vec2, size: f32, color: Color) {
        self.commands.push(DrawCmd::Text {
            text: text.into(),
            pos,
            size,
            color,
            align: TextAlign::Left,
        });
    }

    /// Horizontally centered on the field
    pub fn centered_text(&mut self, text: impl Into<String>, y: f32, size: f32, color: Color) {
        self.commands.push(DrawCmd::Text {
            text: text.into(),
            pos: Vec2::new(FIELD_WIDTH / 2.0, y),
            size,
            color,
            align: TextAlign::Center,
        });
    }

    /// Draw a sprite, or its placeholder rectangle at `dest`
    pub fn sprite<I>(
        &mut self,
        sprite: &Sprite<I>,
        sprite_ref: SpriteRef,
        src: Rect,
        dest: Rect,
        mirrored: bool,
    ) {
        match sprite {
            Sprite::Image(_) => self.commands.push(DrawCmd::Image {
                sprite: sprite_ref,
                src,
                dest,
                mirrored,
            }),
            Sprite::Placeholder(p) => self.rect(dest, p.color),
        }
    }

    /// Stretch a whole image over `dest`
    pub fn full_sprite<I: ImageSource>(&mut self, sprite: &Sprite<I>, sprite_ref: SpriteRef, dest: Rect) {
        let src = match sprite {
            Sprite::Image(image) => {
                let (w, h) = image.dimensions();
                Rect::new(0.0, 0.0, w as f32, h as f32)
            }
            Sprite::Placeholder(p) => Rect::new(0.0, 0.0, p.width, p.height),
        };
        self.sprite(sprite, sprite_ref, src, dest, false);
    }
}

/// Something that knows how to put itself into a scene
pub trait Drawable {
    fn draw<I: ImageSource>(&self, sprites: &SpriteSet<I>, scene: &mut Scene);
}

impl Drawable for Player {
    fn draw<I: ImageSource>(&self, sprites: &SpriteSet<I>, scene: &mut Scene) {
        let dest = self.rect();
        let src = sprites.player_frames.frame(self.frame).unwrap_or(dest);
        scene.sprite(
            &sprites.player,
            SpriteRef::Player,
            src,
            dest,
            self.facing == Facing::Left,
        );
    }
}

impl Drawable for FallingItem {
    fn draw<I: ImageSource>(&self, sprites: &SpriteSet<I>, scene: &mut Scene) {
        let dest = self.rect();
        match sprites.items.get(self.kind) {
            Some(sprite) => scene.full_sprite(sprite, SpriteRef::Item(self.kind), dest),
            None => scene.rect(dest, colors::ITEM),
        }
    }
}

impl Drawable for Button {
    fn draw<I: ImageSource>(&self, _sprites: &SpriteSet<I>, scene: &mut Scene) {
        let color = if self.hovered {
            colors::BUTTON_HOVER
        } else {
            colors::BUTTON
        };
        scene.rect(self.rect, color);
        scene.commands.push(DrawCmd::Text {
            text: self.label.clone(),
            pos: Vec2::new(
                self.rect.center().x,
                self.rect.center().y - BODY_TEXT_SIZE / 2.0,
            ),
            size: BODY_TEXT_SIZE,
            color: colors::TEXT_LIGHT,
            align: TextAlign::Center,
        });
    }
}

fn field() -> Rect {
    Rect::new(0.0, 0.0, FIELD_WIDTH, FIELD_HEIGHT)
}

/// Build the full frame for the current app state
pub fn build<I: ImageSource>(app: &App, sprites: &SpriteSet<I>) -> Vec<DrawCmd> {
    let mut scene = Scene::new();
    scene.clear(colors::FIELD);

    match app.ui.screen {
        Screen::Playing => draw_round(app, sprites, &mut scene),
        Screen::Menu => {
            scene.full_sprite(&sprites.background, SpriteRef::Background, field());
            scene.rect(field(), colors::OVERLAY);
            scene.centered_text(&app.ui.menu.title, 100.0, TITLE_TEXT_SIZE, colors::TEXT_LIGHT);
            for button in &app.ui.menu.buttons {
                button.draw(sprites, &mut scene);
            }
        }
        Screen::Info => {
            scene.full_sprite(&sprites.background, SpriteRef::Background, field());
            scene.rect(field(), colors::OVERLAY);
            let info = &app.ui.info;
            scene.rect(info.panel, colors::PANEL);
            let mut y = info.panel.y + 30.0;
            for line in &info.lines {
                scene.text(line, Vec2::new(info.panel.x + 30.0, y), BODY_TEXT_SIZE, colors::TEXT);
                y += BODY_TEXT_SIZE + 8.0;
            }
            info.back.draw(sprites, &mut scene);
        }
    }

    if app.settings.show_fps {
        scene.text(
            format!("FPS: {}", app.fps.fps()),
            Vec2::new(8.0, FIELD_HEIGHT - 24.0),
            16.0,
            colors::TEXT,
        );
    }

    scene.commands
}

fn draw_round<I: ImageSource>(app: &App, sprites: &SpriteSet<I>, scene: &mut Scene) {
    let state = &app.state;

    if state.round.phase == GamePhase::Victory {
        draw_victory(app, sprites, scene);
        return;
    }

    scene.full_sprite(&sprites.background, SpriteRef::Background, field());
    state.player.draw(sprites, scene);
    for item in &state.items {
        item.draw(sprites, scene);
    }

    scene.centered_text(
        format!("Score: {}", state.round.score),
        10.0,
        HUD_TEXT_SIZE,
        colors::TEXT,
    );
    scene.centered_text(
        format!("Missed: {}/{}", state.round.missed, MAX_MISSED),
        50.0,
        HUD_TEXT_SIZE,
        colors::TEXT,
    );

    if state.round.phase == GamePhase::GameOver {
        scene.rect(field(), colors::OVERLAY);
        scene.centered_text("GAME OVER", 230.0, TITLE_TEXT_SIZE, colors::TEXT_LIGHT);
        scene.centered_text("Press R to play again", 310.0, BODY_TEXT_SIZE, colors::TEXT_LIGHT);
    }
}

fn draw_victory<I: ImageSource>(app: &App, sprites: &SpriteSet<I>, scene: &mut Scene) {
    let state = &app.state;
    scene.full_sprite(
        &sprites.victory_background,
        SpriteRef::VictoryBackground,
        field(),
    );

    let frame = match state.victory.stage {
        VictoryStage::Animating { frame, .. } => Some(frame),
        VictoryStage::Finished => Some(VICTORY_FRAMES - 1),
        _ => None,
    };
    if let Some(frame) = frame {
        let size = Vec2::new(
            crate::assets::VICTORY_FRAME_WIDTH,
            crate::assets::VICTORY_FRAME_HEIGHT,
        );
        let dest = Rect::at(
            Vec2::new(FIELD_WIDTH, FIELD_HEIGHT) / 2.0 - size / 2.0,
            size,
        );
        let src = sprites.victory_frames.frame(frame).unwrap_or(dest);
        scene.sprite(&sprites.victory, SpriteRef::Victory, src, dest, false);
    }

    scene.centered_text("You win!", 40.0, TITLE_TEXT_SIZE, colors::TEXT);
    scene.centered_text(
        format!("Score: {}", state.round.score),
        110.0,
        HUD_TEXT_SIZE,
        colors::TEXT,
    );
    let prompt = match state.victory.stage {
        VictoryStage::BackgroundShown => Some("Press R to celebrate"),
        VictoryStage::Finished => Some("Press R to play again"),
        _ => None,
    };
    if let Some(prompt) = prompt {
        scene.centered_text(prompt, FIELD_HEIGHT - 60.0, BODY_TEXT_SIZE, colors::TEXT);
    }
}
