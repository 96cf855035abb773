//! Rendering module
//!
//! `scene` builds backend-neutral draw commands from the app state; the
//! Canvas 2D backend executes them in the browser.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod scene;

#[cfg(target_arch = "wasm32")]
pub use canvas::{CanvasRenderer, WebAssets};
pub use scene::{DrawCmd, Drawable, Scene, SpriteRef, TextAlign, build};
