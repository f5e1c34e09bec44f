//! Scene rendering over a 2D immediate-mode surface
//!
//! The scene painter is a pure function of the current game state; the
//! only drawing backend the crate ships is the canvas 2D context on wasm.

pub mod scene;
pub mod surface;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use scene::Renderer;
pub use surface::DrawSurface;

#[cfg(target_arch = "wasm32")]
pub use canvas::Canvas2dSurface;
