//! Drawing surface abstraction
//!
//! The minimal 2D immediate-mode contract the scene painter needs: filled
//! paths and circles, glowing stroked lines, an additive blend toggle, and
//! text for the countdown numeral. Backed by `CanvasRenderingContext2d` in
//! the browser and by a recording stub in tests.

use glam::Vec2;

use crate::Color;

pub trait DrawSurface {
    /// Fill the whole surface with a solid color
    fn clear(&mut self, color: Color);

    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Color, alpha: f32);

    /// Fill a closed polygon
    fn fill_polygon(&mut self, points: &[Vec2], color: Color);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color, alpha: f32);

    /// Stroke a line with a soft glow of the given blur radius
    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32, glow: f32);

    /// Toggle additive (lightening) blending; normal blending when off
    fn set_additive(&mut self, on: bool);

    /// Draw text centered on `center`
    fn fill_text(&mut self, text: &str, center: Vec2, size_px: f32, color: Color);
}
