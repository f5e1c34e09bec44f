//! Canvas 2D drawing backend (wasm)

use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::Color;

use super::surface::DrawSurface;

pub struct Canvas2dSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl Canvas2dSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx })
    }

    /// Resize the backing pixel buffer
    pub fn set_size(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    pub fn height(&self) -> u32 {
        self.canvas.height()
    }
}

impl DrawSurface for Canvas2dSurface {
    fn clear(&mut self, color: Color) {
        self.ctx.set_global_alpha(1.0);
        self.ctx.set_fill_style_str(&color.css());
        self.ctx
            .fill_rect(0.0, 0.0, self.canvas.width() as f64, self.canvas.height() as f64);
    }

    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Color, alpha: f32) {
        self.ctx.set_global_alpha(alpha as f64);
        self.ctx.set_fill_style_str(&color.css());
        self.ctx
            .fill_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
        self.ctx.set_global_alpha(1.0);
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        let Some(first) = points.first() else { return };
        self.ctx.set_fill_style_str(&color.css());
        self.ctx.begin_path();
        self.ctx.move_to(first.x as f64, first.y as f64);
        for point in &points[1..] {
            self.ctx.line_to(point.x as f64, point.y as f64);
        }
        self.ctx.close_path();
        self.ctx.fill();
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color, alpha: f32) {
        self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0) as f64);
        self.ctx.set_fill_style_str(&color.css());
        self.ctx.begin_path();
        let _ = self.ctx.arc(
            center.x as f64,
            center.y as f64,
            radius.max(0.0) as f64,
            0.0,
            std::f64::consts::TAU,
        );
        self.ctx.fill();
        self.ctx.set_global_alpha(1.0);
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32, glow: f32) {
        let css = color.css();
        self.ctx.set_stroke_style_str(&css);
        self.ctx.set_line_width(width as f64);
        self.ctx.set_shadow_blur(glow as f64);
        self.ctx.set_shadow_color(&css);
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
        self.ctx.set_shadow_blur(0.0);
    }

    fn set_additive(&mut self, on: bool) {
        let mode = if on { "lighter" } else { "source-over" };
        if self.ctx.set_global_composite_operation(mode).is_err() {
            log::warn!("composite mode {mode} rejected by context");
        }
    }

    fn fill_text(&mut self, text: &str, center: Vec2, size_px: f32, color: Color) {
        self.ctx
            .set_font(&format!("bold {}px 'Courier New', monospace", size_px as u32));
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        self.ctx.set_fill_style_str(&color.css());
        let _ = self.ctx.fill_text(text, center.x as f64, center.y as f64);
    }
}
