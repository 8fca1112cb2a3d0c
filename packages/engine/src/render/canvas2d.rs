use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::core::color::BLACK;
use crate::core::{EngineError, EngineResult};
use crate::domain::{BackendKind, ClearMode};
use crate::env::Viewport;

use super::{Backdrop, DrawStats, Halo, Scene, Sprite, Surface};

pub struct Canvas2dSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl Canvas2dSurface {
    pub fn new(canvas: HtmlCanvasElement) -> EngineResult<Self> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| EngineError::Canvas("2d context unavailable".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| EngineError::Canvas("unexpected 2d context type".into()))?;
        Ok(Self { canvas, ctx })
    }

    fn clear(&self, mode: &ClearMode, viewport: &Viewport) {
        let (w, h) = (viewport.width as f64, viewport.height as f64);
        match mode {
            ClearMode::Clear => self.ctx.clear_rect(0.0, 0.0, w, h),
            ClearMode::Solid { color } => {
                self.ctx.set_fill_style_str(&color.css());
                self.ctx.fill_rect(0.0, 0.0, w, h);
            }
            ClearMode::Trail { color, alpha } => {
                self.ctx.set_fill_style_str(&color.css_with_alpha(*alpha));
                self.ctx.fill_rect(0.0, 0.0, w, h);
            }
        }
    }

    /// Base gradient, spots, vignette. `Field` backdrops are drawn as spots here.
    fn draw_backdrop(&self, backdrop: &Backdrop, viewport: &Viewport) -> EngineResult<u32> {
        let (w, h) = (viewport.width as f64, viewport.height as f64);
        let base = self.ctx.create_linear_gradient(0.0, 0.0, w, h);
        base.add_color_stop(0.0, &backdrop.top.css())?;
        base.add_color_stop(1.0, &backdrop.bottom.css())?;
        self.ctx.set_fill_style_canvas_gradient(&base);
        self.ctx.fill_rect(0.0, 0.0, w, h);
        let mut calls = 1;

        for spot in &backdrop.spots {
            let (x, y, r) = (spot.pos.x as f64, spot.pos.y as f64, spot.radius as f64);
            let gradient = self.ctx.create_radial_gradient(x, y, 0.0, x, y, r)?;
            gradient.add_color_stop(0.0, &spot.color.css_with_alpha(spot.alpha))?;
            gradient.add_color_stop(1.0, &spot.color.css_with_alpha(0.0))?;
            self.ctx.set_fill_style_canvas_gradient(&gradient);
            self.ctx.begin_path();
            self.ctx.arc(x, y, r, 0.0, TAU)?;
            self.ctx.fill();
            calls += 1;
        }

        if backdrop.vignette > 0.0 {
            let (cx, cy) = (w / 2.0, h / 2.0);
            let reach = w.max(h);
            let shade = self.ctx.create_radial_gradient(cx, cy, reach * 0.25, cx, cy, reach * 0.95)?;
            shade.add_color_stop(0.0, &BLACK.css_with_alpha(0.0))?;
            shade.add_color_stop(1.0, &BLACK.css_with_alpha(backdrop.vignette))?;
            self.ctx.set_fill_style_canvas_gradient(&shade);
            self.ctx.fill_rect(0.0, 0.0, w, h);
            calls += 1;
        }
        Ok(calls)
    }

    fn draw_halo(&self, sprite: &Sprite, halo: &Halo) -> EngineResult<()> {
        let (x, y) = (sprite.pos.x as f64, sprite.pos.y as f64);
        if halo.gradient {
            let gradient = self.ctx.create_radial_gradient(x, y, 0.0, x, y, halo.radius as f64)?;
            gradient.add_color_stop(0.0, &halo.color.css_with_alpha(halo.alpha))?;
            gradient.add_color_stop(1.0, &halo.color.css_with_alpha(0.0))?;
            self.ctx.set_fill_style_canvas_gradient(&gradient);
        } else {
            self.ctx.set_fill_style_str(&halo.color.css_with_alpha(halo.alpha));
        }
        self.ctx.begin_path();
        self.ctx.arc(x, y, halo.radius as f64, 0.0, TAU)?;
        self.ctx.fill();
        Ok(())
    }

    fn draw_disc(&self, sprite: &Sprite) -> EngineResult<()> {
        self.ctx.set_fill_style_str(&sprite.color.css_with_alpha(sprite.alpha));
        self.ctx.begin_path();
        self.ctx.arc(sprite.pos.x as f64, sprite.pos.y as f64, sprite.radius as f64, 0.0, TAU)?;
        self.ctx.fill();
        Ok(())
    }
}

impl Surface for Canvas2dSurface {
    fn kind(&self) -> BackendKind {
        BackendKind::Canvas2d
    }

    fn resize(&mut self, viewport: &Viewport) -> EngineResult<()> {
        let (w, h) = viewport.device_size();
        self.canvas.set_width(w);
        self.canvas.set_height(h);
        // Draw in CSS pixels; the transform maps them onto the device-pixel backing store
        let dpr = viewport.dpr as f64;
        self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
        Ok(())
    }

    fn present(&mut self, scene: &Scene) -> EngineResult<DrawStats> {
        let mut stats = DrawStats::default();
        self.clear(&scene.clear, &scene.viewport);
        stats.draw_calls += 1;

        if let Some(backdrop) = &scene.backdrop {
            stats.draw_calls += self.draw_backdrop(backdrop, &scene.viewport)?;
        }

        if !scene.links.is_empty() {
            self.ctx.set_line_width(scene.line_width as f64);
            for link in &scene.links {
                self.ctx.set_stroke_style_str(&scene.link_color.css_with_alpha(link.alpha));
                self.ctx.begin_path();
                self.ctx.move_to(link.from.x as f64, link.from.y as f64);
                self.ctx.line_to(link.to.x as f64, link.to.y as f64);
                self.ctx.stroke();
            }
            stats.links = scene.links.len() as u32;
            stats.draw_calls += stats.links;
        }

        for sprite in &scene.sprites {
            if let Some(halo) = &sprite.halo {
                self.draw_halo(sprite, halo)?;
                stats.draw_calls += 1;
            }
            self.draw_disc(sprite)?;
            stats.draw_calls += 1;
        }
        stats.sprites = scene.sprites.len() as u32;

        Ok(stats)
    }
}
