// Drawing surface the engine renders onto. The canvas implementation wraps a
// 2D context; tests swap in a recording surface.

use crate::color::Color;
use crate::error::EngineError;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn resize(&mut self, width: u32, height: u32);
    fn clear(&mut self);
    // Everything drawn between begin and end lightens what is beneath it
    fn begin_glow_pass(&mut self) -> Result<(), EngineError>;
    fn draw_glow(
        &mut self,
        center: [f64; 2],
        radius: f64,
        color: Color,
        alpha: f64,
    ) -> Result<(), EngineError>;
    fn end_glow_pass(&mut self) -> Result<(), EngineError>;
}

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    const GLOW_COMPOSITE: &'static str = "screen";
    const NORMAL_COMPOSITE: &'static str = "source-over";

    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, EngineError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(EngineError::dom)?
            .ok_or(EngineError::ContextUnavailable)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| EngineError::ContextUnavailable)?;
        Ok(CanvasSurface { canvas, ctx })
    }

    pub fn from_element_id(id: &str) -> Result<Self, EngineError> {
        let document = web_sys::window()
            .ok_or(EngineError::WindowUnavailable)?
            .document()
            .ok_or(EngineError::WindowUnavailable)?;
        let canvas = document
            .get_element_by_id(id)
            .ok_or_else(|| EngineError::SurfaceUnavailable(id.to_owned()))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| EngineError::SurfaceUnavailable(id.to_owned()))?;
        CanvasSurface::new(canvas)
    }

    pub fn context(&self) -> &CanvasRenderingContext2d {
        &self.ctx
    }

    fn fill_gradient_disc(
        &self,
        center: [f64; 2],
        radius: f64,
        color: Color,
    ) -> Result<(), EngineError> {
        let [x, y] = center;
        let gradient = self
            .ctx
            .create_radial_gradient(x, y, 0.0, x, y, radius)
            .map_err(EngineError::draw)?;
        gradient
            .add_color_stop(0.0, &color.to_css())
            .map_err(EngineError::draw)?;
        gradient
            .add_color_stop(1.0, "transparent")
            .map_err(EngineError::draw)?;

        #[allow(deprecated)]
        self.ctx.set_fill_style(&gradient);
        self.ctx.begin_path();
        self.ctx
            .arc(x, y, radius, 0.0, std::f64::consts::PI * 2.0)
            .map_err(EngineError::draw)?;
        self.ctx.fill();
        Ok(())
    }
}

impl Surface for CanvasSurface {
    fn width(&self) -> u32 {
        self.canvas.width()
    }

    fn height(&self) -> u32 {
        self.canvas.height()
    }

    // Setting canvas dimensions also wipes its contents
    fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn clear(&mut self) {
        self.ctx.clear_rect(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );
    }

    fn begin_glow_pass(&mut self) -> Result<(), EngineError> {
        self.ctx
            .set_global_composite_operation(Self::GLOW_COMPOSITE)
            .map_err(EngineError::draw)
    }

    fn draw_glow(
        &mut self,
        center: [f64; 2],
        radius: f64,
        color: Color,
        alpha: f64,
    ) -> Result<(), EngineError> {
        self.ctx.save();
        self.ctx.set_global_alpha(alpha);
        let drawn = self.fill_gradient_disc(center, radius, color);
        self.ctx.restore();
        drawn
    }

    fn end_glow_pass(&mut self) -> Result<(), EngineError> {
        self.ctx
            .set_global_composite_operation(Self::NORMAL_COMPOSITE)
            .map_err(EngineError::draw)
    }
}
