//! Drawing surface backed by `vello_cpu`.
//!
//! A [`Canvas`] has a logical size, the coordinate space callers draw in, and
//! a raster resolution, the pixels actually stored. Drawing happens inside
//! [`Canvas::paint`], which records a scene in logical coordinates and
//! rasterizes it into the pixmap, so the same drawing code works whether the
//! surface is shown at full resolution or squeezed into a terminal.

use glowfield_core::{Point, Rgba, Size};
use kurbo::{Affine, BezPath, Circle, Rect, Shape, Stroke};
use thiserror::Error;
use tracing::debug;
use vello_cpu::peniko::{Color, Gradient};
use vello_cpu::{Pixmap, RenderContext};

/// Largest raster the canvas will allocate.
pub const MAX_RASTER_PIXELS: usize = 4096 * 4096;

/// Tolerance used when turning circles into paths, in logical pixels.
const SHAPE_TOLERANCE: f64 = 0.1;

/// Errors raised while acquiring or resizing a surface.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CanvasError {
    #[error("raster of {cols}x{rows} pixels exceeds the limit of {max} pixels")]
    TooLarge { cols: usize, rows: usize, max: usize },
}

/// Color stops of a gradient, offsets in `0.0..=1.0`, in ascending order.
pub type ColorStops<'a> = &'a [(f32, Rgba)];

/// An owned drawing surface.
#[derive(Debug)]
pub struct Canvas {
    size: Size,
    ctx: RenderContext,
    pixmap: Pixmap,
}

impl Canvas {
    /// Allocate a transparent surface of `cols` x `rows` pixels covering
    /// `size` logical pixels.
    pub fn new(size: Size, cols: usize, rows: usize) -> Result<Self, CanvasError> {
        let (width, height) = raster_dims(cols, rows)?;
        Ok(Self {
            size,
            ctx: render_context(width, height),
            pixmap: Pixmap::new(width, height),
        })
    }

    /// Logical size of the surface.
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn cols(&self) -> usize {
        usize::from(self.pixmap.width())
    }

    pub fn rows(&self) -> usize {
        usize::from(self.pixmap.height())
    }

    /// The rasterized surface, premultiplied RGBA8.
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Raster pixel at `(col, row)` as a straight-alpha color.
    pub fn pixel(&self, col: usize, row: usize) -> Option<Rgba> {
        if col >= self.cols() || row >= self.rows() {
            return None;
        }
        let px = self.pixmap.data().get(row * self.cols() + col)?;
        Some(unpremultiply(px.r, px.g, px.b, px.a))
    }

    /// Change the logical size and raster resolution. A new raster starts out
    /// transparent until the next [`Canvas::paint`].
    pub fn resize(&mut self, size: Size, cols: usize, rows: usize) -> Result<(), CanvasError> {
        if cols != self.cols() || rows != self.rows() {
            let (width, height) = raster_dims(cols, rows)?;
            self.ctx = render_context(width, height);
            self.pixmap = Pixmap::new(width, height);
        }
        if size != self.size {
            debug!(
                width = size.width(),
                height = size.height(),
                cols,
                rows,
                "canvas resized"
            );
        }
        self.size = size;
        Ok(())
    }

    /// Replace the surface contents with the scene drawn by `scene`.
    ///
    /// Drawing calls record into the scene; the pixmap is updated once the
    /// closure returns. Surfaces with no area stay transparent.
    pub fn paint(&mut self, scene: impl FnOnce(&mut Self)) {
        if self.size.is_empty() || self.pixmap.width() == 0 || self.pixmap.height() == 0 {
            self.pixmap.data_as_u8_slice_mut().fill(0);
            return;
        }
        self.ctx.reset();
        self.ctx.set_transform(Affine::scale_non_uniform(
            f64::from(self.pixmap.width()) / self.size.width(),
            f64::from(self.pixmap.height()) / self.size.height(),
        ));
        scene(self);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);
    }

    /// Cover the whole surface with `color`.
    pub fn fill(&mut self, color: Rgba) {
        let bounds = self.bounds();
        self.ctx.set_paint(to_color(color));
        self.ctx.fill_rect(&bounds);
    }

    /// Paint a radial gradient over the whole surface: `stops` are spread
    /// from `center` (offset 0) to `radius` (offset 1); beyond the radius the
    /// last stop is used. A non-positive radius paints nothing.
    pub fn fill_radial_gradient(&mut self, center: Point, radius: f64, stops: ColorStops<'_>) {
        if !(radius > 0.0) || !center.is_finite() {
            return;
        }
        self.fill_gradient(Gradient::new_radial(center, radius as f32), stops);
    }

    /// Paint a top-to-bottom linear gradient over the whole surface.
    pub fn fill_vertical_gradient(&mut self, stops: ColorStops<'_>) {
        let gradient = Gradient::new_linear((0.0, 0.0), (0.0, self.size.height()));
        self.fill_gradient(gradient, stops);
    }

    /// Fill a circle.
    pub fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba) {
        if !(radius > 0.0) || !center.is_finite() {
            return;
        }
        self.ctx.set_paint(to_color(color));
        self.ctx
            .fill_path(&Circle::new(center, radius).to_path(SHAPE_TOLERANCE));
    }

    /// Stroke `path` with round joins and caps. Overlapping parts of the
    /// stroke are painted once.
    pub fn stroke(&mut self, path: &BezPath, width: f64, color: Rgba) {
        if !(width > 0.0) {
            return;
        }
        self.ctx.set_stroke(Stroke::new(width));
        self.ctx.set_paint(to_color(color));
        self.ctx.stroke_path(path);
    }

    fn fill_gradient(&mut self, gradient: Gradient, stops: ColorStops<'_>) {
        match stops {
            [] => {}
            [(_, only)] => self.fill(*only),
            _ => {
                let stops: Vec<(f32, Color)> = stops
                    .iter()
                    .map(|&(offset, color)| (offset, to_color(color)))
                    .collect();
                let bounds = self.bounds();
                self.ctx.set_paint(gradient.with_stops(stops.as_slice()));
                self.ctx.fill_rect(&bounds);
            }
        }
    }

    fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.size.width(), self.size.height())
    }
}

fn raster_dims(cols: usize, rows: usize) -> Result<(u16, u16), CanvasError> {
    let too_large = CanvasError::TooLarge {
        cols,
        rows,
        max: MAX_RASTER_PIXELS,
    };
    match cols.checked_mul(rows) {
        Some(len) if len <= MAX_RASTER_PIXELS => {}
        _ => return Err(too_large),
    }
    match (u16::try_from(cols), u16::try_from(rows)) {
        (Ok(width), Ok(height)) => Ok((width, height)),
        _ => Err(too_large),
    }
}

/// Empty rasters still get a one-pixel context; [`Canvas::paint`] never
/// renders them.
fn render_context(width: u16, height: u16) -> RenderContext {
    RenderContext::new(width.max(1), height.max(1))
}

fn to_color(color: Rgba) -> Color {
    Color::new([color.r, color.g, color.b, color.a])
}

fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> Rgba {
    if a == 0 {
        return Rgba::TRANSPARENT;
    }
    let alpha = f32::from(a) / 255.0;
    let channel = |c: u8| (f32::from(c) / 255.0 / alpha).min(1.0);
    Rgba::new(channel(r), channel(g), channel(b), alpha)
}
