//! Terminal presentation of a [`Canvas`] using half-block characters.

use glowfield_core::Rgba;
use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};

use crate::canvas::Canvas;

/// Upper half block: foreground paints the top pixel, background the bottom.
const HALF_BLOCK: char = '▀';

/// Raster resolution that maps one pixel to each half of a terminal cell.
pub fn raster_for(area: Rect) -> (usize, usize) {
    (area.width as usize, area.height as usize * 2)
}

/// Widget drawing a canvas into a terminal area, two pixels per cell.
///
/// Translucent pixels are flattened onto the colors the cell already shows,
/// so a canvas can be layered over another one. Cells without an RGB color
/// flatten onto `backdrop`. Cells outside the canvas raster are left
/// untouched.
#[derive(Debug, Clone, Copy)]
pub struct CanvasView<'a> {
    canvas: &'a Canvas,
    backdrop: Rgba,
}

impl<'a> CanvasView<'a> {
    pub fn new(canvas: &'a Canvas) -> Self {
        Self {
            canvas,
            backdrop: Rgba::BLACK,
        }
    }

    /// Color translucent pixels are composited onto where the buffer has
    /// nothing to show through.
    pub fn backdrop(mut self, backdrop: Rgba) -> Self {
        self.backdrop = backdrop;
        self
    }

    fn color_at(&self, col: usize, row: usize, under: Color) -> Option<Color> {
        let backdrop = match under {
            Color::Rgb(r, g, b) => Rgba::rgba8(r, g, b, 1.0),
            _ => self.backdrop,
        };
        self.canvas.pixel(col, row).map(|px| {
            let (r, g, b) = px.to_rgb8_over(backdrop);
            Color::Rgb(r, g, b)
        })
    }
}

impl Widget for CanvasView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = area.intersection(buf.area);
        for y in 0..area.height {
            let row = y as usize * 2;
            for x in 0..area.width {
                let col = x as usize;
                let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) else {
                    continue;
                };
                // A half block from an earlier layer splits the cell; anything
                // else shows its background in both halves.
                let (under_top, under_bottom) = if cell.symbol() == "▀" {
                    (cell.fg, cell.bg)
                } else {
                    (cell.bg, cell.bg)
                };
                let Some(top) = self.color_at(col, row, under_top) else {
                    continue;
                };
                let bottom = self.color_at(col, row + 1, under_bottom).unwrap_or(top);
                cell.set_char(HALF_BLOCK).set_fg(top).set_bg(bottom);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glowfield_core::{Point, Size};

    fn red_over_blue() -> Canvas {
        // Top half red, bottom half blue, one pixel per half cell.
        let mut canvas = Canvas::new(Size::new(2.0, 2.0), 2, 2).unwrap();
        canvas.paint(|c| {
            c.fill_vertical_gradient(&[
                (0.0, Rgba::hex(0xff0000)),
                (0.5, Rgba::hex(0xff0000)),
                (0.5, Rgba::hex(0x0000ff)),
                (1.0, Rgba::hex(0x0000ff)),
            ]);
        });
        canvas
    }

    fn rgb(color: Color) -> (u8, u8, u8) {
        match color {
            Color::Rgb(r, g, b) => (r, g, b),
            other => panic!("expected an RGB color, got {other:?}"),
        }
    }

    #[test]
    fn test_raster_for_area() {
        assert_eq!(raster_for(Rect::new(0, 0, 80, 24)), (80, 48));
    }

    #[test]
    fn test_half_blocks_carry_two_pixels() {
        let canvas = red_over_blue();
        let area = Rect::new(0, 0, 2, 1);
        let mut buf = Buffer::empty(area);
        CanvasView::new(&canvas).render(area, &mut buf);

        let cell = &buf[(0, 0)];
        assert_eq!(cell.symbol(), "▀");
        let (r, g, b) = rgb(cell.fg);
        assert!(r > 240 && g < 10 && b < 10);
        let (r, g, b) = rgb(cell.bg);
        assert!(r < 10 && g < 10 && b > 240);
    }

    #[test]
    fn test_translucent_pixels_use_backdrop() {
        let mut canvas = Canvas::new(Size::new(1.0, 2.0), 1, 2).unwrap();
        canvas.paint(|c| c.fill(Rgba::new(1.0, 1.0, 1.0, 0.5)));
        let area = Rect::new(0, 0, 1, 1);
        let mut buf = Buffer::empty(area);
        CanvasView::new(&canvas)
            .backdrop(Rgba::hex(0x0000ff))
            .render(area, &mut buf);

        let (r, _, b) = rgb(buf[(0, 0)].fg);
        assert!((126..=130).contains(&r));
        assert!(b > 250);
    }

    #[test]
    fn test_layers_over_existing_half_blocks() {
        let area = Rect::new(0, 0, 2, 1);
        let mut buf = Buffer::empty(area);
        CanvasView::new(&red_over_blue()).render(area, &mut buf);

        let mut veil = Canvas::new(Size::new(2.0, 2.0), 2, 2).unwrap();
        veil.paint(|c| c.fill_circle(Point::new(1.0, 1.0), 10.0, Rgba::BLACK.with_alpha(0.5)));
        CanvasView::new(&veil)
            .backdrop(Rgba::hex(0xffffff))
            .render(area, &mut buf);

        // Half of the red and blue underneath still shows; the white
        // backdrop is not used because the cell already has colors.
        let (r, g, _) = rgb(buf[(0, 0)].fg);
        assert!((120..=135).contains(&r) && g < 10);
        let (r, _, b) = rgb(buf[(0, 0)].bg);
        assert!(r < 10 && (120..=135).contains(&b));
    }

    #[test]
    fn test_cells_outside_raster_untouched() {
        let canvas = Canvas::new(Size::new(1.0, 2.0), 1, 2).unwrap();
        let area = Rect::new(0, 0, 3, 1);
        let mut buf = Buffer::empty(area);
        CanvasView::new(&canvas).render(area, &mut buf);
        assert_eq!(buf[(0, 0)].symbol(), "▀");
        assert_eq!(buf[(2, 0)].symbol(), " ");
    }
}
