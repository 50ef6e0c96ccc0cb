//! Backdrop state management: which animations are mounted and how they
//! map onto the terminal.

use glowfield_canvas::{Canvas, CanvasView, raster_for};
use glowfield_core::{BackdropStyle, Size};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::{
    Frame,
    layout::Rect,
    widgets::{Block, BorderType},
};
use tracing::debug;

use crate::curve_flow::{CurveFlow, SURFACE_SIZE, surface_size};
use crate::gradient_field::GradientField;
use crate::mount::Mount;
use crate::palette::NEBULA_BACKDROP;

/// Share of the screen the flow card may use in composite mode.
const CARD_FRACTION: f64 = 0.6;

/// Host-side options for the backdrops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackdropOptions {
    /// Logical nebula pixels per terminal half-cell.
    pub pixel_scale: f64,
    /// Darken the bottom of the nebula.
    pub vignette: bool,
}

impl Default for BackdropOptions {
    fn default() -> Self {
        Self {
            pixel_scale: 8.0,
            vignette: true,
        }
    }
}

/// Backdrop animation state.
#[derive(Debug)]
pub struct BackdropState {
    /// Currently shown style.
    style: BackdropStyle,
    /// Mounted nebula, if shown.
    nebula: Option<Mount<GradientField>>,
    /// Mounted flow, if shown.
    flow: Option<Mount<CurveFlow>>,
    /// Random source for freshly mounted animations.
    rng: StdRng,
    options: BackdropOptions,
}

impl BackdropState {
    /// Create the state. Animations are mounted on the first render, once
    /// the viewport is known.
    pub fn new(style: BackdropStyle, options: BackdropOptions, rng: StdRng) -> Self {
        Self {
            style,
            nebula: None,
            flow: None,
            rng,
            options,
        }
    }

    pub fn style(&self) -> BackdropStyle {
        self.style
    }

    pub fn options(&self) -> BackdropOptions {
        self.options
    }

    pub fn nebula(&self) -> Option<&Mount<GradientField>> {
        self.nebula.as_ref()
    }

    pub fn flow(&self) -> Option<&Mount<CurveFlow>> {
        self.flow.as_ref()
    }

    /// Switch styles, unmounting animations the new style does not show.
    pub fn set_style(&mut self, style: BackdropStyle) {
        if style == self.style {
            return;
        }
        debug!(from = self.style.label(), to = style.label(), "backdrop style changed");
        self.style = style;
        if !style.shows_nebula() {
            unmount(&mut self.nebula);
        }
        if !style.shows_flow() {
            unmount(&mut self.flow);
        }
    }

    pub fn set_vignette(&mut self, vignette: bool) {
        self.options.vignette = vignette;
        if let Some(mount) = self.nebula.as_mut() {
            mount.animation_mut().set_vignette(vignette);
        }
    }

    /// Tear everything down and start over from a new random source.
    pub fn reseed(&mut self, seed: Option<u64>) {
        self.unmount_all();
        self.rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
    }

    /// Stop all animations. Returns how many were running.
    pub fn unmount_all(&mut self) -> usize {
        usize::from(unmount(&mut self.nebula)) + usize::from(unmount(&mut self.flow))
    }

    /// Render the backdrop into `area`, advancing one frame unless paused.
    pub fn render(&mut self, frame: &mut Frame, area: Rect, paused: bool) {
        match self.style {
            BackdropStyle::None => {}
            BackdropStyle::Nebula => self.render_nebula(frame, area, paused),
            BackdropStyle::Flow => self.render_flow(frame, fit_flow(area, 1.0), paused),
            BackdropStyle::Composite => {
                self.render_nebula(frame, area, paused);
                let card = fit_flow(area, CARD_FRACTION);
                let block = Block::bordered().border_type(BorderType::Rounded);
                let frame_rect = Rect::new(
                    card.x.saturating_sub(1),
                    card.y.saturating_sub(1),
                    card.width.saturating_add(2),
                    card.height.saturating_add(2),
                );
                frame.render_widget(block, frame_rect.intersection(area));
                self.render_flow(frame, card, paused);
            }
        }
    }

    fn render_nebula(&mut self, frame: &mut Frame, area: Rect, paused: bool) {
        let (cols, rows) = raster_for(area);
        let viewport = Size::new(cols as f64, rows as f64).scaled(self.options.pixel_scale);
        let rng = &mut self.rng;
        let vignette = self.options.vignette;
        let mount = self.nebula.get_or_insert_with(|| {
            let mut field = GradientField::new(rng, viewport);
            field.set_vignette(vignette);
            Mount::new(field, Canvas::new(viewport, cols, rows))
        });
        mount.resize(viewport, cols, rows);
        draw(frame, area, mount, paused);
    }

    fn render_flow(&mut self, frame: &mut Frame, area: Rect, paused: bool) {
        let (cols, rows) = raster_for(area);
        let rng = &mut self.rng;
        let mount = self.flow.get_or_insert_with(|| {
            Mount::new(
                CurveFlow::new(rng),
                Canvas::new(surface_size(), cols, rows),
            )
        });
        mount.resize(surface_size(), cols, rows);
        draw(frame, area, mount, paused);
    }
}

impl Drop for BackdropState {
    fn drop(&mut self) {
        self.unmount_all();
    }
}

fn unmount<A: crate::Animation>(slot: &mut Option<Mount<A>>) -> bool {
    slot.take().is_some_and(|mut mount| mount.unmount())
}

/// Show a mount's surface, layered over whatever is already drawn in `area`.
/// Where nothing is, translucent pixels sit on the nebula's base color.
fn draw<A: crate::Animation>(frame: &mut Frame, area: Rect, mount: &mut Mount<A>, paused: bool) {
    let surface = if paused { mount.surface() } else { mount.frame() };
    if let Some(canvas) = surface {
        frame.render_widget(CanvasView::new(canvas).backdrop(NEBULA_BACKDROP), area);
    }
}

/// Largest centered rect with the flow surface's aspect ratio that fits in
/// `fraction` of `area`, measured in half-cell pixels.
pub fn fit_flow(area: Rect, fraction: f64) -> Rect {
    let (cols, rows) = raster_for(area);
    let avail_w = cols as f64 * fraction;
    let avail_h = rows as f64 * fraction;
    let scale = (avail_w / SURFACE_SIZE.0).min(avail_h / SURFACE_SIZE.1);

    let width = floor_cells(SURFACE_SIZE.0 * scale).min(area.width);
    let height = floor_cells(SURFACE_SIZE.1 * scale / 2.0).min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Round down to whole cells, forgiving float error just below an integer.
fn floor_cells(value: f64) -> u16 {
    (value + 1e-9).floor() as u16
}
