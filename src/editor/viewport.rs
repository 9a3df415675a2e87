//! Pan and zoom state of the canvas.
//!
//! Screen coordinates are pixels inside the canvas element; flow coordinates
//! are the graph's own space. `screen = flow * zoom + pan`.

use serde::Serialize;

use crate::{config::ViewportConfig, workflow::node::Position};

/// Axis-aligned rectangle in flow coordinates.
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(
        &self,
        p: Position,
    ) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    pub fn center(&self) -> Position {
        Position::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Smallest rectangle covering both.
    pub fn union(
        &self,
        other: &Rect,
    ) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let bottom = (self.y + self.height).max(other.y + other.height);
        Rect::new(x, y, right - x, bottom - y)
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Viewport {
    /// screen offset of the flow origin
    pub pan: Position,
    pub zoom: f64,
    #[serde(skip)]
    config: ViewportConfig,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ViewportConfig::default())
    }
}

impl Viewport {
    pub fn new(config: ViewportConfig) -> Self {
        Self {
            pan: Position::default(),
            zoom: 1.0,
            config,
        }
    }

    pub fn screen_to_flow(
        &self,
        p: Position,
    ) -> Position {
        Position::new((p.x - self.pan.x) / self.zoom, (p.y - self.pan.y) / self.zoom)
    }

    pub fn flow_to_screen(
        &self,
        p: Position,
    ) -> Position {
        Position::new(p.x * self.zoom + self.pan.x, p.y * self.zoom + self.pan.y)
    }

    /// Whether a screen point lies on the canvas element.
    pub fn contains_screen(
        &self,
        p: Position,
    ) -> bool {
        Rect::new(0.0, 0.0, self.config.width, self.config.height).contains(p)
    }

    /// Zoom percentage shown in the toolbar.
    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }

    pub fn pan_by(
        &mut self,
        dx: f64,
        dy: f64,
    ) {
        self.pan = self.pan.offset(dx, dy);
    }

    pub fn zoom_in(&mut self) {
        let center = self.screen_center();
        self.zoom_to(self.zoom * self.config.zoom_step, center);
    }

    pub fn zoom_out(&mut self) {
        let center = self.screen_center();
        self.zoom_to(self.zoom / self.config.zoom_step, center);
    }

    /// Set the zoom level, clamped to the configured range, keeping the flow
    /// point under `anchor` fixed on screen.
    pub fn zoom_to(
        &mut self,
        zoom: f64,
        anchor: Position,
    ) {
        let fixed = self.screen_to_flow(anchor);
        self.zoom = zoom.clamp(self.config.min_zoom, self.config.max_zoom);
        self.pan = Position::new(anchor.x - fixed.x * self.zoom, anchor.y - fixed.y * self.zoom);
    }

    /// Frame `bounds` inside the canvas with the configured padding.
    /// With nothing to frame the view resets to the origin at 100%.
    pub fn fit_view(
        &mut self,
        bounds: Option<Rect>,
    ) {
        let Some(bounds) = bounds else {
            self.pan = Position::default();
            self.zoom = 1.0;
            return;
        };
        let pad = self.config.fit_padding;
        let avail_w = (self.config.width - 2.0 * pad).max(1.0);
        let avail_h = (self.config.height - 2.0 * pad).max(1.0);
        let zoom = (avail_w / bounds.width.max(1.0)).min(avail_h / bounds.height.max(1.0));
        self.zoom = zoom.clamp(self.config.min_zoom, self.config.max_zoom);

        let center = bounds.center();
        self.pan = Position::new(self.config.width / 2.0 - center.x * self.zoom, self.config.height / 2.0 - center.y * self.zoom);
    }

    fn screen_center(&self) -> Position {
        Position::new(self.config.width / 2.0, self.config.height / 2.0)
    }
}
