//! Per-monitor panel geometry.
//!
//! Derives the panel's pixel geometry from the monitor rectangle and that
//! monitor's settings. The geometry is immutable per recompute: any input
//! change replaces it wholesale, never patches it.

use ledge_config::{Metrics, MonitorId, PanelAnchor, PanelConfig, PanelLength, PanelPosition, Placement};

use super::dimensions::{Axis, Rect};

/// Thickness floor in logical pixels. When the configured padding would push
/// the inner size below this, the padding shrinks instead.
pub const MIN_THICKNESS: f64 = 22.;

/// A monitor as supplied by the host's display subsystem. Read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct Monitor {
    pub id: MonitorId,
    pub primary: bool,
    pub rect: Rect,
}

impl Monitor {
    pub fn new(id: MonitorId, primary: bool, rect: Rect) -> Self {
        Self { id, primary, rect }
    }
}

/// Derived geometry of one panel. Replaced wholesale on every recompute.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelGeometry {
    pub position: PanelPosition,
    pub anchor: PanelAnchor,
    pub length: PanelLength,
    /// Total thickness along the fixed axis, padding included.
    pub outer_size: f64,
    /// Thickness available to element boxes.
    pub inner_size: f64,
    /// Padding along the fixed axis, possibly shrunk by the thickness floor.
    pub fixed_padding: f64,
    /// Padding along the variable axis.
    pub var_padding: f64,
    /// Stacking tag for fit-content panels; `None` for fixed-length panels.
    pub dynamic: Option<Placement>,
    /// The panel does not span the monitor edge-to-edge.
    pub dock_mode: bool,
    /// Panel box in absolute coordinates, before any dynamic shrink.
    pub rect: Rect,
}

impl PanelGeometry {
    pub fn axis(&self) -> Axis {
        if self.position.is_vertical() {
            Axis::Vertical
        } else {
            Axis::Horizontal
        }
    }

    /// Extent along the variable axis, before any dynamic shrink.
    pub fn var_extent(&self) -> f64 {
        self.axis().pick(self.rect.size)
    }

    /// Extent along the variable axis minus both paddings.
    pub fn padded_extent(&self) -> f64 {
        (self.var_extent() - 2. * self.var_padding).max(0.)
    }

    /// Monitor extent along the variable axis (the dynamic shrink ceiling).
    pub fn monitor_extent(&self, monitor: &Monitor) -> f64 {
        self.axis().pick(monitor.rect.size)
    }

    /// Signed translation that moves the panel fully off-screen past its
    /// monitor edge. Used by the reveal slide.
    pub fn hidden_translation(&self) -> f64 {
        match self.position {
            PanelPosition::Top | PanelPosition::Left => -self.outer_size,
            PanelPosition::Bottom | PanelPosition::Right => self.outer_size,
        }
    }
}

/// Computes the panel geometry for one monitor.
///
/// All inputs are clamped to valid ranges before use; there are no failure
/// paths. Invalid persisted settings were already rejected at the write
/// boundary, so anything surprising here just falls back silently.
pub fn compute_geometry(
    monitor: &Monitor,
    config: &PanelConfig,
    metrics: &Metrics,
    scale: f64,
) -> PanelGeometry {
    let scale = if scale > 0. { scale } else { 1. };
    let vertical = config.position.is_vertical();

    // Fixed axis: thickness with the padding-vs-floor clamp.
    let outer_size = (f64::from(config.size) * scale).max(MIN_THICKNESS);
    let mut fixed_padding = (metrics.fixed_padding * scale).max(0.);
    if outer_size - 2. * fixed_padding < MIN_THICKNESS {
        fixed_padding = ((outer_size - MIN_THICKNESS) / 2.).max(0.);
    }
    let inner_size = outer_size - 2. * fixed_padding;

    let var_padding = (metrics.var_padding * scale).max(0.);
    let margin = (metrics.margin * scale).max(0.);

    // Variable axis: extent and the dynamic tag.
    let monitor_extent = if vertical {
        monitor.rect.size.h
    } else {
        monitor.rect.size.w
    };
    let dynamic = config
        .length
        .is_fit_content()
        .then(|| config.anchor.dynamic_placement());
    let extent = (monitor_extent * config.length.fraction() - 2. * margin).max(0.);

    let full_span = !config.length.is_fit_content()
        && config.length == PanelLength::Percent(ledge_config::panel::MAX_PANEL_LENGTH)
        && margin == 0.;
    let dock_mode = !full_span;

    // Origin: fixed axis snaps to the configured edge, variable axis is
    // placed per the anchor within the leftover space.
    let slack = monitor_extent - extent;
    let var_offset = match config.anchor {
        PanelAnchor::Start => margin,
        PanelAnchor::Middle => slack / 2.,
        PanelAnchor::End => slack - margin,
    };

    let rect = match config.position {
        PanelPosition::Top => Rect::from_loc_and_size(
            (monitor.rect.loc.x + var_offset, monitor.rect.loc.y),
            (extent, outer_size),
        ),
        PanelPosition::Bottom => Rect::from_loc_and_size(
            (
                monitor.rect.loc.x + var_offset,
                monitor.rect.bottom() - outer_size,
            ),
            (extent, outer_size),
        ),
        PanelPosition::Left => Rect::from_loc_and_size(
            (monitor.rect.loc.x, monitor.rect.loc.y + var_offset),
            (outer_size, extent),
        ),
        PanelPosition::Right => Rect::from_loc_and_size(
            (
                monitor.rect.right() - outer_size,
                monitor.rect.loc.y + var_offset,
            ),
            (outer_size, extent),
        ),
    };

    PanelGeometry {
        position: config.position,
        anchor: config.anchor,
        length: config.length,
        outer_size,
        inner_size,
        fixed_padding,
        var_padding,
        dynamic,
        dock_mode,
        rect,
    }
}
