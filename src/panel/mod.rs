//! The panel engine: geometry, grouping, allocation, coordination.
//!
//! The host talks to this module through two seams: [`PanelElement`], which
//! adapts the host's widgets to preferred-size queries and box commits, and
//! [`crate::reveal::RevealHost`], which answers the intellihide heuristic's
//! questions. Everything in between is pure bookkeeping over those traits.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use ledge_config::{Config, ElementKind};

pub mod bar;
pub mod dimensions;
pub mod geometry;
pub mod plan;
pub mod shared;
pub mod solve;

pub use bar::Panel;
pub use geometry::{Monitor, PanelGeometry};
pub use shared::SharedPanelState;

use dimensions::Rect;

use crate::animation::Clock;
use crate::reveal::RevealHost;

/// Host adapter for one panel element.
///
/// `natural_size` must be a pure query; the solver may call it several times
/// per layout pass. `commit_box` must be idempotent, since the same box is
/// re-committed on every pass whether or not it changed.
pub trait PanelElement {
    fn kind(&self) -> ElementKind;

    /// Preferred size along the variable axis, given the thickness available
    /// on the fixed axis.
    fn natural_size(&self, fixed_extent: f64) -> f64;

    /// Applies the allocated box, in panel-local coordinates.
    fn commit_box(&mut self, rect: Rect) -> anyhow::Result<()>;
}

/// Immutable snapshot of everything the panels need to lay out.
///
/// Swapped wholesale on any settings change; panels hold an `Rc` to the
/// current snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Options {
    /// Output scale factor applied to all configured logical sizes.
    pub scale: f64,
    pub config: Config,
}

/// Top-level owner: one [`Panel`] per monitor plus the state they share.
#[derive(Debug)]
pub struct PanelSet<E: PanelElement> {
    panels: Vec<Panel<E>>,
    options: Rc<Options>,
    clock: Clock,
    shared: Rc<RefCell<SharedPanelState>>,
    /// Hold mask restored from the settings store, handed to each new
    /// panel's reveal controller.
    persisted_hold: Option<i64>,
}

impl<E: PanelElement> PanelSet<E> {
    pub fn new(options: Rc<Options>, clock: Clock, persisted_hold: Option<i64>) -> Self {
        Self {
            panels: Vec::new(),
            options,
            clock,
            shared: Rc::new(RefCell::new(SharedPanelState::new())),
            persisted_hold,
        }
    }

    pub fn panels(&self) -> &[Panel<E>] {
        &self.panels
    }

    pub fn panels_mut(&mut self) -> &mut [Panel<E>] {
        &mut self.panels
    }

    /// The primary monitor's panel, if one exists.
    pub fn primary(&self) -> Option<&Panel<E>> {
        self.panels.iter().find(|p| p.monitor().primary)
    }

    pub fn shared(&self) -> &Rc<RefCell<SharedPanelState>> {
        &self.shared
    }

    /// Rebuilds the panel list for a new monitor set. Existing panels are
    /// torn down; `make_elements` supplies each new panel's host elements.
    pub fn monitors_changed(
        &mut self,
        monitors: Vec<Monitor>,
        mut make_elements: impl FnMut(&Monitor) -> Vec<E>,
        host: &dyn RevealHost,
    ) {
        self.panels = monitors
            .into_iter()
            .map(|monitor| {
                let elements = make_elements(&monitor);
                Panel::new(
                    monitor,
                    elements,
                    self.options.clone(),
                    self.clock.clone(),
                    self.persisted_hold,
                    host,
                )
            })
            .collect();
    }

    /// Applies a new options snapshot to every panel.
    pub fn update_config(&mut self, options: Rc<Options>, host: &dyn RevealHost) {
        self.options = options;
        for panel in &mut self.panels {
            panel.update_config(self.options.clone(), host);
        }
    }

    /// Advances the shared clock and fires every panel's timers and
    /// animations. Call once per event loop dispatch.
    pub fn advance(&mut self, now: Duration, host: &dyn RevealHost) {
        self.clock.set(now);
        for panel in &mut self.panels {
            panel.reveal_mut().advance(host);
        }
    }

    /// Runs an allocation pass on every panel. Commit failures are logged
    /// and do not stop the other panels; the failed panel keeps its previous
    /// boxes until the next pass.
    pub fn allocate_all(&mut self) -> Vec<Rect> {
        let mut boxes = Vec::with_capacity(self.panels.len());
        for panel in &mut self.panels {
            match panel.allocate() {
                Ok(rect) => boxes.push(rect),
                Err(err) => {
                    warn!("panel allocation failed on {}: {err:?}", panel.monitor().id);
                    boxes.push(panel.geometry().rect.round());
                }
            }
        }
        boxes
    }

    /// Collects hold masks that reveal controllers asked to persist since
    /// the last call. The host writes the last one to the settings store.
    pub fn take_pending_persist(&mut self) -> Option<i64> {
        let mut pending = None;
        for panel in &mut self.panels {
            if let Some(mask) = panel.reveal_mut().take_pending_persist() {
                pending = Some(mask);
            }
        }
        pending
    }
}
