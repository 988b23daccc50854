//! Panel layout and auto-hide engine.
//!
//! ledge computes, for each monitor, the geometry of a panel bar and
//! distributively allocates its elements (show-apps button, taskbar, date
//! menu, ...) into stacked, centered and monitor-centered groups along the
//! panel's variable axis. An orthogonal intellihide state machine decides
//! when the panel is revealed at all.
//!
//! The engine is host-agnostic by design: it never owns an event loop, a
//! scene graph or a settings backend. Instead the host implements three small
//! capabilities and drives the engine from its own single-threaded loop:
//!
//! * [`panel::PanelElement`]: preferred-size query and box commit for one
//!   panel widget.
//! * [`reveal::RevealHost`]: the pointer/window/grab queries the intellihide
//!   heuristic needs.
//! * `ledge_config::SettingsStore`: key/value settings with change
//!   notification.
//!
//! Derived state is always rebuilt from scratch: a settings change replaces
//! the whole [`panel::Options`], geometry is recomputed wholesale, and the
//! allocation solve re-runs on every layout pass. Nothing is patched
//! incrementally, which is what makes the single-threaded re-entrant model
//! safe.

#[macro_use]
extern crate tracing;

pub mod animation;
pub mod panel;
pub mod reveal;
pub mod utils;
