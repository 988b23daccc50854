use std::time::Duration;

/// Behavior knobs for the intellihide state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealConfig {
    /// Master switch; disabled panels stay shown.
    pub enabled: bool,
    /// Delay before the first visibility evaluation after `enable()`.
    pub start_delay: Duration,
    /// Delay before hiding after a hover-out. Other hides are immediate.
    pub hide_delay: Duration,
    /// Minimum interval between host-event-driven re-evaluations; requests
    /// inside the window coalesce and re-run once after it closes.
    pub min_update_interval: Duration,
    /// Reveal on edge pressure even while a mouse button is held, when the
    /// focused window is fullscreen.
    pub fullscreen_override: bool,
    /// Pointer travel, in pixels, the host's edge barrier accumulates
    /// before it fires a reveal trigger.
    pub pressure_threshold: i32,
    /// Window within which that travel must accumulate.
    pub pressure_timeout: Duration,
    /// Hide only while a window actually overlaps the panel's monitor.
    pub only_when_obstructed: bool,
    /// Allow notifications to force-reveal the panel.
    pub reveal_on_notify: bool,
    /// Duration of the slide animation between shown and hidden.
    pub animation_duration: Duration,
    /// Persist the PERMANENT hold bit back to the settings store.
    pub persist_hold: bool,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            start_delay: Duration::from_millis(2000),
            hide_delay: Duration::from_millis(400),
            min_update_interval: Duration::from_millis(250),
            fullscreen_override: false,
            pressure_threshold: 100,
            pressure_timeout: Duration::from_millis(1000),
            only_when_obstructed: true,
            reveal_on_notify: true,
            animation_duration: Duration::from_millis(200),
            persist_hold: false,
        }
    }
}
