//! Namespaced settings keys and their write-boundary validation.
//!
//! The engine's read side always sees previously valid values or built-in
//! defaults, so validation only needs to exist here, where writes enter the
//! store.

use crate::panel::{
    PanelAnchor, PanelLength, PanelPosition, PerMonitor, MAX_PANEL_SIZE, MIN_PANEL_SIZE,
};
use crate::elements::ElementOrder;

// Per-monitor JSON maps.
pub const PANEL_SIZES: &str = "panel-sizes";
pub const PANEL_LENGTHS: &str = "panel-lengths";
pub const PANEL_POSITIONS: &str = "panel-positions";
pub const PANEL_ANCHORS: &str = "panel-anchors";
pub const PANEL_ELEMENT_POSITIONS: &str = "panel-element-positions";

// Global integers/booleans.
pub const PANEL_FIXED_PADDING: &str = "panel-fixed-padding";
pub const PANEL_VAR_PADDING: &str = "panel-var-padding";
pub const PANEL_MARGIN: &str = "panel-margin";

pub const INTELLIHIDE: &str = "intellihide";
pub const INTELLIHIDE_START_DELAY: &str = "intellihide-enable-start-delay";
pub const INTELLIHIDE_HIDE_DELAY: &str = "intellihide-close-delay";
pub const INTELLIHIDE_ANIMATION_TIME: &str = "intellihide-animation-time";
pub const INTELLIHIDE_FULLSCREEN: &str = "intellihide-show-in-fullscreen";
pub const INTELLIHIDE_ONLY_WHEN_OBSTRUCTED: &str = "intellihide-hide-from-windows";
pub const INTELLIHIDE_REVEAL_ON_NOTIFY: &str = "intellihide-show-on-notification";
pub const INTELLIHIDE_PERSIST: &str = "intellihide-persist-state";
pub const INTELLIHIDE_PRESSURE_THRESHOLD: &str = "intellihide-pressure-threshold";
pub const INTELLIHIDE_PRESSURE_TIME: &str = "intellihide-pressure-time";

/// Last hold mask ANDed with PERMANENT, or -1 when not persisted.
pub const INTELLIHIDE_PERSISTED_STATE: &str = "intellihide-persisted-state";

/// Whether an integer write for `key` is acceptable.
pub fn validate_int(key: &str, value: i64) -> bool {
    match key {
        INTELLIHIDE_START_DELAY
        | INTELLIHIDE_HIDE_DELAY
        | INTELLIHIDE_ANIMATION_TIME
        | INTELLIHIDE_PRESSURE_THRESHOLD
        | INTELLIHIDE_PRESSURE_TIME => value >= 0,
        PANEL_FIXED_PADDING | PANEL_VAR_PADDING | PANEL_MARGIN => (0..=64).contains(&value),
        INTELLIHIDE_PERSISTED_STATE => value >= -1,
        _ => true,
    }
}

/// Whether a string write for `key` is acceptable.
///
/// Per-monitor blobs must parse as their target map type; anything else goes
/// through unchecked (hosts own their own keys).
pub fn validate_string(key: &str, value: &str) -> bool {
    fn parses<T: serde::de::DeserializeOwned + Clone + Default>(value: &str) -> bool {
        value.is_empty() || serde_json::from_str::<std::collections::HashMap<crate::panel::MonitorId, T>>(value).is_ok()
    }

    match key {
        PANEL_SIZES => {
            parses::<i32>(value)
                && PerMonitor::<i32>::parse(key, value)
                    .0
                    .values()
                    .all(|size| (MIN_PANEL_SIZE..=MAX_PANEL_SIZE).contains(size))
        }
        PANEL_LENGTHS => parses::<PanelLength>(value),
        PANEL_POSITIONS => parses::<PanelPosition>(value),
        PANEL_ANCHORS => parses::<PanelAnchor>(value),
        PANEL_ELEMENT_POSITIONS => {
            parses::<ElementOrder>(value)
                && PerMonitor::<ElementOrder>::parse(key, value)
                    .0
                    .values()
                    .all(ElementOrder::is_valid)
        }
        _ => true,
    }
}
