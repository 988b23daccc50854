//! Configuration model for the ledge panel engine.
//!
//! Settings live in a host-provided key/value store ([`SettingsStore`]) under
//! namespaced string keys. Per-monitor options are JSON-encoded maps keyed by
//! a stable [`MonitorId`]; global options are plain typed keys. Reads always
//! succeed: anything missing or malformed falls back to the built-in defaults
//! with a warning, because validation already happened at the write boundary.

#[macro_use]
extern crate tracing;

use std::time::Duration;

pub mod elements;
pub mod keys;
pub mod panel;
pub mod reveal;
pub mod store;

pub use crate::elements::{ElementKind, ElementLayout, ElementOrder, Placement};
pub use crate::panel::{
    Metrics, MonitorId, PanelAnchor, PanelConfig, PanelLength, PanelPosition, PerMonitor,
};
pub use crate::reveal::RevealConfig;
pub use crate::store::{MemoryStore, SettingsStore, SignalId};

/// Snapshot of every setting the engine consumes.
///
/// Rebuilt wholesale from the store on any relevant key change; the engine
/// never patches it incrementally.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub sizes: PerMonitor<SizeEntry>,
    pub lengths: PerMonitor<PanelLength>,
    pub positions: PerMonitor<PanelPosition>,
    pub anchors: PerMonitor<PanelAnchor>,
    pub element_orders: PerMonitor<ElementOrder>,
    pub metrics: Metrics,
    pub reveal: RevealConfig,
}

/// Panel thickness entry; a newtype so the missing-entry default is the
/// canonical size rather than zero.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(transparent)]
pub struct SizeEntry(pub i32);

impl Default for SizeEntry {
    fn default() -> Self {
        Self(panel::DEFAULT_PANEL_SIZE)
    }
}

impl Config {
    /// Reads the full configuration out of the store.
    pub fn from_store(store: &dyn SettingsStore) -> Self {
        let blob = |key: &str| store.get_string(key).unwrap_or_default();

        let int = |key: &str, default: i64| store.get_int(key).unwrap_or(default);
        let flag = |key: &str, default: bool| store.get_bool(key).unwrap_or(default);
        let millis = |key: &str, default: Duration| {
            store
                .get_int(key)
                .map(|ms| Duration::from_millis(ms.max(0) as u64))
                .unwrap_or(default)
        };

        let defaults = RevealConfig::default();
        let reveal = RevealConfig {
            enabled: flag(keys::INTELLIHIDE, defaults.enabled),
            start_delay: millis(keys::INTELLIHIDE_START_DELAY, defaults.start_delay),
            hide_delay: millis(keys::INTELLIHIDE_HIDE_DELAY, defaults.hide_delay),
            min_update_interval: defaults.min_update_interval,
            fullscreen_override: flag(keys::INTELLIHIDE_FULLSCREEN, defaults.fullscreen_override),
            pressure_threshold: int(
                keys::INTELLIHIDE_PRESSURE_THRESHOLD,
                i64::from(defaults.pressure_threshold),
            ) as i32,
            pressure_timeout: millis(keys::INTELLIHIDE_PRESSURE_TIME, defaults.pressure_timeout),
            only_when_obstructed: flag(
                keys::INTELLIHIDE_ONLY_WHEN_OBSTRUCTED,
                defaults.only_when_obstructed,
            ),
            reveal_on_notify: flag(
                keys::INTELLIHIDE_REVEAL_ON_NOTIFY,
                defaults.reveal_on_notify,
            ),
            animation_duration: millis(
                keys::INTELLIHIDE_ANIMATION_TIME,
                defaults.animation_duration,
            ),
            persist_hold: flag(keys::INTELLIHIDE_PERSIST, defaults.persist_hold),
        };

        let default_metrics = Metrics::default();
        let metrics = Metrics {
            fixed_padding: int(
                keys::PANEL_FIXED_PADDING,
                default_metrics.fixed_padding as i64,
            ) as f64,
            var_padding: int(keys::PANEL_VAR_PADDING, default_metrics.var_padding as i64) as f64,
            margin: int(keys::PANEL_MARGIN, default_metrics.margin as i64) as f64,
        };

        Self {
            sizes: PerMonitor::parse(keys::PANEL_SIZES, &blob(keys::PANEL_SIZES)),
            lengths: PerMonitor::parse(keys::PANEL_LENGTHS, &blob(keys::PANEL_LENGTHS)),
            positions: PerMonitor::parse(keys::PANEL_POSITIONS, &blob(keys::PANEL_POSITIONS)),
            anchors: PerMonitor::parse(keys::PANEL_ANCHORS, &blob(keys::PANEL_ANCHORS)),
            element_orders: PerMonitor::parse(
                keys::PANEL_ELEMENT_POSITIONS,
                &blob(keys::PANEL_ELEMENT_POSITIONS),
            ),
            metrics,
            reveal,
        }
    }

    /// Assembles the resolved panel configuration for one monitor.
    pub fn panel(&self, id: &MonitorId) -> PanelConfig {
        let mut config = PanelConfig {
            size: self.sizes.get(id).0,
            length: self.lengths.get(id),
            position: self.positions.get(id),
            anchor: self.anchors.get(id),
            elements: self.element_orders.get(id),
        };
        config.sanitize();
        config
    }

    /// The persisted intellihide hold mask, if any (-1 means not persisted).
    pub fn persisted_hold(store: &dyn SettingsStore) -> Option<i64> {
        match store.get_int(keys::INTELLIHIDE_PERSISTED_STATE) {
            None | Some(-1) => None,
            Some(mask) => Some(mask),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_without_any_keys() {
        let store = MemoryStore::new();
        let config = Config::from_store(&store);
        assert_eq!(config, Config::default());

        let panel = config.panel(&MonitorId::from_index(0));
        assert_eq!(panel, PanelConfig::default());
    }

    #[test]
    fn per_monitor_overrides_apply() {
        let mut store = MemoryStore::new();
        store.set_string(keys::PANEL_SIZES, r#"{"DP-1": 64}"#);
        store.set_string(keys::PANEL_POSITIONS, r#"{"DP-1": "TOP"}"#);
        store.set_string(keys::PANEL_LENGTHS, r#"{"DP-1": -1}"#);

        let config = Config::from_store(&store);
        let panel = config.panel(&MonitorId::new("DP-1"));
        assert_eq!(panel.size, 64);
        assert_eq!(panel.position, PanelPosition::Top);
        assert_eq!(panel.length, PanelLength::FitContent);

        // Other monitors keep defaults.
        let other = config.panel(&MonitorId::new("HDMI-1"));
        assert_eq!(other, PanelConfig::default());
    }

    #[test]
    fn reveal_keys_map_to_config() {
        let mut store = MemoryStore::new();
        store.set_bool(keys::INTELLIHIDE, true);
        store.set_int(keys::INTELLIHIDE_HIDE_DELAY, 150);
        store.set_bool(keys::INTELLIHIDE_ONLY_WHEN_OBSTRUCTED, false);
        store.set_int(keys::INTELLIHIDE_PRESSURE_THRESHOLD, 250);
        store.set_int(keys::INTELLIHIDE_PRESSURE_TIME, 500);

        let config = Config::from_store(&store);
        assert!(config.reveal.enabled);
        assert_eq!(config.reveal.hide_delay, Duration::from_millis(150));
        assert!(!config.reveal.only_when_obstructed);
        assert_eq!(config.reveal.pressure_threshold, 250);
        assert_eq!(config.reveal.pressure_timeout, Duration::from_millis(500));
    }

    #[test]
    fn persisted_hold_sentinel() {
        let mut store = MemoryStore::new();
        assert_eq!(Config::persisted_hold(&store), None);
        store.set_int(keys::INTELLIHIDE_PERSISTED_STATE, -1);
        assert_eq!(Config::persisted_hold(&store), None);
        store.set_int(keys::INTELLIHIDE_PERSISTED_STATE, 2);
        assert_eq!(Config::persisted_hold(&store), Some(2));
    }
}
