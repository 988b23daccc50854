use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::elements::{ElementOrder, Placement};

/// Smallest thickness a panel may end up with, in logical pixels.
pub const MIN_PANEL_SIZE: i32 = 22;
pub const MAX_PANEL_SIZE: i32 = 128;
pub const DEFAULT_PANEL_SIZE: i32 = 48;

pub const MIN_PANEL_LENGTH: i32 = 20;
pub const MAX_PANEL_LENGTH: i32 = 100;

/// Sentinel persisted for "size the panel to fit its content".
pub const FIT_CONTENT_LENGTH: i32 = -1;

/// Which monitor edge the panel occupies.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelPosition {
    #[serde(rename = "TOP")]
    Top,
    #[default]
    #[serde(rename = "BOTTOM")]
    Bottom,
    #[serde(rename = "LEFT")]
    Left,
    #[serde(rename = "RIGHT")]
    Right,
}

impl PanelPosition {
    /// Left and right panels run their variable axis vertically.
    pub fn is_vertical(self) -> bool {
        matches!(self, PanelPosition::Left | PanelPosition::Right)
    }
}

/// Where a panel shorter than the full edge sits along that edge.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelAnchor {
    #[serde(rename = "START")]
    Start,
    #[default]
    #[serde(rename = "MIDDLE")]
    Middle,
    #[serde(rename = "END")]
    End,
}

impl PanelAnchor {
    /// The stacking tag a fit-content panel adopts for its single group.
    pub fn dynamic_placement(self) -> Placement {
        match self {
            PanelAnchor::Start => Placement::StackedTl,
            PanelAnchor::Middle => Placement::CenteredMonitor,
            PanelAnchor::End => Placement::StackedBr,
        }
    }
}

/// Panel length along the variable axis.
///
/// Persisted as an integer: a percentage in `[20, 100]`, or `-1` for
/// fit-content. Out-of-range persisted values clamp silently on read; the
/// write boundary rejects them before they are ever stored.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(from = "i32", into = "i32")]
pub enum PanelLength {
    Percent(i32),
    FitContent,
}

impl Default for PanelLength {
    fn default() -> Self {
        PanelLength::Percent(MAX_PANEL_LENGTH)
    }
}

impl From<i32> for PanelLength {
    fn from(value: i32) -> Self {
        if value == FIT_CONTENT_LENGTH {
            PanelLength::FitContent
        } else {
            PanelLength::Percent(value.clamp(MIN_PANEL_LENGTH, MAX_PANEL_LENGTH))
        }
    }
}

impl From<PanelLength> for i32 {
    fn from(value: PanelLength) -> Self {
        match value {
            PanelLength::Percent(pct) => pct,
            PanelLength::FitContent => FIT_CONTENT_LENGTH,
        }
    }
}

impl PanelLength {
    /// Fraction of the monitor edge the panel spans, before any dynamic
    /// shrinking. Fit-content panels start at the full edge.
    pub fn fraction(self) -> f64 {
        match self {
            PanelLength::Percent(pct) => f64::from(pct) / 100.,
            PanelLength::FitContent => 1.,
        }
    }

    pub fn is_fit_content(self) -> bool {
        matches!(self, PanelLength::FitContent)
    }
}

/// Stable identity of a monitor.
///
/// Hosts derive it from connector/EDID data so it survives reboots; when they
/// can't, the positional index is the fallback.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct MonitorId(pub String);

impl MonitorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn from_index(index: usize) -> Self {
        Self(index.to_string())
    }
}

impl fmt::Display for MonitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A JSON-encoded per-monitor map as stored under one settings key.
///
/// Missing entries fall back to `T::default()`; a malformed blob falls back
/// wholesale (logged by the caller, never fatal).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(transparent)]
pub struct PerMonitor<T>(pub HashMap<MonitorId, T>);

impl<T: Clone + Default> PerMonitor<T> {
    pub fn get(&self, id: &MonitorId) -> T {
        self.0.get(id).cloned().unwrap_or_default()
    }

    pub fn set(&mut self, id: MonitorId, value: T) {
        self.0.insert(id, value);
    }
}

impl<T: serde::de::DeserializeOwned + Clone + Default> PerMonitor<T> {
    /// Parses the persisted blob for one settings key.
    ///
    /// Invalid JSON yields the empty map, so every monitor sees defaults.
    pub fn parse(key: &str, json: &str) -> Self {
        if json.is_empty() {
            return Self::default();
        }
        match serde_json::from_str(json) {
            Ok(map) => Self(map),
            Err(err) => {
                warn!("invalid per-monitor blob for {key:?}, using defaults: {err}");
                Self::default()
            }
        }
    }
}

impl<T: Serialize> PerMonitor<T> {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.0)
    }
}

/// Fully resolved configuration of one monitor's panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelConfig {
    pub size: i32,
    pub length: PanelLength,
    pub position: PanelPosition,
    pub anchor: PanelAnchor,
    pub elements: ElementOrder,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_PANEL_SIZE,
            length: PanelLength::default(),
            position: PanelPosition::default(),
            anchor: PanelAnchor::default(),
            elements: ElementOrder::default(),
        }
    }
}

impl PanelConfig {
    /// Clamps persisted values into their valid ranges.
    pub fn sanitize(&mut self) {
        self.size = self.size.clamp(MIN_PANEL_SIZE, MAX_PANEL_SIZE);
        if !self.elements.is_valid() {
            warn!("invalid element order, using the default");
            self.elements = ElementOrder::default();
        }
    }
}

/// Theme-provided padding and margin metrics, in unscaled logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    /// Padding along the fixed axis (between panel edge and element boxes).
    pub fixed_padding: f64,
    /// Padding along the variable axis (before the first and after the last
    /// group).
    pub var_padding: f64,
    /// Margin between the panel box and the monitor edges.
    pub margin: f64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            fixed_padding: 4.,
            var_padding: 8.,
            margin: 0.,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn length_sentinel_round_trips() {
        let parsed: PanelLength = serde_json::from_str("-1").unwrap();
        assert_eq!(parsed, PanelLength::FitContent);
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "-1");

        let parsed: PanelLength = serde_json::from_str("65").unwrap();
        assert_eq!(parsed, PanelLength::Percent(65));
    }

    #[test]
    fn length_clamps_out_of_range_reads() {
        let parsed: PanelLength = serde_json::from_str("5").unwrap();
        assert_eq!(parsed, PanelLength::Percent(MIN_PANEL_LENGTH));
        let parsed: PanelLength = serde_json::from_str("170").unwrap();
        assert_eq!(parsed, PanelLength::Percent(MAX_PANEL_LENGTH));
    }

    #[test]
    fn per_monitor_parse_falls_back_on_garbage() {
        let map: PerMonitor<i32> = PerMonitor::parse("panel-sizes", "{not json");
        assert_eq!(map, PerMonitor::default());
        assert_eq!(map.get(&MonitorId::from_index(0)), 0);
    }

    #[test]
    fn per_monitor_lookup() {
        let json = r#"{"DP-1": 64, "0": 32}"#;
        let map: PerMonitor<i32> = PerMonitor::parse("panel-sizes", json);
        assert_eq!(map.get(&MonitorId::new("DP-1")), 64);
        assert_eq!(map.get(&MonitorId::from_index(0)), 32);
        assert_eq!(map.get(&MonitorId::new("HDMI-2")), 0);
    }

    #[test]
    fn sanitize_clamps_size_and_order() {
        let mut config = PanelConfig {
            size: 500,
            ..Default::default()
        };
        config.elements.0.clear();
        config.elements.0.extend([
            crate::elements::ElementLayout::new(
                crate::elements::ElementKind::Taskbar,
                true,
                Placement::StackedTl,
            ),
            crate::elements::ElementLayout::new(
                crate::elements::ElementKind::Taskbar,
                true,
                Placement::StackedBr,
            ),
        ]);
        config.sanitize();
        assert_eq!(config.size, MAX_PANEL_SIZE);
        assert_eq!(config.elements, ElementOrder::default());
    }
}
