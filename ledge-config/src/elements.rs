use serde::{Deserialize, Serialize};

/// The fixed set of widgets a panel can contain.
///
/// The serialized names match the identifiers persisted by the settings store
/// in the `panel-element-positions` blobs.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    #[serde(rename = "showAppsButton")]
    ShowApps,
    #[serde(rename = "activitiesButton")]
    Activities,
    #[serde(rename = "leftBox")]
    LeftBox,
    #[serde(rename = "taskbar")]
    Taskbar,
    #[serde(rename = "centerBox")]
    CenterBox,
    #[serde(rename = "rightBox")]
    RightBox,
    #[serde(rename = "dateMenu")]
    DateMenu,
    #[serde(rename = "systemMenu")]
    SystemMenu,
    #[serde(rename = "desktopButton")]
    Desktop,
}

/// Number of distinct element kinds; also the upper bound on panel slots.
pub const ELEMENT_KIND_COUNT: usize = 9;

impl ElementKind {
    /// The taskbar is the one element allowed to absorb leftover space.
    pub fn is_expandable(self) -> bool {
        matches!(self, ElementKind::Taskbar)
    }
}

/// Where along the panel's variable axis an element is stacked.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placement {
    /// Pinned toward the top/left end of the panel.
    #[serde(rename = "stackedTL")]
    StackedTl,
    /// Pinned toward the bottom/right end of the panel.
    #[serde(rename = "stackedBR")]
    StackedBr,
    /// Centered within the space left over by neighboring groups.
    #[serde(rename = "centered")]
    Centered,
    /// Centered on the monitor's full extent, ignoring neighbors.
    #[serde(rename = "centerMonitor")]
    CenteredMonitor,
}

impl Placement {
    pub fn is_centered(self) -> bool {
        matches!(self, Placement::Centered | Placement::CenteredMonitor)
    }
}

/// One record of the ordered per-panel element list.
///
/// Order is significant: it determines precedence within a stacking run.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementLayout {
    pub element: ElementKind,
    pub visible: bool,
    pub position: Placement,
}

impl ElementLayout {
    pub fn new(element: ElementKind, visible: bool, position: Placement) -> Self {
        Self {
            element,
            visible,
            position,
        }
    }
}

/// Ordered element list for one panel.
///
/// A newtype so that a missing per-monitor entry falls back to the canonical
/// default order rather than an empty list.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct ElementOrder(pub Vec<ElementLayout>);

impl Default for ElementOrder {
    fn default() -> Self {
        use ElementKind::*;
        use Placement::*;
        Self(vec![
            ElementLayout::new(ShowApps, true, StackedTl),
            ElementLayout::new(Activities, false, StackedTl),
            ElementLayout::new(LeftBox, true, StackedTl),
            ElementLayout::new(Taskbar, true, StackedTl),
            ElementLayout::new(CenterBox, true, StackedBr),
            ElementLayout::new(RightBox, true, StackedBr),
            ElementLayout::new(DateMenu, true, StackedBr),
            ElementLayout::new(SystemMenu, true, StackedBr),
            ElementLayout::new(Desktop, true, StackedBr),
        ])
    }
}

impl ElementOrder {
    /// Whether the list is a permutation of known kinds with no duplicates.
    pub fn is_valid(&self) -> bool {
        let mut seen = [false; ELEMENT_KIND_COUNT];
        for layout in &self.0 {
            let idx = layout.element as usize;
            if seen[idx] {
                return false;
            }
            seen[idx] = true;
        }
        true
    }
}
