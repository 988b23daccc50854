//! State shared between the per-monitor panels.
//!
//! Owned by the [`PanelSet`](super::PanelSet) and handed to panels by
//! reference; there is no process-wide singleton. Hotkey numbering is
//! recomputed from the primary monitor's taskbar and read by the secondary
//! panels.

use std::collections::HashMap;
use std::time::Duration;

/// How long a click keeps counting as "recent".
pub const RECENT_CLICK_EXPIRY: Duration = Duration::from_millis(500);

/// Maximum number of apps addressable by numeric hotkey.
pub const HOTKEY_SLOTS: u32 = 10;

#[derive(Debug, Default)]
pub struct SharedPanelState {
    app_numbers: HashMap<String, u32>,
    recent_click: Option<RecentClick>,
}

#[derive(Debug)]
struct RecentClick {
    app_id: String,
    at: Duration,
}

impl SharedPanelState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reassigns hotkey numbers 1..=10 from the primary taskbar's app order.
    pub fn renumber(&mut self, app_ids: impl IntoIterator<Item = String>) {
        self.app_numbers.clear();
        for (i, app_id) in app_ids.into_iter().take(HOTKEY_SLOTS as usize).enumerate() {
            self.app_numbers.insert(app_id, i as u32 + 1);
        }
    }

    pub fn hotkey_number(&self, app_id: &str) -> Option<u32> {
        self.app_numbers.get(app_id).copied()
    }

    pub fn record_click(&mut self, app_id: impl Into<String>, now: Duration) {
        self.recent_click = Some(RecentClick {
            app_id: app_id.into(),
            at: now,
        });
    }

    /// The app clicked within the expiry window, if any.
    pub fn recently_clicked(&self, now: Duration) -> Option<&str> {
        let click = self.recent_click.as_ref()?;
        (now.saturating_sub(click.at) < RECENT_CLICK_EXPIRY).then_some(click.app_id.as_str())
    }
}
