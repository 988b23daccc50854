//! Intellihide: the auto-reveal/auto-hide state machine.
//!
//! One controller per panel. Visibility is decided by a single procedure,
//! [`RevealController::update_visibility`], driven by pointer/edge triggers
//! and by host events (overview, grabs, drags, workspace switches). An
//! orthogonal [`Hold`] mask forces the panel visible while any bit is set,
//! independent of the heuristic.
//!
//! All timers are due-times stored on the controller and fired from
//! [`RevealController::advance`]; there are no threads and no callbacks. A
//! reschedule always supersedes the pending timer of the same kind.

use std::time::Duration;

use bitflags::bitflags;
use ledge_config::RevealConfig;

use crate::animation::{Animation, Clock};

bitflags! {
    /// Reasons the panel is forced visible. Visible iff nonzero.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Hold: u32 {
        /// Short-lived programmatic reveal, e.g. during a hotkey overlay.
        const TEMPORARY = 1;
        /// User-toggled pin; optionally persisted across sessions.
        const PERMANENT = 2;
        /// A notification banner wants the panel on screen.
        const NOTIFY = 4;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    /// Intellihide is off; the panel stays shown.
    Disabled,
    Shown,
    Hidden,
}

/// What prompted a visibility re-evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Pointer reached the panel's monitor edge (or a pressure barrier).
    PointerEdge,
    /// The pointer left the panel. The only trigger that honors the
    /// configured hide delay.
    HoverOut,
    /// Anything else: overview toggles, drag end, workspace switch, grab
    /// begin/end. Rate-limited and coalesced.
    HostEvent,
}

/// Host-side queries the visibility heuristic needs.
///
/// The host implements this over its compositor state; the controller never
/// caches the answers.
pub trait RevealHost {
    /// The overview is visible or transitioning to visible.
    fn overview_visible(&self) -> bool;
    /// A window-preview menu is open above the panel.
    fn preview_menu_open(&self) -> bool;
    /// A drag-and-drop operation is currently over the panel.
    fn drag_over_panel(&self) -> bool;
    /// The pointer is inside the panel.
    fn panel_hovered(&self) -> bool;
    /// A modal grab is anchored to an actor inside the panel.
    fn grab_in_panel(&self) -> bool;
    /// A mouse button is currently pressed.
    fn mouse_button_down(&self) -> bool;
    /// Some window overlaps the panel's monitor work area.
    fn window_overlaps_panel(&self) -> bool;
    /// The focused window on this monitor is fullscreen.
    fn in_fullscreen(&self) -> bool;
    /// The host is currently showing notification banners.
    fn banners_enabled(&self) -> bool;

    /// Duration of the host's running overview transition, if one is in
    /// flight. While the overview is active the slide follows this instead
    /// of the configured duration, so the panel lands together with it.
    fn overview_transition_duration(&self) -> Option<Duration> {
        None
    }
}

#[derive(Debug)]
pub struct RevealController {
    config: RevealConfig,
    clock: Clock,
    state: RevealState,
    hold: Hold,

    /// Translation of the panel when fully hidden, signed toward its edge.
    hidden_offset: f64,
    /// Committed translation when no slide is running.
    offset: f64,
    slide: Option<Animation>,

    enable_due: Option<Duration>,
    hide_due: Option<Duration>,
    last_update: Option<Duration>,
    update_queued: bool,

    pending_persist: Option<i64>,
}

impl RevealController {
    /// `persisted` is the stored hold mask from a previous session, already
    /// filtered through the `-1` sentinel.
    pub fn new(
        config: RevealConfig,
        hidden_offset: f64,
        clock: Clock,
        persisted: Option<i64>,
    ) -> Self {
        let mut hold = Hold::empty();
        if config.persist_hold {
            if let Some(mask) = persisted {
                hold = Hold::from_bits_truncate(mask as u32) & Hold::PERMANENT;
            }
        }

        Self {
            config,
            clock,
            state: RevealState::Disabled,
            hold,
            hidden_offset,
            offset: 0.,
            slide: None,
            enable_due: None,
            hide_due: None,
            last_update: None,
            update_queued: false,
            pending_persist: None,
        }
    }

    pub fn state(&self) -> RevealState {
        self.state
    }

    pub fn hold(&self) -> Hold {
        self.hold
    }

    /// Current translation along the perpendicular axis. 0 when shown, the
    /// signed panel thickness when hidden.
    pub fn translation(&self) -> f64 {
        match &self.slide {
            Some(anim) => anim.value(),
            None => self.offset,
        }
    }

    /// Starts intellihide. The first evaluation runs after the configured
    /// startup delay; until then the panel stays shown.
    pub fn enable(&mut self, host: &dyn RevealHost) {
        if self.state != RevealState::Disabled {
            return;
        }

        self.state = RevealState::Shown;
        self.offset = 0.;
        self.slide = None;

        if self.config.start_delay.is_zero() {
            self.evaluate(Trigger::HostEvent, host);
        } else {
            self.enable_due = Some(self.clock.now() + self.config.start_delay);
        }
    }

    /// Stops intellihide and restores the panel to its shown position.
    pub fn disable(&mut self) {
        if self.state == RevealState::Disabled {
            return;
        }

        self.enable_due = None;
        self.hide_due = None;
        self.update_queued = false;

        if self.state == RevealState::Hidden || self.slide.is_some() {
            self.slide_to(0., self.config.animation_duration);
        }
        self.state = RevealState::Disabled;
    }

    /// The single visibility decision procedure.
    ///
    /// Host-event triggers are rate-limited to one run per
    /// `min_update_interval`; a request inside the window coalesces into one
    /// re-run after the window closes.
    pub fn update_visibility(&mut self, trigger: Trigger, host: &dyn RevealHost) {
        if self.state == RevealState::Disabled {
            return;
        }

        if trigger == Trigger::HostEvent {
            let now = self.clock.now();
            if let Some(last) = self.last_update {
                if now.saturating_sub(last) < self.config.min_update_interval {
                    self.update_queued = true;
                    return;
                }
            }
            self.last_update = Some(now);
        }

        self.evaluate(trigger, host);
    }

    /// Unconditionally reveals the panel and ORs `reason` into the hold mask.
    ///
    /// NOTIFY reveals are dropped when disabled in config or when the host
    /// isn't showing banners.
    pub fn reveal_and_hold(&mut self, reason: Hold, host: &dyn RevealHost) {
        if reason.contains(Hold::NOTIFY)
            && (!self.config.reveal_on_notify || !host.banners_enabled())
        {
            return;
        }

        self.hold |= reason;
        if reason.contains(Hold::PERMANENT) {
            self.queue_persist();
        }

        if self.state == RevealState::Disabled {
            return;
        }
        self.show(host);
    }

    /// Drops `reason` from the hold mask. No-op when the bit isn't set. When
    /// the mask empties, visibility is re-evaluated normally.
    pub fn release(&mut self, reason: Hold, host: &dyn RevealHost) {
        if !self.hold.intersects(reason) {
            return;
        }

        self.hold &= !reason;
        if reason.contains(Hold::PERMANENT) {
            self.queue_persist();
        }

        if self.hold.is_empty() && self.state != RevealState::Disabled {
            self.evaluate(Trigger::HostEvent, host);
        }
    }

    /// Fires due timers and steps the slide animation. Call once per event
    /// loop dispatch after advancing the shared clock.
    pub fn advance(&mut self, host: &dyn RevealHost) {
        let now = self.clock.now();

        if let Some(due) = self.enable_due {
            if now >= due {
                self.enable_due = None;
                self.evaluate(Trigger::HostEvent, host);
            }
        }

        if self.update_queued {
            let window_closed = self
                .last_update
                .map_or(true, |last| {
                    now.saturating_sub(last) >= self.config.min_update_interval
                });
            if window_closed {
                self.update_queued = false;
                self.last_update = Some(now);
                self.evaluate(Trigger::HostEvent, host);
            }
        }

        if let Some(due) = self.hide_due {
            if now >= due {
                self.hide_due = None;
                self.begin_hide(host);
            }
        }

        if let Some(anim) = &mut self.slide {
            anim.set_current_time(now);
            if anim.is_done() {
                self.offset = anim.to();
                self.slide = None;
            }
        }
    }

    /// Applies a settings change. Geometry changes feed in the new hidden
    /// translation; the enable flag is handled by the owning panel.
    pub fn update_config(&mut self, config: RevealConfig, hidden_offset: f64) {
        self.config = config;
        self.hidden_offset = hidden_offset;
        if self.state == RevealState::Hidden && self.slide.is_none() {
            self.offset = hidden_offset;
        }
    }

    /// The PERMANENT mask to write back to the settings store, if a hold
    /// change since the last call asked for persistence.
    pub fn take_pending_persist(&mut self) -> Option<i64> {
        self.pending_persist.take()
    }

    fn queue_persist(&mut self) {
        if self.config.persist_hold {
            self.pending_persist = Some((self.hold & Hold::PERMANENT).bits() as i64);
        }
    }

    fn evaluate(&mut self, trigger: Trigger, host: &dyn RevealHost) {
        if !self.hold.is_empty() || self.check_should_be_visible(trigger, host) {
            self.show(host);
        } else {
            let delay = match trigger {
                Trigger::HoverOut => self.config.hide_delay,
                _ => Duration::ZERO,
            };
            self.hide(delay, host);
        }
    }

    fn check_should_be_visible(&self, trigger: Trigger, host: &dyn RevealHost) -> bool {
        if host.overview_visible()
            || host.preview_menu_open()
            || host.drag_over_panel()
            || host.panel_hovered()
            || host.grab_in_panel()
        {
            return true;
        }

        if trigger == Trigger::PointerEdge {
            // Pressure at the edge while dragging means the user is moving
            // something, not asking for the panel.
            return !host.mouse_button_down()
                || (self.config.fullscreen_override && host.in_fullscreen());
        }

        if self.config.only_when_obstructed {
            !host.window_overlaps_panel()
        } else {
            host.panel_hovered()
        }
    }

    fn show(&mut self, host: &dyn RevealHost) {
        self.hide_due = None;
        if self.state == RevealState::Shown && self.slide.is_none() && self.offset == 0. {
            return;
        }
        self.state = RevealState::Shown;
        let over = self.slide_duration(host);
        self.slide_to(0., over);
    }

    fn hide(&mut self, delay: Duration, host: &dyn RevealHost) {
        if self.state == RevealState::Hidden {
            return;
        }
        if delay.is_zero() {
            self.hide_due = None;
            self.begin_hide(host);
        } else if self.hide_due.is_none() {
            self.hide_due = Some(self.clock.now() + delay);
        }
    }

    fn begin_hide(&mut self, host: &dyn RevealHost) {
        if !self.hold.is_empty() || self.state != RevealState::Shown {
            return;
        }
        self.state = RevealState::Hidden;
        let over = self.slide_duration(host);
        self.slide_to(self.hidden_offset, over);
    }

    /// While the overview is transitioning the slide follows the host's own
    /// transition duration so both land at the same time.
    fn slide_duration(&self, host: &dyn RevealHost) -> Duration {
        if host.overview_visible() {
            host.overview_transition_duration()
                .unwrap_or(self.config.animation_duration)
        } else {
            self.config.animation_duration
        }
    }

    fn slide_to(&mut self, target: f64, over: Duration) {
        let from = self.translation();
        if from == target {
            self.slide = None;
            self.offset = target;
            return;
        }
        self.slide = Some(Animation::new(self.clock.now(), from, target, over));
        self.offset = target;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Default)]
    struct TestHost {
        overview: Cell<bool>,
        menu: Cell<bool>,
        drag: Cell<bool>,
        hovered: Cell<bool>,
        grab: Cell<bool>,
        button_down: Cell<bool>,
        overlap: Cell<bool>,
        fullscreen: Cell<bool>,
        banners: Cell<bool>,
        overview_duration: Cell<Option<Duration>>,
    }

    impl RevealHost for TestHost {
        fn overview_visible(&self) -> bool {
            self.overview.get()
        }
        fn preview_menu_open(&self) -> bool {
            self.menu.get()
        }
        fn drag_over_panel(&self) -> bool {
            self.drag.get()
        }
        fn panel_hovered(&self) -> bool {
            self.hovered.get()
        }
        fn grab_in_panel(&self) -> bool {
            self.grab.get()
        }
        fn mouse_button_down(&self) -> bool {
            self.button_down.get()
        }
        fn window_overlaps_panel(&self) -> bool {
            self.overlap.get()
        }
        fn in_fullscreen(&self) -> bool {
            self.fullscreen.get()
        }
        fn banners_enabled(&self) -> bool {
            self.banners.get()
        }
        fn overview_transition_duration(&self) -> Option<Duration> {
            self.overview_duration.get()
        }
    }

    fn controller(config: RevealConfig) -> (RevealController, Clock) {
        let clock = Clock::with_time(Duration::ZERO);
        let ctl = RevealController::new(config, 48., clock.clone(), None);
        (ctl, clock)
    }

    fn instant_config() -> RevealConfig {
        RevealConfig {
            enabled: true,
            start_delay: Duration::ZERO,
            hide_delay: Duration::ZERO,
            animation_duration: Duration::ZERO,
            ..Default::default()
        }
    }

    #[test]
    fn hides_when_window_overlaps() {
        let (mut ctl, _) = controller(instant_config());
        let host = TestHost::default();
        host.overlap.set(true);

        ctl.enable(&host);
        assert_eq!(ctl.state(), RevealState::Hidden);
        assert_eq!(ctl.translation(), 48.);
    }

    #[test]
    fn stays_shown_without_obstruction() {
        let (mut ctl, _) = controller(instant_config());
        let host = TestHost::default();

        ctl.enable(&host);
        assert_eq!(ctl.state(), RevealState::Shown);
        assert_eq!(ctl.translation(), 0.);
    }

    #[test]
    fn hold_forces_visible() {
        let (mut ctl, _) = controller(instant_config());
        let host = TestHost::default();
        host.overlap.set(true);

        ctl.enable(&host);
        assert_eq!(ctl.state(), RevealState::Hidden);

        ctl.reveal_and_hold(Hold::TEMPORARY, &host);
        assert_eq!(ctl.state(), RevealState::Shown);

        // No heuristic re-run ever hides a held panel.
        ctl.update_visibility(Trigger::HostEvent, &host);
        assert_eq!(ctl.state(), RevealState::Shown);

        ctl.release(Hold::TEMPORARY, &host);
        assert_eq!(ctl.state(), RevealState::Hidden);
    }

    #[test]
    fn hold_mask_is_monotonic_across_reasons() {
        let (mut ctl, _) = controller(instant_config());
        let host = TestHost::default();
        host.overlap.set(true);
        host.banners.set(true);

        ctl.enable(&host);
        ctl.reveal_and_hold(Hold::TEMPORARY, &host);
        ctl.reveal_and_hold(Hold::NOTIFY, &host);
        assert_eq!(ctl.hold(), Hold::TEMPORARY | Hold::NOTIFY);

        // Releasing one reason keeps the panel up while another remains.
        ctl.release(Hold::TEMPORARY, &host);
        assert_eq!(ctl.state(), RevealState::Shown);
        ctl.release(Hold::NOTIFY, &host);
        assert_eq!(ctl.state(), RevealState::Hidden);
    }

    #[test]
    fn release_of_unset_reason_is_a_noop() {
        let (mut ctl, _) = controller(instant_config());
        let host = TestHost::default();

        ctl.enable(&host);
        ctl.release(Hold::PERMANENT, &host);
        assert_eq!(ctl.hold(), Hold::empty());
        assert_eq!(ctl.state(), RevealState::Shown);
    }

    #[test]
    fn notify_reveal_respects_gating() {
        let (mut ctl, _) = controller(RevealConfig {
            reveal_on_notify: false,
            ..instant_config()
        });
        let host = TestHost::default();
        host.overlap.set(true);
        host.banners.set(true);

        ctl.enable(&host);
        ctl.reveal_and_hold(Hold::NOTIFY, &host);
        assert_eq!(ctl.hold(), Hold::empty());
        assert_eq!(ctl.state(), RevealState::Hidden);
    }

    #[test]
    fn notify_reveal_requires_banners() {
        let (mut ctl, _) = controller(instant_config());
        let host = TestHost::default();
        host.overlap.set(true);
        host.banners.set(false);

        ctl.enable(&host);
        ctl.reveal_and_hold(Hold::NOTIFY, &host);
        assert_eq!(ctl.state(), RevealState::Hidden);
    }

    #[test]
    fn edge_trigger_suppressed_while_dragging() {
        let (mut ctl, _) = controller(instant_config());
        let host = TestHost::default();
        host.overlap.set(true);

        ctl.enable(&host);
        host.button_down.set(true);
        ctl.update_visibility(Trigger::PointerEdge, &host);
        assert_eq!(ctl.state(), RevealState::Hidden);

        host.button_down.set(false);
        ctl.update_visibility(Trigger::PointerEdge, &host);
        assert_eq!(ctl.state(), RevealState::Shown);
    }

    #[test]
    fn fullscreen_override_beats_drag_suppression() {
        let (mut ctl, _) = controller(RevealConfig {
            fullscreen_override: true,
            ..instant_config()
        });
        let host = TestHost::default();
        host.overlap.set(true);
        host.button_down.set(true);
        host.fullscreen.set(true);

        ctl.enable(&host);
        ctl.update_visibility(Trigger::PointerEdge, &host);
        assert_eq!(ctl.state(), RevealState::Shown);
    }

    #[test]
    fn host_events_are_rate_limited_and_coalesced() {
        let (mut ctl, mut clock) = controller(instant_config());
        let host = TestHost::default();

        ctl.enable(&host);
        ctl.update_visibility(Trigger::HostEvent, &host);
        assert_eq!(ctl.state(), RevealState::Shown);

        // Obstruction appears inside the rate-limit window; the request
        // coalesces instead of running.
        host.overlap.set(true);
        clock.set(Duration::from_millis(100));
        ctl.update_visibility(Trigger::HostEvent, &host);
        assert_eq!(ctl.state(), RevealState::Shown);

        // Still inside the window.
        clock.set(Duration::from_millis(200));
        ctl.advance(&host);
        assert_eq!(ctl.state(), RevealState::Shown);

        // Window closed; the coalesced run fires.
        clock.set(Duration::from_millis(300));
        ctl.advance(&host);
        assert_eq!(ctl.state(), RevealState::Hidden);
    }

    #[test]
    fn hide_delay_applies_only_to_hover_out() {
        let (mut ctl, mut clock) = controller(RevealConfig {
            hide_delay: Duration::from_millis(400),
            ..instant_config()
        });
        let host = TestHost::default();
        host.hovered.set(true);
        host.overlap.set(true);

        ctl.enable(&host);
        assert_eq!(ctl.state(), RevealState::Shown);

        host.hovered.set(false);
        ctl.update_visibility(Trigger::HoverOut, &host);
        assert_eq!(ctl.state(), RevealState::Shown);

        clock.set(Duration::from_millis(399));
        ctl.advance(&host);
        assert_eq!(ctl.state(), RevealState::Shown);

        clock.set(Duration::from_millis(400));
        ctl.advance(&host);
        assert_eq!(ctl.state(), RevealState::Hidden);
    }

    #[test]
    fn pending_hide_cancelled_by_reveal() {
        let (mut ctl, mut clock) = controller(RevealConfig {
            hide_delay: Duration::from_millis(400),
            ..instant_config()
        });
        let host = TestHost::default();
        host.hovered.set(true);
        host.overlap.set(true);

        ctl.enable(&host);
        host.hovered.set(false);
        ctl.update_visibility(Trigger::HoverOut, &host);

        // Pointer comes back before the delay elapses.
        host.hovered.set(true);
        ctl.update_visibility(Trigger::PointerEdge, &host);
        clock.set(Duration::from_millis(1000));
        ctl.advance(&host);
        assert_eq!(ctl.state(), RevealState::Shown);
    }

    #[test]
    fn startup_delay_defers_first_evaluation() {
        let (mut ctl, mut clock) = controller(RevealConfig {
            start_delay: Duration::from_millis(2000),
            ..instant_config()
        });
        let host = TestHost::default();
        host.overlap.set(true);

        ctl.enable(&host);
        assert_eq!(ctl.state(), RevealState::Shown);

        clock.set(Duration::from_millis(2000));
        ctl.advance(&host);
        assert_eq!(ctl.state(), RevealState::Hidden);
    }

    #[test]
    fn visibility_decision_is_idempotent() {
        let (mut ctl, mut clock) = controller(instant_config());
        let host = TestHost::default();
        host.overlap.set(true);

        ctl.enable(&host);
        let first = ctl.state();
        clock.set(Duration::from_millis(500));
        ctl.update_visibility(Trigger::HostEvent, &host);
        assert_eq!(ctl.state(), first);
    }

    #[test]
    fn permanent_hold_persists() {
        let config = RevealConfig {
            persist_hold: true,
            ..instant_config()
        };
        let (mut ctl, _) = controller(config.clone());
        let host = TestHost::default();

        ctl.enable(&host);
        ctl.reveal_and_hold(Hold::PERMANENT, &host);
        assert_eq!(ctl.take_pending_persist(), Some(2));
        assert_eq!(ctl.take_pending_persist(), None);

        ctl.release(Hold::PERMANENT, &host);
        assert_eq!(ctl.take_pending_persist(), Some(0));

        // A persisted mask is restored on construction.
        let restored =
            RevealController::new(config, 48., Clock::with_time(Duration::ZERO), Some(2));
        assert_eq!(restored.hold(), Hold::PERMANENT);
    }

    #[test]
    fn disable_forces_shown() {
        let (mut ctl, _) = controller(instant_config());
        let host = TestHost::default();
        host.overlap.set(true);

        ctl.enable(&host);
        assert_eq!(ctl.state(), RevealState::Hidden);

        ctl.disable();
        assert_eq!(ctl.state(), RevealState::Disabled);
        assert_eq!(ctl.translation(), 0.);
    }

    #[test]
    fn overview_transition_drives_the_slide_duration() {
        let (mut ctl, mut clock) = controller(RevealConfig {
            animation_duration: Duration::from_millis(200),
            ..instant_config()
        });
        let host = TestHost::default();
        host.overlap.set(true);

        ctl.enable(&host);
        clock.set(Duration::from_millis(300));
        ctl.advance(&host);
        assert_eq!(ctl.state(), RevealState::Hidden);
        assert_eq!(ctl.translation(), 48.);

        // The overview opens with its own, slower transition; the reveal
        // slide follows it instead of the configured duration.
        host.overview.set(true);
        host.overview_duration.set(Some(Duration::from_millis(400)));
        ctl.update_visibility(Trigger::HostEvent, &host);
        assert_eq!(ctl.state(), RevealState::Shown);

        // 200 ms in, the configured duration would already be done.
        clock.set(Duration::from_millis(500));
        ctl.advance(&host);
        let mid = ctl.translation();
        assert!(mid > 0. && mid < 48.);

        clock.set(Duration::from_millis(700));
        ctl.advance(&host);
        assert_eq!(ctl.translation(), 0.);
    }

    #[test]
    fn slide_animates_between_positions() {
        let (mut ctl, mut clock) = controller(RevealConfig {
            animation_duration: Duration::from_millis(200),
            ..instant_config()
        });
        let host = TestHost::default();

        ctl.enable(&host);
        host.overlap.set(true);
        ctl.update_visibility(Trigger::HostEvent, &host);
        assert_eq!(ctl.state(), RevealState::Hidden);
        assert_eq!(ctl.translation(), 0.);

        clock.set(Duration::from_millis(100));
        ctl.advance(&host);
        let mid = ctl.translation();
        assert!(mid > 0. && mid < 48.);

        clock.set(Duration::from_millis(250));
        ctl.advance(&host);
        assert_eq!(ctl.translation(), 48.);
    }
}
