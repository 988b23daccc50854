//! The per-monitor panel.

use std::rc::Rc;

use anyhow::Context as _;
use ledge_config::{ElementLayout, PanelConfig};

use super::dimensions::{Axis, Rect};
use super::geometry::{compute_geometry, Monitor, PanelGeometry};
use super::plan::{plan_groups, GroupShell};
use super::solve::{solve, SolveParams};
use super::{Options, PanelElement};
use crate::animation::Clock;
use crate::reveal::{RevealController, RevealHost, RevealState};

/// One panel on one monitor.
///
/// Owns that monitor's host elements, the derived geometry and group shells,
/// and the reveal controller. All derived state is recomputed wholesale from
/// the options snapshot; nothing is patched incrementally.
#[derive(Debug)]
pub struct Panel<E: PanelElement> {
    monitor: Monitor,
    options: Rc<Options>,
    elements: Vec<E>,
    /// Element order for this monitor; entries without a matching host
    /// element are forced invisible.
    layouts: Vec<ElementLayout>,
    /// Per layout slot, the index into `elements` of the matching element.
    slots: Vec<Option<usize>>,
    geometry: PanelGeometry,
    groups: Vec<GroupShell>,
    reveal: RevealController,
}

impl<E: PanelElement> Panel<E> {
    pub fn new(
        monitor: Monitor,
        elements: Vec<E>,
        options: Rc<Options>,
        clock: Clock,
        persisted_hold: Option<i64>,
        host: &dyn RevealHost,
    ) -> Self {
        let config = options.config.panel(&monitor.id);
        let geometry = compute_geometry(&monitor, &config, &options.config.metrics, options.scale);
        let (layouts, slots) = resolve_layouts(&config, &elements);
        let groups = plan_groups(&layouts, geometry.dynamic);

        let reveal = RevealController::new(
            options.config.reveal.clone(),
            geometry.hidden_translation(),
            clock,
            persisted_hold,
        );

        let mut panel = Self {
            monitor,
            options,
            elements,
            layouts,
            slots,
            geometry,
            groups,
            reveal,
        };
        panel.sync_reveal_enabled(host);
        panel
    }

    pub fn monitor(&self) -> &Monitor {
        &self.monitor
    }

    pub fn geometry(&self) -> &PanelGeometry {
        &self.geometry
    }

    pub fn groups(&self) -> &[GroupShell] {
        &self.groups
    }

    pub fn elements(&self) -> &[E] {
        &self.elements
    }

    pub fn reveal(&self) -> &RevealController {
        &self.reveal
    }

    pub fn reveal_mut(&mut self) -> &mut RevealController {
        &mut self.reveal
    }

    /// Current slide translation along the perpendicular axis.
    pub fn translation(&self) -> f64 {
        self.reveal.translation()
    }

    /// Applies a new options snapshot: geometry, layouts and groups are all
    /// rebuilt from scratch.
    pub fn update_config(&mut self, options: Rc<Options>, host: &dyn RevealHost) {
        self.options = options;

        let config = self.options.config.panel(&self.monitor.id);
        self.geometry = compute_geometry(
            &self.monitor,
            &config,
            &self.options.config.metrics,
            self.options.scale,
        );
        let (layouts, slots) = resolve_layouts(&config, &self.elements);
        self.layouts = layouts;
        self.slots = slots;
        self.groups = plan_groups(&self.layouts, self.geometry.dynamic);

        self.reveal.update_config(
            self.options.config.reveal.clone(),
            self.geometry.hidden_translation(),
        );
        self.sync_reveal_enabled(host);
    }

    fn sync_reveal_enabled(&mut self, host: &dyn RevealHost) {
        let enabled = self.options.config.reveal.enabled;
        if enabled && self.reveal.state() == RevealState::Disabled {
            self.reveal.enable(host);
        } else if !enabled && self.reveal.state() != RevealState::Disabled {
            self.reveal.disable();
        }
    }

    /// Runs one allocation pass: queries preferred sizes, solves, and
    /// commits rounded boxes to every visible element.
    ///
    /// Returns the panel's own box in absolute coordinates, shrunk around
    /// its content for fit-content panels.
    pub fn allocate(&mut self) -> anyhow::Result<Rect> {
        let fixed_extent = self.geometry.inner_size;

        let mut natural = vec![0.; self.layouts.len()];
        for (i, layout) in self.layouts.iter().enumerate() {
            if !layout.visible {
                continue;
            }
            let Some(slot) = self.slots[i] else { continue };
            natural[i] = self.elements[slot].natural_size(fixed_extent).max(0.);
        }

        let params = SolveParams {
            extent: self.geometry.var_extent(),
            var_padding: self.geometry.var_padding,
            dynamic: self.geometry.dynamic,
            monitor_extent: self.geometry.monitor_extent(&self.monitor),
        };
        let result = solve(&self.groups, &natural, &params);

        let axis = self.geometry.axis();
        for (i, span) in result.element_spans.iter().enumerate() {
            let Some(span) = span else { continue };
            let Some(slot) = self.slots[i] else { continue };

            // Panel-local box: solved range on the variable axis, padded
            // thickness on the fixed axis. Rounded only here.
            let rect = match axis {
                Axis::Horizontal => Rect::from_loc_and_size(
                    (span.start, self.geometry.fixed_padding),
                    (span.len(), self.geometry.inner_size),
                ),
                Axis::Vertical => Rect::from_loc_and_size(
                    (self.geometry.fixed_padding, span.start),
                    (self.geometry.inner_size, span.len()),
                ),
            };
            self.elements[slot]
                .commit_box(rect.round())
                .with_context(|| format!("committing box for {:?}", self.layouts[i].element))?;
        }

        let span = result.panel_span;
        let rect = match axis {
            Axis::Horizontal => Rect::from_loc_and_size(
                (
                    self.geometry.rect.loc.x + span.start,
                    self.geometry.rect.loc.y,
                ),
                (span.len(), self.geometry.outer_size),
            ),
            Axis::Vertical => Rect::from_loc_and_size(
                (
                    self.geometry.rect.loc.x,
                    self.geometry.rect.loc.y + span.start,
                ),
                (self.geometry.outer_size, span.len()),
            ),
        };
        Ok(rect.round())
    }
}

/// Pairs the configured element order with the host's elements.
///
/// Kinds the host did not supply stay in the order but are forced invisible
/// so grouping and indices stay stable.
fn resolve_layouts<E: PanelElement>(
    config: &PanelConfig,
    elements: &[E],
) -> (Vec<ElementLayout>, Vec<Option<usize>>) {
    let mut layouts = config.elements.0.clone();
    let mut slots = Vec::with_capacity(layouts.len());
    for layout in &mut layouts {
        let slot = elements.iter().position(|e| e.kind() == layout.element);
        if slot.is_none() {
            layout.visible = false;
        }
        slots.push(slot);
    }
    (layouts, slots)
}
