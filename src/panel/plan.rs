//! Element grouping.
//!
//! Converts the ordered element list into group shells ready for allocation.
//! Sizes are not computed here; the solver re-derives them on every layout
//! pass from fresh preferred-size queries.

use arrayvec::ArrayVec;
use ledge_config::elements::ELEMENT_KIND_COUNT;
use ledge_config::{ElementKind, ElementLayout, Placement};

/// One element's slot within a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupMember {
    /// Index into the panel's element slot list.
    pub index: usize,
    pub kind: ElementKind,
    /// Effective stacking tag. For fit-content panels this is the dynamic
    /// tag for every member; otherwise the element's own tag.
    pub placement: Placement,
}

/// A run of elements allocated together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupShell {
    /// The group's resolved stacking tag: the first member's effective tag.
    pub placement: Placement,
    pub members: ArrayVec<GroupMember, ELEMENT_KIND_COUNT>,
    /// Index into `members` of the element that absorbs leftover space.
    pub expandable: Option<usize>,
}

impl GroupShell {
    fn new(placement: Placement) -> Self {
        Self {
            placement,
            members: ArrayVec::new(),
            expandable: None,
        }
    }

    fn push(&mut self, member: GroupMember) {
        if member.kind.is_expandable() {
            self.expandable = Some(self.members.len());
        }
        self.members.push(member);
    }
}

/// Whether `current` starts a new group after an element tagged `previous`.
///
/// The transition table is deliberately literal; see the exhaustive pair
/// test rather than inferring a simpler unifying rule.
fn starts_new_group(previous: Option<Placement>, current: Placement) -> bool {
    let Some(previous) = previous else {
        // First visible element.
        return true;
    };

    // A leading stack closes as soon as the tag changes.
    if previous == Placement::StackedTl && current != Placement::StackedTl {
        return true;
    }

    // A trailing stack always starts fresh.
    if current == Placement::StackedBr && previous != Placement::StackedBr {
        return true;
    }

    // Distinct centered positions are isolated from each other, unless the
    // run is continuing out of a trailing stack.
    if current.is_centered()
        && previous.is_centered()
        && current != previous
        && previous != Placement::StackedBr
    {
        return true;
    }

    false
}

/// Scans the ordered element list once and produces group shells.
///
/// `dynamic` is the panel's fit-content tag; when set, every element's
/// effective tag is coerced to it, forcing exactly one group. Invisible
/// elements are skipped entirely. Zero visible elements yield zero groups.
pub fn plan_groups(layouts: &[ElementLayout], dynamic: Option<Placement>) -> Vec<GroupShell> {
    let mut groups: Vec<GroupShell> = Vec::new();
    let mut previous: Option<Placement> = None;

    for (index, layout) in layouts.iter().enumerate() {
        if !layout.visible {
            continue;
        }

        let effective = dynamic.unwrap_or(layout.position);
        if starts_new_group(previous, effective) {
            groups.push(GroupShell::new(effective));
        }

        groups
            .last_mut()
            .unwrap()
            .push(GroupMember {
                index,
                kind: layout.element,
                placement: effective,
            });
        previous = Some(effective);
    }

    groups
}

/// Index of the group the solver treats as centered-on-monitor.
///
/// At most one such group exists in well-formed configurations; if several
/// slipped through, the first wins and the rest degrade to plain centering.
pub fn center_monitor_group(groups: &[GroupShell]) -> Option<usize> {
    groups
        .iter()
        .position(|g| g.placement == Placement::CenteredMonitor)
}
