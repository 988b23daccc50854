//! The allocation solver.
//!
//! Assigns each group a start/end offset along the panel's variable axis and
//! each element a slot within its group. Stacked groups resolve against the
//! panel edges and their resolved neighbors; centered groups resolve only
//! once both neighbors are known, so the whole thing runs as a bounded
//! fixed-point iteration. All math stays in floating point; rounding happens
//! at box commit, outside this module.

use ledge_config::Placement;

use super::plan::{center_monitor_group, GroupShell};

/// Solver inputs that come from the panel geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveParams {
    /// Panel extent along the variable axis, before any dynamic shrink.
    pub extent: f64,
    /// Padding before the first and after the last group.
    pub var_padding: f64,
    /// Fit-content tag; `Some` shrinks the panel box around its one group.
    pub dynamic: Option<Placement>,
    /// Monitor extent along the variable axis; ceiling for the shrink.
    pub monitor_extent: f64,
}

/// Half-open offset range along the variable axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Span {
    pub start: f64,
    pub end: f64,
}

impl Span {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> f64 {
        self.end - self.start
    }
}

/// Resolved bounds of one group after the solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedGroup {
    /// `None` if the iteration cap was hit before this group resolved; its
    /// members get a zero box for this pass.
    pub span: Option<Span>,
    pub size: f64,
    pub tl_offset: f64,
    pub br_offset: f64,
}

/// Output of one allocation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveResult {
    /// The panel's own box along the variable axis, as an offset range
    /// within the pre-shrink extent. Identical to `(0, extent)` except for
    /// fit-content panels.
    pub panel_span: Span,
    /// Per element slot: allocated range in final-panel-local coordinates.
    /// `None` for slots that are invisible or not in any group.
    pub element_spans: Vec<Option<Span>>,
    pub groups: Vec<ResolvedGroup>,
}

#[derive(Debug, Clone, Copy, Default)]
struct GroupMetrics {
    size: f64,
    tl_offset: f64,
    br_offset: f64,
    centered_sum: f64,
}

fn group_metrics(group: &GroupShell, natural: &[f64]) -> GroupMetrics {
    let mut m = GroupMetrics::default();
    let mut total = 0.;
    for member in &group.members {
        let n = natural[member.index].max(0.);
        total += n;
        if group.placement.is_centered() {
            match member.placement {
                Placement::StackedTl => m.tl_offset += n,
                Placement::StackedBr => m.br_offset += n,
                _ => m.centered_sum += n,
            }
        }
    }
    m.size = if group.placement.is_centered() {
        m.centered_sum + 2. * m.tl_offset.max(m.br_offset)
    } else {
        total
    };
    m
}

/// Space left for group `i` once the other resolved groups are accounted
/// for. Centered groups count double: they occupy symmetric space on both
/// sides of center.
fn resolved_available(
    groups: &[GroupShell],
    i: usize,
    spans: &[Option<Span>],
    natural: &[f64],
    padded_extent: f64,
) -> f64 {
    let mut available = padded_extent;
    for (j, group) in groups.iter().enumerate() {
        if j == i || spans[j].is_none() {
            continue;
        }
        let size = group_metrics(group, natural).size;
        available -= if group.placement.is_centered() {
            2. * size
        } else {
            size
        };
    }
    available.max(0.)
}

/// Shrinks the group's expandable element by the overflow deficit, if any,
/// right before the group is placed.
fn shrink_expandable(
    groups: &[GroupShell],
    i: usize,
    spans: &[Option<Span>],
    natural: &mut [f64],
    padded_extent: f64,
) {
    let group = &groups[i];
    let Some(expandable) = group.expandable else {
        return;
    };
    let size = group_metrics(group, natural).size;
    let available = resolved_available(groups, i, spans, natural, padded_extent);
    if size <= available {
        return;
    }
    let deficit = size - available;
    let member = group.members[expandable];
    // In a centered group an edge-pinned expandable occupies symmetric
    // space on both sides of center, so the shrink is split 50/50 to keep
    // the group centered; otherwise the whole deficit comes out of it.
    let amount = if group.placement.is_centered() && !member.placement.is_centered() {
        deficit / 2.
    } else {
        deficit
    };
    let slot = member.index;
    natural[slot] = (natural[slot] - amount).max(0.);
    trace!(
        "shrinking expandable element in group {i} by {deficit} to {}",
        natural[slot]
    );
}

/// Runs one allocation pass over the group shells.
///
/// `natural` holds the current preferred size of every element slot along
/// the variable axis; slots outside any group are ignored. The solver never
/// mutates its inputs, so re-running it with the same state is idempotent.
pub fn solve(groups: &[GroupShell], natural: &[f64], params: &SolveParams) -> SolveResult {
    let mut natural = natural.to_vec();
    let var_padding = params.var_padding.max(0.);

    // Fit-content panels shrink their own box around the single group
    // before any element is placed.
    let mut extent = params.extent.max(0.);
    let mut panel_offset = 0.;
    if let Some(tag) = params.dynamic {
        if groups.len() == 1 {
            let content = group_metrics(&groups[0], &natural).size;
            let shrunk = (content + 2. * var_padding)
                .min(params.monitor_extent)
                .min(extent)
                .max(0.);
            panel_offset = match tag {
                Placement::StackedTl => 0.,
                Placement::StackedBr => extent - shrunk,
                _ => (extent - shrunk) / 2.,
            };
            extent = shrunk;
        }
    }

    let padded_start = var_padding.min(extent / 2.);
    let padded_end = (extent - var_padding).max(extent / 2.);
    let padded_extent = padded_end - padded_start;

    let mut spans: Vec<Option<Span>> = vec![None; groups.len()];

    // The centered-on-monitor group resolves first, against the panel's full
    // padded bounds, regardless of its neighbors.
    if let Some(ci) = center_monitor_group(groups) {
        shrink_expandable(groups, ci, &spans, &mut natural, padded_extent);
        let size = group_metrics(&groups[ci], &natural).size;
        let mid = (padded_start + padded_end) / 2.;
        let start = (mid - size / 2.)
            .min(padded_end - size)
            .max(padded_start);
        spans[ci] = Some(Span::new(start, start + size));
    }

    // Remaining groups resolve once their relevant neighbors are known. At
    // least one group resolves per pass in any well-formed configuration, so
    // the group count bounds the iteration; hitting the cap with groups
    // still unresolved is the defensive fallback, not an expected path.
    let max_passes = groups.len().max(1);
    for _ in 0..max_passes {
        let mut progress = false;

        for (i, group) in groups.iter().enumerate() {
            if spans[i].is_some() {
                continue;
            }

            let prev_resolved = i == 0 || spans[i - 1].is_some();
            let next_resolved = i + 1 == groups.len() || spans[i + 1].is_some();
            let left = if i == 0 {
                padded_start
            } else {
                spans[i - 1].map_or(padded_start, |s| s.end)
            };
            let right = if i + 1 == groups.len() {
                padded_end
            } else {
                spans[i + 1].map_or(padded_end, |s| s.start)
            };

            let placed = match group.placement {
                Placement::StackedTl if prev_resolved => {
                    shrink_expandable(groups, i, &spans, &mut natural, padded_extent);
                    let size = group_metrics(group, &natural).size;
                    Some(Span::new(left, left + size))
                }
                Placement::StackedBr if next_resolved => {
                    shrink_expandable(groups, i, &spans, &mut natural, padded_extent);
                    let size = group_metrics(group, &natural).size;
                    Some(Span::new(right - size, right))
                }
                Placement::Centered | Placement::CenteredMonitor
                    if prev_resolved && next_resolved =>
                {
                    shrink_expandable(groups, i, &spans, &mut natural, padded_extent);
                    let size = group_metrics(group, &natural).size;
                    let start = left + (right - left - size) / 2.;
                    Some(Span::new(start, start + size))
                }
                _ => None,
            };

            if let Some(span) = placed {
                spans[i] = Some(span);
                progress = true;
            }
        }

        if spans.iter().all(Option::is_some) {
            break;
        }
        if !progress {
            break;
        }
    }

    if spans.iter().any(Option::is_none) {
        warn!("allocation left unresolved groups; they collapse to zero for this pass");
    }

    // Lay out members within their resolved groups.
    let mut element_spans: Vec<Option<Span>> = vec![None; natural.len()];
    let mut resolved_groups = Vec::with_capacity(groups.len());

    for (i, group) in groups.iter().enumerate() {
        let metrics = group_metrics(group, &natural);
        resolved_groups.push(ResolvedGroup {
            span: spans[i],
            size: metrics.size,
            tl_offset: metrics.tl_offset,
            br_offset: metrics.br_offset,
        });

        let Some(span) = spans[i] else {
            for member in &group.members {
                element_spans[member.index] = Some(Span::default());
            }
            continue;
        };

        if !group.placement.is_centered() {
            let mut cursor = span.start;
            for member in &group.members {
                let n = natural[member.index].max(0.);
                element_spans[member.index] = Some(Span::new(cursor, cursor + n));
                cursor += n;
            }
        } else {
            // Edge-pinned members hug the group bounds; the centered run
            // centers within the full group span.
            let mid = (span.start + span.end) / 2.;
            let mut tl_cursor = span.start;
            let mut br_cursor = span.end - metrics.br_offset;
            let mut c_cursor = mid - metrics.centered_sum / 2.;
            for member in &group.members {
                let n = natural[member.index].max(0.);
                let cursor = match member.placement {
                    Placement::StackedTl => &mut tl_cursor,
                    Placement::StackedBr => &mut br_cursor,
                    _ => &mut c_cursor,
                };
                element_spans[member.index] = Some(Span::new(*cursor, *cursor + n));
                *cursor += n;
            }
        }
    }

    SolveResult {
        panel_span: Span::new(panel_offset, panel_offset + extent),
        element_spans,
        groups: resolved_groups,
    }
}
