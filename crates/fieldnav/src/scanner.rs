#![forbid(unsafe_code)]

//! Candidate enumeration over an id window.
//!
//! The scanner walks a bounded id range in the direction's scan order,
//! probing each id through the cursor guard and dropping everything that
//! cannot be a focus target inside this panel.
//!
//! # Skip rules (in order)
//!
//! 1. **Not focusable**: the host refuses focus; no rect is read.
//! 2. **Duplicate**: the rect equals the rect read immediately before it.
//!    Hosts emit ghost entries for internal bookkeeping controls.
//! 3. **Degenerate**: zero width or height.
//! 4. **Phantom**: geometry that matches a known signature of unrelated host
//!    UI sharing the id space (see [`PHANTOM_WIDTH_DELTAS`]).
//! 5. **Out of bounds**: not fully inside the panel bounds. These count
//!    toward the abort threshold; any accepted candidate resets the count.
//!
//! # Invariants
//!
//! - Ids at or below `before_boundary_id` are never probed.
//! - A second pass only walks ids the first pass did not cover.
//! - The cursor is back at the entry id when [`CandidateScanner::scan`]
//!   returns, however the scan ended.
//! - Candidates come out in scan order.

use crate::probe::{GeometryProbe, ProbeGuard, ProbeReading};
use crate::row_group::{RowGroupClassifier, RowSlot};
use fieldnav_core::{ControlId, Direction, NavConfig, Rect};

/// `usable_width - width` values reported by host chrome that shares the
/// panel's left anchor but is not a field: a header strip drawn to the
/// panel edge (-4, the right margin), a row shortened by the vertical
/// scrollbar (15), and one shortened by scrollbar plus right margin (19).
pub const PHANTOM_WIDTH_DELTAS: [f32; 3] = [-4.0, 15.0, 19.0];

/// Half-open id range and the order it is walked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanWindow {
    /// First id in the range (inclusive).
    pub start: ControlId,
    /// End of the range (exclusive).
    pub stop: ControlId,
    /// Walk from `stop - 1` down to `start`.
    pub descending: bool,
}

impl ScanWindow {
    /// Conservative window for the first pass of a directional query.
    ///
    /// Forward directions walk up from `id_was + 1` and stop at the end hint
    /// or after `first_pass_span` ids. Backward directions walk down from
    /// `id_was - 1` over at most `first_pass_span` ids. Ids at or below
    /// `before_boundary_id` are never included.
    pub fn first_pass(
        direction: Direction,
        id_was: ControlId,
        before_boundary_id: ControlId,
        approx_end_id: ControlId,
        config: &NavConfig,
    ) -> Self {
        let floor = before_boundary_id.saturating_add(1);
        if direction.scans_descending() {
            Self {
                start: floor.max(id_was.saturating_sub(config.first_pass_span)),
                stop: id_was,
                descending: true,
            }
        } else {
            let start = id_was.saturating_add(1).max(floor);
            let end_hint = approx_end_id.max(id_was).saturating_add(1);
            Self {
                start,
                stop: end_hint.min(start.saturating_add(config.first_pass_span)).max(start),
                descending: false,
            }
        }
    }

    /// The ids a second pass adds past `self`, continuing in scan order.
    ///
    /// The result never overlaps `self` and holds at most
    /// `second_pass_widening` ids, so a query probes no more than
    /// `first_pass_span + second_pass_widening` ids however wrong the end
    /// hint is.
    pub fn widened(&self, before_boundary_id: ControlId, config: &NavConfig) -> Self {
        if self.descending {
            let floor = before_boundary_id.saturating_add(1);
            Self {
                start: floor.max(self.start.saturating_sub(config.second_pass_widening)),
                stop: self.start,
                descending: true,
            }
        } else {
            Self {
                start: self.stop,
                stop: self.stop.saturating_add(config.second_pass_widening),
                descending: false,
            }
        }
    }

    /// True when the window holds no ids.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.stop
    }

    /// Number of ids in the window.
    #[inline]
    pub fn len(&self) -> u64 {
        self.stop.saturating_sub(self.start)
    }

    /// Ids in scan order.
    pub fn ids(&self) -> WindowIds {
        WindowIds {
            front: self.start,
            back: self.stop,
            descending: self.descending,
        }
    }
}

/// Iterator over a [`ScanWindow`] in scan order.
#[derive(Debug, Clone)]
pub struct WindowIds {
    front: ControlId,
    back: ControlId,
    descending: bool,
}

impl Iterator for WindowIds {
    type Item = ControlId;

    fn next(&mut self) -> Option<ControlId> {
        if self.front >= self.back {
            return None;
        }
        if self.descending {
            self.back -= 1;
            Some(self.back)
        } else {
            let id = self.front;
            self.front += 1;
            Some(id)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = usize::try_from(self.back.saturating_sub(self.front)).unwrap_or(usize::MAX);
        (len, Some(len))
    }
}

/// A focusable, in-bounds control found during a scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub id: ControlId,
    pub rect: Rect,
    pub row_slot: Option<RowSlot>,
}

/// Why an id was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    NotFocusable,
    Duplicate,
    Degenerate,
    Phantom,
    OutOfBounds,
}

impl Rejection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Rejection::NotFocusable => "not_focusable",
            Rejection::Duplicate => "duplicate",
            Rejection::Degenerate => "degenerate",
            Rejection::Phantom => "phantom",
            Rejection::OutOfBounds => "out_of_bounds",
        }
    }
}

/// Counters for one or more scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanStats {
    pub probes: u32,
    pub accepted: u32,
    pub not_focusable: u32,
    pub duplicate: u32,
    pub degenerate: u32,
    pub phantom: u32,
    pub out_of_bounds: u32,
    /// The out-of-bounds threshold ended the scan early.
    pub aborted: bool,
}

impl ScanStats {
    fn reject(&mut self, rejection: Rejection) {
        let counter = match rejection {
            Rejection::NotFocusable => &mut self.not_focusable,
            Rejection::Duplicate => &mut self.duplicate,
            Rejection::Degenerate => &mut self.degenerate,
            Rejection::Phantom => &mut self.phantom,
            Rejection::OutOfBounds => &mut self.out_of_bounds,
        };
        *counter = counter.saturating_add(1);
    }

    /// Count of skipped ids for one reason.
    pub fn rejected(&self, rejection: Rejection) -> u32 {
        match rejection {
            Rejection::NotFocusable => self.not_focusable,
            Rejection::Duplicate => self.duplicate,
            Rejection::Degenerate => self.degenerate,
            Rejection::Phantom => self.phantom,
            Rejection::OutOfBounds => self.out_of_bounds,
        }
    }

    /// Fold another scan's counters into these.
    pub fn merge(&mut self, other: &ScanStats) {
        self.probes = self.probes.saturating_add(other.probes);
        self.accepted = self.accepted.saturating_add(other.accepted);
        self.not_focusable = self.not_focusable.saturating_add(other.not_focusable);
        self.duplicate = self.duplicate.saturating_add(other.duplicate);
        self.degenerate = self.degenerate.saturating_add(other.degenerate);
        self.phantom = self.phantom.saturating_add(other.phantom);
        self.out_of_bounds = self.out_of_bounds.saturating_add(other.out_of_bounds);
        self.aborted |= other.aborted;
    }
}

/// Candidates of one scan, in scan order.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    pub candidates: Vec<Candidate>,
    pub stats: ScanStats,
    /// Last rect read, for duplicate detection in a following scan.
    pub last_read: Option<Rect>,
}

/// Probes a window and filters it down to candidates.
#[derive(Debug, Clone, Copy)]
pub struct CandidateScanner<'c> {
    bounds: Rect,
    classifier: &'c RowGroupClassifier,
    usable_width: f32,
    abort_threshold: u32,
}

impl<'c> CandidateScanner<'c> {
    /// Scanner for one panel. `usable_width` is the panel width minus the
    /// left and right margins.
    pub fn new(
        bounds: Rect,
        classifier: &'c RowGroupClassifier,
        usable_width: f32,
        config: &NavConfig,
    ) -> Self {
        Self {
            bounds,
            classifier,
            usable_width,
            abort_threshold: config.abort_threshold.max(1),
        }
    }

    /// True for rects that look like host chrome rather than a field.
    pub fn is_phantom(&self, rect: &Rect) -> bool {
        let anchored = rect.x == self.bounds.x;
        if rect.width == self.usable_width && !anchored {
            return true;
        }
        anchored
            && PHANTOM_WIDTH_DELTAS
                .iter()
                .any(|delta| self.usable_width - rect.width == *delta)
    }

    /// Walk `window`, returning the surviving candidates.
    pub fn scan<P: GeometryProbe + ?Sized>(
        &self,
        guard: &mut ProbeGuard<'_, P>,
        window: &ScanWindow,
    ) -> ScanOutcome {
        self.scan_after(guard, window, None)
    }

    /// Walk `window` as the continuation of an earlier scan whose last read
    /// rect was `last_read`. A ghost straddling the two windows is still
    /// skipped as a duplicate.
    pub fn scan_after<P: GeometryProbe + ?Sized>(
        &self,
        guard: &mut ProbeGuard<'_, P>,
        window: &ScanWindow,
        mut last_read: Option<Rect>,
    ) -> ScanOutcome {
        let mut probe = guard.scoped();
        let mut outcome = ScanOutcome::default();
        let mut out_of_bounds_run = 0u32;

        for id in window.ids() {
            outcome.stats.probes = outcome.stats.probes.saturating_add(1);
            let rect = match probe.probe(id) {
                ProbeReading::NotFocusable => {
                    self.reject(&mut outcome.stats, id, Rejection::NotFocusable);
                    continue;
                }
                ProbeReading::Rect(rect) => rect,
            };

            if last_read.replace(rect) == Some(rect) {
                self.reject(&mut outcome.stats, id, Rejection::Duplicate);
                continue;
            }
            if rect.is_degenerate() {
                self.reject(&mut outcome.stats, id, Rejection::Degenerate);
                continue;
            }
            if self.is_phantom(&rect) {
                self.reject(&mut outcome.stats, id, Rejection::Phantom);
                continue;
            }
            if !self.bounds.contains_rect(&rect) {
                self.reject(&mut outcome.stats, id, Rejection::OutOfBounds);
                out_of_bounds_run += 1;
                if out_of_bounds_run >= self.abort_threshold {
                    outcome.stats.aborted = true;
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        id,
                        threshold = self.abort_threshold,
                        "scan aborted: out-of-bounds threshold reached"
                    );
                    break;
                }
                continue;
            }

            out_of_bounds_run = 0;
            outcome.stats.accepted = outcome.stats.accepted.saturating_add(1);
            outcome.candidates.push(Candidate {
                id,
                rect,
                row_slot: self.classifier.slot_of(&rect),
            });
        }

        outcome.last_read = last_read;
        outcome
    }

    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    fn reject(&self, stats: &mut ScanStats, id: ControlId, rejection: Rejection) {
        #[cfg(feature = "tracing")]
        tracing::trace!(id, reason = rejection.as_str(), "candidate rejected");
        stats.reject(rejection);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::{PanelMetrics, panel_bounds};
    use std::collections::BTreeMap;

    #[derive(Default)]
    struct MapHost {
        active: ControlId,
        rects: BTreeMap<ControlId, Rect>,
        probed: Vec<ControlId>,
    }

    impl MapHost {
        fn with(mut self, id: ControlId, rect: Rect) -> Self {
            self.rects.insert(id, rect);
            self
        }
    }

    impl GeometryProbe for MapHost {
        fn active(&self) -> ControlId {
            self.active
        }

        fn set_active(&mut self, id: ControlId) {
            self.active = id;
            self.probed.push(id);
        }

        fn can_receive_focus(&self, id: ControlId) -> bool {
            self.rects.contains_key(&id)
        }

        fn current_rect(&self) -> Rect {
            self.rects.get(&self.active).copied().unwrap_or_default()
        }
    }

    fn config() -> NavConfig {
        NavConfig::default()
            .with_top_margin(0.0)
            .with_resize_strip_height(0.0)
    }

    fn panel() -> PanelMetrics {
        PanelMetrics::new(218.0, 100.0)
    }

    fn run(host: &mut MapHost, window: ScanWindow, cfg: &NavConfig) -> ScanOutcome {
        let panel = panel();
        let bounds = panel_bounds(&panel, cfg);
        let classifier = RowGroupClassifier::new(&panel, cfg);
        let scanner = CandidateScanner::new(bounds, &classifier, panel.usable_width(cfg), cfg);
        let mut guard = ProbeGuard::new(host);
        scanner.scan(&mut guard, &window)
    }

    fn ascending(start: ControlId, stop: ControlId) -> ScanWindow {
        ScanWindow {
            start,
            stop,
            descending: false,
        }
    }

    #[test]
    fn forward_window_first_and_second_pass() {
        let cfg = NavConfig::default();
        let first = ScanWindow::first_pass(Direction::Down, 20, 10, 40, &cfg);
        assert_eq!(first, ascending(21, 41));
        assert_eq!(first.widened(10, &cfg), ascending(41, 241));
    }

    #[test]
    fn forward_window_caps_first_pass_span() {
        let cfg = NavConfig::default().with_first_pass_span(5);
        let first = ScanWindow::first_pass(Direction::Right, 20, 10, 400, &cfg);
        assert_eq!(first, ascending(21, 26));
    }

    #[test]
    fn widening_ignores_an_inflated_end_hint() {
        let cfg = NavConfig::default();
        let first = ScanWindow::first_pass(Direction::Down, 20, 10, 2_000_000, &cfg);
        let second = first.widened(10, &cfg);
        assert_eq!(first, ascending(21, 121));
        assert_eq!(second, ascending(121, 321));
        assert_eq!(first.len() + second.len(), 300);
    }

    #[test]
    fn forward_window_survives_stale_end_hint() {
        let cfg = NavConfig::default();
        // Hint below the focused id: the first pass is empty, the second
        // still widens past the focus.
        let first = ScanWindow::first_pass(Direction::Down, 50, 10, 30, &cfg);
        assert!(first.is_empty());
        assert_eq!(first.widened(10, &cfg), ascending(51, 251));
    }

    #[test]
    fn backward_window_respects_boundary() {
        let cfg = NavConfig::default().with_first_pass_span(5);
        let first = ScanWindow::first_pass(Direction::Up, 20, 10, 40, &cfg);
        assert_eq!(
            first,
            ScanWindow {
                start: 15,
                stop: 20,
                descending: true
            }
        );
        let second = first.widened(10, &cfg);
        assert_eq!(second.start, 11);
        assert_eq!(second.ids().collect::<Vec<_>>(), (11..15).rev().collect::<Vec<_>>());
    }

    #[test]
    fn backward_widening_is_capped() {
        let cfg = NavConfig::default()
            .with_first_pass_span(5)
            .with_second_pass_widening(7);
        let first = ScanWindow::first_pass(Direction::Left, 1_000, 0, 0, &cfg);
        let second = first.widened(0, &cfg);
        assert_eq!((second.start, second.stop), (988, 995));
    }

    #[test]
    fn backward_window_empty_at_boundary() {
        let cfg = NavConfig::default();
        let first = ScanWindow::first_pass(Direction::Up, 11, 10, 40, &cfg);
        assert!(first.is_empty());
        let second = first.widened(10, &cfg);
        assert!(second.is_empty());
        assert_eq!(second.ids().count(), 0);
    }

    #[test]
    fn window_ids_size_hint_matches_len() {
        let window = ascending(5, 12);
        assert_eq!(window.len(), 7);
        assert_eq!(window.ids().size_hint(), (7, Some(7)));
    }

    #[test]
    fn skips_unfocusable_duplicate_and_degenerate() {
        let row = Rect::new(12.0, 18.0, 202.0, 16.0);
        let mut host = MapHost {
            active: 1,
            ..Default::default()
        }
        .with(2, row)
        .with(3, row)
        .with(5, Rect::new(12.0, 36.0, 0.0, 16.0))
        .with(6, Rect::new(12.0, 54.0, 202.0, 16.0));
        let out = run(&mut host, ascending(2, 7), &config());

        let ids: Vec<_> = out.candidates.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 6]);
        assert_eq!(out.stats.probes, 5);
        assert_eq!(out.stats.rejected(Rejection::Duplicate), 1);
        assert_eq!(out.stats.rejected(Rejection::NotFocusable), 1);
        assert_eq!(out.stats.rejected(Rejection::Degenerate), 1);
        assert_eq!(host.active, 1);
    }

    #[test]
    fn duplicate_means_immediately_preceding_read() {
        let row = Rect::new(12.0, 18.0, 202.0, 16.0);
        let mut host = MapHost::default()
            .with(2, row)
            .with(3, Rect::new(12.0, 36.0, 202.0, 16.0))
            .with(4, row);
        let out = run(&mut host, ascending(2, 5), &config());
        assert_eq!(out.candidates.len(), 3);
    }

    #[test]
    fn duplicate_carries_across_scans() {
        let row = Rect::new(12.0, 18.0, 202.0, 16.0);
        let cfg = config();
        let panel = panel();
        let bounds = panel_bounds(&panel, &cfg);
        let classifier = RowGroupClassifier::new(&panel, &cfg);
        let scanner = CandidateScanner::new(bounds, &classifier, panel.usable_width(&cfg), &cfg);
        let mut host = MapHost::default()
            .with(2, row)
            .with(3, row)
            .with(4, Rect::new(12.0, 36.0, 202.0, 16.0));
        let mut guard = ProbeGuard::new(&mut host);

        let first = scanner.scan(&mut guard, &ascending(2, 3));
        assert_eq!(first.last_read, Some(row));
        let second = scanner.scan_after(&mut guard, &ascending(3, 5), first.last_read);
        let ids: Vec<_> = second.candidates.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![4]);
        assert_eq!(second.stats.rejected(Rejection::Duplicate), 1);
    }

    #[test]
    fn rejects_phantom_signatures() {
        let cfg = config();
        // usable width is 218 - 12 - 4 = 202
        let mut host = MapHost::default()
            .with(2, Rect::new(20.0, 0.0, 202.0, 16.0))
            .with(3, Rect::new(12.0, 18.0, 187.0, 16.0))
            .with(4, Rect::new(12.0, 36.0, 183.0, 16.0))
            .with(5, Rect::new(12.0, 54.0, 186.0, 16.0));
        let out = run(&mut host, ascending(2, 6), &cfg);
        let ids: Vec<_> = out.candidates.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![5]);
        assert_eq!(out.stats.rejected(Rejection::Phantom), 3);
    }

    #[test]
    fn phantom_wider_than_usable_is_rejected_even_if_out_of_bounds() {
        let cfg = config();
        let mut host = MapHost::default().with(2, Rect::new(12.0, 0.0, 206.0, 16.0));
        let out = run(&mut host, ascending(2, 3), &cfg);
        assert!(out.candidates.is_empty());
        assert_eq!(out.stats.rejected(Rejection::Phantom), 1);
        assert_eq!(out.stats.rejected(Rejection::OutOfBounds), 0);
    }

    #[test]
    fn out_of_bounds_threshold_aborts_and_restores() {
        let cfg = config().with_abort_threshold(3);
        let mut host = MapHost {
            active: 7,
            ..Default::default()
        };
        for id in 10..20 {
            host.rects
                .insert(id, Rect::new(12.0, 500.0 + id as f32 * 18.0, 100.0, 16.0));
        }
        host.rects.insert(20, Rect::new(12.0, 0.0, 100.0, 16.0));
        let out = run(&mut host, ascending(10, 21), &cfg);

        assert!(out.stats.aborted);
        assert_eq!(out.stats.probes, 3);
        assert!(out.candidates.is_empty());
        assert_eq!(host.active, 7);
        assert_eq!(host.probed.last(), Some(&7));
    }

    #[test]
    fn accepted_candidate_resets_out_of_bounds_run() {
        let cfg = config().with_abort_threshold(2);
        let mut host = MapHost::default()
            .with(2, Rect::new(12.0, 900.0, 100.0, 16.0))
            .with(3, Rect::new(12.0, 0.0, 100.0, 16.0))
            .with(4, Rect::new(12.0, 918.0, 100.0, 16.0))
            .with(5, Rect::new(12.0, 18.0, 100.0, 16.0));
        let out = run(&mut host, ascending(2, 6), &cfg);
        assert!(!out.stats.aborted);
        assert_eq!(out.candidates.len(), 2);
    }

    #[test]
    fn candidates_carry_row_slots() {
        let mut host = MapHost::default()
            .with(2, Rect::new(12.0, 18.0, 66.0, 16.0))
            .with(3, Rect::new(80.0, 18.0, 66.0, 16.0))
            .with(4, Rect::new(148.0, 18.0, 66.0, 16.0));
        let out = run(&mut host, ascending(2, 5), &config());
        let slots: Vec<_> = out.candidates.iter().map(|c| c.row_slot).collect();
        assert_eq!(
            slots,
            vec![
                Some(RowSlot::First),
                Some(RowSlot::Middle),
                Some(RowSlot::Last)
            ]
        );
    }

    #[test]
    fn stats_merge_accumulates() {
        let mut a = ScanStats {
            probes: 3,
            phantom: 1,
            ..Default::default()
        };
        let b = ScanStats {
            probes: 2,
            accepted: 1,
            aborted: true,
            ..Default::default()
        };
        a.merge(&b);
        assert_eq!(a.probes, 5);
        assert_eq!(a.accepted, 1);
        assert_eq!(a.phantom, 1);
        assert!(a.aborted);
    }
}
