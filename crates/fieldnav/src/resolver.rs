#![forbid(unsafe_code)]

//! Directional query orchestration.
//!
//! # State machine
//!
//! ```text
//!   Idle ──next()──▶ Scanning{pass 1} ──no eligible candidate──▶ Scanning{pass 2}
//!                         │                                           │
//!                         ├──best candidate──▶ Resolved(id)           │
//!                         │                        ▲──best candidate──┤
//!                         └──────────────▶ Exhausted ◀──nothing───────┘
//! ```
//!
//! Every call starts in `Idle` and reports its final phase; nothing carries
//! over to the next frame. The second pass only walks the ids the widening
//! adds past the first window, and is skipped when that extension is empty
//! or the first pass hit the out-of-bounds threshold.
//!
//! # Invariants
//!
//! - The probe cursor holds the entry id again when `next` returns or
//!   unwinds.
//! - A `Focus` outcome names a control whose rect lies inside the panel
//!   bounds.
//! - No id is probed twice in one query.
//! - Same snapshot, same outcome.

use crate::bounds::{PanelMetrics, panel_bounds};
use crate::boundary::BoundaryClassifier;
use crate::probe::{GeometryProbe, ProbeGuard};
use crate::row_group::RowGroupClassifier;
use crate::scanner::{CandidateScanner, ScanStats, ScanWindow};
use crate::scoring::{ScoreContext, ScoringEngine};
use fieldnav_core::{ControlId, Direction, NO_CONTROL, NavConfig, NavConfigError, Rect};
use serde::{Deserialize, Serialize};

/// One arrow-key query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavRequest {
    pub direction: Direction,
    /// Rect of the control that has focus.
    pub previous_rect: Rect,
    /// Ids at or below this belong to UI drawn before the panel.
    pub before_boundary_id: ControlId,
    /// Best guess at the panel's last id; may be wrong in either direction.
    pub approx_end_id: ControlId,
    pub panel: PanelMetrics,
}

/// What the owner should do with the key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum NavigationOutcome {
    /// Move keyboard focus to this control.
    Focus(ControlId),
    /// Nothing further this way inside the panel; hand the key to a sibling
    /// panel, a header, or drop it.
    LeavePanel(Direction),
}

/// Phase of a directional query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolvePhase {
    #[default]
    Idle,
    Scanning {
        pass: u8,
    },
    Resolved(ControlId),
    Exhausted,
}

/// Diagnostics for one `next` call.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResolveReport {
    /// Phase the query finished in.
    pub phase: ResolvePhase,
    /// Passes actually scanned (0 when the query failed before scanning).
    pub passes: u8,
    /// Bounds used for the query.
    pub bounds: Rect,
    /// Counters summed over all passes.
    pub stats: ScanStats,
    /// Score of the returned candidate.
    pub winning_score: Option<f64>,
}

/// Resolves arrow-key presses to focus targets inside one panel style.
#[derive(Debug, Clone, Default)]
pub struct NavigationResolver {
    config: NavConfig,
}

impl NavigationResolver {
    /// Resolver with `config`. An invalid config makes every query leave
    /// the panel; use [`try_new`](Self::try_new) to reject it up front.
    pub fn new(config: NavConfig) -> Self {
        Self { config }
    }

    /// Resolver with a validated `config`.
    pub fn try_new(config: NavConfig) -> Result<Self, NavConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    /// Pick the control to focus for `request`.
    pub fn next<P: GeometryProbe + ?Sized>(
        &self,
        probe: &mut P,
        request: &NavRequest,
    ) -> NavigationOutcome {
        self.next_with_report(probe, request).0
    }

    /// [`next`](Self::next), plus what the query did to get there.
    pub fn next_with_report<P: GeometryProbe + ?Sized>(
        &self,
        probe: &mut P,
        request: &NavRequest,
    ) -> (NavigationOutcome, ResolveReport) {
        let mut guard = ProbeGuard::new(probe);
        let id_was = guard.id_was();
        let direction = request.direction;
        let mut report = ResolveReport::default();

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "fieldnav.resolve",
            direction = direction.as_str(),
            id_was,
            pass = tracing::field::Empty
        )
        .entered();

        let exhausted = |mut report: ResolveReport| {
            report.phase = ResolvePhase::Exhausted;
            #[cfg(feature = "tracing")]
            tracing::debug!(
                passes = report.passes,
                probes = report.stats.probes,
                "no candidate; leaving panel"
            );
            (NavigationOutcome::LeavePanel(direction), report)
        };

        if id_was == NO_CONTROL {
            return exhausted(report);
        }
        if let Err(_err) = self.config.validate() {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %_err, "invalid navigation config");
            return exhausted(report);
        }

        let bounds = panel_bounds(&request.panel, &self.config);
        report.bounds = bounds;
        if bounds.is_degenerate() {
            return exhausted(report);
        }

        let usable_width = request.panel.usable_width(&self.config);
        let classifier = RowGroupClassifier::new(&request.panel, &self.config);
        let scanner = CandidateScanner::new(bounds, &classifier, usable_width, &self.config);
        let engine = ScoringEngine::new(ScoreContext {
            direction,
            id_was,
            prev_rect: request.previous_rect,
            prev_slot: classifier.slot_of(&request.previous_rect),
            column_anchor: classifier.anchor(),
            bounds,
            usable_width,
            config: &self.config,
        });

        let mut window = ScanWindow::first_pass(
            direction,
            id_was,
            request.before_boundary_id,
            request.approx_end_id,
            &self.config,
        );
        let mut last_read = None;
        for pass in 1..=2u8 {
            if pass == 2 {
                window = window.widened(request.before_boundary_id, &self.config);
                if window.is_empty() {
                    break;
                }
            }

            report.phase = ResolvePhase::Scanning { pass };
            report.passes = pass;
            #[cfg(feature = "tracing")]
            {
                _span.record("pass", pass);
                tracing::debug!(
                    start = window.start,
                    stop = window.stop,
                    descending = window.descending,
                    "scanning"
                );
            }

            let outcome = scanner.scan_after(&mut guard, &window, last_read);
            report.stats.merge(&outcome.stats);

            if let Some((winner, score)) = engine.best(&outcome.candidates) {
                report.phase = ResolvePhase::Resolved(winner.id);
                report.winning_score = Some(score);
                #[cfg(feature = "tracing")]
                tracing::debug!(id = winner.id, score, "resolved");
                return (NavigationOutcome::Focus(winner.id), report);
            }
            if outcome.stats.aborted {
                break;
            }
            last_read = outcome.last_read;
        }

        exhausted(report)
    }

    /// Bounds a candidate must fit inside for `panel`.
    pub fn bounds(&self, panel: &PanelMetrics) -> Rect {
        panel_bounds(panel, &self.config)
    }

    /// Boundary predicates for `panel`.
    pub fn boundary(&self, panel: &PanelMetrics) -> BoundaryClassifier {
        BoundaryClassifier::new(panel, &self.config)
    }

    /// Whether the control holding the cursor is the panel's first field.
    pub fn is_first_field<P: GeometryProbe + ?Sized>(
        &self,
        probe: &mut P,
        panel: &PanelMetrics,
    ) -> bool {
        let focused = ProbeGuard::new(probe).focused_rect();
        self.boundary(panel).is_first_field(focused)
    }

    /// Whether the control holding the cursor is the panel's last field.
    pub fn is_last_field<P: GeometryProbe + ?Sized>(
        &self,
        probe: &mut P,
        panel: &PanelMetrics,
    ) -> bool {
        let focused = ProbeGuard::new(probe).focused_rect();
        self.boundary(panel).is_last_field(focused)
    }

    /// Whether the control holding the cursor has drifted outside the
    /// panel. Nothing focused is not out of bounds.
    pub fn is_out_of_bounds<P: GeometryProbe + ?Sized>(
        &self,
        probe: &mut P,
        panel: &PanelMetrics,
    ) -> bool {
        let focused = ProbeGuard::new(probe).focused_rect();
        focused.is_some_and(|rect| self.boundary(panel).is_out_of_bounds(&rect))
    }
}
