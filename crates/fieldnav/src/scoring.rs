#![forbid(unsafe_code)]

//! Heuristic ranking of scan candidates.
//!
//! Each candidate gets a score relative to the control that had focus
//! (`prev`) and the requested direction. Lower wins; ties go to the candidate
//! seen first in scan order.
//!
//! # Terms
//!
//! | term | effect |
//! |---|---|
//! | id distance | `100 × primary gap + 5 × secondary offset + abs(id − ideal)` |
//! | id proximity | tiered bonus for ids next to `ideal = id_was ± 1` |
//! | primary alignment | bonus for whole-row / adjacent-field steps, penalty otherwise |
//! | secondary alignment | bonus for exact column/row alignment or the panel's first column/row |
//! | row group | bonus for moving between matching three-column slots; an unclassified side at the column anchor counts as the first slot |
//! | plausibility | standard heights, matching widths, full-width anchored fields |
//! | exclusion | disqualifies candidates that pass `prev` the wrong way |
//!
//! Ids are only a prior: hosts hand them out in draw order, so the next
//! control down or right is usually `id_was + 1`, but composite fields
//! interleave their parts. Geometry terms are weighted to override the prior
//! when the layout disagrees.

use crate::row_group::RowSlot;
use crate::scanner::Candidate;
use fieldnav_core::geometry::approx_eq;
use fieldnav_core::{ControlId, Direction, NavConfig, Rect};

/// Weight of the gap between `prev` and the candidate along the movement axis.
pub const PRIMARY_GAP_WEIGHT: f64 = 100.0;
/// Weight of the misalignment across the movement axis.
pub const SECONDARY_OFFSET_WEIGHT: f64 = 5.0;

/// `(max id distance, bonus)` tiers, checked in order; distances past the
/// last tier get nothing.
pub const ID_PROXIMITY_TIERS: [(u64, f64); 3] = [(0, -400.0), (19, -200.0), (39, -100.0)];

/// Primary offset equals a whole-row step (vertical) or exact adjacency
/// (horizontal).
pub const WHOLE_STEP_BONUS: f64 = -300.0;
/// Integral primary offset that is not a known step.
pub const MISALIGNED_STEP_PENALTY: f64 = 150.0;
/// Fractional primary offset that is not a known step.
pub const FRACTIONAL_STEP_PENALTY: f64 = 400.0;
/// Tolerance when matching offsets against known steps.
pub const STEP_TOLERANCE: f32 = 0.5;

/// Candidate shares `prev`'s column (vertical) or row (horizontal).
pub const SECONDARY_EXACT_BONUS: f64 = -200.0;
/// Candidate sits in the panel's first column (vertical) or row (horizontal).
pub const SECONDARY_ANCHORED_BONUS: f64 = -100.0;

/// Vertical move to the same slot, or horizontal move to the next slot.
pub const SLOT_MATCH_BONUS: f64 = -500.0;
/// Vertical move to a neighbouring slot.
pub const SLOT_ADJACENT_BONUS: f64 = -150.0;
/// Multiplier for slot bonuses when the rows themselves line up.
pub const SLOT_ALIGNED_SCALE: f64 = 2.0;

/// Height is one of the standard control heights.
pub const STANDARD_HEIGHT_BONUS: f64 = -20.0;
/// Height is not a multiple of the row height.
pub const IRREGULAR_HEIGHT_PENALTY: f64 = 50.0;
/// Width equals `prev`'s width.
pub const WIDTH_MATCH_BONUS: f64 = -30.0;
/// Left-anchored candidate that does not span the usable width.
pub const ANCHORED_PARTIAL_WIDTH_PENALTY: f64 = 60.0;

/// Added when the candidate lies on the wrong side of `prev`.
pub const PASSING_PENALTY: f64 = 1.0e9;
/// Totals at or above this are never returned.
pub const DISQUALIFIED_AT: f64 = PASSING_PENALTY / 2.0;

/// Per-term contributions to one candidate's score.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreBreakdown {
    pub id_distance: f64,
    pub id_proximity: f64,
    pub primary_alignment: f64,
    pub secondary_alignment: f64,
    pub row_group: f64,
    pub plausibility: f64,
    pub exclusion: f64,
}

impl ScoreBreakdown {
    /// Sum of all terms.
    pub fn total(&self) -> f64 {
        self.id_distance
            + self.id_proximity
            + self.primary_alignment
            + self.secondary_alignment
            + self.row_group
            + self.plausibility
            + self.exclusion
    }

    /// True when the candidate must not be chosen.
    pub fn is_disqualified(&self) -> bool {
        self.total() >= DISQUALIFIED_AT
    }
}

/// Everything the scorer needs to know about the current query.
#[derive(Debug, Clone, Copy)]
pub struct ScoreContext<'a> {
    pub direction: Direction,
    pub id_was: ControlId,
    pub prev_rect: Rect,
    pub prev_slot: Option<RowSlot>,
    /// X where the panel's control column starts.
    pub column_anchor: f32,
    pub bounds: Rect,
    pub usable_width: f32,
    pub config: &'a NavConfig,
}

/// Scores candidates for one query.
#[derive(Debug, Clone, Copy)]
pub struct ScoringEngine<'a> {
    ctx: ScoreContext<'a>,
}

impl<'a> ScoringEngine<'a> {
    pub fn new(ctx: ScoreContext<'a>) -> Self {
        Self { ctx }
    }

    /// The id a purely sequential layout would move to.
    pub fn ideal_next_id(&self) -> ControlId {
        if self.ctx.direction.scans_descending() {
            self.ctx.id_was.saturating_sub(1)
        } else {
            self.ctx.id_was.saturating_add(1)
        }
    }

    /// Total score of `candidate`.
    pub fn score(&self, candidate: &Candidate) -> f64 {
        self.breakdown(candidate).total()
    }

    /// Score of `candidate`, term by term.
    pub fn breakdown(&self, candidate: &Candidate) -> ScoreBreakdown {
        let ctx = &self.ctx;
        let prev = &ctx.prev_rect;
        let rect = &candidate.rect;
        let vertical = ctx.direction.is_vertical();

        let id_offset = candidate.id.abs_diff(self.ideal_next_id());
        let primary_gap = f64::from(self.primary_gap(rect).abs());
        let secondary_offset = if vertical {
            (rect.x - prev.x).abs()
        } else {
            (rect.y - prev.y).abs()
        };
        let primary_offset = self.primary_offset(rect);
        let whole_step = self.is_whole_step(primary_offset, rect);

        ScoreBreakdown {
            id_distance: PRIMARY_GAP_WEIGHT * primary_gap
                + SECONDARY_OFFSET_WEIGHT * f64::from(secondary_offset)
                + id_offset as f64,
            id_proximity: id_proximity_bonus(id_offset),
            primary_alignment: if whole_step {
                WHOLE_STEP_BONUS
            } else if primary_offset == 0.0 {
                0.0
            } else if primary_offset.fract() != 0.0 {
                FRACTIONAL_STEP_PENALTY
            } else {
                MISALIGNED_STEP_PENALTY
            },
            secondary_alignment: self.secondary_alignment(secondary_offset, rect),
            row_group: self.row_group(rect, candidate.row_slot, whole_step, secondary_offset),
            plausibility: self.plausibility(rect),
            exclusion: if self.passes_prev(rect) {
                PASSING_PENALTY
            } else {
                0.0
            },
        }
    }

    /// Lowest-scoring eligible candidate; the first one wins ties.
    pub fn best<'c>(&self, candidates: &'c [Candidate]) -> Option<(&'c Candidate, f64)> {
        let mut best: Option<(&Candidate, f64)> = None;
        for candidate in candidates {
            let breakdown = self.breakdown(candidate);
            if breakdown.is_disqualified() {
                #[cfg(feature = "tracing")]
                tracing::trace!(id = candidate.id, "candidate disqualified");
                continue;
            }
            let score = breakdown.total();
            #[cfg(feature = "tracing")]
            tracing::trace!(id = candidate.id, score, "candidate scored");
            if best.is_none_or(|(_, best_score)| score < best_score) {
                best = Some((candidate, score));
            }
        }
        best
    }

    /// Distance between facing edges along the movement axis.
    fn primary_gap(&self, rect: &Rect) -> f32 {
        let prev = &self.ctx.prev_rect;
        match self.ctx.direction {
            Direction::Up => prev.y - rect.y_max(),
            Direction::Down => rect.y - prev.y_max(),
            Direction::Left => prev.x - rect.x_max(),
            Direction::Right => rect.x - prev.x_max(),
        }
    }

    /// Distance between leading edges along the movement axis.
    fn primary_offset(&self, rect: &Rect) -> f32 {
        let prev = &self.ctx.prev_rect;
        match self.ctx.direction {
            Direction::Up => prev.y - rect.y,
            Direction::Down => rect.y - prev.y,
            Direction::Left => prev.x - rect.x,
            Direction::Right => rect.x - prev.x,
        }
    }

    fn is_whole_step(&self, offset: f32, rect: &Rect) -> bool {
        let cfg = self.ctx.config;
        let matches = |step: f32| approx_eq(offset, step, STEP_TOLERANCE);
        match self.ctx.direction {
            Direction::Up | Direction::Down => {
                let row = cfg.row_height;
                let step = cfg.row_step();
                [row, step, 2.0 * row, 2.0 * step, 3.0 * step]
                    .into_iter()
                    .any(matches)
            }
            Direction::Right => matches(self.ctx.prev_rect.width + cfg.inter_control_gap),
            Direction::Left => matches(rect.width + cfg.inter_control_gap),
        }
    }

    fn secondary_alignment(&self, offset: f32, rect: &Rect) -> f64 {
        if offset == 0.0 {
            return SECONDARY_EXACT_BONUS;
        }
        let anchored = if self.ctx.direction.is_vertical() {
            rect.x == self.ctx.bounds.x
        } else {
            rect.y == self.ctx.bounds.y
        };
        if anchored { SECONDARY_ANCHORED_BONUS } else { 0.0 }
    }

    /// Slot agreement bonus. Applies when either side sits in a
    /// three-column row; an unclassified side counts as the first slot when
    /// it starts at the column anchor.
    fn row_group(
        &self,
        rect: &Rect,
        slot: Option<RowSlot>,
        whole_step: bool,
        secondary_offset: f32,
    ) -> f64 {
        if self.ctx.prev_slot.is_none() && slot.is_none() {
            return 0.0;
        }
        let prev = self
            .ctx
            .prev_slot
            .or_else(|| self.anchored_slot(&self.ctx.prev_rect));
        let (Some(prev), Some(cand)) = (prev, slot.or_else(|| self.anchored_slot(rect))) else {
            return 0.0;
        };
        let (prev, cand) = (i16::from(prev.index()), i16::from(cand.index()));
        let (bonus, aligned) = match self.ctx.direction {
            Direction::Up | Direction::Down => {
                let bonus = match (cand - prev).abs() {
                    0 => SLOT_MATCH_BONUS,
                    1 => SLOT_ADJACENT_BONUS,
                    _ => 0.0,
                };
                (bonus, whole_step)
            }
            Direction::Left | Direction::Right => {
                let expected = if self.ctx.direction == Direction::Right {
                    prev + 1
                } else {
                    prev - 1
                };
                let bonus = if cand == expected {
                    SLOT_MATCH_BONUS
                } else {
                    0.0
                };
                (bonus, secondary_offset == 0.0)
            }
        };
        if aligned {
            bonus * SLOT_ALIGNED_SCALE
        } else {
            bonus
        }
    }

    fn anchored_slot(&self, rect: &Rect) -> Option<RowSlot> {
        approx_eq(rect.x, self.ctx.column_anchor, STEP_TOLERANCE).then_some(RowSlot::First)
    }

    fn plausibility(&self, rect: &Rect) -> f64 {
        let cfg = self.ctx.config;
        let mut score = 0.0;

        let standard = [cfg.row_height, cfg.double_row_height(), cfg.text_area_height()]
            .into_iter()
            .any(|h| approx_eq(rect.height, h, STEP_TOLERANCE));
        if standard {
            score += STANDARD_HEIGHT_BONUS;
        } else if rect.height % cfg.row_height != 0.0 {
            score += IRREGULAR_HEIGHT_PENALTY;
        }

        if approx_eq(rect.width, self.ctx.prev_rect.width, STEP_TOLERANCE) {
            score += WIDTH_MATCH_BONUS;
        }
        if rect.x == self.ctx.bounds.x && rect.width != self.ctx.usable_width {
            score += ANCHORED_PARTIAL_WIDTH_PENALTY;
        }
        score
    }

    /// True when `rect` is not strictly on the requested side of `prev`.
    ///
    /// Horizontal moves also require the candidate to share part of `prev`'s
    /// row.
    fn passes_prev(&self, rect: &Rect) -> bool {
        let prev = &self.ctx.prev_rect;
        let tol = STEP_TOLERANCE;
        match self.ctx.direction {
            Direction::Up => rect.y >= prev.y || rect.y_max() > prev.y + tol,
            Direction::Down => rect.y <= prev.y || rect.y < prev.y_max() - tol,
            Direction::Left => {
                rect.x >= prev.x || rect.x_max() > prev.x + tol || !rect.overlaps_vertically(prev)
            }
            Direction::Right => {
                rect.x <= prev.x || rect.x < prev.x_max() - tol || !rect.overlaps_vertically(prev)
            }
        }
    }
}

/// Tiered bonus for ids close to the ideal next id.
pub fn id_proximity_bonus(id_offset: u64) -> f64 {
    ID_PROXIMITY_TIERS
        .iter()
        .find(|(max, _)| id_offset <= *max)
        .map_or(0.0, |(_, bonus)| *bonus)
}
