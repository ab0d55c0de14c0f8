#![forbid(unsafe_code)]

//! Exhaustive navigation traces.
//!
//! [`NavTrace::record`] asks the resolver for every (focusable control,
//! direction) pair of a fixture and keeps one JSONL line per query. The
//! blake3 checksum of those lines pins a fixture's full navigation graph, so
//! a scoring change shows up as a single checksum diff.

use crate::fixture::LayoutFixture;
use fieldnav::{GeometryProbe, NavigationOutcome};
use fieldnav_core::{ControlId, Direction};
use serde::{Deserialize, Serialize};
use tracing::info_span;

/// Prefix of [`NavTrace::checksum`] values.
pub const CHECKSUM_PREFIX: &str = "blake3:";

/// One directional query and what came of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceStep {
    pub from: ControlId,
    pub direction: Direction,
    pub outcome: NavigationOutcome,
    pub passes: u8,
    pub probes: u32,
    pub score: Option<f64>,
    /// The host cursor held `from` again after the query.
    pub cursor_restored: bool,
}

/// All queries of one fixture, in (id, direction) order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavTrace {
    pub fixture: String,
    pub steps: Vec<TraceStep>,
}

impl NavTrace {
    /// Run every query the fixture allows.
    pub fn record(fixture: &LayoutFixture) -> Self {
        let _span = info_span!("fieldnav.trace", fixture = %fixture.name).entered();
        let resolver = fixture.resolver();
        let mut host = fixture.to_host();
        let mut steps = Vec::new();

        for from in fixture.focusable_ids() {
            for direction in Direction::ALL {
                host.focus(from);
                let request = fixture.request(direction, from);
                let (outcome, report) = resolver.next_with_report(&mut host, &request);
                steps.push(TraceStep {
                    from,
                    direction,
                    outcome,
                    passes: report.passes,
                    probes: report.stats.probes,
                    score: report.winning_score,
                    cursor_restored: host.active() == from,
                });
            }
        }

        tracing::info!(steps = steps.len(), "trace recorded");
        Self {
            fixture: fixture.name.clone(),
            steps,
        }
    }

    /// Outcome recorded for `from` moving `direction`.
    pub fn outcome(&self, from: ControlId, direction: Direction) -> Option<NavigationOutcome> {
        self.steps
            .iter()
            .find(|s| s.from == from && s.direction == direction)
            .map(|s| s.outcome)
    }

    /// One JSON object per step, newline-terminated.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        let mut out = String::new();
        for step in &self.steps {
            out.push_str(&serde_json::to_string(step)?);
            out.push('\n');
        }
        Ok(out)
    }

    /// blake3 digest of [`to_jsonl`](Self::to_jsonl), prefixed with
    /// [`CHECKSUM_PREFIX`].
    pub fn checksum(&self) -> Result<String, serde_json::Error> {
        let jsonl = self.to_jsonl()?;
        let hash = blake3::hash(jsonl.as_bytes());
        Ok(format!("{CHECKSUM_PREFIX}{}", hash.to_hex()))
    }
}
