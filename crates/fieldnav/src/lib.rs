#![forbid(unsafe_code)]

//! Directional focus navigation for immediate-mode inspector panels.
//!
//! # Role in fieldnav
//! The host keeps no retained widget tree. All it can tell us is, for a
//! per-frame control id, whether that control accepts focus and where its
//! rect sits once the id is made "active". This crate turns an arrow-key
//! press into the id of the control that should receive focus next, or a
//! signal that the key should leave the panel.
//!
//! # Primary responsibilities
//! - **Probing**: [`GeometryProbe`] abstracts the host cursor;
//!   [`ProbeGuard`] restores it on every exit path.
//! - **Scanning**: [`CandidateScanner`] walks a bounded id window and drops
//!   chrome, duplicates and out-of-panel rects.
//! - **Scoring**: [`ScoringEngine`] ranks what survives.
//! - **Resolving**: [`NavigationResolver`] runs up to two scan passes and
//!   returns a [`NavigationOutcome`].
//! - **Boundaries**: [`BoundaryClassifier`] answers first/last/out-of-bounds
//!   questions for owners deciding whether to hand focus elsewhere.
//!
//! # Example
//! ```
//! use fieldnav::{GeometryProbe, NavRequest, NavigationOutcome, NavigationResolver, PanelMetrics};
//! use fieldnav_core::{ControlId, Direction, NavConfig, Rect};
//!
//! struct TwoRows {
//!     active: ControlId,
//! }
//!
//! impl GeometryProbe for TwoRows {
//!     fn active(&self) -> ControlId {
//!         self.active
//!     }
//!     fn set_active(&mut self, id: ControlId) {
//!         self.active = id;
//!     }
//!     fn can_receive_focus(&self, id: ControlId) -> bool {
//!         matches!(id, 1 | 2)
//!     }
//!     fn current_rect(&self) -> Rect {
//!         match self.active {
//!             1 => Rect::new(12.0, 0.0, 202.0, 16.0),
//!             2 => Rect::new(12.0, 18.0, 202.0, 16.0),
//!             _ => Rect::ZERO,
//!         }
//!     }
//! }
//!
//! let resolver = NavigationResolver::new(
//!     NavConfig::default()
//!         .with_top_margin(0.0)
//!         .with_resize_strip_height(0.0),
//! );
//! let mut host = TwoRows { active: 1 };
//! let request = NavRequest {
//!     direction: Direction::Down,
//!     previous_rect: host.current_rect(),
//!     before_boundary_id: 0,
//!     approx_end_id: 2,
//!     panel: PanelMetrics::new(218.0, 100.0),
//! };
//! assert_eq!(resolver.next(&mut host, &request), NavigationOutcome::Focus(2));
//! assert_eq!(host.active, 1);
//! ```

pub mod boundary;
pub mod bounds;
pub mod probe;
pub mod resolver;
pub mod row_group;
pub mod scanner;
pub mod scoring;

pub use boundary::BoundaryClassifier;
pub use bounds::{PanelMetrics, panel_bounds};
pub use probe::{GeometryProbe, ProbeGuard, ProbeReading};
pub use resolver::{NavRequest, NavigationOutcome, NavigationResolver, ResolvePhase, ResolveReport};
pub use row_group::{RowGroupClassifier, RowSlot};
pub use scanner::{Candidate, CandidateScanner, Rejection, ScanOutcome, ScanStats, ScanWindow};
pub use scoring::{ScoreBreakdown, ScoreContext, ScoringEngine};

pub use fieldnav_core::{ControlId, Direction, NO_CONTROL, NavConfig, NavConfigError, Rect, Sides};
