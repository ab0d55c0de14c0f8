#![forbid(unsafe_code)]

//! Core: geometry, direction and configuration types for directional field
//! navigation.
//!
//! # Role in fieldnav
//! `fieldnav-core` holds the plain data shared by the resolver (`fieldnav`)
//! and the test harness (`fieldnav-harness`). It has no knowledge of the
//! host's probe cursor; it only describes rectangles, directions, control
//! identifiers and the tunable layout metrics a host theme supplies.
//!
//! # Primary responsibilities
//! - **Rect / Sides**: floating-point control rectangles and margins.
//! - **Direction**: the four arrow-key directions and their scan order.
//! - **NavConfig**: row metrics, margins, gaps and scan limits, with
//!   validation.

pub mod config;
pub mod direction;
pub mod geometry;

pub use config::{NavConfig, NavConfigError};
pub use direction::Direction;
pub use geometry::{Rect, Sides};

/// Per-frame control handle assigned by the host render loop.
///
/// Ids are ascending in draw order within one render pass and carry no
/// meaning across frames.
pub type ControlId = u64;

/// Cursor value meaning "no control holds keyboard focus".
pub const NO_CONTROL: ControlId = 0;
