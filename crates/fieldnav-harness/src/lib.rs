#![forbid(unsafe_code)]

//! Test harness for fieldnav: a scripted probe host, JSON layout fixtures
//! and checksummed navigation traces.

pub mod fixture;
pub mod host;
pub mod trace;

pub use fixture::{
    FixtureControl, FixtureError, LayoutFixture, all_fixtures, scenario_panel, stacked_fields,
    vector_rows,
};
pub use host::{HostControl, ScriptedHost};
pub use trace::{CHECKSUM_PREFIX, NavTrace, TraceStep};
