#![forbid(unsafe_code)]

//! Serializable panel layouts.
//!
//! A [`LayoutFixture`] is one frame of a panel: its metrics, the id window
//! around it, and every control the host would report. Fixtures load from
//! JSON so layouts captured from a real host can be replayed unchanged.

use crate::host::ScriptedHost;
use ahash::AHashSet;
use fieldnav::{NavRequest, NavigationResolver, PanelMetrics};
use fieldnav_core::{ControlId, Direction, NO_CONTROL, NavConfig, Rect};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One control in a fixture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixtureControl {
    pub id: ControlId,
    pub rect: Rect,
    #[serde(default = "focusable_by_default")]
    pub focusable: bool,
}

fn focusable_by_default() -> bool {
    true
}

/// Errors produced while loading a fixture.
#[derive(Debug)]
pub enum FixtureError {
    /// The JSON did not parse.
    Parse(serde_json::Error),
    /// Two controls share an id.
    DuplicateId(ControlId),
    /// A control uses the reserved "no control" id.
    ReservedId,
}

impl fmt::Display for FixtureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "fixture parse error: {err}"),
            Self::DuplicateId(id) => write!(f, "control id {id} appears more than once"),
            Self::ReservedId => write!(f, "control id {NO_CONTROL} is reserved"),
        }
    }
}

impl std::error::Error for FixtureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for FixtureError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

/// A panel frame ready to be replayed against the resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutFixture {
    pub name: String,
    #[serde(default)]
    pub config: NavConfig,
    pub panel: PanelMetrics,
    pub before_boundary_id: ControlId,
    pub approx_end_id: ControlId,
    pub controls: Vec<FixtureControl>,
}

impl LayoutFixture {
    /// Parse and validate a fixture.
    pub fn from_json(json: &str) -> Result<Self, FixtureError> {
        let fixture: Self = serde_json::from_str(json)?;
        fixture.validate()?;
        Ok(fixture)
    }

    pub fn to_json(&self) -> Result<String, FixtureError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject fixtures no host could produce.
    pub fn validate(&self) -> Result<(), FixtureError> {
        let mut seen = AHashSet::with_capacity(self.controls.len());
        for control in &self.controls {
            if control.id == NO_CONTROL {
                return Err(FixtureError::ReservedId);
            }
            if !seen.insert(control.id) {
                return Err(FixtureError::DuplicateId(control.id));
            }
        }
        Ok(())
    }

    /// Host reporting this fixture's controls, with nothing focused.
    pub fn to_host(&self) -> ScriptedHost {
        let mut host = ScriptedHost::new();
        for control in &self.controls {
            host.insert(control.id, control.rect, control.focusable);
        }
        host
    }

    pub fn resolver(&self) -> NavigationResolver {
        NavigationResolver::new(self.config.clone())
    }

    /// Query for moving `direction` away from `from`.
    pub fn request(&self, direction: Direction, from: ControlId) -> NavRequest {
        NavRequest {
            direction,
            previous_rect: self.rect_of(from),
            before_boundary_id: self.before_boundary_id,
            approx_end_id: self.approx_end_id,
            panel: self.panel,
        }
    }

    /// Rect of `id`, or [`Rect::ZERO`] when the fixture has no such control.
    pub fn rect_of(&self, id: ControlId) -> Rect {
        self.controls
            .iter()
            .find(|c| c.id == id)
            .map_or(Rect::ZERO, |c| c.rect)
    }

    /// Focusable ids in ascending order.
    pub fn focusable_ids(&self) -> Vec<ControlId> {
        let mut ids: Vec<_> = self
            .controls
            .iter()
            .filter(|c| c.focusable)
            .map(|c| c.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    fn push(&mut self, id: ControlId, rect: Rect, focusable: bool) {
        self.controls.push(FixtureControl {
            id,
            rect,
            focusable,
        });
    }
}

/// One full-width field above a three-column row.
///
/// ```text
///   [11                 ]
///   [12    ][13    ][14    ]
/// ```
pub fn scenario_panel() -> LayoutFixture {
    let mut fixture = LayoutFixture {
        name: "scenario_panel".into(),
        config: NavConfig::default()
            .with_top_margin(0.0)
            .with_resize_strip_height(0.0),
        panel: PanelMetrics::new(218.0, 100.0),
        before_boundary_id: 10,
        approx_end_id: 14,
        controls: Vec::new(),
    };
    fixture.push(11, Rect::new(12.0, 0.0, 200.0, 16.0), true);
    fixture.push(12, Rect::new(12.0, 18.0, 66.0, 16.0), true);
    fixture.push(13, Rect::new(80.0, 18.0, 66.0, 16.0), true);
    fixture.push(14, Rect::new(148.0, 18.0, 66.0, 16.0), true);
    fixture
}

/// Labeled transform editor: three vector rows, a checkbox and a text
/// field, each preceded by a static label in the prefix column.
///
/// ```text
///   Position [102][103][104]
///   Rotation [106][107][108]
///   Scale    [110][111][112]
///            [113 checkbox    ]
///            [114 text        ]
/// ```
pub fn vector_rows() -> LayoutFixture {
    let mut fixture = LayoutFixture {
        name: "vector_rows".into(),
        config: NavConfig::default(),
        panel: PanelMetrics::new(218.0, 120.0)
            .with_header_height(20.0)
            .with_prefix_width(100.0),
        before_boundary_id: 100,
        approx_end_id: 114,
        controls: Vec::new(),
    };
    // Body starts at 20 + 4 + 2; columns are 36 wide from x=102.
    let mut id = 101;
    for row in 0..3u8 {
        let y = 26.0 + 18.0 * f32::from(row);
        fixture.push(id, Rect::new(12.0, y, 88.0, 16.0), false);
        id += 1;
        for slot in 0..3u8 {
            let x = 102.0 + 38.0 * f32::from(slot);
            fixture.push(id, Rect::new(x, y, 36.0, 16.0), true);
            id += 1;
        }
    }
    fixture.push(113, Rect::new(102.0, 80.0, 112.0, 16.0), true);
    fixture.push(114, Rect::new(102.0, 98.0, 112.0, 16.0), true);
    fixture
}

/// Unlabeled form with the host artifacts the scanner has to see through:
/// a header strip (51), a scrollbar-shortened twin (55), a ghost entry
/// repeating the previous rect (60) and a field scrolled out of view (61).
pub fn stacked_fields() -> LayoutFixture {
    let mut fixture = LayoutFixture {
        name: "stacked_fields".into(),
        config: NavConfig::default(),
        panel: PanelMetrics::new(218.0, 200.0).with_header_height(20.0),
        before_boundary_id: 50,
        approx_end_id: 61,
        controls: Vec::new(),
    };
    fixture.push(51, Rect::new(12.0, 26.0, 206.0, 16.0), true);
    fixture.push(52, Rect::new(12.0, 26.0, 202.0, 16.0), true);
    fixture.push(53, Rect::new(12.0, 44.0, 202.0, 16.0), true);
    fixture.push(54, Rect::new(12.0, 62.0, 202.0, 52.0), true);
    fixture.push(55, Rect::new(12.0, 116.0, 187.0, 16.0), true);
    fixture.push(56, Rect::new(12.0, 116.0, 202.0, 16.0), true);
    fixture.push(57, Rect::new(12.0, 134.0, 100.0, 16.0), true);
    fixture.push(58, Rect::new(114.0, 134.0, 100.0, 16.0), true);
    fixture.push(59, Rect::new(12.0, 152.0, 202.0, 16.0), true);
    fixture.push(60, Rect::new(12.0, 152.0, 202.0, 16.0), true);
    fixture.push(61, Rect::new(12.0, 210.0, 202.0, 16.0), true);
    fixture
}

/// Every built-in fixture.
pub fn all_fixtures() -> Vec<LayoutFixture> {
    vec![scenario_panel(), vector_rows(), stacked_fields()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldnav::NavigationOutcome;

    #[test]
    fn json_round_trip_preserves_fixture() {
        let fixture = vector_rows();
        let json = fixture.to_json().expect("serialize");
        let back = LayoutFixture::from_json(&json).expect("parse");
        assert_eq!(back, fixture);
    }

    #[test]
    fn minimal_json_uses_defaults() {
        let json = r#"{
            "name": "tiny",
            "panel": { "width": 218.0, "height": 60.0 },
            "before_boundary_id": 0,
            "approx_end_id": 2,
            "controls": [
                { "id": 1, "rect": { "x": 12.0, "y": 6.0, "width": 202.0, "height": 16.0 } },
                { "id": 2, "rect": { "x": 12.0, "y": 24.0, "width": 202.0, "height": 16.0 } }
            ]
        }"#;
        let fixture = LayoutFixture::from_json(json).expect("parse");
        assert_eq!(fixture.config, NavConfig::default());
        assert_eq!(fixture.panel.header_height, 0.0);
        assert_eq!(fixture.focusable_ids(), vec![1, 2]);

        let mut host = fixture.to_host();
        host.focus(1);
        let outcome = fixture
            .resolver()
            .next(&mut host, &fixture.request(Direction::Down, 1));
        assert_eq!(outcome, NavigationOutcome::Focus(2));
    }

    #[test]
    fn rejects_duplicate_and_reserved_ids() {
        let mut fixture = scenario_panel();
        fixture.push(12, Rect::new(0.0, 0.0, 1.0, 1.0), true);
        assert!(matches!(
            fixture.validate(),
            Err(FixtureError::DuplicateId(12))
        ));

        let mut fixture = scenario_panel();
        fixture.push(NO_CONTROL, Rect::new(0.0, 0.0, 1.0, 1.0), true);
        assert!(matches!(fixture.validate(), Err(FixtureError::ReservedId)));
    }

    #[test]
    fn malformed_json_reports_parse_error() {
        let err = LayoutFixture::from_json("{ not json").expect_err("must fail");
        assert!(matches!(err, FixtureError::Parse(_)));
        assert!(err.to_string().starts_with("fixture parse error"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn built_in_fixtures_are_valid() {
        for fixture in all_fixtures() {
            fixture.validate().expect(&fixture.name);
        }
    }

    #[test]
    fn request_reads_previous_rect() {
        let fixture = scenario_panel();
        let req = fixture.request(Direction::Right, 12);
        assert_eq!(req.previous_rect, Rect::new(12.0, 18.0, 66.0, 16.0));
        assert_eq!(fixture.request(Direction::Up, 99).previous_rect, Rect::ZERO);
    }
}
