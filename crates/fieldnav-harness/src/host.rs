#![forbid(unsafe_code)]

//! Scripted probe host.
//!
//! [`ScriptedHost`] plays the part of an immediate-mode UI: a flat table of
//! per-frame ids, each with a rect and a focusable flag, behind a single
//! "active control" cursor. Every cursor write is logged so tests can assert
//! on probe order and on cursor restoration.

use ahash::AHashMap;
use fieldnav::GeometryProbe;
use fieldnav_core::{ControlId, NO_CONTROL, Rect};

/// One control as the host reports it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostControl {
    pub rect: Rect,
    pub focusable: bool,
}

/// In-memory [`GeometryProbe`] with a cursor write log.
#[derive(Debug, Clone, Default)]
pub struct ScriptedHost {
    active: ControlId,
    focused: ControlId,
    controls: AHashMap<ControlId, HostControl>,
    writes: Vec<ControlId>,
    panic_on: Option<ControlId>,
}

impl ScriptedHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a focusable control.
    #[must_use]
    pub fn with_control(mut self, id: ControlId, rect: Rect) -> Self {
        self.insert(id, rect, true);
        self
    }

    /// Add a control that refuses focus (labels, separators).
    #[must_use]
    pub fn with_static(mut self, id: ControlId, rect: Rect) -> Self {
        self.insert(id, rect, false);
        self
    }

    /// Panic the first time the cursor is moved to `id`.
    #[must_use]
    pub fn with_panic_on(mut self, id: ControlId) -> Self {
        self.panic_on = Some(id);
        self
    }

    pub fn insert(&mut self, id: ControlId, rect: Rect, focusable: bool) {
        self.controls.insert(id, HostControl { rect, focusable });
    }

    /// Give focus to `id` without logging the write.
    pub fn focus(&mut self, id: ControlId) {
        self.active = id;
        self.focused = id;
    }

    /// Rect of `id`, or [`Rect::ZERO`] for unknown ids.
    pub fn rect_of(&self, id: ControlId) -> Rect {
        self.controls.get(&id).map_or(Rect::ZERO, |c| c.rect)
    }

    /// Focusable ids in ascending order.
    pub fn focusable_ids(&self) -> Vec<ControlId> {
        let mut ids: Vec<_> = self
            .controls
            .iter()
            .filter(|(_, c)| c.focusable)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Highest id in the table, or [`NO_CONTROL`] when empty.
    pub fn max_id(&self) -> ControlId {
        self.controls.keys().copied().max().unwrap_or(NO_CONTROL)
    }

    /// Cursor writes since the last [`clear_log`](Self::clear_log).
    pub fn writes(&self) -> &[ControlId] {
        &self.writes
    }

    /// Logged writes other than restores of the focused id, in order.
    pub fn probed(&self) -> Vec<ControlId> {
        self.writes
            .iter()
            .copied()
            .filter(|id| *id != self.focused)
            .collect()
    }

    pub fn clear_log(&mut self) {
        self.writes.clear();
    }
}

impl GeometryProbe for ScriptedHost {
    fn active(&self) -> ControlId {
        self.active
    }

    fn set_active(&mut self, id: ControlId) {
        self.writes.push(id);
        self.active = id;
        if self.panic_on == Some(id) {
            self.panic_on = None;
            panic!("scripted host fault at control {id}");
        }
    }

    fn can_receive_focus(&self, id: ControlId) -> bool {
        self.controls.get(&id).is_some_and(|c| c.focusable)
    }

    fn current_rect(&self) -> Rect {
        self.rect_of(self.active)
    }
}
