#![forbid(unsafe_code)]

//! The host's geometry probe and the scoped guard that borrows it.
//!
//! Immediate-mode hosts keep no layout tree. The only way to learn where a
//! control was drawn is to make it the active control and read back the
//! rectangle computed for it during the last render pass. The active slot is
//! the same slot that holds real keyboard focus, so every probe temporarily
//! clobbers focus.
//!
//! [`ProbeGuard`] owns that clobbering: it records the active id on entry and
//! writes it back when dropped, which covers normal returns, early aborts and
//! unwinding alike.

use fieldnav_core::{ControlId, NO_CONTROL, Rect};

/// Host capability for querying control geometry one id at a time.
pub trait GeometryProbe {
    /// Id currently held by the cursor ([`NO_CONTROL`] when nothing has focus).
    fn active(&self) -> ControlId;

    /// Point the cursor at `id`.
    fn set_active(&mut self, id: ControlId);

    /// Whether `id` is a control that can hold keyboard focus.
    fn can_receive_focus(&self, id: ControlId) -> bool;

    /// Rectangle of the control the cursor points at, from the last render.
    fn current_rect(&self) -> Rect;
}

impl<P: GeometryProbe + ?Sized> GeometryProbe for &mut P {
    fn active(&self) -> ControlId {
        (**self).active()
    }

    fn set_active(&mut self, id: ControlId) {
        (**self).set_active(id);
    }

    fn can_receive_focus(&self, id: ControlId) -> bool {
        (**self).can_receive_focus(id)
    }

    fn current_rect(&self) -> Rect {
        (**self).current_rect()
    }
}

/// Result of probing one id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProbeReading {
    /// The host says the id cannot hold focus; no rect was read.
    NotFocusable,
    /// The rect reported for the id.
    Rect(Rect),
}

/// Exclusive, self-restoring borrow of the probe cursor.
///
/// The mutable borrow makes concurrent queries impossible; `Drop` resets the
/// cursor to the id observed at construction.
pub struct ProbeGuard<'a, P: GeometryProbe + ?Sized> {
    probe: &'a mut P,
    id_was: ControlId,
    probes: u32,
}

impl<'a, P: GeometryProbe + ?Sized> ProbeGuard<'a, P> {
    /// Borrow the cursor, remembering its current value.
    pub fn new(probe: &'a mut P) -> Self {
        let id_was = probe.active();
        Self {
            probe,
            id_was,
            probes: 0,
        }
    }

    /// Id the cursor held on entry.
    #[inline]
    pub fn id_was(&self) -> ControlId {
        self.id_was
    }

    /// Number of ids probed through this guard.
    #[inline]
    pub fn probes(&self) -> u32 {
        self.probes
    }

    /// Make `id` active and read its geometry.
    pub fn probe(&mut self, id: ControlId) -> ProbeReading {
        self.probes = self.probes.saturating_add(1);
        self.probe.set_active(id);
        if !self.probe.can_receive_focus(id) {
            return ProbeReading::NotFocusable;
        }
        ProbeReading::Rect(self.probe.current_rect())
    }

    /// Rect of the control focused on entry, if any.
    pub fn focused_rect(&mut self) -> Option<Rect> {
        if self.id_was == NO_CONTROL {
            return None;
        }
        self.probe.set_active(self.id_was);
        Some(self.probe.current_rect())
    }

    /// Nested guard restoring to the same entry id when it drops.
    pub fn scoped(&mut self) -> ProbeGuard<'_, P> {
        ProbeGuard {
            probe: &mut *self.probe,
            id_was: self.id_was,
            probes: 0,
        }
    }
}

impl<P: GeometryProbe + ?Sized> Drop for ProbeGuard<'_, P> {
    fn drop(&mut self) {
        self.probe.set_active(self.id_was);
    }
}
