//! Deferred visual hide for closing dialogs.
//!
//! `close` removes the stack entry immediately; the surface stays on
//! screen playing its fade-out until the deadline passes. During that
//! window the stack already reports the dialog closed while it is still
//! visible and still intercepting input, so "closed" must never be read
//! as "not on screen". The two phases are explicit: an entry here is
//! `LogicallyClosed` until the fade completes, then `VisuallyHidden`;
//! declaring everything fully closed stays the synchronizer's call.
//!
//! There is no cancellation. Re-opening a dialog while its fade is
//! pending neither cancels nor waits for it, and the stale deadline will
//! hide the surface when it fires.

use crate::surface::WeakSurface;
use crate::types::DialogHandle;
use std::time::Instant;
use tracing::debug;

/// Phase of a dialog whose stack entry is already gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosePhase {
    /// Removed from the stack, surface still fading out
    LogicallyClosed,
    /// Fade complete, surface marked hidden
    VisuallyHidden,
}

/// A scheduled hide for one surface.
#[derive(Debug)]
pub struct PendingFade {
    handle: DialogHandle,
    surface: WeakSurface,
    deadline: Instant,
    phase: ClosePhase,
}

impl PendingFade {
    pub fn handle(&self) -> &DialogHandle {
        &self.handle
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn phase(&self) -> ClosePhase {
        self.phase
    }
}

/// Queue of in-flight fade-outs, driven from the host's tick.
#[derive(Debug, Default)]
pub struct FadeQueue {
    pending: Vec<PendingFade>,
}

impl FadeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, handle: DialogHandle, surface: WeakSurface, deadline: Instant) {
        if self.pending.iter().any(|fade| fade.handle == handle) {
            debug!(dialog = %handle, "scheduling hide over an already-pending fade");
        }
        self.pending.push(PendingFade {
            handle,
            surface,
            deadline,
            phase: ClosePhase::LogicallyClosed,
        });
    }

    /// Complete every fade whose deadline has passed, hiding its surface.
    /// Returns the handles hidden on this tick.
    pub fn advance(&mut self, now: Instant) -> Vec<DialogHandle> {
        let mut hidden = Vec::new();
        self.pending.retain_mut(|fade| {
            if fade.deadline > now {
                return true;
            }
            if let Some(surface) = fade.surface.upgrade() {
                surface.borrow_mut().hide();
            }
            fade.phase = ClosePhase::VisuallyHidden;
            hidden.push(fade.handle.clone());
            false
        });
        hidden
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
