//! Back navigation, Escape and pointer dispatch for dialog sessions.
//!
//! A "dialog session" is the period during which stack depth is above
//! zero. One history checkpoint is pushed when the session starts; the
//! checkpoint models "a dialog session is active", never one entry per
//! dialog. While the session is active, the platform back action means
//! "close everything", Escape and backdrop taps mean "go back one level",
//! and a dialog's own close control closes that specific dialog.

use crate::types::DialogHandle;
use crossterm::event::{KeyCode, KeyEvent};
use tracing::debug;

/// Platform back-navigation history boundary.
pub trait HistorySink {
    /// Push the single session checkpoint.
    fn push_checkpoint(&mut self);

    /// Retire the checkpoint when the session ends through anything
    /// other than the platform back action (which consumes it itself).
    fn retire_checkpoint(&mut self);
}

/// Session state of the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Active,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Idle
    }
}

/// What a dispatched input should do to the stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavAction {
    GoBack,
    CloseAll,
    Close(DialogHandle),
}

/// Where a document-level interaction landed. A click is described by its
/// target path, ordered from the interaction origin outward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerTarget {
    /// A dialog's dismiss control
    CloseButton(DialogHandle),
    /// A dialog's backdrop, outside its content
    Backdrop(DialogHandle),
    /// A dialog's content area
    Content(DialogHandle),
    /// Anything outside the dialog tree
    Page,
}

/// Maps platform back navigation, the Escape key and pointer interaction
/// onto stack operations while a session is active. Owns the history
/// boundary so checkpoint bookkeeping cannot be bypassed.
pub struct NavigationBridge {
    state: SessionState,
    history: Box<dyn HistorySink>,
    escape_dismiss: bool,
    backdrop_dismiss: bool,
}

impl NavigationBridge {
    pub fn new(history: Box<dyn HistorySink>, escape_dismiss: bool, backdrop_dismiss: bool) -> Self {
        Self {
            state: SessionState::Idle,
            history,
            escape_dismiss,
            backdrop_dismiss,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    /// Arm the session on the empty-to-non-empty transition. At most one
    /// checkpoint per transition; dialogs stacked on top do not get their
    /// own.
    pub fn begin_session(&mut self) {
        if self.state == SessionState::Active {
            return;
        }
        self.history.push_checkpoint();
        self.state = SessionState::Active;
        debug!("dialog session started");
    }

    /// End the session. `retire_checkpoint` is false on the back-action
    /// path, where the platform already consumed the checkpoint.
    pub fn end_session(&mut self, retire_checkpoint: bool) {
        if self.state == SessionState::Idle {
            return;
        }
        if retire_checkpoint {
            self.history.retire_checkpoint();
        }
        self.state = SessionState::Idle;
        debug!("dialog session ended");
    }

    /// Escape goes back one level while active. The key is left alone
    /// when idle.
    pub fn action_for_key(&self, key: &KeyEvent) -> Option<NavAction> {
        if self.state != SessionState::Active || !self.escape_dismiss {
            return None;
        }
        if key.code == KeyCode::Esc && key.modifiers.is_empty() {
            return Some(NavAction::GoBack);
        }
        None
    }

    /// The platform back action always means "close everything" while a
    /// session is active, never a page navigation.
    pub fn action_for_back(&self) -> Option<NavAction> {
        if self.state == SessionState::Active {
            Some(NavAction::CloseAll)
        } else {
            None
        }
    }

    /// Resolve a click by walking its target path from the interaction
    /// origin outward; the first recognized role wins. A close button
    /// therefore takes precedence over the backdrop behind it, and a
    /// click inside dialog content dismisses nothing.
    pub fn action_for_pointer(&self, path: &[PointerTarget]) -> Option<NavAction> {
        if self.state != SessionState::Active {
            return None;
        }
        for target in path {
            match target {
                PointerTarget::CloseButton(handle) => {
                    return Some(NavAction::Close(handle.clone()));
                }
                PointerTarget::Backdrop(_) => {
                    if self.backdrop_dismiss {
                        return Some(NavAction::GoBack);
                    }
                    return None;
                }
                PointerTarget::Content(_) => return None,
                PointerTarget::Page => {}
            }
        }
        None
    }
}
