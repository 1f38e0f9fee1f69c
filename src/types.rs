//! Core overlay types: dialog handles, errors and lifecycle events.

use serde::{Deserialize, Serialize};

/// Logical identifier for a dialog surface.
///
/// A handle resolves to exactly one surface at a time; two simultaneously
/// open dialogs never share a handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DialogHandle(pub String);

impl DialogHandle {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DialogHandle {
    fn from(handle: &str) -> Self {
        Self(handle.to_string())
    }
}

impl From<String> for DialogHandle {
    fn from(handle: String) -> Self {
        Self(handle)
    }
}

impl std::fmt::Display for DialogHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result type for overlay operations
pub type OverlayResult<T> = std::result::Result<T, OverlayError>;

/// Errors that reach the caller of `open`.
///
/// Callback failures, stack drift and orphaned surfaces are recovered
/// internally and never propagate.
#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    #[error("no surface registered for dialog '{0}'")]
    NotFound(DialogHandle),

    #[error("dialog '{0}' is already open")]
    AlreadyOpen(DialogHandle),
}

/// Lifecycle notifications emitted on the manager's event channel.
#[derive(Debug, Clone)]
pub enum OverlayEvent {
    /// A dialog finished opening and its surface is visible
    Opened(DialogHandle),

    /// A dialog's stack entry was removed; its surface may still be
    /// fading out
    Closed(DialogHandle),

    /// A closing dialog's surface finished its fade and is hidden
    Hidden(DialogHandle),

    /// The busy indicator for a dialog was shown
    LoadingShown(DialogHandle),

    /// The busy indicator for a dialog was released
    LoadingHidden(DialogHandle),

    /// Stack depth went from zero to one; a history checkpoint was pushed
    SessionStarted,

    /// Stack depth returned to zero
    SessionEnded,

    /// The synchronizer dropped an entry whose surface was no longer
    /// visible on inspection
    DriftPruned(DialogHandle),

    /// Host-defined event payload
    Custom(String, serde_json::Value),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_conversions() {
        let from_str: DialogHandle = "packing".into();
        let from_string: DialogHandle = String::from("packing").into();
        assert_eq!(from_str, from_string);
        assert_eq!(from_str.as_str(), "packing");
        assert_eq!(from_str.to_string(), "packing");
    }

    #[test]
    fn test_error_messages_name_the_dialog() {
        let err = OverlayError::NotFound(DialogHandle::new("weather"));
        assert!(err.to_string().contains("weather"));

        let err = OverlayError::AlreadyOpen(DialogHandle::new("chat"));
        assert!(err.to_string().contains("already open"));
    }
}
