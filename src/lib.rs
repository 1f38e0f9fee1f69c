//! Overlay and dialog-presentation layer for the Wayfarer travel guide.
//!
//! Any part of the UI can ask for a named dialog surface to be shown on
//! top of the current view. Dialogs may open further dialogs, and while a
//! dialog session is active the platform back action, the Escape key and
//! backdrop taps all mean "go back one level" instead of leaving the app.
//!
//! The crate is a pure in-memory coordination layer:
//! - [`surface::SurfaceRegistry`] resolves a handle to its pre-existing
//!   visual surface (the manager never creates or destroys surfaces)
//! - [`stack::ModalStack`] is the single source of truth for what is open
//!   and in what order
//! - [`sync::VisibilitySynchronizer`] reconciles that stack against the
//!   actually observed visibility of each surface
//! - [`navigation::NavigationBridge`] maps back navigation, Escape and
//!   pointer input onto stack operations
//! - [`loading::LoadingGuard`] brackets the content-population step of an
//!   open with a per-dialog busy indicator
//!
//! [`manager::OverlayManager`] ties the pieces together and is the only
//! type most hosts need to talk to.

pub mod config;
pub mod fade;
pub mod loading;
pub mod manager;
pub mod navigation;
pub mod stack;
pub mod surface;
pub mod sync;
pub mod types;
pub mod viewport;

pub use config::OverlayConfig;
pub use manager::OverlayManager;
pub use navigation::{HistorySink, NavAction, NavigationBridge, PointerTarget, SessionState};
pub use surface::{SharedSurface, Surface, SurfaceRegistry, Visibility, WeakSurface};
pub use types::{DialogHandle, OverlayError, OverlayEvent, OverlayResult};
pub use viewport::Viewport;
