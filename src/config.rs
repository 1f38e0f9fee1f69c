//! Overlay configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Layering value of the band directly below the first dialog
pub const BASE_LAYER: i32 = 1000;

/// Layering distance between adjacent dialogs on the stack
pub const LAYER_STEP: i32 = 10;

/// How long a closing surface keeps playing its fade-out before it is
/// marked hidden
pub const FADE_OUT: Duration = Duration::from_millis(200);

/// Configuration for the overlay manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Layering base; the dialog at stack position `i` (from the bottom)
    /// is assigned `base_layer + (i + 1) * layer_step`
    pub base_layer: i32,

    /// Layering distance between stacked dialogs
    pub layer_step: i32,

    /// Duration of the close fade-out window
    pub fade_out: Duration,

    /// Whether tapping a dialog's backdrop goes back one level
    pub backdrop_dismiss: bool,

    /// Whether Escape goes back one level
    pub escape_dismiss: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            base_layer: BASE_LAYER,
            layer_step: LAYER_STEP,
            fade_out: FADE_OUT,
            backdrop_dismiss: true,
            escape_dismiss: true,
        }
    }
}

impl OverlayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_layer(mut self, base_layer: i32) -> Self {
        self.base_layer = base_layer;
        self
    }

    pub fn with_layer_step(mut self, layer_step: i32) -> Self {
        self.layer_step = layer_step;
        self
    }

    pub fn with_fade_out(mut self, fade_out: Duration) -> Self {
        self.fade_out = fade_out;
        self
    }

    pub fn backdrop_dismiss(mut self, enabled: bool) -> Self {
        self.backdrop_dismiss = enabled;
        self
    }

    pub fn escape_dismiss(mut self, enabled: bool) -> Self {
        self.escape_dismiss = enabled;
        self
    }

    /// Layering value for the entry at `position` (0-indexed from the
    /// bottom of the stack).
    pub fn layer_for(&self, position: usize) -> i32 {
        self.base_layer + (position as i32 + 1) * self.layer_step
    }
}
