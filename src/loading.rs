//! Per-dialog busy indicator bracketing the content-population step.
//!
//! The guard is independent of open/close fade timing: it covers only the
//! synchronous portion of the population callback and is released exactly
//! once per open attempt, on every path.

use crate::surface::SurfaceRegistry;
use crate::types::DialogHandle;
use std::collections::HashSet;
use tracing::debug;

#[derive(Debug, Default)]
pub struct LoadingGuard {
    active: HashSet<DialogHandle>,
}

impl LoadingGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `handle` busy. A handle with no registered surface is still
    /// tracked so the show/release bookkeeping stays balanced.
    pub fn begin(&mut self, handle: &DialogHandle, registry: &SurfaceRegistry) {
        if !self.active.insert(handle.clone()) {
            debug!(dialog = %handle, "busy indicator already shown");
        }
        if let Some(surface) = registry.resolve(handle) {
            surface.borrow_mut().set_busy(true);
        }
    }

    /// Release the busy indicator for `handle`.
    pub fn end(&mut self, handle: &DialogHandle, registry: &SurfaceRegistry) {
        if !self.active.remove(handle) {
            debug!(dialog = %handle, "busy indicator released without being shown");
        }
        if let Some(surface) = registry.resolve(handle) {
            surface.borrow_mut().set_busy(false);
        }
    }

    pub fn is_loading(&self, handle: &DialogHandle) -> bool {
        self.active.contains(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_end_toggles_surface_busy() {
        let mut registry = SurfaceRegistry::new();
        let surface = registry.register("packing");
        let mut guard = LoadingGuard::new();
        let handle = DialogHandle::new("packing");

        guard.begin(&handle, &registry);
        assert!(guard.is_loading(&handle));
        assert!(surface.borrow().busy());

        guard.end(&handle, &registry);
        assert!(!guard.is_loading(&handle));
        assert!(!surface.borrow().busy());
    }

    #[test]
    fn test_unregistered_handle_is_tracked_without_panic() {
        let registry = SurfaceRegistry::new();
        let mut guard = LoadingGuard::new();
        let handle = DialogHandle::new("ghost");

        guard.begin(&handle, &registry);
        assert!(guard.is_loading(&handle));
        guard.end(&handle, &registry);
        assert!(!guard.is_loading(&handle));
    }
}
