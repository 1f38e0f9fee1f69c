//! Dialog surfaces and the registry that resolves handles to them.
//!
//! Surfaces are owned by the surrounding view tree, not by the manager.
//! The manager only toggles their visibility, opacity, layering and busy
//! attributes; external code holding a [`SharedSurface`] may hide one
//! directly, which is exactly the drift the synchronizer reconciles.

use crate::types::DialogHandle;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

/// Visibility marker toggled on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

impl Default for Visibility {
    fn default() -> Self {
        Self::Hidden
    }
}

/// The visual record behind a dialog.
#[derive(Debug, Default)]
pub struct Surface {
    visibility: Visibility,
    opacity: f32,
    layer: i32,
    busy: bool,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface counts as on screen only when its marker says visible
    /// and its opacity is above zero. Both are checked: either attribute
    /// alone can be flipped by code outside the manager.
    pub fn is_observably_visible(&self) -> bool {
        self.visibility == Visibility::Visible && self.opacity > 0.0
    }

    pub fn show(&mut self) {
        self.visibility = Visibility::Visible;
        self.opacity = 1.0;
    }

    pub fn hide(&mut self) {
        self.visibility = Visibility::Hidden;
        self.opacity = 0.0;
        self.busy = false;
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    pub fn layer(&self) -> i32 {
        self.layer
    }

    pub fn set_layer(&mut self, layer: i32) {
        self.layer = layer;
    }

    pub fn busy(&self) -> bool {
        self.busy
    }

    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }
}

/// Shared handle to a surface; the registry and the view tree hold strong
/// references, stack entries only weak ones.
pub type SharedSurface = Rc<RefCell<Surface>>;

/// Lookup-only reference held by a stack entry.
pub type WeakSurface = Weak<RefCell<Surface>>;

/// Resolves a dialog handle to its surface in the view tree.
#[derive(Debug, Default)]
pub struct SurfaceRegistry {
    surfaces: HashMap<DialogHandle, SharedSurface>,
}

impl SurfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the surface backing `handle`, returning the shared
    /// reference the view tree keeps for itself. Registering a handle
    /// twice replaces the old surface.
    pub fn register(&mut self, handle: impl Into<DialogHandle>) -> SharedSurface {
        let surface: SharedSurface = Rc::new(RefCell::new(Surface::new()));
        self.surfaces.insert(handle.into(), Rc::clone(&surface));
        surface
    }

    pub fn resolve(&self, handle: &DialogHandle) -> Option<&SharedSurface> {
        self.surfaces.get(handle)
    }

    pub fn contains(&self, handle: &DialogHandle) -> bool {
        self.surfaces.contains_key(handle)
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Direct inspection across every registered surface, regardless of
    /// what the stack believes is open.
    pub fn any_visible(&self) -> bool {
        self.surfaces
            .values()
            .any(|surface| surface.borrow().is_observably_visible())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_starts_hidden() {
        let surface = Surface::new();
        assert_eq!(surface.visibility(), Visibility::Hidden);
        assert!(!surface.is_observably_visible());
    }

    #[test]
    fn test_observable_visibility_needs_marker_and_opacity() {
        let mut surface = Surface::new();
        surface.show();
        assert!(surface.is_observably_visible());

        // opacity dropped behind the manager's back
        surface.set_opacity(0.0);
        assert!(!surface.is_observably_visible());

        surface.set_opacity(0.4);
        assert!(surface.is_observably_visible());

        surface.hide();
        assert!(!surface.is_observably_visible());
        assert_eq!(surface.opacity(), 0.0);
    }

    #[test]
    fn test_hide_clears_busy() {
        let mut surface = Surface::new();
        surface.show();
        surface.set_busy(true);
        surface.hide();
        assert!(!surface.busy());
    }

    #[test]
    fn test_registry_resolution_and_visibility_sweep() {
        let mut registry = SurfaceRegistry::new();
        let packing = registry.register("packing");
        registry.register("photo-upload");

        assert!(registry.contains(&"packing".into()));
        assert!(registry.resolve(&"weather".into()).is_none());
        assert!(!registry.any_visible());

        packing.borrow_mut().show();
        assert!(registry.any_visible());

        packing.borrow_mut().hide();
        assert!(!registry.any_visible());
    }
}
