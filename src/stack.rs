//! The modal stack: the ordered record of open dialogs.
//!
//! Position in the stack determines layering and which dialog a back
//! action targets. The stack is an owned value inside the manager and is
//! only mutated through its operations.

use crate::surface::WeakSurface;
use crate::types::DialogHandle;
use tracing::debug;

/// One open dialog.
///
/// Created synchronously inside `open`, removed synchronously inside
/// `close`; the surface reference is lookup-only.
#[derive(Debug)]
pub struct StackEntry {
    handle: DialogHandle,
    surface: WeakSurface,
    captured_scroll_offset: f64,
}

impl StackEntry {
    pub fn new(handle: DialogHandle, surface: WeakSurface, captured_scroll_offset: f64) -> Self {
        Self {
            handle,
            surface,
            captured_scroll_offset,
        }
    }

    pub fn handle(&self) -> &DialogHandle {
        &self.handle
    }

    pub fn surface(&self) -> &WeakSurface {
        &self.surface
    }

    /// Page scroll position at the moment this dialog opened; the
    /// bottom-most capture is what gets restored when the session ends.
    pub fn captured_scroll_offset(&self) -> f64 {
        self.captured_scroll_offset
    }
}

/// Ordered sequence of open dialogs, unique by handle; the single source
/// of truth for what is open and in what order (last = topmost).
#[derive(Debug, Default)]
pub struct ModalStack {
    entries: Vec<StackEntry>,
}

impl ModalStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: StackEntry) {
        debug!(dialog = %entry.handle, depth = self.entries.len() + 1, "stack push");
        self.entries.push(entry);
    }

    pub fn remove(&mut self, handle: &DialogHandle) -> Option<StackEntry> {
        let index = self.entries.iter().position(|e| e.handle == *handle)?;
        let entry = self.entries.remove(index);
        debug!(dialog = %handle, depth = self.entries.len(), "stack remove");
        Some(entry)
    }

    /// Empty the stack, returning every entry bottom-first.
    pub fn drain(&mut self) -> Vec<StackEntry> {
        std::mem::take(&mut self.entries)
    }

    /// Drop entries `keep` rejects, preserving order. Returns what was
    /// removed.
    pub fn prune<F>(&mut self, mut keep: F) -> Vec<StackEntry>
    where
        F: FnMut(&StackEntry) -> bool,
    {
        let mut removed = Vec::new();
        let mut index = 0;
        while index < self.entries.len() {
            if keep(&self.entries[index]) {
                index += 1;
            } else {
                removed.push(self.entries.remove(index));
            }
        }
        removed
    }

    pub fn contains(&self, handle: &DialogHandle) -> bool {
        self.entries.iter().any(|e| e.handle == *handle)
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top(&self) -> Option<&StackEntry> {
        self.entries.last()
    }

    pub fn bottom(&self) -> Option<&StackEntry> {
        self.entries.first()
    }

    pub fn entries(&self) -> &[StackEntry] {
        &self.entries
    }

    pub fn handles(&self) -> Vec<DialogHandle> {
        self.entries.iter().map(|e| e.handle.clone()).collect()
    }

    /// Reassign layering values bottom to top. Runs after every stack
    /// mutation so positions and layers never diverge.
    pub fn apply_layers(&self, base: i32, step: i32) {
        for (index, entry) in self.entries.iter().enumerate() {
            if let Some(surface) = entry.surface.upgrade() {
                surface.borrow_mut().set_layer(base + (index as i32 + 1) * step);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::SurfaceRegistry;
    use std::rc::Rc;

    fn entry(registry: &mut SurfaceRegistry, handle: &str, offset: f64) -> StackEntry {
        let surface = registry.register(handle);
        StackEntry::new(handle.into(), Rc::downgrade(&surface), offset)
    }

    #[test]
    fn test_layering_is_strictly_increasing() {
        let mut registry = SurfaceRegistry::new();
        let mut stack = ModalStack::new();
        for handle in ["packing", "photo-upload", "chat"] {
            stack.push(entry(&mut registry, handle, 0.0));
        }
        stack.apply_layers(1000, 10);

        let layers: Vec<i32> = stack
            .entries()
            .iter()
            .map(|e| e.surface().upgrade().unwrap().borrow().layer())
            .collect();
        assert_eq!(layers, vec![1010, 1020, 1030]);
        assert!(layers.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_layers_recomputed_after_middle_removal() {
        let mut registry = SurfaceRegistry::new();
        let mut stack = ModalStack::new();
        for handle in ["a", "b", "c"] {
            stack.push(entry(&mut registry, handle, 0.0));
        }
        stack.apply_layers(1000, 10);
        stack.remove(&"b".into());
        stack.apply_layers(1000, 10);

        let c_layer = stack
            .top()
            .and_then(|e| e.surface().upgrade())
            .map(|s| s.borrow().layer());
        assert_eq!(c_layer, Some(1020));
    }

    #[test]
    fn test_remove_unknown_is_none() {
        let mut stack = ModalStack::new();
        assert!(stack.remove(&"ghost".into()).is_none());
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_prune_keeps_order_and_returns_removed() {
        let mut registry = SurfaceRegistry::new();
        let mut stack = ModalStack::new();
        for handle in ["a", "b", "c", "d"] {
            stack.push(entry(&mut registry, handle, 0.0));
        }

        let removed = stack.prune(|e| e.handle().as_str() != "b" && e.handle().as_str() != "d");
        assert_eq!(removed.len(), 2);
        assert_eq!(stack.handles(), vec!["a".into(), "c".into()]);
    }

    #[test]
    fn test_drain_is_bottom_first() {
        let mut registry = SurfaceRegistry::new();
        let mut stack = ModalStack::new();
        stack.push(entry(&mut registry, "first", 100.0));
        stack.push(entry(&mut registry, "second", 250.0));

        let drained = stack.drain();
        assert!(stack.is_empty());
        assert_eq!(drained[0].handle().as_str(), "first");
        assert_eq!(drained[0].captured_scroll_offset(), 100.0);
    }
}
