//! Reconciles the logical stack against observed surface visibility.
//!
//! Code outside the manager can hide a surface directly; the stack then
//! over-counts. The synchronizer walks the stack by direct inspection and
//! prunes entries whose surface is not actually on screen. It is also the
//! only authority for releasing the page scroll lock: the stack can both
//! over-count (stale entries) and under-count (entries removed while the
//! fade still plays), so release requires an empty reconciled stack AND
//! no observably visible surface anywhere.

use crate::stack::{ModalStack, StackEntry};
use crate::surface::SurfaceRegistry;
use tracing::warn;

#[derive(Debug, Default)]
pub struct VisibilitySynchronizer {
    pruned_total: u64,
}

impl VisibilitySynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop stack entries whose surface is gone or not observably
    /// visible. Returns the pruned entries; drift is recovered silently
    /// apart from diagnostics.
    pub fn reconcile(&mut self, stack: &mut ModalStack) -> Vec<StackEntry> {
        let pruned = stack.prune(|entry| {
            entry
                .surface()
                .upgrade()
                .map(|surface| surface.borrow().is_observably_visible())
                .unwrap_or(false)
        });
        for entry in &pruned {
            warn!(dialog = %entry.handle(), "stack drift: surface no longer visible, pruning entry");
        }
        self.pruned_total += pruned.len() as u64;
        pruned
    }

    /// Whether the page scroll lock may be released. Call only after
    /// [`reconcile`](Self::reconcile) on the same tick.
    pub fn lock_releasable(&self, stack: &ModalStack, registry: &SurfaceRegistry) -> bool {
        stack.is_empty() && !registry.any_visible()
    }

    /// Total entries pruned since construction.
    pub fn pruned_total(&self) -> u64 {
        self.pruned_total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::StackEntry;
    use std::rc::Rc;

    #[test]
    fn test_reconcile_prunes_hidden_surfaces() {
        let mut registry = SurfaceRegistry::new();
        let packing = registry.register("packing");
        let chat = registry.register("chat");
        packing.borrow_mut().show();
        chat.borrow_mut().show();

        let mut stack = ModalStack::new();
        stack.push(StackEntry::new("packing".into(), Rc::downgrade(&packing), 0.0));
        stack.push(StackEntry::new("chat".into(), Rc::downgrade(&chat), 0.0));

        let mut sync = VisibilitySynchronizer::new();
        assert!(sync.reconcile(&mut stack).is_empty());

        // hidden behind the manager's back
        chat.borrow_mut().hide();
        let pruned = sync.reconcile(&mut stack);
        assert_eq!(pruned.len(), 1);
        assert_eq!(pruned[0].handle().as_str(), "chat");
        assert_eq!(stack.depth(), 1);
        assert_eq!(sync.pruned_total(), 1);
    }

    #[test]
    fn test_reconcile_prunes_dangling_entries() {
        let mut registry = SurfaceRegistry::new();
        let transient = registry.register("transient");
        transient.borrow_mut().show();

        let mut stack = ModalStack::new();
        stack.push(StackEntry::new(
            "transient".into(),
            Rc::downgrade(&transient),
            0.0,
        ));
        drop(transient);
        drop(registry);

        let mut sync = VisibilitySynchronizer::new();
        assert_eq!(sync.reconcile(&mut stack).len(), 1);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_lock_release_needs_both_checks() {
        let mut registry = SurfaceRegistry::new();
        let packing = registry.register("packing");

        let mut stack = ModalStack::new();
        let sync = VisibilitySynchronizer::new();

        // empty stack but a surface still fading out on screen
        packing.borrow_mut().show();
        assert!(!sync.lock_releasable(&stack, &registry));

        // visible surface gone, stack empty: releasable
        packing.borrow_mut().hide();
        assert!(sync.lock_releasable(&stack, &registry));

        // non-empty stack blocks release even with nothing visible
        stack.push(StackEntry::new("packing".into(), Rc::downgrade(&packing), 0.0));
        assert!(!sync.lock_releasable(&stack, &registry));
    }
}
