//! The overlay manager: owner of the modal stack and the glue between
//! the surface registry, fade queue, navigation bridge, loading guard
//! and the page viewport.
//!
//! All operations run on the single cooperative UI thread. Deferred work
//! (fade-outs, drift reconciliation, scroll-lock release) is driven by
//! the host calling [`OverlayManager::tick`].

use crate::config::OverlayConfig;
use crate::fade::FadeQueue;
use crate::loading::LoadingGuard;
use crate::navigation::{HistorySink, NavAction, NavigationBridge, PointerTarget};
use crate::stack::{ModalStack, StackEntry};
use crate::surface::{SharedSurface, SurfaceRegistry};
use crate::sync::VisibilitySynchronizer;
use crate::types::{DialogHandle, OverlayError, OverlayEvent, OverlayResult};
use crate::viewport::Viewport;
use crossterm::event::KeyEvent;
use std::rc::Rc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, warn};

pub struct OverlayManager {
    config: OverlayConfig,
    registry: SurfaceRegistry,
    stack: ModalStack,
    fades: FadeQueue,
    loading: LoadingGuard,
    bridge: NavigationBridge,
    synchronizer: VisibilitySynchronizer,
    viewport: Box<dyn Viewport>,
    event_sender: Option<mpsc::UnboundedSender<OverlayEvent>>,
}

impl OverlayManager {
    pub fn new(
        config: OverlayConfig,
        viewport: Box<dyn Viewport>,
        history: Box<dyn HistorySink>,
    ) -> Self {
        let bridge = NavigationBridge::new(history, config.escape_dismiss, config.backdrop_dismiss);
        Self {
            config,
            registry: SurfaceRegistry::new(),
            stack: ModalStack::new(),
            fades: FadeQueue::new(),
            loading: LoadingGuard::new(),
            bridge,
            synchronizer: VisibilitySynchronizer::new(),
            viewport,
            event_sender: None,
        }
    }

    /// Set the channel lifecycle events are emitted on.
    pub fn set_event_sender(&mut self, sender: mpsc::UnboundedSender<OverlayEvent>) {
        self.event_sender = Some(sender);
    }

    /// Register the surface backing `handle`; the view tree keeps the
    /// returned reference and may mutate the surface directly.
    pub fn register_surface(&mut self, handle: impl Into<DialogHandle>) -> SharedSurface {
        self.registry.register(handle)
    }

    pub fn registry(&self) -> &SurfaceRegistry {
        &self.registry
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Open `handle` with no population step.
    pub fn open(&mut self, handle: impl Into<DialogHandle>) -> OverlayResult<()> {
        self.open_with(handle, || Ok(()))
    }

    /// Open `handle`, running `populate` to fill the dialog's content
    /// while the busy indicator shows.
    ///
    /// The callback runs at most once, after the stack and layering
    /// update and before the busy indicator is released. Its errors are
    /// caught and logged; the dialog stays open with whatever partial
    /// content the callback produced. Deferred work the callback starts
    /// is not awaited. The busy indicator is released exactly once per
    /// attempt, whatever the outcome.
    pub fn open_with<F>(&mut self, handle: impl Into<DialogHandle>, populate: F) -> OverlayResult<()>
    where
        F: FnOnce() -> anyhow::Result<()>,
    {
        let handle = handle.into();
        self.loading.begin(&handle, &self.registry);
        self.send_event(OverlayEvent::LoadingShown(handle.clone()));

        let result = self.open_inner(&handle, populate);

        self.loading.end(&handle, &self.registry);
        self.send_event(OverlayEvent::LoadingHidden(handle.clone()));

        match result {
            Ok(surface) => {
                surface.borrow_mut().show();
                self.send_event(OverlayEvent::Opened(handle));
                Ok(())
            }
            Err(err) => {
                debug!(dialog = %handle, error = %err, "open refused");
                Err(err)
            }
        }
    }

    fn open_inner<F>(&mut self, handle: &DialogHandle, populate: F) -> OverlayResult<SharedSurface>
    where
        F: FnOnce() -> anyhow::Result<()>,
    {
        if self.stack.contains(handle) {
            return Err(OverlayError::AlreadyOpen(handle.clone()));
        }
        let surface = self
            .registry
            .resolve(handle)
            .cloned()
            .ok_or_else(|| OverlayError::NotFound(handle.clone()))?;

        let captured = self.viewport.scroll_offset();
        let first = self.stack.is_empty();
        self.stack
            .push(StackEntry::new(handle.clone(), Rc::downgrade(&surface), captured));
        self.stack
            .apply_layers(self.config.base_layer, self.config.layer_step);

        if first {
            self.viewport.set_scroll_locked(true);
            self.bridge.begin_session();
            self.send_event(OverlayEvent::SessionStarted);
        }

        if let Err(err) = populate() {
            warn!(dialog = %handle, error = %err, "population callback failed, dialog stays open");
        }

        Ok(surface)
    }

    /// Close `handle`: the stack entry goes immediately, the surface
    /// fades out over the configured window. An unknown handle still
    /// gets its surface hidden, best effort; lost bookkeeping must never
    /// leave a surface stuck open.
    pub fn close(&mut self, handle: impl Into<DialogHandle>) {
        let handle = handle.into();
        let deadline = Instant::now() + self.config.fade_out;
        match self.stack.remove(&handle) {
            Some(entry) => {
                self.fades
                    .schedule(handle.clone(), entry.surface().clone(), deadline);
                self.stack
                    .apply_layers(self.config.base_layer, self.config.layer_step);
                self.send_event(OverlayEvent::Closed(handle));
                if self.stack.is_empty() {
                    self.viewport
                        .set_scroll_offset(entry.captured_scroll_offset());
                    self.end_session(true);
                }
            }
            None => {
                warn!(dialog = %handle, "close for a dialog not on the stack, force-hiding its surface");
                if let Some(surface) = self.registry.resolve(&handle) {
                    self.fades.schedule(handle, Rc::downgrade(surface), deadline);
                }
            }
        }
    }

    /// One step back: closes the top dialog; the last one out restores
    /// the page scroll position. No-op at depth zero.
    pub fn go_back(&mut self) {
        if let Some(top) = self.stack.top().map(|entry| entry.handle().clone()) {
            self.close(top);
        }
    }

    /// Clear the whole stack, scheduling every surface's fade-out and
    /// restoring the scroll offset captured by the bottom-most entry.
    /// No-op when nothing is open.
    pub fn close_all(&mut self) {
        self.close_all_inner(true);
    }

    fn close_all_inner(&mut self, retire_checkpoint: bool) {
        if self.stack.is_empty() {
            return;
        }
        let deadline = Instant::now() + self.config.fade_out;
        let entries = self.stack.drain();
        let restore = entries.first().map(|entry| entry.captured_scroll_offset());
        for entry in entries {
            self.fades
                .schedule(entry.handle().clone(), entry.surface().clone(), deadline);
            self.send_event(OverlayEvent::Closed(entry.handle().clone()));
        }
        if let Some(offset) = restore {
            self.viewport.set_scroll_offset(offset);
        }
        self.end_session(retire_checkpoint);
    }

    /// Feed one platform back-navigation event. While a session is
    /// active it always means "close everything", never a page
    /// navigation; the platform has already consumed the checkpoint.
    pub fn handle_back_navigation(&mut self) -> bool {
        match self.bridge.action_for_back() {
            Some(NavAction::CloseAll) => {
                self.close_all_inner(false);
                true
            }
            _ => false,
        }
    }

    /// Feed one event from the global key-down stream. Returns whether
    /// the overlay consumed it.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> bool {
        match self.bridge.action_for_key(&key) {
            Some(NavAction::GoBack) => {
                self.go_back();
                true
            }
            _ => false,
        }
    }

    /// Feed one document-level click, described by its target path from
    /// the interaction origin outward.
    pub fn handle_pointer(&mut self, path: &[PointerTarget]) -> bool {
        match self.bridge.action_for_pointer(path) {
            Some(NavAction::Close(handle)) => {
                self.close(handle);
                true
            }
            Some(NavAction::GoBack) => {
                self.go_back();
                true
            }
            Some(NavAction::CloseAll) => {
                self.close_all();
                true
            }
            None => false,
        }
    }

    /// Drive deferred work: complete due fade-outs, reconcile the stack
    /// against observed visibility, and release the scroll lock once
    /// nothing is logically open or observably visible.
    pub fn tick(&mut self, now: Instant) {
        for handle in self.fades.advance(now) {
            self.send_event(OverlayEvent::Hidden(handle));
        }

        let pruned = self.synchronizer.reconcile(&mut self.stack);
        if !pruned.is_empty() {
            self.stack
                .apply_layers(self.config.base_layer, self.config.layer_step);
            for entry in pruned {
                self.send_event(OverlayEvent::DriftPruned(entry.handle().clone()));
            }
            if self.stack.is_empty() {
                self.end_session(true);
            }
        }

        if self.viewport.scroll_locked()
            && self.synchronizer.lock_releasable(&self.stack, &self.registry)
        {
            self.viewport.set_scroll_locked(false);
            debug!("scroll lock released");
        }
    }

    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    pub fn is_open(&self, handle: &DialogHandle) -> bool {
        self.stack.contains(handle)
    }

    pub fn open_handles(&self) -> Vec<DialogHandle> {
        self.stack.handles()
    }

    pub fn top_handle(&self) -> Option<DialogHandle> {
        self.stack.top().map(|entry| entry.handle().clone())
    }

    pub fn is_session_active(&self) -> bool {
        self.bridge.is_active()
    }

    /// Surfaces removed from the stack whose fade-out has not completed.
    pub fn pending_hide_count(&self) -> usize {
        self.fades.len()
    }

    fn end_session(&mut self, retire_checkpoint: bool) {
        if !self.bridge.is_active() {
            return;
        }
        self.bridge.end_session(retire_checkpoint);
        self.send_event(OverlayEvent::SessionEnded);
    }

    fn send_event(&self, event: OverlayEvent) {
        if let Some(sender) = &self.event_sender {
            let _ = sender.send(event);
        }
    }
}
