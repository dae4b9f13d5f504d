//! The forwarding proxy and its dispatch engine.
//!
//! `DelegateProxy` installs itself as a surface's delegate and data source,
//! then routes every contract message to the listeners registered with it:
//! broadcast notifications reach every capable responder, content and layout
//! queries reach exactly one. The proxy owns no business logic and no UI
//! state; each message is handled statelessly against the current registry
//! snapshot.
//!
//! # Routing
//!
//! ```text
//!  surface ──▶ DelegateProxy ──▶ primary listener
//!                  │    │
//!                  │    └──────▶ secondary listeners (weak)
//!                  └───────────▶ parent proxy (layered composition)
//! ```
//!
//! The parent chain is consulted only when none of this proxy's own
//! registrations can handle a message, so a layered proxy behaves as one
//! seamless conformer whose capability surface is the union of all layers.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};

use crate::content::{ItemContent, ItemSize};
use crate::contract::{
    CountProvider, DisplayHandler, GridDataSource, GridDelegate, GridSurface, HeaderProvider,
    HighlightHandler, ItemProvider, LayoutProvider, ReorderHandler, SelectionGate,
    SelectionHandler, data_source_implements, delegate_implements,
};
use crate::error::{BroadcastFailure, ProxyError};
use crate::index::ItemIndex;
use crate::message::{DataSourceMessage, DelegateMessage};
use crate::registry::ListenerRegistry;

/// Hook consulted before each broadcast notification.
///
/// Returning `true` consumes the notification: no responder sees it.
pub type NotificationInterceptor = Arc<dyn Fn(DelegateMessage, ItemIndex) -> bool + Send + Sync>;

/// A forwarding proxy that merges any number of partial listeners into one
/// conformer of both surface contracts.
///
/// # Registration
///
/// Each contract has one optional primary listener (strongly held,
/// authoritative) and an unordered collection of secondary listeners (weakly
/// held). There is no remove operation: a secondary detaches by dropping its
/// last strong reference.
///
/// # Thread model
///
/// Dispatch is synchronous on the calling thread; nothing is queued or
/// deferred. Contract traffic is expected from the surface's own
/// single-threaded update cycle. Registry state sits behind locks so
/// registration from another thread is defined, but the locks only guard
/// snapshots and are never held across a responder invocation.
pub struct DelegateProxy {
    surface: RwLock<Weak<dyn GridSurface>>,
    delegates: ListenerRegistry<dyn GridDelegate>,
    sources: ListenerRegistry<dyn GridDataSource>,
    parent: Option<Arc<DelegateProxy>>,
    blocked: AtomicBool,
    interceptor: RwLock<Option<NotificationInterceptor>>,
    failures: Mutex<Vec<BroadcastFailure>>,
}

impl DelegateProxy {
    /// Builds a proxy bound to `surface` and installs it as the surface's
    /// delegate and data source, replacing whatever was installed before.
    pub fn attach(surface: &Arc<dyn GridSurface>) -> Arc<Self> {
        let proxy = Arc::new(Self::bare(Arc::downgrade(surface), None));
        proxy.install();
        proxy
    }

    /// Builds a proxy layered over `parent`.
    ///
    /// The new proxy inherits the parent's surface and installs itself; the
    /// parent's registrations remain reachable through the chain, so the new
    /// layer exposes the union of both layers' capabilities. Installation is
    /// silently skipped when the surface is already gone.
    pub fn layered(parent: &Arc<DelegateProxy>) -> Arc<Self> {
        let surface = parent.surface.read().clone();
        let proxy = Arc::new(Self::bare(surface, Some(parent.clone())));
        proxy.install();
        proxy
    }

    fn bare(surface: Weak<dyn GridSurface>, parent: Option<Arc<DelegateProxy>>) -> Self {
        Self {
            surface: RwLock::new(surface),
            delegates: ListenerRegistry::new(),
            sources: ListenerRegistry::new(),
            parent,
            blocked: AtomicBool::new(false),
            interceptor: RwLock::new(None),
            failures: Mutex::new(Vec::new()),
        }
    }

    fn install(self: &Arc<Self>) {
        match self.surface.read().upgrade() {
            Some(surface) => {
                surface.set_delegate(Some(self.clone() as Arc<dyn GridDelegate>));
                surface.set_data_source(Some(self.clone() as Arc<dyn GridDataSource>));
                tracing::debug!(
                    target: "viewmux::proxy",
                    layered = self.parent.is_some(),
                    "installed as surface delegate and data source"
                );
            }
            None => {
                tracing::debug!(target: "viewmux::proxy", "surface gone, installation skipped");
            }
        }
    }

    /// Re-runs surface installation, e.g. after the application replaced the
    /// surface's delegate with something else.
    pub fn reinstall(self: &Arc<Self>) -> Result<(), ProxyError> {
        if self.surface.read().upgrade().is_none() {
            return Err(ProxyError::SurfaceGone);
        }
        self.install();
        Ok(())
    }

    /// The observed surface, if it is still alive.
    pub fn surface(&self) -> Option<Arc<dyn GridSurface>> {
        self.surface.read().upgrade()
    }

    /// The wrapped parent proxy, if this proxy was built with
    /// [`DelegateProxy::layered`].
    pub fn parent(&self) -> Option<&Arc<DelegateProxy>> {
        self.parent.as_ref()
    }

    // -------------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------------

    /// Replaces the authoritative delegate listener; `None` clears it.
    pub fn set_primary_delegate(&self, listener: Option<Arc<dyn GridDelegate>>) {
        tracing::debug!(
            target: "viewmux::registry",
            present = listener.is_some(),
            "primary delegate replaced"
        );
        self.delegates.set_primary(listener);
    }

    /// Replaces the authoritative data-source provider; `None` clears it.
    pub fn set_primary_data_source(&self, provider: Option<Arc<dyn GridDataSource>>) {
        tracing::debug!(
            target: "viewmux::registry",
            present = provider.is_some(),
            "primary data source replaced"
        );
        self.sources.set_primary(provider);
    }

    /// Registers a secondary delegate listener.
    ///
    /// The reference is held weakly; re-adding a listener that is already
    /// registered is a no-op.
    pub fn add_delegate(&self, listener: &Arc<dyn GridDelegate>) {
        let inserted = self.delegates.add(listener);
        tracing::debug!(
            target: "viewmux::registry",
            inserted,
            count = self.delegates.secondary_count(),
            "secondary delegate registered"
        );
    }

    /// Registers a secondary data-source provider.
    ///
    /// The reference is held weakly; re-adding a provider that is already
    /// registered is a no-op.
    pub fn add_data_source(&self, provider: &Arc<dyn GridDataSource>) {
        let inserted = self.sources.add(provider);
        tracing::debug!(
            target: "viewmux::registry",
            inserted,
            count = self.sources.secondary_count(),
            "secondary data source registered"
        );
    }

    // -------------------------------------------------------------------------
    // Diagnostics
    // -------------------------------------------------------------------------

    /// Whether a primary delegate is set.
    pub fn has_primary_delegate(&self) -> bool {
        self.delegates.has_primary()
    }

    /// Whether a primary data source is set.
    pub fn has_primary_data_source(&self) -> bool {
        self.sources.has_primary()
    }

    /// Number of live secondary delegate listeners.
    pub fn secondary_delegate_count(&self) -> usize {
        self.delegates.secondary_count()
    }

    /// Number of live secondary data-source providers.
    pub fn secondary_data_source_count(&self) -> usize {
        self.sources.secondary_count()
    }

    /// Drains the responder failures captured since the last call.
    ///
    /// Failures accumulate across broadcast passes; see
    /// [`BroadcastFailure`].
    pub fn take_broadcast_failures(&self) -> Vec<BroadcastFailure> {
        std::mem::take(&mut *self.failures.lock())
    }

    // -------------------------------------------------------------------------
    // Notification gating
    // -------------------------------------------------------------------------

    /// Blocks or unblocks broadcast notifications.
    ///
    /// While blocked, notifications are dropped without reaching any
    /// responder; single-responder queries are unaffected.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Whether broadcast notifications are currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Installs a hook consulted before each broadcast notification.
    ///
    /// Returning `true` consumes the notification before any responder sees
    /// it.
    pub fn set_notification_interceptor<F>(&self, interceptor: F)
    where
        F: Fn(DelegateMessage, ItemIndex) -> bool + Send + Sync + 'static,
    {
        *self.interceptor.write() = Some(Arc::new(interceptor));
    }

    /// Removes the notification interceptor.
    pub fn clear_notification_interceptor(&self) {
        *self.interceptor.write() = None;
    }

    // -------------------------------------------------------------------------
    // Capability introspection
    // -------------------------------------------------------------------------

    /// Would this proxy handle `message` of the delegate contract?
    ///
    /// True iff the primary, any live secondary, or the parent chain
    /// implements the message. Computed against the current registry state on
    /// every call; there is no cached capability set.
    pub fn responds_to_delegate(&self, message: DelegateMessage) -> bool {
        self.own_delegate_capable(message)
            || self
                .parent
                .as_ref()
                .is_some_and(|parent| parent.responds_to_delegate(message))
    }

    /// Would this proxy handle `message` of the data-source contract?
    pub fn responds_to_data_source(&self, message: DataSourceMessage) -> bool {
        self.own_data_source_capable(message)
            || self
                .parent
                .as_ref()
                .is_some_and(|parent| parent.responds_to_data_source(message))
    }

    fn own_delegate_capable(&self, message: DelegateMessage) -> bool {
        if self
            .delegates
            .primary()
            .is_some_and(|primary| delegate_implements(&*primary, message))
        {
            return true;
        }
        self.delegates
            .secondaries()
            .iter()
            .any(|secondary| delegate_implements(&**secondary, message))
    }

    fn own_data_source_capable(&self, message: DataSourceMessage) -> bool {
        if self
            .sources
            .primary()
            .is_some_and(|primary| data_source_implements(&*primary, message))
        {
            return true;
        }
        self.sources
            .secondaries()
            .iter()
            .any(|secondary| data_source_implements(&**secondary, message))
    }

    // -------------------------------------------------------------------------
    // Dispatch engine
    // -------------------------------------------------------------------------

    /// Every capable responder for a broadcast notification, primary first.
    fn delegate_responders(&self, message: DelegateMessage) -> Vec<Arc<dyn GridDelegate>> {
        let mut responders = Vec::new();
        let primary = self.delegates.primary();
        if let Some(primary) = &primary {
            if delegate_implements(&**primary, message) {
                responders.push(primary.clone());
            }
        }
        for secondary in self.delegates.secondaries() {
            // One object registered both ways receives one delivery.
            if primary
                .as_ref()
                .is_some_and(|primary| Arc::ptr_eq(primary, &secondary))
            {
                continue;
            }
            if delegate_implements(&*secondary, message) {
                responders.push(secondary);
            }
        }
        responders
    }

    /// Delivers a broadcast notification to every capable responder in one
    /// synchronous pass, isolating per-responder failures.
    #[tracing::instrument(skip_all, target = "viewmux::dispatch", level = "trace", fields(message = %message, index = %index))]
    fn notify(&self, message: DelegateMessage, index: ItemIndex, invoke: &dyn Fn(&dyn GridDelegate)) {
        if self.is_blocked() {
            tracing::trace!(target: "viewmux::dispatch", "proxy blocked, dropping notification");
            return;
        }
        let interceptor = self.interceptor.read().clone();
        if let Some(interceptor) = interceptor {
            if interceptor(message, index) {
                tracing::trace!(target: "viewmux::dispatch", "notification consumed by interceptor");
                return;
            }
        }

        let responders = self.delegate_responders(message);
        if responders.is_empty() {
            if let Some(parent) = &self.parent {
                parent.notify(message, index, invoke);
            }
            return;
        }

        tracing::trace!(
            target: "viewmux::dispatch",
            responders = responders.len(),
            "broadcasting notification"
        );
        for responder in responders {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| invoke(&*responder)));
            if let Err(payload) = outcome {
                let failure = BroadcastFailure {
                    message,
                    detail: panic_text(payload.as_ref()),
                };
                tracing::error!(
                    target: "viewmux::dispatch",
                    %failure,
                    "responder failed, continuing broadcast"
                );
                self.failures.lock().push(failure);
            }
        }
    }

    /// Answers a single-responder delegate message with the first capable
    /// responder's result: primary, then secondaries in scan order, then the
    /// parent chain. `None` means no responder: the message is unhandled.
    #[tracing::instrument(skip_all, target = "viewmux::dispatch", level = "trace", fields(message = %message))]
    fn query<R>(
        &self,
        message: DelegateMessage,
        probe: &dyn Fn(&dyn GridDelegate) -> Option<R>,
    ) -> Option<R> {
        if let Some(primary) = self.delegates.primary() {
            if let Some(result) = probe(&*primary) {
                return Some(result);
            }
        }
        for secondary in self.delegates.secondaries() {
            if let Some(result) = probe(&*secondary) {
                return Some(result);
            }
        }
        match &self.parent {
            Some(parent) => parent.query(message, probe),
            None => None,
        }
    }

    /// Single-responder engine for the data-source contract.
    #[tracing::instrument(skip_all, target = "viewmux::dispatch", level = "trace", fields(message = %message))]
    fn query_source<R>(
        &self,
        message: DataSourceMessage,
        probe: &dyn Fn(&dyn GridDataSource) -> Option<R>,
    ) -> Option<R> {
        if let Some(primary) = self.sources.primary() {
            if let Some(result) = probe(&*primary) {
                return Some(result);
            }
        }
        for secondary in self.sources.secondaries() {
            if let Some(result) = probe(&*secondary) {
                return Some(result);
            }
        }
        match &self.parent {
            Some(parent) => parent.query_source(message, probe),
            None => None,
        }
    }
}

fn panic_text(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

impl fmt::Debug for DelegateProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegateProxy")
            .field("surface_alive", &self.surface.read().upgrade().is_some())
            .field("has_primary_delegate", &self.has_primary_delegate())
            .field("secondary_delegates", &self.secondary_delegate_count())
            .field("has_primary_data_source", &self.has_primary_data_source())
            .field("secondary_data_sources", &self.secondary_data_source_count())
            .field("layered", &self.parent.is_some())
            .finish()
    }
}

// -------------------------------------------------------------------------
// Conformance: the proxy is a full conformer of both contracts. Each
// narrowing accessor answers Some exactly when some registered responder
// (own layer or parent chain) is capable, so the surface's dispatch
// machinery sees the live capability union.
// -------------------------------------------------------------------------

impl GridDelegate for DelegateProxy {
    fn selection_handler(&self) -> Option<&dyn SelectionHandler> {
        if self.responds_to_delegate(DelegateMessage::DidSelect) {
            Some(self)
        } else {
            None
        }
    }

    fn display_handler(&self) -> Option<&dyn DisplayHandler> {
        if self.responds_to_delegate(DelegateMessage::WillDisplay) {
            Some(self)
        } else {
            None
        }
    }

    fn highlight_handler(&self) -> Option<&dyn HighlightHandler> {
        if self.responds_to_delegate(DelegateMessage::DidHighlight) {
            Some(self)
        } else {
            None
        }
    }

    fn selection_gate(&self) -> Option<&dyn SelectionGate> {
        if self.responds_to_delegate(DelegateMessage::ShouldSelect) {
            Some(self)
        } else {
            None
        }
    }

    fn layout_provider(&self) -> Option<&dyn LayoutProvider> {
        if self.responds_to_delegate(DelegateMessage::ItemSize) {
            Some(self)
        } else {
            None
        }
    }
}

impl SelectionHandler for DelegateProxy {
    fn did_select(&self, index: ItemIndex) {
        self.notify(DelegateMessage::DidSelect, index, &|delegate| {
            if let Some(handler) = delegate.selection_handler() {
                handler.did_select(index);
            }
        });
    }

    fn did_deselect(&self, index: ItemIndex) {
        self.notify(DelegateMessage::DidDeselect, index, &|delegate| {
            if let Some(handler) = delegate.selection_handler() {
                handler.did_deselect(index);
            }
        });
    }
}

impl DisplayHandler for DelegateProxy {
    fn will_display(&self, index: ItemIndex) {
        self.notify(DelegateMessage::WillDisplay, index, &|delegate| {
            if let Some(handler) = delegate.display_handler() {
                handler.will_display(index);
            }
        });
    }

    fn did_end_display(&self, index: ItemIndex) {
        self.notify(DelegateMessage::DidEndDisplay, index, &|delegate| {
            if let Some(handler) = delegate.display_handler() {
                handler.did_end_display(index);
            }
        });
    }
}

impl HighlightHandler for DelegateProxy {
    fn did_highlight(&self, index: ItemIndex) {
        self.notify(DelegateMessage::DidHighlight, index, &|delegate| {
            if let Some(handler) = delegate.highlight_handler() {
                handler.did_highlight(index);
            }
        });
    }

    fn did_unhighlight(&self, index: ItemIndex) {
        self.notify(DelegateMessage::DidUnhighlight, index, &|delegate| {
            if let Some(handler) = delegate.highlight_handler() {
                handler.did_unhighlight(index);
            }
        });
    }
}

impl SelectionGate for DelegateProxy {
    fn should_select(&self, index: ItemIndex) -> bool {
        // The registry can change between the surface's narrowing and this
        // call; the fallback mirrors an empty conformer.
        self.query(DelegateMessage::ShouldSelect, &|delegate| {
            delegate.selection_gate().map(|gate| gate.should_select(index))
        })
        .unwrap_or(true)
    }
}

impl LayoutProvider for DelegateProxy {
    fn item_size(&self, index: ItemIndex, available: ItemSize) -> ItemSize {
        self.query(DelegateMessage::ItemSize, &|delegate| {
            delegate
                .layout_provider()
                .map(|provider| provider.item_size(index, available))
        })
        .unwrap_or(ItemSize::ZERO)
    }
}

impl GridDataSource for DelegateProxy {
    fn count_provider(&self) -> Option<&dyn CountProvider> {
        if self.responds_to_data_source(DataSourceMessage::ItemCount) {
            Some(self)
        } else {
            None
        }
    }

    fn item_provider(&self) -> Option<&dyn ItemProvider> {
        if self.responds_to_data_source(DataSourceMessage::ItemAt) {
            Some(self)
        } else {
            None
        }
    }

    fn header_provider(&self) -> Option<&dyn HeaderProvider> {
        if self.responds_to_data_source(DataSourceMessage::HeaderContent) {
            Some(self)
        } else {
            None
        }
    }

    fn reorder_handler(&self) -> Option<&dyn ReorderHandler> {
        if self.responds_to_data_source(DataSourceMessage::CanMoveItem) {
            Some(self)
        } else {
            None
        }
    }
}

impl CountProvider for DelegateProxy {
    fn item_count(&self, section: usize) -> usize {
        self.query_source(DataSourceMessage::ItemCount, &|source| {
            source.count_provider().map(|counts| counts.item_count(section))
        })
        .unwrap_or(0)
    }

    fn section_count(&self) -> usize {
        self.query_source(DataSourceMessage::SectionCount, &|source| {
            source.count_provider().map(|counts| counts.section_count())
        })
        .unwrap_or(1)
    }
}

impl ItemProvider for DelegateProxy {
    fn item_at(&self, index: ItemIndex) -> ItemContent {
        self.query_source(DataSourceMessage::ItemAt, &|source| {
            source.item_provider().map(|items| items.item_at(index))
        })
        .unwrap_or(ItemContent::None)
    }
}

impl HeaderProvider for DelegateProxy {
    fn header_content(&self, section: usize) -> ItemContent {
        self.query_source(DataSourceMessage::HeaderContent, &|source| {
            source
                .header_provider()
                .map(|headers| headers.header_content(section))
        })
        .unwrap_or(ItemContent::None)
    }
}

impl ReorderHandler for DelegateProxy {
    fn can_move_item(&self, index: ItemIndex) -> bool {
        self.query_source(DataSourceMessage::CanMoveItem, &|source| {
            source
                .reorder_handler()
                .map(|reorder| reorder.can_move_item(index))
        })
        .unwrap_or(false)
    }

    fn move_item(&self, from: ItemIndex, to: ItemIndex) {
        let _ = self.query_source(DataSourceMessage::MoveItem, &|source| {
            source.reorder_handler().map(|reorder| reorder.move_item(from, to))
        });
    }
}

static_assertions::assert_impl_all!(DelegateProxy: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    struct TestSurface {
        delegate: RwLock<Option<Arc<dyn GridDelegate>>>,
        source: RwLock<Option<Arc<dyn GridDataSource>>>,
    }

    impl TestSurface {
        fn new() -> Arc<dyn GridSurface> {
            Arc::new(Self {
                delegate: RwLock::new(None),
                source: RwLock::new(None),
            })
        }
    }

    impl GridSurface for TestSurface {
        fn set_delegate(&self, delegate: Option<Arc<dyn GridDelegate>>) {
            *self.delegate.write() = delegate;
        }

        fn set_data_source(&self, source: Option<Arc<dyn GridDataSource>>) {
            *self.source.write() = source;
        }
    }

    struct SelectionRecorder {
        name: &'static str,
        seen: Arc<Mutex<Vec<(&'static str, ItemIndex)>>>,
    }

    impl GridDelegate for SelectionRecorder {
        fn selection_handler(&self) -> Option<&dyn SelectionHandler> {
            Some(self)
        }
    }

    impl SelectionHandler for SelectionRecorder {
        fn did_select(&self, index: ItemIndex) {
            self.seen.lock().push((self.name, index));
        }
    }

    struct Gate(bool);

    impl GridDelegate for Gate {
        fn selection_gate(&self) -> Option<&dyn SelectionGate> {
            Some(self)
        }
    }

    impl SelectionGate for Gate {
        fn should_select(&self, _index: ItemIndex) -> bool {
            self.0
        }
    }

    struct Counts(usize);

    impl GridDataSource for Counts {
        fn count_provider(&self) -> Option<&dyn CountProvider> {
            Some(self)
        }
    }

    impl CountProvider for Counts {
        fn item_count(&self, _section: usize) -> usize {
            self.0
        }
    }

    struct PanickingListener;

    impl GridDelegate for PanickingListener {
        fn selection_handler(&self) -> Option<&dyn SelectionHandler> {
            Some(self)
        }
    }

    impl SelectionHandler for PanickingListener {
        fn did_select(&self, _index: ItemIndex) {
            panic!("listener exploded");
        }
    }

    fn detached_proxy() -> Arc<DelegateProxy> {
        DelegateProxy::attach(&TestSurface::new())
    }

    #[test]
    fn test_empty_proxy_conforms_to_nothing() {
        let proxy = detached_proxy();
        for message in DelegateMessage::ALL {
            assert!(!proxy.responds_to_delegate(message));
        }
        for message in DataSourceMessage::ALL {
            assert!(!proxy.responds_to_data_source(message));
        }
        assert!(proxy.selection_handler().is_none());
        assert!(proxy.count_provider().is_none());
    }

    #[test]
    fn test_single_provider_answer_is_returned_verbatim() {
        let proxy = detached_proxy();
        let counts: Arc<dyn GridDataSource> = Arc::new(Counts(5));
        proxy.add_data_source(&counts);

        assert!(proxy.responds_to_data_source(DataSourceMessage::ItemCount));
        let provider = proxy.count_provider().expect("a provider is registered");
        assert_eq!(provider.item_count(0), 5);
        assert_eq!(provider.section_count(), 1);
    }

    #[test]
    fn test_primary_precedes_secondary_for_queries() {
        let proxy = detached_proxy();
        let primary: Arc<dyn GridDelegate> = Arc::new(Gate(false));
        let secondary: Arc<dyn GridDelegate> = Arc::new(Gate(true));
        proxy.set_primary_delegate(Some(primary));
        proxy.add_delegate(&secondary);

        let gate = proxy.selection_gate().expect("gates are registered");
        assert!(!gate.should_select(ItemIndex::first()));
    }

    #[test]
    fn test_broadcast_reaches_primary_and_secondary_once_each() {
        let proxy = detached_proxy();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let primary: Arc<dyn GridDelegate> = Arc::new(SelectionRecorder {
            name: "primary",
            seen: seen.clone(),
        });
        let secondary: Arc<dyn GridDelegate> = Arc::new(SelectionRecorder {
            name: "secondary",
            seen: seen.clone(),
        });
        proxy.set_primary_delegate(Some(primary));
        proxy.add_delegate(&secondary);

        let index = ItemIndex::new(0, 2);
        proxy.selection_handler().unwrap().did_select(index);

        let events = seen.lock();
        assert_eq!(*events, vec![("primary", index), ("secondary", index)]);
    }

    #[test]
    fn test_blocked_proxy_drops_notifications() {
        let proxy = detached_proxy();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let listener: Arc<dyn GridDelegate> = Arc::new(SelectionRecorder {
            name: "listener",
            seen: seen.clone(),
        });
        proxy.add_delegate(&listener);

        proxy.set_blocked(true);
        proxy.did_select(ItemIndex::first());
        assert!(seen.lock().is_empty());

        proxy.set_blocked(false);
        proxy.did_select(ItemIndex::first());
        assert_eq!(seen.lock().len(), 1);
    }

    #[test]
    fn test_interceptor_consumes_notifications() {
        let proxy = detached_proxy();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let listener: Arc<dyn GridDelegate> = Arc::new(SelectionRecorder {
            name: "listener",
            seen: seen.clone(),
        });
        proxy.add_delegate(&listener);

        proxy.set_notification_interceptor(|message, _index| {
            message == DelegateMessage::DidSelect
        });
        proxy.did_select(ItemIndex::first());
        assert!(seen.lock().is_empty());

        proxy.clear_notification_interceptor();
        proxy.did_select(ItemIndex::first());
        assert_eq!(seen.lock().len(), 1);
    }

    #[test]
    fn test_responder_panic_is_isolated_and_recorded() {
        let proxy = detached_proxy();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let exploding: Arc<dyn GridDelegate> = Arc::new(PanickingListener);
        let steady: Arc<dyn GridDelegate> = Arc::new(SelectionRecorder {
            name: "steady",
            seen: seen.clone(),
        });
        proxy.add_delegate(&exploding);
        proxy.add_delegate(&steady);

        proxy.did_select(ItemIndex::first());

        // The failing responder never suppressed the one after it.
        assert_eq!(seen.lock().len(), 1);

        let failures = proxy.take_broadcast_failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].message, DelegateMessage::DidSelect);
        assert!(failures[0].detail.contains("listener exploded"));
        assert!(proxy.take_broadcast_failures().is_empty());
    }

    #[test]
    fn test_primary_also_registered_as_secondary_delivers_once() {
        let proxy = detached_proxy();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let listener: Arc<dyn GridDelegate> = Arc::new(SelectionRecorder {
            name: "both",
            seen: seen.clone(),
        });
        proxy.set_primary_delegate(Some(listener.clone()));
        proxy.add_delegate(&listener);

        proxy.did_select(ItemIndex::first());
        assert_eq!(seen.lock().len(), 1);
    }

    #[test]
    fn test_stale_secondary_is_skipped_without_error() {
        let proxy = detached_proxy();
        let seen = Arc::new(Mutex::new(Vec::new()));
        {
            let transient: Arc<dyn GridDelegate> = Arc::new(SelectionRecorder {
                name: "transient",
                seen: seen.clone(),
            });
            proxy.add_delegate(&transient);
            assert!(proxy.responds_to_delegate(DelegateMessage::DidSelect));
        }

        assert!(!proxy.responds_to_delegate(DelegateMessage::DidSelect));
        assert_eq!(proxy.secondary_delegate_count(), 0);
        proxy.did_select(ItemIndex::first());
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_debug_output_reflects_registry() {
        let proxy = detached_proxy();
        let counts: Arc<dyn GridDataSource> = Arc::new(Counts(1));
        proxy.add_data_source(&counts);

        let debug = format!("{proxy:?}");
        assert!(debug.contains("secondary_data_sources: 1"));
        assert!(debug.contains("layered: false"));
    }
}
