//! Registry of live reactive messages and event fan-out.

use crate::{ReactiveConfig, ReactiveMessage, ReactiveView};
use async_trait::async_trait;
use futures::future::join_all;
use parking_lot::RwLock;
use quill_error::QuillResult;
use quill_interface::{ChannelRef, ChatPlatform, PlatformEvent};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::{debug, error, instrument, trace};

/// Capacity of the permission-change broadcast; waiters only need the latest.
const PERMISSION_EVENT_CAPACITY: usize = 64;

/// Identifies one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub struct ListenerId(u64);

/// Anything the router can forward platform events to.
#[async_trait]
pub trait ReactiveListener: Send + Sync {
    /// Registry key.
    fn listener_id(&self) -> ListenerId;

    /// Cheap pre-check run before the event is handed over. Must not block.
    fn wants(&self, _event: &PlatformEvent) -> bool {
        true
    }

    /// Handle one event; errors are logged by the router.
    async fn handle_event(&self, event: &PlatformEvent) -> QuillResult<()>;
}

/// The bot's event router for reactive messages.
///
/// Owns the platform handle and configuration every instance shares, keeps the
/// list of live instances, and fans events out to them. Dispatch iterates over
/// a snapshot, so instances may register or deregister while an event is in
/// flight. Permission-change events go to a broadcast channel that instances
/// waiting for permissions subscribe to.
pub struct EventRouter {
    platform: Arc<dyn ChatPlatform>,
    config: ReactiveConfig,
    listeners: RwLock<Vec<Arc<dyn ReactiveListener>>>,
    next_id: AtomicU64,
    permission_events: broadcast::Sender<PlatformEvent>,
}

impl std::fmt::Debug for EventRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRouter")
            .field("config", &self.config)
            .field("listeners", &self.len())
            .finish()
    }
}

impl EventRouter {
    /// Create a router over a platform.
    pub fn new(platform: Arc<dyn ChatPlatform>, config: ReactiveConfig) -> Arc<Self> {
        let (permission_events, _) = broadcast::channel(PERMISSION_EVENT_CAPACITY);
        Arc::new(Self {
            platform,
            config,
            listeners: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
            permission_events,
        })
    }

    /// Platform shared by every instance.
    pub fn platform(&self) -> &Arc<dyn ChatPlatform> {
        &self.platform
    }

    /// Configuration shared by every instance.
    pub fn config(&self) -> &ReactiveConfig {
        &self.config
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    /// Whether no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.read().is_empty()
    }

    pub(crate) fn allocate_id(&self) -> ListenerId {
        ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    pub(crate) fn permission_sender(&self) -> broadcast::Sender<PlatformEvent> {
        self.permission_events.clone()
    }

    /// Add a listener.
    pub fn register(&self, listener: Arc<dyn ReactiveListener>) {
        debug!(listener = %listener.listener_id(), "Registering listener");
        self.listeners.write().push(listener);
    }

    /// Remove a listener; returns whether it was registered.
    pub fn deregister(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|l| l.listener_id() != id);
        let removed = listeners.len() != before;
        debug!(listener = %id, removed, "Deregistering listener");
        removed
    }

    /// Create, register and send a reactive message.
    ///
    /// # Errors
    ///
    /// Returns the first send's error; the instance is removed again in that
    /// case.
    #[instrument(skip(self, view), fields(channel = %channel))]
    pub async fn instantiate<V: ReactiveView>(
        self: &Arc<Self>,
        view: V,
        channel: ChannelRef,
    ) -> QuillResult<Arc<ReactiveMessage<V>>> {
        let message = ReactiveMessage::new(self, view, channel);
        if let Err(e) = message.send().await {
            message.remove();
            return Err(e);
        }
        Ok(message)
    }

    /// Forward an event to every live instance.
    ///
    /// Instances handle the event concurrently; each one serializes on its own
    /// lock. Instances that do not [`want`](ReactiveListener::wants) the event
    /// are skipped, so one waiting on its lock only holds up events it would
    /// actually handle. Handler errors are logged and do not affect other
    /// instances.
    #[instrument(skip(self, event))]
    pub async fn dispatch(&self, event: PlatformEvent) {
        if event.is_permission_change() {
            if self.permission_events.send(event).is_err() {
                trace!("No instance is waiting for permissions");
            }
            return;
        }

        let snapshot: Vec<Arc<dyn ReactiveListener>> = self
            .listeners
            .read()
            .iter()
            .filter(|l| l.wants(&event))
            .cloned()
            .collect();
        if snapshot.is_empty() {
            trace!("No instance wants the event");
            return;
        }
        let results = join_all(snapshot.iter().map(|l| l.handle_event(&event))).await;

        for (listener, result) in snapshot.iter().zip(results) {
            if let Err(e) = result {
                error!(listener = %listener.listener_id(), error = %e, "Reactive message failed to handle event");
            }
        }
    }
}
