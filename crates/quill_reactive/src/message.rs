//! The reactive message state machine.

use crate::router::{EventRouter, ListenerId, ReactiveListener};
use crate::{ReactiveConfig, ReactiveView, Termination, ViewControl};
use async_trait::async_trait;
use quill_core::{
    PermissionFlag, ReactionOp, ReactionToken, RenderPayload, degraded_payload, diff,
    plan_additive, plan_reaction_patch, plan_reaction_sync, required_permissions,
};
use quill_error::{PlatformResult, QuillResult, ReactiveError, ReactiveErrorKind};
use quill_interface::{ChannelRef, ChatPlatform, MessageId, PlatformEvent};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::{Mutex, broadcast, watch};
use tracing::{debug, info, instrument, warn};

/// State guarded by the instance lock.
struct MessageState<V> {
    view: V,
    bound_message: Option<MessageId>,
    /// Verified to match what the platform shows; the diff baseline.
    displayed: Option<RenderPayload>,
    /// Last render, shown once permissions allow.
    intended: Option<RenderPayload>,
    pending_dirty: bool,
    functional: bool,
}

/// How the permission gate ended.
enum GateOutcome {
    Applied,
    Degraded,
    TimedOut,
    Terminated,
}

/// Lowers the gate flag when the wait ends, however it ends.
struct GateFlag<'a>(&'a AtomicBool);

impl<'a> GateFlag<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        Self(flag)
    }
}

impl Drop for GateFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// One live interactive message.
///
/// Every settle cycle and every event handled for this instance holds its
/// lock, so at most one render or update is in flight per message. Different
/// instances proceed independently.
///
/// Lifecycle: created running with no bound message, [`send`](Self::send)
/// binds one, any number of settle cycles follow, and [`remove`](Self::remove)
/// or [`delete`](Self::delete) end it for good.
pub struct ReactiveMessage<V: ReactiveView> {
    id: ListenerId,
    channel: ChannelRef,
    platform: Arc<dyn ChatPlatform>,
    config: ReactiveConfig,
    router: Weak<EventRouter>,
    permission_events: broadcast::Sender<PlatformEvent>,
    running: watch::Sender<bool>,
    /// Set while the permission gate waits with the lock held.
    gated: AtomicBool,
    state: Mutex<MessageState<V>>,
}

impl<V: ReactiveView> std::fmt::Debug for ReactiveMessage<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReactiveMessage")
            .field("id", &self.id)
            .field("channel", &self.channel)
            .field("running", &self.is_running())
            .finish()
    }
}

impl<V: ReactiveView> ReactiveMessage<V> {
    /// Create an instance bound to `channel` and register it with `router`.
    ///
    /// Nothing is posted until [`send`](Self::send).
    pub fn new(router: &Arc<EventRouter>, view: V, channel: ChannelRef) -> Arc<Self> {
        let (running, _) = watch::channel(true);
        let message = Arc::new(Self {
            id: router.allocate_id(),
            channel,
            platform: Arc::clone(router.platform()),
            config: router.config().clone(),
            router: Arc::downgrade(router),
            permission_events: router.permission_sender(),
            running,
            gated: AtomicBool::new(false),
            state: Mutex::new(MessageState {
                view,
                bound_message: None,
                displayed: None,
                intended: None,
                pending_dirty: false,
                functional: false,
            }),
        });
        router.register(Arc::clone(&message) as Arc<dyn ReactiveListener>);
        message
    }

    /// Channel the message lives in.
    pub fn channel(&self) -> &ChannelRef {
        &self.channel
    }

    /// Registry key of this instance.
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Whether the instance still reacts to events.
    pub fn is_running(&self) -> bool {
        *self.running.borrow()
    }

    /// The live message, if one is bound.
    pub async fn bound_message(&self) -> Option<MessageId> {
        self.state.lock().await.bound_message
    }

    /// Payload the platform is verified to show.
    pub async fn displayed(&self) -> Option<RenderPayload> {
        self.state.lock().await.displayed.clone()
    }

    /// Whether the real payload (rather than the degraded one) is shown.
    pub async fn is_functional(&self) -> bool {
        self.state.lock().await.functional
    }

    /// Render and post the message.
    ///
    /// Sending again replaces the bound message: the new one is posted first
    /// and the old one deleted afterwards.
    ///
    /// # Errors
    ///
    /// Fails when the instance was terminated, when the view's render fails,
    /// when the payload has neither content nor embed, or on a platform error
    /// the gate cannot recover from.
    #[instrument(skip(self), fields(listener = %self.id, channel = %self.channel))]
    pub async fn send(&self) -> QuillResult<()> {
        let mut state = self.state.lock().await;
        if !self.is_running() {
            return Err(ReactiveError::new(ReactiveErrorKind::Terminated).into());
        }
        state.pending_dirty = false;
        let target = state.view.render().await?;
        self.fulfill(&mut state, target, true).await
    }

    /// Settle point: re-render if something marked the view dirty.
    ///
    /// A no-op when nothing changed since the last settle.
    pub async fn check_update(&self) -> QuillResult<()> {
        let mut state = self.state.lock().await;
        self.settle(&mut state).await
    }

    /// Mutate the view from outside an event, then settle once.
    ///
    /// # Errors
    ///
    /// Propagates render and platform errors of the settle cycle.
    pub async fn mutate<F, R>(&self, f: F) -> QuillResult<R>
    where
        F: FnOnce(&mut V, &mut ViewControl) -> R + Send,
        R: Send,
    {
        let mut state = self.state.lock().await;
        let mut ctl = self.control();
        let out = f(&mut state.view, &mut ctl);
        self.apply_control(&mut state, ctl).await?;
        Ok(out)
    }

    /// Stop handling events, leaving the message in place.
    ///
    /// Idempotent: only the first call deregisters.
    pub fn remove(&self) {
        if self.stop() {
            info!(listener = %self.id, "Reactive message removed");
        }
    }

    /// Stop handling events and delete the bound message.
    ///
    /// A message that is already gone counts as deleted. Does nothing when the
    /// instance was already removed.
    ///
    /// # Errors
    ///
    /// Propagates platform errors other than not-found.
    pub async fn delete(&self) -> QuillResult<()> {
        if !self.stop() {
            return Ok(());
        }
        let mut state = self.state.lock().await;
        self.delete_bound(&mut state).await
    }

    fn control(&self) -> ViewControl {
        ViewControl::new(self.channel, self.platform.bot_user())
    }

    /// Flip the running flag and deregister. True for the call that did it.
    fn stop(&self) -> bool {
        let stopped = self
            .running
            .send_if_modified(|running| std::mem::replace(running, false));
        if stopped && let Some(router) = self.router.upgrade() {
            router.deregister(self.id);
        }
        stopped
    }

    async fn delete_bound(&self, state: &mut MessageState<V>) -> QuillResult<()> {
        let Some(message) = state.bound_message.take() else {
            return Ok(());
        };
        match self.platform.delete_message(&self.channel, message).await {
            Ok(()) => {
                info!(listener = %self.id, message = %message, "Reactive message deleted");
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                debug!(message = %message, "Message already gone");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn terminate(&self, state: &mut MessageState<V>, how: Termination) -> QuillResult<()> {
        match how {
            Termination::Remove => {
                self.remove();
                Ok(())
            }
            Termination::Delete => {
                if self.stop() {
                    self.delete_bound(state).await?;
                }
                Ok(())
            }
        }
    }

    async fn apply_control(&self, state: &mut MessageState<V>, ctl: ViewControl) -> QuillResult<()> {
        if let Some(how) = ctl.termination() {
            return self.terminate(state, how).await;
        }
        if ctl.is_dirty() {
            state.pending_dirty = true;
        }
        if ctl.wants_resend() {
            self.resend(state).await?;
        }
        self.settle(state).await
    }

    #[instrument(skip(self, state), fields(listener = %self.id))]
    async fn resend(&self, state: &mut MessageState<V>) -> QuillResult<()> {
        if !self.is_running() {
            return Ok(());
        }
        let target = match state.intended.clone() {
            Some(intended) if !state.pending_dirty => intended,
            _ => {
                state.pending_dirty = false;
                state.view.render().await?
            }
        };
        info!("Re-sending reactive message");
        self.fulfill(state, target, true).await
    }

    #[instrument(skip(self, state), fields(listener = %self.id))]
    async fn settle(&self, state: &mut MessageState<V>) -> QuillResult<()> {
        if !self.is_running() || !state.pending_dirty {
            return Ok(());
        }
        state.pending_dirty = false;

        let target = state.view.render().await?;
        let changes = diff(state.displayed.as_ref(), &target);
        if changes.is_empty() {
            debug!("Render unchanged");
            state.intended = Some(target);
            return Ok(());
        }
        debug!(?changes, "Render changed");
        self.fulfill(state, target, false).await
    }

    /// Permission gate: apply `target` once the required permissions are
    /// present, showing the degraded payload and waiting for a permission
    /// change in between. Deletes the message when the wait times out.
    #[instrument(skip(self, state, target), fields(listener = %self.id))]
    async fn fulfill(
        &self,
        state: &mut MessageState<V>,
        target: RenderPayload,
        mut creation: bool,
    ) -> QuillResult<()> {
        state.intended = Some(target.clone());

        loop {
            match self.gate_pass(state, &target, creation).await? {
                GateOutcome::Applied | GateOutcome::Terminated => return Ok(()),
                GateOutcome::TimedOut => {
                    warn!("Permissions were not restored in time, deleting message");
                    return self.terminate(state, Termination::Delete).await;
                }
                GateOutcome::Degraded => creation = false,
            }
        }
    }

    async fn gate_pass(
        &self,
        state: &mut MessageState<V>,
        target: &RenderPayload,
        creation: bool,
    ) -> QuillResult<GateOutcome> {
        // subscribe before checking so no change slips between check and wait
        let mut events = self.permission_events.subscribe();
        let mut stopped = self.running.subscribe();

        let baseline = if creation { None } else { state.displayed.as_ref() };
        let required = required_permissions(
            &diff(baseline, target),
            *self.config.enforce_reaction_positions(),
        );
        let available = self.platform.effective_permissions(&self.channel).await?;
        let missing = required.missing_from(&available);

        if missing.is_empty() {
            state.functional = true;
            self.apply(state, target, creation).await?;
            return Ok(GateOutcome::Applied);
        }

        warn!(?missing, "Missing permissions, showing degraded message");
        state.functional = false;
        self.apply(state, &degraded_payload(&missing), creation).await?;
        if !self.is_running() {
            return Ok(GateOutcome::Terminated);
        }

        let _waiting = GateFlag::raise(&self.gated);
        let timeout = tokio::time::sleep(self.config.permission_wait());
        tokio::pin!(timeout);
        loop {
            tokio::select! {
                _ = &mut timeout => return Ok(GateOutcome::TimedOut),
                _ = stopped.changed() => return Ok(GateOutcome::Terminated),
                event = events.recv() => match event {
                    Ok(event) if event.affects_permissions(&self.channel, self.platform.bot_user()) => {
                        debug!(?event, "Permission change observed");
                        return Ok(GateOutcome::Degraded);
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "Permission events lagged, re-checking");
                        return Ok(GateOutcome::Degraded);
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        return Ok(GateOutcome::TimedOut);
                    }
                },
            }
        }
    }

    async fn apply(
        &self,
        state: &mut MessageState<V>,
        payload: &RenderPayload,
        creation: bool,
    ) -> QuillResult<()> {
        if creation || state.bound_message.is_none() {
            self.send_payload(state, payload).await
        } else {
            self.update_payload(state, payload).await
        }
    }

    /// Post `payload` as a new message, replacing any bound one.
    async fn send_payload(&self, state: &mut MessageState<V>, payload: &RenderPayload) -> QuillResult<()> {
        if !payload.is_creatable() {
            return Err(ReactiveError::new(ReactiveErrorKind::InvalidPayload).into());
        }

        let previous = state.bound_message;
        let message = self
            .platform
            .create_message(&self.channel, payload.content(), payload.embed())
            .await?;
        state.bound_message = Some(message);
        state.displayed = Some(payload.clone());
        info!(listener = %self.id, message = %message, "Reactive message sent");

        if let Some(old) = previous {
            match self.platform.delete_message(&self.channel, old).await {
                Ok(()) => debug!(message = %old, "Replaced message deleted"),
                Err(e) if e.is_not_found() => debug!(message = %old, "Replaced message already gone"),
                Err(e) if e.is_forbidden() => warn!(message = %old, error = %e, "Cannot delete replaced message"),
                Err(e) => return Err(e.into()),
            }
        }

        for emoji in payload.reactions() {
            match self.platform.add_reaction(&self.channel, message, emoji).await {
                Ok(()) => {}
                Err(e) if e.is_forbidden() => {
                    warn!(error = %e, "Adding reactions forbidden, resyncing");
                    let live = self.live_reactions(message).await?;
                    if let Some(displayed) = state.displayed.as_mut() {
                        displayed.set_reactions(live);
                    }
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Edit the bound message towards `payload`.
    async fn update_payload(&self, state: &mut MessageState<V>, payload: &RenderPayload) -> QuillResult<()> {
        let Some(message) = state.bound_message else {
            return self.send_payload(state, payload).await;
        };

        match self.edit_and_sync(message, state.displayed.as_ref(), payload).await {
            Ok(shown) => {
                state.displayed = Some(shown);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                info!(listener = %self.id, message = %message, "Bound message is gone, removing");
                state.bound_message = None;
                self.remove();
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Apply body edits and converge reactions; returns what is now shown.
    async fn edit_and_sync(
        &self,
        message: MessageId,
        displayed: Option<&RenderPayload>,
        payload: &RenderPayload,
    ) -> PlatformResult<RenderPayload> {
        let changes = diff(displayed, payload);
        let mut shown = payload.clone();

        if let Some(edit) = changes.message_edit() {
            self.platform.edit_message(&self.channel, message, &edit).await?;
        }

        if let Some(desired) = changes.reactions() {
            if !*self.config.enforce_reaction_positions()
                && !changes.reaction_group_changed()
                && let Some(previous) = displayed
                && same_reactions(previous.reactions(), desired)
            {
                shown.set_reactions(previous.reactions().to_vec());
                return Ok(shown);
            }

            let resync = match self
                .sync_reactions(message, desired, changes.reaction_group_changed())
                .await
            {
                Ok(complete) => !complete,
                Err(e) if e.is_forbidden() => true,
                Err(e) => return Err(e),
            };
            if resync {
                debug!(message = %message, "Reaction row unverified, adopting live reactions");
                shown.set_reactions(self.live_reactions(message).await?);
            }
        }

        Ok(shown)
    }

    /// Reaction synchronizer. Returns false when the live row may differ
    /// from `desired`: an operation was skipped for lack of permission, or
    /// positions are not enforced and something was added.
    #[instrument(skip(self, desired), fields(message = %message))]
    async fn sync_reactions(
        &self,
        message: MessageId,
        desired: &[ReactionToken],
        rebuild: bool,
    ) -> PlatformResult<bool> {
        let available = self.platform.effective_permissions(&self.channel).await?;
        let can_add = available.contains(PermissionFlag::AddReactions);
        let can_manage = available.contains(PermissionFlag::ManageMessages);
        let live = self.platform.fetch_reactions(&self.channel, message).await?;
        let mut complete = true;

        let plan = if rebuild {
            if can_manage {
                self.platform.clear_reactions(&self.channel, message).await?;
                plan_additive(&[], desired)
            } else {
                complete = false;
                plan_additive(&live, desired)
            }
        } else if *self.config.enforce_reaction_positions() {
            plan_reaction_sync(&live, desired)
        } else {
            let plan = plan_reaction_patch(&live, desired);
            // additions land at the end of the row
            if plan.adds() {
                complete = false;
            }
            plan
        };
        debug!(?plan, "Reaction plan");

        for op in plan {
            match op {
                ReactionOp::Add(emoji) if can_add => {
                    self.platform.add_reaction(&self.channel, message, &emoji).await?;
                }
                ReactionOp::Clear(emoji) if can_manage => {
                    self.platform.clear_reaction(&self.channel, message, &emoji).await?;
                }
                skipped => {
                    debug!(?skipped, "Reaction operation not permitted");
                    complete = false;
                }
            }
        }

        Ok(complete)
    }

    async fn live_reactions(&self, message: MessageId) -> PlatformResult<Vec<ReactionToken>> {
        let live = self.platform.fetch_reactions(&self.channel, message).await?;
        Ok(live.into_iter().map(|r| r.token).collect())
    }
}

/// Same entries, any order.
fn same_reactions(a: &[ReactionToken], b: &[ReactionToken]) -> bool {
    a.len() == b.len() && a.iter().all(|token| b.contains(token))
}

#[async_trait]
impl<V: ReactiveView> ReactiveListener for ReactiveMessage<V> {
    fn listener_id(&self) -> ListenerId {
        self.id
    }

    fn wants(&self, event: &PlatformEvent) -> bool {
        if !self.is_running() || event.actor() == Some(self.platform.bot_user()) {
            return false;
        }
        if event.channel().is_some_and(|channel| channel.id != self.channel.id) {
            return false;
        }
        // the degraded message takes no input
        let input = matches!(
            event,
            PlatformEvent::MessageReceived(_) | PlatformEvent::ReactionAdded(_)
        );
        !(input && self.gated.load(Ordering::Acquire))
    }

    async fn handle_event(&self, event: &PlatformEvent) -> QuillResult<()> {
        if !self.wants(event) {
            return Ok(());
        }

        let mut state = self.state.lock().await;
        if !self.is_running() {
            return Ok(());
        }

        match event {
            PlatformEvent::MessageDeleted { .. } | PlatformEvent::MessagesBulkDeleted { .. } => {
                if let Some(bound) = state.bound_message
                    && event.deletes(bound)
                {
                    info!(listener = %self.id, message = %bound, "Bound message deleted externally");
                    state.bound_message = None;
                    self.remove();
                }
                Ok(())
            }
            PlatformEvent::MessageReceived(incoming)
                if incoming.channel.id == self.channel.id && state.functional =>
            {
                let mut ctl = self.control();
                state.view.on_message(incoming, &mut ctl).await?;
                self.apply_control(&mut state, ctl).await
            }
            PlatformEvent::ReactionAdded(reaction)
                if state.bound_message == Some(reaction.message) && state.functional =>
            {
                let mut ctl = self.control();
                state.view.on_reaction_add(reaction, &mut ctl).await?;
                self.apply_control(&mut state, ctl).await
            }
            _ => Ok(()),
        }
    }
}
