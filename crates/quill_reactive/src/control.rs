//! Handle a view uses to talk back to its reactive message.

use quill_interface::{ChannelRef, UserId};

/// How a view asked its message to end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Stop reacting to events, leave the message as it is
    Remove,
    /// Stop reacting to events and delete the message
    Delete,
}

/// Requests collected while a view handles an event.
///
/// The owning [`ReactiveMessage`](crate::ReactiveMessage) applies them once
/// the handler returns, so any number of mutations inside one handler turn
/// into at most one render.
#[derive(Debug)]
pub struct ViewControl {
    channel: ChannelRef,
    bot: UserId,
    dirty: bool,
    resend: bool,
    termination: Option<Termination>,
}

impl ViewControl {
    pub(crate) fn new(channel: ChannelRef, bot: UserId) -> Self {
        Self {
            channel,
            bot,
            dirty: false,
            resend: false,
            termination: None,
        }
    }

    /// Channel the message lives in.
    pub fn channel(&self) -> &ChannelRef {
        &self.channel
    }

    /// The bot's own user.
    pub fn bot_user(&self) -> UserId {
        self.bot
    }

    /// Ask for a re-render at the next settle point.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Store `value` in `slot`, marking dirty when it changed.
    ///
    /// Returns whether the value changed.
    ///
    /// ```
    /// # use quill_reactive::ViewControl;
    /// fn toggle(ctl: &mut ViewControl, shown: &mut bool) {
    ///     let next = !*shown;
    ///     ctl.update(shown, next);
    /// }
    /// ```
    pub fn update<T: PartialEq>(&mut self, slot: &mut T, value: T) -> bool {
        if *slot == value {
            return false;
        }
        *slot = value;
        self.dirty = true;
        true
    }

    /// Re-send the message as a new one at the bottom of the channel.
    pub fn request_resend(&mut self) {
        self.resend = true;
    }

    /// End the message, leaving it in place.
    pub fn remove(&mut self) {
        self.termination = Some(Termination::Remove);
    }

    /// End the message and delete it.
    pub fn delete(&mut self) {
        self.termination = Some(Termination::Delete);
    }

    /// Whether a re-render was requested.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn wants_resend(&self) -> bool {
        self.resend
    }

    pub(crate) fn termination(&self) -> Option<Termination> {
        self.termination
    }
}
