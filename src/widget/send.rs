//! Send flow state machine.
//!
//! A send cycle is split into phases so a host can release the widget while
//! the backend call is outstanding:
//!
//! 1. [`ChatWidget::begin_send`](super::ChatWidget::begin_send) renders the
//!    user message, clears the input, shows a typing indicator and parks a
//!    [`PendingSend`] under the indicator's ticket.
//! 2. [`PendingSend::dispatch`] performs the backend call without borrowing
//!    the widget.
//! 3. [`ChatWidget::finish_send`](super::ChatWidget::finish_send) removes the
//!    indicator and only then appends the answer or the error bubble.

use std::collections::HashMap;
use std::sync::Arc;

use crate::backend::{ChatBackend, ChatReply, SendMessageForm};
use crate::error::Result;

use super::log::{MessageId, TypingId};

/// Bubble shown when a send cycle fails.
pub const SEND_ERROR_MESSAGE: &str = "Sorry, I encountered an error. Please try again.";

/// Send flow state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SendState {
    /// No request outstanding.
    #[default]
    Idle,
    /// At least one request outstanding.
    Sending,
    /// The last cycle ended in an error bubble.
    ErrorDisplayed,
}

/// A send cycle waiting for its backend call.
#[derive(Debug)]
pub struct PendingSend {
    ticket: TypingId,
    form: SendMessageForm,
    backend: Arc<dyn ChatBackend>,
}

impl PendingSend {
    pub(crate) fn new(ticket: TypingId, form: SendMessageForm, backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            ticket,
            form,
            backend,
        }
    }

    /// Post the message to the backend.
    pub async fn dispatch(self) -> PendingReply {
        tracing::debug!(
            name: "send.dispatch",
            session_id = %self.form.session_id,
            ticket = %self.ticket,
            "Posting message to backend"
        );
        let result = self.backend.send_message(&self.form).await;
        PendingReply {
            ticket: self.ticket,
            result,
        }
    }
}

/// Settled backend call of a send cycle.
#[derive(Debug)]
pub struct PendingReply {
    pub(crate) ticket: TypingId,
    pub(crate) result: Result<ChatReply>,
}

/// Final result of a send cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The answer was rendered.
    Answered(MessageId),
    /// The generic error bubble was rendered.
    Failed(MessageId),
}

/// Bookkeeping for parked and in-flight send cycles.
#[derive(Debug, Default)]
pub struct SendFlow {
    parked: HashMap<TypingId, PendingSend>,
    outstanding: usize,
    last_failed: bool,
}

impl SendFlow {
    pub(crate) fn park(&mut self, pending: PendingSend) {
        self.outstanding += 1;
        self.last_failed = false;
        self.parked.insert(pending.ticket, pending);
    }

    pub(crate) fn take(&mut self, ticket: TypingId) -> Option<PendingSend> {
        self.parked.remove(&ticket)
    }

    pub(crate) fn settle(&mut self, failed: bool) {
        self.outstanding = self.outstanding.saturating_sub(1);
        self.last_failed = failed;
    }

    /// Tickets parked but not yet dispatched, oldest first.
    #[must_use]
    pub fn parked(&self) -> Vec<TypingId> {
        let mut tickets: Vec<TypingId> = self.parked.keys().copied().collect();
        tickets.sort_unstable();
        tickets
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> SendState {
        if self.outstanding > 0 {
            SendState::Sending
        } else if self.last_failed {
            SendState::ErrorDisplayed
        } else {
            SendState::Idle
        }
    }
}
