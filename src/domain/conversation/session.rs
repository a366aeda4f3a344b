//! Per-conversation session state.
//!
//! Ephemeral: the message log plus the stored documents are enough to
//! rebuild a session with [`SessionState::resume`].

use crate::domain::foundation::{StateMachine, TransitionError, UserId};

use super::{ConversationMessage, InterviewState, Router};

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    user_id: UserId,
    messages: Vec<ConversationMessage>,
    state: InterviewState,
    terminated: bool,
}

impl SessionState {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            messages: Vec::new(),
            state: InterviewState::AwaitingUser,
            terminated: false,
        }
    }

    /// Rebuilds a session from a replayed log.
    ///
    /// A log containing a termination request is terminated. A log ending
    /// mid-turn resumes at the route decision so the turn can be re-run.
    pub fn resume(user_id: UserId, messages: Vec<ConversationMessage>, router: &Router) -> Self {
        let terminated = messages.iter().any(|m| match m {
            ConversationMessage::Human { text, .. } => router.is_termination(text),
            _ => false,
        });

        let state = if terminated {
            InterviewState::Terminated
        } else {
            match messages.last() {
                None | Some(ConversationMessage::AssistantText { .. }) => {
                    InterviewState::AwaitingUser
                }
                Some(_) => InterviewState::NeedsRouteDecision,
            }
        };

        Self {
            user_id,
            messages,
            state,
            terminated,
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    pub fn last_message(&self) -> Option<&ConversationMessage> {
        self.messages.last()
    }

    pub fn state(&self) -> InterviewState {
        self.state
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn append(&mut self, message: ConversationMessage) {
        self.messages.push(message);
    }

    /// Moves to `target`, enforcing the transition table.
    pub fn transition(&mut self, target: InterviewState) -> Result<(), TransitionError> {
        self.state = self.state.transition_to(target)?;
        if self.state == InterviewState::Terminated {
            self.terminated = true;
        }
        Ok(())
    }

    /// Sets the state directly, bypassing the table.
    ///
    /// Used when a turn is restarted after a failure left it mid-way.
    pub(crate) fn reset_to(&mut self, state: InterviewState) {
        self.state = state;
    }

    /// Messages handed to extraction: the whole log, minus a trailing
    /// proposal that is itself awaiting processing.
    pub fn extraction_window(&self) -> &[ConversationMessage] {
        match self.messages.split_last() {
            Some((last, rest)) if last.is_proposal() => rest,
            _ => &self.messages,
        }
    }
}
