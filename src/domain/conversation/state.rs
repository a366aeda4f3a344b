//! Interview state machine.
//!
//! Defines the states an interview turn moves through and the valid
//! transitions between them.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Where the interview currently stands.
///
/// - `AwaitingUser`: turn boundary, waiting for the next human message
/// - `NeedsExtraction`: new human input must be mined for facts
/// - `NeedsRouteDecision`: an action finished, inspect the log again
/// - `ExtractCase` / `ExtractUser`: process proposals of that kind
/// - `AskNextQuestion`: generate the next question
/// - `Terminated`: absorbing end state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InterviewState {
    #[default]
    AwaitingUser,
    NeedsExtraction,
    NeedsRouteDecision,
    ExtractCase,
    ExtractUser,
    AskNextQuestion,
    Terminated,
}

impl InterviewState {
    /// True for states that end a turn.
    pub fn ends_turn(&self) -> bool {
        matches!(self, Self::AwaitingUser | Self::Terminated)
    }

    /// True for states that write extracted facts.
    pub fn is_extraction(&self) -> bool {
        matches!(
            self,
            Self::NeedsExtraction | Self::ExtractCase | Self::ExtractUser
        )
    }
}

impl StateMachine for InterviewState {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use InterviewState::*;
        match self {
            AwaitingUser => vec![NeedsExtraction, Terminated],
            NeedsExtraction => vec![NeedsRouteDecision],
            NeedsRouteDecision => vec![
                ExtractCase,
                ExtractUser,
                AskNextQuestion,
                AwaitingUser,
                Terminated,
            ],
            ExtractCase | ExtractUser => vec![NeedsRouteDecision],
            AskNextQuestion => vec![NeedsRouteDecision],
            Terminated => vec![],
        }
    }
}
