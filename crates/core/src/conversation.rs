//! Conversation-related types.

use std::fmt::{self, Display};

use little_react_model::{ModelMessage, ModelRequest};
use serde::Serialize;
use thiserror::Error;

/// The author of a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The protocol instructions.
    System,
    /// Input fed to the model: the query or an observation.
    User,
    /// Output of the model.
    Assistant,
}

impl Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single turn in the transcript.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Turn {
    role: Role,
    content: String,
}

impl Turn {
    /// Returns the author of this turn.
    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the text of this turn.
    #[inline]
    pub fn content(&self) -> &str {
        &self.content
    }

    fn to_message(&self) -> ModelMessage {
        match self.role {
            Role::System => ModelMessage::System(self.content.clone()),
            Role::User => ModelMessage::User(self.content.clone()),
            Role::Assistant => ModelMessage::Assistant(self.content.clone()),
        }
    }
}

/// Rejected transcript mutation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{attempted} turn cannot follow {after}")]
pub struct TranscriptError {
    attempted: Role,
    after: String,
}

/// The ordered record of turns exchanged with the model.
///
/// There is at most one system turn, and it always comes first. The turns
/// after it strictly alternate between user and assistant, starting with a
/// user turn.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// Creates a transcript, optionally led by a system turn.
    pub fn new(system: Option<String>) -> Self {
        let turns = system
            .map(|content| {
                vec![Turn {
                    role: Role::System,
                    content,
                }]
            })
            .unwrap_or_default();
        Self { turns }
    }

    /// Returns all turns in order.
    #[inline]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Returns the number of turns, including the system turn.
    #[inline]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Returns `true` if there are no turns at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Returns the latest turn.
    #[inline]
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Appends a user turn.
    pub fn push_user<S: Into<String>>(
        &mut self,
        content: S,
    ) -> Result<(), TranscriptError> {
        self.push(Role::User, content.into())
    }

    /// Appends an assistant turn.
    pub fn push_assistant<S: Into<String>>(
        &mut self,
        content: S,
    ) -> Result<(), TranscriptError> {
        self.push(Role::Assistant, content.into())
    }

    /// Checks the ordering invariant over the whole transcript.
    pub fn is_well_formed(&self) -> bool {
        let mut expected = Role::User;
        for (idx, turn) in self.turns.iter().enumerate() {
            if turn.role == Role::System {
                if idx != 0 {
                    return false;
                }
                continue;
            }
            if turn.role != expected {
                return false;
            }
            expected = match expected {
                Role::User => Role::Assistant,
                _ => Role::User,
            };
        }
        true
    }

    /// Builds a model request carrying every turn.
    pub fn to_request(&self) -> ModelRequest {
        ModelRequest {
            messages: self.turns.iter().map(Turn::to_message).collect(),
        }
    }

    /// Drops the trailing user turn left behind by a failed invocation.
    pub(crate) fn pop_pending_user(&mut self) -> Option<Turn> {
        match self.turns.last() {
            Some(turn) if turn.role == Role::User => self.turns.pop(),
            _ => None,
        }
    }

    fn expected_next(&self) -> Role {
        match self.turns.last().map(Turn::role) {
            None | Some(Role::System) | Some(Role::Assistant) => Role::User,
            Some(Role::User) => Role::Assistant,
        }
    }

    fn push(
        &mut self,
        role: Role,
        content: String,
    ) -> Result<(), TranscriptError> {
        if role != self.expected_next() {
            let after = match self.turns.last() {
                Some(turn) => format!("a {} turn", turn.role),
                None => "the start of the transcript".to_owned(),
            };
            return Err(TranscriptError {
                attempted: role,
                after,
            });
        }
        self.turns.push(Turn { role, content });
        Ok(())
    }
}
