//! The completion service seam.
//!
//! The orchestrator never talks to a model API directly. It builds a
//! [`CompletionRequest`] per chunk and hands it to an injected
//! [`CompletionService`]. Transport, authentication, retries and rate
//! limiting all belong to the implementation.

use crate::BoxError;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Role {
    /// Instructions for the model.
    System,
    /// Content to act on.
    User,
    /// A model reply.
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        })
    }
}

/// One chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    /// Who wrote it.
    pub role: Role,
    /// The text.
    pub content: String,
}

impl Message {
    /// A system message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// A user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A request for one chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompletionRequest {
    /// Model to use; `None` leaves the choice to the service.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub model: Option<String>,
    /// Messages in conversation order.
    pub messages: Vec<Message>,
}

/// Produces a completion for a sequence of messages.
///
/// Implemented for any `Fn(&CompletionRequest) -> Result<String, BoxError>`:
///
/// ```rust
/// use condense::{BoxError, CompletionRequest, CompletionService, Message};
///
/// let echo = |req: &CompletionRequest| -> Result<String, BoxError> {
///     Ok(req.messages.last().map(|m| m.content.clone()).unwrap_or_default())
/// };
///
/// let request = CompletionRequest { model: None, messages: vec![Message::user("hi")] };
/// assert_eq!(echo.complete(&request).unwrap(), "hi");
/// ```
pub trait CompletionService: Send + Sync {
    /// Return the model's reply text.
    ///
    /// # Errors
    ///
    /// Any transport, rate-limit or decoding failure. The orchestrator
    /// reports it with the failing chunk's index and does not retry.
    fn complete(&self, request: &CompletionRequest) -> Result<String, BoxError>;
}

impl<F> CompletionService for F
where
    F: Fn(&CompletionRequest) -> Result<String, BoxError> + Send + Sync,
{
    fn complete(&self, request: &CompletionRequest) -> Result<String, BoxError> {
        self(request)
    }
}
