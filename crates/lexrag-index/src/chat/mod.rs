//! Chat-completion providers used to answer questions over retrieved passages
//! and to draft evaluation datasets.

#[cfg(any(test, feature = "mock"))]
mod mock;
mod ollama;
mod openai;

use std::future::Future;
use std::pin::Pin;

#[cfg(any(test, feature = "mock"))]
pub use mock::MockChat;
pub use ollama::OllamaChat;
pub use openai::OpenAiChat;
use serde::{Deserialize, Serialize};

use crate::error::ChatError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

pub type ChatFuture<'a> = Pin<Box<dyn Future<Output = Result<String, ChatError>> + Send + 'a>>;

pub trait ChatProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Sends `messages` and returns the assistant reply.
    fn chat<'a>(&'a self, messages: &'a [Message]) -> ChatFuture<'a>;
}
