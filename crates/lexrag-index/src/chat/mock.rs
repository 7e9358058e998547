//! Scripted chat provider for tests and offline runs.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::{ChatFuture, ChatProvider, Message};
use crate::error::ChatError;

/// Replies with queued responses in order, then with `default_response`.
/// Every request is recorded.
#[derive(Debug, Clone)]
pub struct MockChat {
    responses: Arc<Mutex<VecDeque<String>>>,
    requests: Arc<Mutex<Vec<Vec<Message>>>>,
    pub default_response: String,
    pub fail: bool,
}

impl Default for MockChat {
    fn default() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            default_response: "mock response".into(),
            fail: false,
        }
    }
}

impl MockChat {
    #[must_use]
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Message lists received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    fn reply(&self, messages: &[Message]) -> Result<String, ChatError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(messages.to_vec());
        }
        if self.fail {
            return Err(ChatError::Other("mock chat error".into()));
        }
        let queued = self
            .responses
            .lock()
            .ok()
            .and_then(|mut responses| responses.pop_front());
        Ok(queued.unwrap_or_else(|| self.default_response.clone()))
    }
}

impl ChatProvider for MockChat {
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "mock"
    }

    fn chat<'a>(&'a self, messages: &'a [Message]) -> ChatFuture<'a> {
        Box::pin(async move { self.reply(messages) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn queued_then_default() {
        let chat = MockChat::with_responses(vec!["uno".into()]);
        let messages = [Message::user("hola")];
        assert_eq!(chat.chat(&messages).await.unwrap(), "uno");
        assert_eq!(chat.chat(&messages).await.unwrap(), "mock response");
        assert_eq!(chat.requests().len(), 2);
    }

    #[tokio::test]
    async fn failing_errors() {
        assert!(MockChat::failing().chat(&[]).await.is_err());
    }
}
