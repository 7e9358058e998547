use ollama_rs::Ollama;
use ollama_rs::generation::chat::ChatMessage;
use ollama_rs::generation::chat::request::ChatMessageRequest;

use super::{ChatFuture, ChatProvider, Message, Role};
use crate::error::ChatError;

#[derive(Debug, Clone)]
pub struct OllamaChat {
    client: Ollama,
    model: String,
}

impl OllamaChat {
    /// # Errors
    ///
    /// Returns [`ChatError::Other`] if `base_url` is not a valid URL.
    pub fn new(base_url: &str, model: String) -> Result<Self, ChatError> {
        let client = crate::http::ollama_client(base_url).map_err(ChatError::Other)?;
        Ok(Self { client, model })
    }

    async fn request(&self, messages: &[Message]) -> Result<String, ChatError> {
        let request = ChatMessageRequest::new(
            self.model.clone(),
            messages.iter().map(convert_message).collect(),
        );

        let response = self
            .client
            .send_chat_messages(request)
            .await
            .map_err(|e| ChatError::Other(format!("Ollama chat request failed: {e}")))?;

        Ok(response.message.content)
    }
}

impl ChatProvider for OllamaChat {
    fn name(&self) -> &str {
        &self.model
    }

    fn chat<'a>(&'a self, messages: &'a [Message]) -> ChatFuture<'a> {
        Box::pin(self.request(messages))
    }
}

fn convert_message(message: &Message) -> ChatMessage {
    let text = message.content.clone();
    match message.role {
        Role::System => ChatMessage::system(text),
        Role::User => ChatMessage::user(text),
        Role::Assistant => ChatMessage::assistant(text),
    }
}

#[cfg(test)]
mod tests {
    use ollama_rs::generation::chat::MessageRole;

    use super::*;

    #[test]
    fn name_is_model() {
        let chat = OllamaChat::new("http://localhost:11434", "llama3.1".into()).unwrap();
        assert_eq!(chat.name(), "llama3.1");
    }

    #[test]
    fn roles_map_one_to_one() {
        let system = convert_message(&Message::system("reglas"));
        assert_eq!(system.role, MessageRole::System);
        assert_eq!(system.content, "reglas");
        assert_eq!(convert_message(&Message::user("hola")).role, MessageRole::User);
    }

    #[test]
    fn invalid_url_rejected() {
        assert!(matches!(
            OllamaChat::new("::", "m".into()),
            Err(ChatError::Other(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_endpoint_errors() {
        let chat = OllamaChat::new("http://127.0.0.1:1", "m".into()).unwrap();
        let result = chat.chat(&[Message::user("hola")]).await;
        assert!(matches!(result, Err(ChatError::Other(_))));
    }
}
