use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ChatFuture, ChatProvider, Message};
use crate::error::ChatError;

/// Client for any OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone)]
pub struct OpenAiChat {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl fmt::Debug for OpenAiChat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiChat")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiChat {
    #[must_use]
    pub fn new(api_key: String, base_url: String, model: String, max_tokens: u32) -> Self {
        Self {
            client: crate::http::default_client(),
            api_key,
            base_url: crate::http::trim_base_url(base_url),
            model,
            max_tokens,
        }
    }

    async fn request(&self, messages: &[Message]) -> Result<String, ChatError> {
        let body = ChatRequest {
            model: &self.model,
            messages: messages
                .iter()
                .map(|m| ApiMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            max_tokens: self.max_tokens,
            temperature: 0.0,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::error!("OpenAI chat API error {status}: {text}");
            return Err(ChatError::Status {
                provider: "openai",
                status: status.as_u16(),
            });
        }

        let resp: ChatResponse = serde_json::from_str(&text)?;

        resp.choices
            .into_iter()
            .next()
            .map(|c| c.message.content.unwrap_or_default())
            .ok_or(ChatError::EmptyResponse { provider: "openai" })
    }
}

impl ChatProvider for OpenAiChat {
    fn name(&self) -> &str {
        &self.model
    }

    fn chat<'a>(&'a self, messages: &'a [Message]) -> ChatFuture<'a> {
        Box::pin(self.request(messages))
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn chat(server: &MockServer) -> OpenAiChat {
        OpenAiChat::new(
            "sk-test".into(),
            format!("{}/v1/", server.uri()),
            "gpt-4o-mini".into(),
            256,
        )
    }

    #[tokio::test]
    async fn sends_messages_and_returns_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_json(serde_json::json!({
                "model": "gpt-4o-mini",
                "messages": [
                    {"role": "system", "content": "Responde en castellano."},
                    {"role": "user", "content": "¿Qué es un aditivo?"}
                ],
                "max_tokens": 256,
                "temperature": 0.0
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [
                    {"message": {"role": "assistant", "content": "Una sustancia añadida."}},
                    {"message": {"role": "assistant", "content": "ignorada"}}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let messages = [
            Message::system("Responde en castellano."),
            Message::user("¿Qué es un aditivo?"),
        ];
        let reply = chat(&server).chat(&messages).await.unwrap();
        assert_eq!(reply, "Una sustancia añadida.");
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let err = chat(&server).chat(&[Message::user("x")]).await.unwrap_err();
        assert!(matches!(err, ChatError::Status { status: 401, .. }));
    }

    #[tokio::test]
    async fn no_choices_is_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&server)
            .await;

        let err = chat(&server).chat(&[Message::user("x")]).await.unwrap_err();
        assert!(matches!(err, ChatError::EmptyResponse { .. }));
    }

    #[tokio::test]
    async fn null_content_is_empty_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": null}}]
            })))
            .mount(&server)
            .await;

        assert_eq!(chat(&server).chat(&[Message::user("x")]).await.unwrap(), "");
    }

    #[test]
    fn debug_redacts_key() {
        let chat = OpenAiChat::new("secret".into(), "http://x".into(), "m".into(), 8);
        let dbg = format!("{chat:?}");
        assert!(!dbg.contains("secret"));
        assert!(dbg.contains("<redacted>"));
    }
}
