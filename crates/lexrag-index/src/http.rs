//! Shared HTTP client construction for consistent timeout and TLS configuration.

use std::time::Duration;

use ollama_rs::Ollama;

const DEFAULT_OLLAMA_PORT: u16 = 11434;

/// 30s connect timeout, 60s request timeout, rustls TLS, `lexrag/{version}`
/// user-agent, redirect limit 10.
#[must_use]
pub fn default_client() -> reqwest::Client {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(30))
        .timeout(Duration::from_secs(60))
        .user_agent(concat!("lexrag/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .unwrap_or_default()
}

pub(crate) fn trim_base_url(mut base_url: String) -> String {
    while base_url.ends_with('/') {
        base_url.pop();
    }
    base_url
}

/// Ollama client for `base_url`, defaulting the port to 11434 when the URL
/// carries none.
pub(crate) fn ollama_client(base_url: &str) -> Result<Ollama, String> {
    let (host, port) = parse_host_port(base_url);
    Ollama::try_new(format!("{host}:{port}"))
        .map_err(|e| format!("invalid Ollama URL {base_url}: {e}"))
}

fn parse_host_port(url: &str) -> (String, u16) {
    let url = url.trim_end_matches('/');
    if let Some(colon_pos) = url.rfind(':') {
        let port_str = &url[colon_pos + 1..];
        if let Ok(port) = port_str.parse::<u16>() {
            return (url[..colon_pos].to_string(), port);
        }
    }
    (url.to_string(), DEFAULT_OLLAMA_PORT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_removed() {
        assert_eq!(
            trim_base_url("http://localhost:8080///".into()),
            "http://localhost:8080"
        );
        assert_eq!(trim_base_url("http://x".into()), "http://x");
    }

    #[test]
    fn parse_host_port_with_port() {
        assert_eq!(
            parse_host_port("http://localhost:11434"),
            ("http://localhost".to_owned(), 11434)
        );
    }

    #[test]
    fn parse_host_port_without_port() {
        assert_eq!(
            parse_host_port("http://ollama.internal/"),
            ("http://ollama.internal".to_owned(), DEFAULT_OLLAMA_PORT)
        );
    }

    #[test]
    fn parse_host_port_invalid_port_falls_back() {
        assert_eq!(
            parse_host_port("http://localhost:99999"),
            ("http://localhost:99999".to_owned(), DEFAULT_OLLAMA_PORT)
        );
    }

    #[test]
    fn ollama_client_keeps_explicit_port() {
        let client = ollama_client("http://localhost:8081/").unwrap();
        assert_eq!(client.url().port(), Some(8081));
    }

    #[test]
    fn ollama_client_defaults_port() {
        let client = ollama_client("http://ollama.internal").unwrap();
        assert_eq!(client.url().port(), Some(DEFAULT_OLLAMA_PORT));
    }

    #[test]
    fn ollama_client_rejects_garbage() {
        assert!(ollama_client("not a url").is_err());
    }
}
