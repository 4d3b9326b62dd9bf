use crate::config::LlmSettings;
use crate::credentials::ApiKey;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const WEB_SEARCH_TOOL: &str = "web_search_20250305";

/// Anthropic Messages API client with the hosted web search tool enabled.
pub struct LlmClient {
    api_key: ApiKey,
    model: String,
    max_tokens: u32,
    web_search_max_uses: Option<u32>,
    base_url: String,
    http: HttpClient,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    tools: Vec<WebSearchTool>,
    messages: Vec<Msg<'a>>,
}

#[derive(Serialize)]
struct WebSearchTool {
    #[serde(rename = "type")]
    kind: &'static str,
    name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_uses: Option<u32>,
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

// Tool-use and search-result blocks carry no `text`; only `text` blocks do.
#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

impl LlmClient {
    pub fn new(api_key: ApiKey, settings: &LlmSettings) -> Result<Self> {
        let http = HttpClient::new(concat!("job-search/", env!("CARGO_PKG_VERSION")))?;
        let base_url = settings
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());
        Ok(Self {
            api_key,
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            web_search_max_uses: settings.web_search_max_uses,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one user message and return the text blocks of the reply,
    /// newline-joined. The model may search the web while answering.
    pub async fn complete_with_web_search(&self, user_message: &str) -> Result<String> {
        debug!(model = %self.model, "sending LLM request with web search");

        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            tools: vec![WebSearchTool {
                kind: WEB_SEARCH_TOOL,
                name: "web_search",
                max_uses: self.web_search_max_uses,
            }],
            messages: vec![Msg {
                role: "user",
                content: user_message,
            }],
        };

        let body = serde_json::to_string(&request)
            .map_err(|e| Error::parse(format!("serialize request: {e}")))?;

        let url = format!("{}/messages", self.base_url);
        let response_text = self
            .http
            .post_json_raw(
                &url,
                &body,
                &[
                    ("x-api-key", self.api_key.expose()),
                    ("anthropic-version", ANTHROPIC_VERSION),
                ],
            )
            .await
            .map_err(|e| {
                warn!("Anthropic API error: {e}");
                e
            })?;

        extract_text(&response_text)
    }
}

fn extract_text(response_text: &str) -> Result<String> {
    let resp: MessagesResponse = serde_json::from_str(response_text)
        .map_err(|e| Error::parse(format!("parse Anthropic response: {e}")))?;

    Ok(resp
        .content
        .into_iter()
        .filter(|b| b.kind == "text")
        .filter_map(|b| b.text)
        .collect::<Vec<_>>()
        .join("\n"))
}
