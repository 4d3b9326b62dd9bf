use crate::error::{Error, Result};
use reqwest::{Client, StatusCode, header};
use std::time::Duration;
use tracing::{debug, warn};

/// Thin wrapper over `reqwest` that maps failures onto [`Error`].
/// Each call is sent exactly once.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(180))
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::network(e.to_string()))?;

        Ok(Self { client })
    }

    pub async fn post_json_raw(
        &self,
        url: &str,
        body: &str,
        headers: &[(&str, &str)],
    ) -> Result<String> {
        let mut req = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.to_string());
        for (k, v) in headers {
            req = req.header(*k, *v);
        }

        debug!(%url, "POST");
        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::network(format!("request to {url} timed out"))
            } else {
                Error::network(e.to_string())
            }
        })?;
        handle_response(resp).await
    }
}

async fn handle_response(resp: reqwest::Response) -> Result<String> {
    let status = resp.status();

    if status.is_success() {
        return resp.text().await.map_err(|e| Error::network(e.to_string()));
    }

    match status {
        // 403 is a permission problem with a valid key, reported as a plain API error.
        StatusCode::UNAUTHORIZED => {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "credential rejected");
            Err(Error::Authentication(error_message(&body, status)))
        }
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after = resp
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            Err(Error::RateLimited {
                retry_after_secs: retry_after,
            })
        }
        _ => {
            let body = resp.text().await.unwrap_or_default();
            Err(Error::Api {
                status: status.as_u16(),
                message: error_message(&body, status),
            })
        }
    }
}

/// Pull `error.message` out of a JSON error body, falling back to the raw
/// body or the status reason.
fn error_message(body: &str, status: StatusCode) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_owned));
    match from_json {
        Some(msg) => msg,
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    }
}
