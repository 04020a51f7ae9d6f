//! Built-in HTTP backends for the OCR and translation capabilities.
//!
//! Both talk to Google Cloud REST endpoints and share authentication, client
//! construction and error-body decoding, which live here.

pub mod google_translate;
pub mod google_vision;

pub use google_translate::GoogleTranslate;
pub use google_vision::GoogleVisionOcr;

use crate::error::ServiceError;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Environment variable holding a Google Cloud API key.
pub const GOOGLE_API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Environment variable holding an OAuth2 access token.
pub const GOOGLE_ACCESS_TOKEN_ENV: &str = "GOOGLE_ACCESS_TOKEN";

/// Credentials for Google Cloud REST calls.
#[derive(Clone, PartialEq, Eq)]
pub enum GoogleAuth {
    /// Sent as the `key` query parameter.
    ApiKey(String),
    /// Sent as `Authorization: Bearer <token>`.
    BearerToken(String),
}

impl GoogleAuth {
    /// `GOOGLE_API_KEY` first, then `GOOGLE_ACCESS_TOKEN`. Empty values are ignored.
    pub fn from_env() -> Option<Self> {
        let non_empty = |var: &str| std::env::var(var).ok().filter(|v| !v.trim().is_empty());

        non_empty(GOOGLE_API_KEY_ENV)
            .map(GoogleAuth::ApiKey)
            .or_else(|| non_empty(GOOGLE_ACCESS_TOKEN_ENV).map(GoogleAuth::BearerToken))
    }

    fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            GoogleAuth::ApiKey(key) => request.query(&[("key", key)]),
            GoogleAuth::BearerToken(token) => request.bearer_auth(token),
        }
    }
}

impl fmt::Debug for GoogleAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoogleAuth::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
            GoogleAuth::BearerToken(_) => f.write_str("BearerToken(<redacted>)"),
        }
    }
}

/// Build the shared HTTP client. No timeout unless one is given.
pub(crate) fn http_client(
    service: &str,
    timeout_secs: Option<u64>,
) -> Result<reqwest::Client, ServiceError> {
    let mut builder = reqwest::Client::builder()
        .user_agent(concat!("edgequake-pdf-translate/", env!("CARGO_PKG_VERSION")));
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build().map_err(|e| ServiceError::Http {
        service: service.to_string(),
        reason: e.to_string(),
    })
}

/// POST a JSON body and return the response text, mapping non-2xx to [`ServiceError::Api`].
pub(crate) async fn post_json(
    client: &reqwest::Client,
    auth: &GoogleAuth,
    service: &str,
    endpoint: &str,
    body: &serde_json::Value,
) -> Result<String, ServiceError> {
    let request = auth.apply(client.post(endpoint)).json(body);

    let response = request.send().await.map_err(|e| ServiceError::Http {
        service: service.to_string(),
        reason: e.to_string(),
    })?;

    let status = response.status();
    let text = response.text().await.map_err(|e| ServiceError::Http {
        service: service.to_string(),
        reason: format!("reading body: {e}"),
    })?;

    if !status.is_success() {
        return Err(ServiceError::Api {
            service: service.to_string(),
            status: status.as_u16(),
            message: error_message(&text),
        });
    }

    Ok(text)
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Pull `error.message` out of a Google error body, falling back to the raw text.
pub(crate) fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(env) if !env.error.message.is_empty() => env.error.message,
        _ => {
            let trimmed = body.trim();
            if trimmed.chars().count() > 200 {
                let head: String = trimmed.chars().take(200).collect();
                format!("{head}\u{2026}")
            } else {
                trimmed.to_string()
            }
        }
    }
}
