//! Google Cloud Translation (v2 REST) backend.

use super::{http_client, post_json, GoogleAuth};
use crate::error::ServiceError;
use crate::pipeline::translate::Translator;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

/// Default Translation v2 endpoint.
pub const TRANSLATE_ENDPOINT: &str = "https://translation.googleapis.com/language/translate/v2";

const SERVICE: &str = "google-translate";

/// Translation through the Cloud Translation v2 API. Source language is
/// auto-detected by the service.
#[derive(Debug, Clone)]
pub struct GoogleTranslate {
    client: reqwest::Client,
    auth: GoogleAuth,
    endpoint: String,
}

impl GoogleTranslate {
    pub fn new(auth: GoogleAuth, timeout_secs: Option<u64>) -> Result<Self, ServiceError> {
        Ok(Self {
            client: http_client(SERVICE, timeout_secs)?,
            auth,
            endpoint: TRANSLATE_ENDPOINT.to_string(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl Translator for GoogleTranslate {
    fn name(&self) -> &str {
        SERVICE
    }

    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ServiceError> {
        let body = translate_request(text, target_language);
        let response = post_json(&self.client, &self.auth, SERVICE, &self.endpoint, &body).await?;
        parse_translate_response(&response)
    }
}

// `format: text` keeps the service from HTML-escaping the result.
pub(crate) fn translate_request(text: &str, target_language: &str) -> serde_json::Value {
    json!({
        "q": text,
        "target": target_language,
        "format": "text"
    })
}

#[derive(Deserialize)]
struct TranslateResponse {
    data: TranslationsData,
}

#[derive(Deserialize)]
struct TranslationsData {
    #[serde(default)]
    translations: Vec<Translation>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
}

pub(crate) fn parse_translate_response(body: &str) -> Result<String, ServiceError> {
    let parsed: TranslateResponse =
        serde_json::from_str(body).map_err(|e| ServiceError::MalformedResponse {
            service: SERVICE.into(),
            detail: e.to_string(),
        })?;

    parsed
        .data
        .translations
        .into_iter()
        .next()
        .map(|t| t.translated_text)
        .ok_or_else(|| ServiceError::MalformedResponse {
            service: SERVICE.into(),
            detail: "response contained no translations".into(),
        })
}
