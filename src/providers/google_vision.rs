//! Google Cloud Vision `TEXT_DETECTION` backend.

use super::{http_client, post_json, GoogleAuth};
use crate::error::ServiceError;
use crate::pipeline::ocr::{BoundingQuad, DetectedWord, OcrProvider, Vertex};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

/// Default `images:annotate` endpoint.
pub const VISION_ENDPOINT: &str = "https://vision.googleapis.com/v1/images:annotate";

const SERVICE: &str = "google-vision";

/// OCR through the Vision API. Returns all text annotations, whole-image
/// block first.
#[derive(Debug, Clone)]
pub struct GoogleVisionOcr {
    client: reqwest::Client,
    auth: GoogleAuth,
    endpoint: String,
}

impl GoogleVisionOcr {
    pub fn new(auth: GoogleAuth, timeout_secs: Option<u64>) -> Result<Self, ServiceError> {
        Ok(Self {
            client: http_client(SERVICE, timeout_secs)?,
            auth,
            endpoint: VISION_ENDPOINT.to_string(),
        })
    }

    /// Point at a different endpoint (proxies, regional hosts, test servers).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl OcrProvider for GoogleVisionOcr {
    fn name(&self) -> &str {
        SERVICE
    }

    async fn detect_text(&self, image_bytes: &[u8]) -> Result<Vec<DetectedWord>, ServiceError> {
        let body = annotate_request(image_bytes);
        let text = post_json(&self.client, &self.auth, SERVICE, &self.endpoint, &body).await?;
        let annotations = parse_annotate_response(&text)?;
        debug!("Vision returned {} annotations", annotations.len());
        Ok(annotations)
    }
}

/// Request body for a single image.
pub(crate) fn annotate_request(image_bytes: &[u8]) -> serde_json::Value {
    json!({
        "requests": [{
            "image": { "content": STANDARD.encode(image_bytes) },
            "features": [{ "type": "TEXT_DETECTION" }]
        }]
    })
}

#[derive(Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    #[serde(default)]
    text_annotations: Vec<EntityAnnotation>,
    error: Option<Status>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntityAnnotation {
    #[serde(default)]
    description: String,
    bounding_poly: Option<BoundingPoly>,
}

#[derive(Deserialize)]
struct BoundingPoly {
    #[serde(default)]
    vertices: Vec<RawVertex>,
}

// The API omits zero coordinates.
#[derive(Deserialize)]
struct RawVertex {
    #[serde(default)]
    x: i32,
    #[serde(default)]
    y: i32,
}

#[derive(Deserialize)]
struct Status {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
}

/// Decode an `images:annotate` response body into annotations, in API order.
pub(crate) fn parse_annotate_response(body: &str) -> Result<Vec<DetectedWord>, ServiceError> {
    let parsed: AnnotateResponse =
        serde_json::from_str(body).map_err(|e| ServiceError::MalformedResponse {
            service: SERVICE.into(),
            detail: e.to_string(),
        })?;

    let Some(first) = parsed.responses.into_iter().next() else {
        return Ok(Vec::new());
    };

    if let Some(status) = first.error {
        return Err(ServiceError::Api {
            service: SERVICE.into(),
            status: u16::try_from(status.code).unwrap_or(0),
            message: status.message,
        });
    }

    first
        .text_annotations
        .into_iter()
        .enumerate()
        .map(|(idx, annotation)| to_detected_word(idx, annotation))
        .collect()
}

fn to_detected_word(idx: usize, annotation: EntityAnnotation) -> Result<DetectedWord, ServiceError> {
    let vertices = annotation
        .bounding_poly
        .map(|poly| poly.vertices)
        .unwrap_or_default();

    let vertices: [Vertex; 4] = vertices
        .into_iter()
        .map(|v| Vertex::new(v.x, v.y))
        .collect::<Vec<_>>()
        .try_into()
        .map_err(|v: Vec<Vertex>| ServiceError::MalformedResponse {
            service: SERVICE.into(),
            detail: format!(
                "annotation {} ('{}') has {} vertices, expected 4",
                idx,
                annotation.description,
                v.len()
            ),
        })?;

    Ok(DetectedWord {
        text: annotation.description,
        bounding_quad: BoundingQuad::new(vertices),
    })
}
