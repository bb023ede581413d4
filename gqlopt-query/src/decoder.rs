//! # Error Decoding
//!
//! Turns the body of a failed HTTP response into `GraphQlErrors`.
//!
//! A decoder receives the response metadata and a seekable reader positioned
//! at the start of the body. Seeking lets a decoder try one payload format,
//! rewind, and try another without the body being buffered twice.

use crate::error::{Error, Result};
use crate::response::GraphQlErrors;
use reqwest::header::HeaderMap;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::sync::Arc;
use tracing::debug;

/// How much of a body is kept in a decode failure's context
const MAX_BODY_PREVIEW: usize = 512;

/// A readable, rewindable body stream
pub trait ReadSeek: Read + Seek {}

impl<T: Read + Seek + ?Sized> ReadSeek for T {}

/// Status line and headers of a failed response. The body travels separately.
#[derive(Debug, Clone)]
pub struct ResponseMeta {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub url: Option<Url>,
}

impl ResponseMeta {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            url: None,
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }
}

impl From<&reqwest::Response> for ResponseMeta {
    fn from(response: &reqwest::Response) -> Self {
        Self {
            status: response.status(),
            headers: response.headers().clone(),
            url: Some(response.url().clone()),
        }
    }
}

/// Decodes a failed response body into GraphQL errors, or fails with
/// `ErrorKind::DecodeFailed` when the body is not an error payload.
pub type ErrorDecoder =
    Arc<dyn Fn(&ResponseMeta, &mut dyn ReadSeek) -> Result<GraphQlErrors> + Send + Sync>;

/// The decoder used when no custom decoder option is supplied
pub fn default_error_decoder() -> ErrorDecoder {
    Arc::new(decode_graphql_errors)
}

#[derive(Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    errors: Option<GraphQlErrors>,
}

/// Decode a `{"errors": [...]}` body.
///
/// Anything else, including an empty `errors` array, is a decode failure
/// carrying the status and a preview of the raw body.
pub fn decode_graphql_errors(meta: &ResponseMeta, reader: &mut dyn ReadSeek) -> Result<GraphQlErrors> {
    let (reason, source) = match serde_json::from_reader::<_, ErrorPayload>(&mut *reader) {
        Ok(ErrorPayload { errors: Some(errors) }) if !errors.is_empty() => {
            debug!(status = %meta.status, count = errors.len(), "decoded graphql errors");
            return Ok(errors);
        }
        Ok(_) => ("response body carries no graphql errors".to_string(), None),
        Err(e) => (format!("response body is not a graphql error payload: {}", e), Some(e)),
    };

    let body = read_from_start(reader).map_err(|e| e.with_operation("decoder::default"))?;
    debug!(status = %meta.status, body_len = body.len(), "failed response is not an error payload");

    let err = Error::decode_failed(reason)
        .with_operation("decoder::default")
        .with_context("status", meta.status.as_u16().to_string())
        .with_context("body", preview(&body));
    Err(match source {
        Some(source) => err.set_source(source),
        None => err,
    })
}

/// Rewind and read the whole body as (lossy) text
pub fn read_from_start(reader: &mut dyn ReadSeek) -> Result<String> {
    reader.seek(SeekFrom::Start(0))?;
    let mut raw = Vec::new();
    reader.read_to_end(&mut raw)?;
    Ok(String::from_utf8_lossy(&raw).into_owned())
}

fn preview(body: &str) -> String {
    if body.chars().count() <= MAX_BODY_PREVIEW {
        body.to_string()
    } else {
        let head: String = body.chars().take(MAX_BODY_PREVIEW).collect();
        format!("{}…", head)
    }
}

/// Buffer a failed response once and run `decoder` over it exactly once.
///
/// An empty collection from the decoder is reported as a decode failure.
pub async fn decode_response(response: reqwest::Response, decoder: &ErrorDecoder) -> Result<GraphQlErrors> {
    let meta = ResponseMeta::from(&response);
    let body = response.bytes().await.map_err(|e| {
        Error::network_failed(format!("failed to read response body: {}", e))
            .with_operation("decoder::decode_response")
            .with_context("status", meta.status.as_u16().to_string())
            .set_source(e)
    })?;

    debug!(status = %meta.status, body_len = body.len(), "decoding failed response");
    let mut cursor = Cursor::new(body);
    let reader: &mut dyn ReadSeek = &mut cursor;
    let errors = decoder(&meta, reader).map_err(|e| e.with_operation("decoder::decode_response"))?;
    if errors.is_empty() {
        return Err(Error::decode_failed("decoder returned no errors for a failed response")
            .with_operation("decoder::decode_response")
            .with_context("status", meta.status.as_u16().to_string()));
    }
    Ok(errors)
}
