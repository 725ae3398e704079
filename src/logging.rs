//! Middleware for logging requests and responses.

use axum::{
    body::Body,
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

/// The number of bytes of a body logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// JSON fields whose values are never logged.
const REDACTED_FIELDS: [&str; 2] = ["senha", "password"];

const REDACTED_VALUE: &str = "********";

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is truncated
/// and the full body is logged at the `debug` level. Passwords in JSON
/// request bodies are redacted.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_text = match read_body(body).await {
        Ok(body_text) => body_text,
        Err(error) => {
            tracing::error!("Could not read request body: {error}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    log_request(&parts, &redact_passwords(&body_text));

    let request = Request::from_parts(parts, Body::from(body_text));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_text = match read_body(body).await {
        Ok(body_text) => body_text,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    log_response(&parts, &body_text);

    Response::from_parts(parts, Body::from(body_text))
}

async fn read_body(body: Body) -> Result<String, axum::Error> {
    let body_bytes = axum::body::to_bytes(body, usize::MAX).await?;

    Ok(String::from_utf8_lossy(&body_bytes).to_string())
}

/// Replace the values of password fields in a JSON body.
///
/// Bodies that are not JSON are returned unchanged.
fn redact_passwords(body_text: &str) -> String {
    let Ok(mut json) = serde_json::from_str::<Value>(body_text) else {
        return body_text.to_owned();
    };

    if !redact_value(&mut json) {
        return body_text.to_owned();
    }

    json.to_string()
}

/// Returns whether anything was redacted.
fn redact_value(value: &mut Value) -> bool {
    match value {
        Value::Object(map) => {
            let mut redacted = false;

            for (key, field) in map.iter_mut() {
                if REDACTED_FIELDS.contains(&key.as_str()) {
                    *field = Value::String(REDACTED_VALUE.to_owned());
                    redacted = true;
                } else {
                    redacted |= redact_value(field);
                }
            }

            redacted
        }
        Value::Array(values) => values
            .iter_mut()
            .fold(false, |redacted, value| redact_value(value) || redacted),
        _ => false,
    }
}

/// The longest prefix of `text` that is at most `limit` bytes and ends on a character boundary.
fn truncate(text: &str, limit: usize) -> &str {
    if text.len() <= limit {
        return text;
    }

    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }

    &text[..end]
}

fn log_request(parts: &axum::http::request::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Received request: {parts:#?}\nbody: {}...",
            truncate(body, LOG_BODY_LENGTH_LIMIT)
        );
        tracing::debug!("Full request body: {body:?}");
    } else {
        tracing::info!("Received request: {parts:#?}\nbody: {body:?}");
    }
}

fn log_response(parts: &axum::http::response::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Sending response: {parts:#?}\nbody: {}...",
            truncate(body, LOG_BODY_LENGTH_LIMIT)
        );
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Sending response: {parts:#?}\nbody: {body:?}");
    }
}
