//! Rewrites axum's plain-text extractor rejections into the JSON envelope.
//!
//! Syntax errors, missing fields and wrong field types all surface as
//! `400 BAD_REQUEST`; a missing JSON content type stays `415`.

use axum::{
    body::{Body, Bytes},
    http::{HeaderValue, Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::debug;

use crate::app::http::response_envelope::ApiResponse;

async fn take_body(res: Response) -> (axum::http::response::Parts, Bytes) {
    let (parts, body) = res.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();
    (parts, bytes)
}

fn hint_for(msg: &str) -> Option<&'static str> {
    if msg.contains("missing field") {
        Some(r#"Send a JSON object like {"user_id": "42", "text": "no tengo red"}."#)
    } else if msg.contains("invalid type") {
        Some("`user_id` and `text` must both be strings.")
    } else if msg.contains("Content-Type") {
        Some("Set the header `Content-Type: application/json`.")
    } else {
        None
    }
}

fn ensure_request_id(parts: &mut axum::http::response::Parts) -> String {
    if let Some(v) = parts
        .headers
        .get("X-Request-Id")
        .and_then(|h| h.to_str().ok())
        .filter(|v| !v.trim().is_empty())
    {
        return v.to_string();
    }
    let nanos = Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| Utc::now().timestamp_micros() * 1000);
    let id = format!("req-{nanos}");
    if let Ok(value) = HeaderValue::from_str(&id) {
        parts.headers.insert("X-Request-Id", value);
    }
    id
}

fn is_json(parts: &axum::http::response::Parts) -> bool {
    parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

pub async fn json_error_mapper(req: Request<Body>, next: Next) -> Response {
    let res = next.run(req).await;
    let status = res.status();

    if !matches!(
        status,
        StatusCode::BAD_REQUEST
            | StatusCode::UNPROCESSABLE_ENTITY
            | StatusCode::UNSUPPORTED_MEDIA_TYPE
    ) {
        return res;
    }

    let (mut parts, bytes) = take_body(res).await;
    // Handler errors are already enveloped.
    if is_json(&parts) {
        return Response::from_parts(parts, Body::from(bytes));
    }

    let original = String::from_utf8_lossy(&bytes);
    let request_id = ensure_request_id(&mut parts);
    debug!(%status, request_id = %request_id, rejection = %original.trim(), "request rejected");

    let (status, code) = if status == StatusCode::UNSUPPORTED_MEDIA_TYPE {
        (status, "UNSUPPORTED_MEDIA_TYPE")
    } else {
        (StatusCode::BAD_REQUEST, "BAD_REQUEST")
    };

    let mut envelope = ApiResponse::<()>::error(code, original.trim());
    if let Some(hint) = hint_for(&original) {
        envelope = envelope.with_hint(hint);
    }

    let body = match serde_json::to_vec(&envelope) {
        Ok(v) => v,
        Err(_) => bytes.to_vec(),
    };

    parts.status = status;
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    parts.headers.remove(header::CONTENT_LENGTH);

    Response::from_parts(parts, Body::from(body))
}
