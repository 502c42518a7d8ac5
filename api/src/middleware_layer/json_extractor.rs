//! Rewrites plain-text 400/422 rejections (e.g. a missing query parameter)
//! into the JSON error envelope and tags every response with `X-Request-Id`.

use axum::{
    body::{Body, Bytes},
    http::{HeaderValue, Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use crate::core::http::response_envelope::{ApiErrorDetail, ApiResponse};

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

async fn take_body(res: Response) -> (axum::http::response::Parts, Bytes) {
    let (parts, body) = res.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();
    (parts, bytes)
}

fn guess_path_from_serde_msg(msg: &str) -> Option<String> {
    for key in ["prompt", "model"] {
        if msg.contains(key) {
            return Some(key.to_string());
        }
    }
    None
}

fn is_json(parts: &axum::http::response::Parts) -> bool {
    parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

fn ensure_request_id(headers: &mut axum::http::HeaderMap) {
    let present = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|v| !v.trim().is_empty());
    if present {
        return;
    }
    let nanos = Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| Utc::now().timestamp_micros() * 1000);
    if let Ok(id) = HeaderValue::from_str(&format!("req-{nanos}")) {
        headers.insert(REQUEST_ID_HEADER, id);
    }
}

pub async fn json_error_mapper(req: Request<Body>, next: Next) -> Response {
    let mut res = next.run(req).await;
    let status = res.status();

    // Only non-JSON 400/422 bodies are rewritten; handler errors are already enveloped.
    let rejected = status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY;
    if !rejected {
        ensure_request_id(res.headers_mut());
        return res;
    }

    let (mut parts, bytes) = take_body(res).await;
    ensure_request_id(&mut parts.headers);
    if is_json(&parts) {
        return Response::from_parts(parts, Body::from(bytes));
    }

    let original = String::from_utf8_lossy(&bytes);
    let detail = ApiErrorDetail {
        path: guess_path_from_serde_msg(&original),
        hint: if original.contains("missing field") {
            Some("Both `prompt` and `model` query parameters are required.".into())
        } else {
            None
        },
    };

    let envelope = ApiResponse::<()>::error(
        if status == StatusCode::BAD_REQUEST {
            "BAD_REQUEST"
        } else {
            "UNPROCESSABLE_ENTITY"
        },
        original.trim(),
        vec![detail],
    );

    let body = match serde_json::to_vec(&envelope) {
        Ok(v) => v,
        Err(_) => bytes.to_vec(),
    };

    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    parts.headers.remove(header::CONTENT_LENGTH);

    Response::from_parts(parts, Body::from(body))
}
