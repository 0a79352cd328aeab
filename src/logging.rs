//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE, request, response},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// The maximum number of bytes of a request or response body logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// The largest text body the middleware will buffer for logging.
pub const MAX_BUFFERED_BODY_LENGTH: usize = 2 * 1024 * 1024;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If the body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and the full body is logged at the `debug` level.
///
/// Only text bodies are buffered and logged. Bodies are forwarded byte for byte.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let (body, body_text) = match read_body(&parts.headers, body).await {
        Ok(read) => read,
        Err(error) => {
            tracing::error!("could not read request body: {error}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };
    log_request(&parts, &body_text);

    let request = Request::from_parts(parts, body);
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let (body, body_text) = match read_body(&parts.headers, body).await {
        Ok(read) => read,
        Err(error) => {
            tracing::error!("could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    log_response(&parts, &body_text);

    Response::from_parts(parts, body)
}

/// Return the body to forward along with the text to log for it.
///
/// Bodies that are not text are passed through without being read.
async fn read_body(headers: &HeaderMap, body: Body) -> Result<(Body, String), axum::Error> {
    if !has_text_content(headers) {
        return Ok((body, "<binary body>".to_owned()));
    }

    let bytes: Bytes = axum::body::to_bytes(body, MAX_BUFFERED_BODY_LENGTH).await?;
    let text = String::from_utf8_lossy(&bytes).into_owned();

    Ok((Body::from(bytes), text))
}

fn has_text_content(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE) else {
        return true;
    };

    content_type.to_str().is_ok_and(|content_type| {
        content_type.starts_with("text/")
            || content_type.starts_with("application/x-www-form-urlencoded")
            || content_type.starts_with("application/json")
    })
}

/// Cut `body` down to at most [LOG_BODY_LENGTH_LIMIT] bytes without splitting a character.
fn truncate_body(body: &str) -> Option<&str> {
    if body.len() <= LOG_BODY_LENGTH_LIMIT {
        return None;
    }

    let end = body
        .char_indices()
        .map(|(index, _)| index)
        .take_while(|&index| index <= LOG_BODY_LENGTH_LIMIT)
        .last()
        .unwrap_or(0);

    Some(&body[..end])
}

fn log_request(parts: &request::Parts, body: &str) {
    match truncate_body(body) {
        Some(truncated) => {
            tracing::info!("Received request: {parts:#?}\nbody: {truncated:}...");
            tracing::debug!("Full request body: {body:?}");
        }
        None => tracing::info!("Received request: {parts:#?}\nbody: {body:?}"),
    }
}

fn log_response(parts: &response::Parts, body: &str) {
    match truncate_body(body) {
        Some(truncated) => {
            tracing::info!("Sending response: {parts:#?}\nbody: {truncated:}...");
            tracing::debug!("Full response body: {body:?}");
        }
        None => tracing::info!("Sending response: {parts:#?}\nbody: {body:?}"),
    }
}
