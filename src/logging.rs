//! Middleware for logging requests and responses.

use axum::{extract::Request, middleware::Next, response::Response};

/// The maximum number of body bytes logged at the `info` level before the
/// rest is demoted to `debug`.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and logged in full at the `debug` level.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();
    let body_text = String::from_utf8_lossy(&body_bytes).to_string();

    log_payload("Received request", &format!("{parts:#?}"), &body_text);

    let request = Request::from_parts(parts, body_text.into());
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();
    let body_text = String::from_utf8_lossy(&body_bytes).to_string();

    log_payload("Sending response", &format!("{parts:#?}"), &body_text);

    Response::from_parts(parts, body_text.into())
}

fn log_payload(label: &str, headers: &str, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        let cut = truncation_point(body);
        tracing::info!("{label}: {headers}\nbody: {}...", &body[..cut]);
        tracing::debug!("Full body: {body:?}");
    } else {
        tracing::info!("{label}: {headers}\nbody: {body:?}");
    }
}

// Slicing at LOG_BODY_LENGTH_LIMIT directly could split a multi-byte
// character and panic; back up to the nearest character boundary.
fn truncation_point(body: &str) -> usize {
    let mut cut = LOG_BODY_LENGTH_LIMIT.min(body.len());
    while !body.is_char_boundary(cut) {
        cut -= 1;
    }
    cut
}

#[cfg(test)]
mod tests {
    use super::{LOG_BODY_LENGTH_LIMIT, truncation_point};

    #[test]
    fn truncation_respects_character_boundaries() {
        let body = "ç".repeat(LOG_BODY_LENGTH_LIMIT);

        let cut = truncation_point(&body);

        assert!(body.is_char_boundary(cut));
        assert!(cut <= LOG_BODY_LENGTH_LIMIT);
    }

    #[test]
    fn short_bodies_are_not_truncated() {
        assert_eq!(truncation_point("abc"), 3);
    }
}
