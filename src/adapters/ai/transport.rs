//! Error mapping shared by the HTTP-backed providers.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};

use crate::ports::AIError;

/// Retry hint reported when the provider does not give one.
pub(super) const DEFAULT_RETRY_AFTER_SECS: u32 = 30;

pub(super) fn client(timeout: Duration) -> Result<Client, AIError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AIError::InvalidRequest(format!("cannot build http client: {e}")))
}

pub(super) fn send_error(err: reqwest::Error, timeout: Duration) -> AIError {
    if err.is_timeout() {
        AIError::Timeout {
            timeout_secs: timeout.as_secs() as u32,
        }
    } else if err.is_connect() {
        AIError::network(format!("connect: {err}"))
    } else {
        AIError::network(err.to_string())
    }
}

/// Passes 2xx responses through and turns everything else into an
/// [`AIError`]. `retry_after` reads a hint out of a 429 body.
pub(super) async fn check_status(
    response: Response,
    retry_after: fn(&str) -> Option<u32>,
) -> Result<Response, AIError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(status_error(status, body, retry_after))
}

fn status_error(status: StatusCode, body: String, retry_after: fn(&str) -> Option<u32>) -> AIError {
    match status.as_u16() {
        401 | 403 => AIError::AuthenticationFailed,
        429 => AIError::rate_limited(retry_after(&body).unwrap_or(DEFAULT_RETRY_AFTER_SECS)),
        400 | 404 | 422 => AIError::InvalidRequest(body),
        500..=599 => AIError::unavailable(format!("{status}: {body}")),
        _ => AIError::network(format!("unexpected {status}: {body}")),
    }
}

pub(super) fn no_hint(_: &str) -> Option<u32> {
    None
}
