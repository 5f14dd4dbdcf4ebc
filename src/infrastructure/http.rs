// src/infrastructure/http.rs
//! Response handling shared by the service clients.
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Why a call to a hosted service failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// No response arrived: refused connection, DNS failure, timeout.
    Transport(String),
    /// The service answered with a non-success status.
    Status(StatusCode, String),
}

/// Joins a base URL and a path without doubling the slash.
pub fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

pub async fn send(request: RequestBuilder) -> Result<Response, Failure> {
    let response = request
        .send()
        .await
        .map_err(|e| Failure::Transport(e.to_string()))?;
    check(response).await
}

/// Passes successful responses through. Otherwise yields the status with the
/// service's `message` unchanged, or the status and raw body when it sent none.
pub async fn check(response: Response) -> Result<Response, Failure> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(Failure::Status(status, error_message(status, &body)))
}

fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return parsed.message;
    }
    let body = body.trim();
    if body.is_empty() {
        status.to_string()
    } else {
        format!("{status}: {body}")
    }
}
