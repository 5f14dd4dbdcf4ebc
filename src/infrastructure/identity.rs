// src/infrastructure/identity.rs
use chrono::{Duration, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::IdentityProvider;
use crate::domain::{DomainError, NewUser, Session};
use crate::infrastructure::http::{endpoint, send, Failure};

/// Client for the hosted identity service.
pub struct HttpIdentityProvider {
    http: Client,
    base_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Credentials<'a> {
    username: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignUpResponse {
    user_sub: Option<String>,
    #[serde(default)]
    user_confirmed: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    id_token: String,
    access_token: String,
    refresh_token: Option<String>,
    expires_in: i64,
}

impl TokenResponse {
    fn into_session(self, username: &str, previous_refresh: Option<&str>) -> Result<Session, DomainError> {
        let refresh_token = self
            .refresh_token
            .or_else(|| previous_refresh.map(String::from))
            .ok_or_else(|| DomainError::AuthError("Identity service sent no refresh token".to_string()))?;
        Ok(Session {
            username: username.to_string(),
            id_token: self.id_token,
            access_token: self.access_token,
            refresh_token,
            expires_at: Utc::now() + Duration::seconds(self.expires_in),
        })
    }
}

impl HttpIdentityProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<reqwest::Response, Failure> {
        send(self.http.post(endpoint(&self.base_url, path)).json(body)).await
    }

    async fn tokens(response: reqwest::Response) -> Result<TokenResponse, DomainError> {
        response
            .json()
            .await
            .map_err(|e| DomainError::AuthError(format!("Failed to parse token response: {e}")))
    }
}

/// Only a 4xx answer is a refusal. Server faults and lost connections say
/// nothing about the credentials.
fn auth_error(failure: Failure) -> DomainError {
    match failure {
        Failure::Transport(reason) => DomainError::Unreachable(reason),
        Failure::Status(status, message) if status.is_client_error() => DomainError::AuthError(message),
        Failure::Status(_, message) => DomainError::ServiceError(message),
    }
}

impl IdentityProvider for HttpIdentityProvider {
    #[instrument(level = "debug", skip(self, password))]
    async fn sign_up(&mut self, email: &str, password: &str) -> Result<NewUser, DomainError> {
        let body = Credentials {
            username: email,
            password: Some(password),
            code: None,
        };
        let response = match self.post("signup", &body).await {
            Ok(r) => r,
            Err(Failure::Status(StatusCode::CONFLICT, _)) => return Err(DomainError::UsernameExists(email.to_string())),
            Err(e) => return Err(auth_error(e)),
        };
        let created: SignUpResponse = response
            .json()
            .await
            .map_err(|e| DomainError::AuthError(format!("Failed to parse sign-up response: {e}")))?;
        Ok(NewUser {
            username: email.to_string(),
            user_sub: created.user_sub,
            confirmed: created.user_confirmed,
        })
    }

    #[instrument(level = "debug", skip(self, code))]
    async fn confirm_sign_up(&mut self, email: &str, code: &str) -> Result<(), DomainError> {
        let body = Credentials {
            username: email,
            password: None,
            code: Some(code),
        };
        self.post("confirm", &body).await.map_err(auth_error)?;
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    async fn resend_sign_up(&mut self, email: &str) -> Result<(), DomainError> {
        let body = Credentials {
            username: email,
            password: None,
            code: None,
        };
        self.post("resend", &body).await.map_err(auth_error)?;
        Ok(())
    }

    #[instrument(level = "debug", skip(self, password))]
    async fn sign_in(&mut self, email: &str, password: &str) -> Result<Session, DomainError> {
        let body = Credentials {
            username: email,
            password: Some(password),
            code: None,
        };
        let response = self.post("signin", &body).await.map_err(auth_error)?;
        Self::tokens(response).await?.into_session(email, None)
    }

    #[instrument(level = "debug", skip(self, session), fields(username = %session.username))]
    async fn refresh(&mut self, session: &Session) -> Result<Session, DomainError> {
        let body = RefreshRequest {
            refresh_token: &session.refresh_token,
        };
        let response = self.post("refresh", &body).await.map_err(auth_error)?;
        let fresh = Self::tokens(response)
            .await?
            .into_session(&session.username, Some(&session.refresh_token))?;
        debug!(expires_at = %fresh.expires_at, "Token refreshed");
        Ok(fresh)
    }

    #[instrument(level = "debug", skip(self, session), fields(username = %session.username))]
    async fn sign_out(&mut self, session: &Session) -> Result<(), DomainError> {
        let request = self
            .http
            .post(endpoint(&self.base_url, "signout"))
            .bearer_auth(&session.access_token);
        send(request).await.map_err(auth_error)?;
        Ok(())
    }
}
