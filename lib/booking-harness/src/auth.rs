//! Session token acquisition.

use std::time::Instant;

use http::StatusCode;
use tracing::{error, info};

use crate::booking::{LoginRequest, LoginResponse};
use crate::endpoints::LOGIN;
use crate::{ApiClientError, RestClient, SecureString};

/// Login failures.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum AuthError {
    /// The server answered but issued no token.
    #[from(skip)]
    #[display("Login refused: {}", reason.as_deref().unwrap_or("no reason given"))]
    BadCredentials {
        /// The `reason` field of the response, if any.
        reason: Option<String>,
    },

    /// The login call itself failed.
    #[display("Login call failed: {_0}")]
    Client(ApiClientError),
}

/// Logs in against `POST /auth`.
#[derive(Debug)]
pub struct Auth {
    client: RestClient,
}

impl Auth {
    /// Uses a fork of `client`, leaving its pending state alone.
    pub fn new(client: &RestClient) -> Self {
        Self {
            client: client.fork(),
        }
    }

    /// Requests a session token.
    ///
    /// # Errors
    ///
    /// - [`AuthError::BadCredentials`] when the response carries no token
    /// - [`AuthError::Client`] for transport, status or decoding failures
    pub async fn login(&mut self, username: &str, password: &str) -> Result<SecureString, AuthError> {
        info!(endpoint = LOGIN, username, "login");
        let start = Instant::now();

        let result = self.request_token(username, password).await;
        let elapsed_ms = start.elapsed().as_millis();
        match &result {
            Ok(_) => info!(endpoint = LOGIN, elapsed_ms, "login succeeded"),
            Err(err) => error!(endpoint = LOGIN, elapsed_ms, %err, "login failed"),
        }
        result
    }

    async fn request_token(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<SecureString, AuthError> {
        let LoginResponse { token, reason } = self
            .client
            .with_json_body(&LoginRequest { username, password })?
            .execute_as(http::Method::POST, LOGIN, StatusCode::OK)
            .await?;

        match token {
            Some(token) if !token.as_str().is_empty() => Ok(token),
            _ => Err(AuthError::BadCredentials { reason }),
        }
    }
}
