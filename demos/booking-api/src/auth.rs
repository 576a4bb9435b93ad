use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use axum::Json;
use axum::extract::{FromRef, FromRequestParts, State};
use axum::http::request::Parts;
use headers::authorization::Bearer;
use headers::{Authorization, Cookie, HeaderMapExt};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::errors::ApiError;
use crate::extractors::StrictJson;

const TOKEN_COOKIE: &str = "token";

/// The only account accepted by `POST /auth`
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::new("admin", "password123")
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Issued session tokens
#[derive(Debug, Clone, Default)]
pub(crate) struct TokenStore {
    tokens: Arc<RwLock<HashSet<String>>>,
}

impl TokenStore {
    pub(crate) async fn issue(&self) -> String {
        let token = uuid::Uuid::new_v4().simple().to_string();
        self.tokens.write().await.insert(token.clone());
        token
    }

    pub(crate) async fn is_valid(&self, token: &str) -> bool {
        self.tokens.read().await.contains(token)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum LoginResponse {
    Granted { token: String },
    Refused { reason: &'static str },
}

/// Bad credentials still answer 200, only the payload changes.
pub(crate) async fn login(
    State(tokens): State<TokenStore>,
    State(credentials): State<Credentials>,
    StrictJson(request): StrictJson<LoginRequest>,
) -> Json<LoginResponse> {
    if request.username != credentials.username || request.password != credentials.password {
        warn!(username = %request.username, "login refused");
        return Json(LoginResponse::Refused {
            reason: "Bad credentials",
        });
    }

    let token = tokens.issue().await;
    info!(username = %request.username, "token issued");
    Json(LoginResponse::Granted { token })
}

/// Proof that the caller sent a token issued by `POST /auth`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Authorized;

impl<S> FromRequestParts<S> for Authorized
where
    TokenStore: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let from_cookie = parts
            .headers
            .typed_get::<Cookie>()
            .and_then(|cookie| cookie.get(TOKEN_COOKIE).map(ToString::to_string));
        let token = from_cookie.or_else(|| {
            parts
                .headers
                .typed_get::<Authorization<Bearer>>()
                .map(|auth| auth.token().to_string())
        });

        let tokens = TokenStore::from_ref(state);
        match token {
            Some(token) if tokens.is_valid(&token).await => Ok(Self),
            _ => Err(ApiError::Forbidden),
        }
    }
}
