#![allow(
    clippy::missing_errors_doc,
    dead_code,
    missing_docs,
    clippy::expect_used
)]
use std::io;
use std::net::TcpListener;

use anyhow::Context;
use http::StatusCode;
use tracing::info;

use booking_harness::auth::Auth;
use booking_harness::endpoints::PING;
use booking_harness::test_client::{HealthStatus, TestClient, TestServer};
use booking_harness::{RestClient, SecureString};

use booking_api::{Credentials, launch};

#[derive(Debug, Default)]
pub struct BookingTestServer {
    credentials: Credentials,
}

impl TestServer for BookingTestServer {
    type Error = io::Error;

    async fn launch(&self, listener: TcpListener) -> Result<(), Self::Error> {
        listener.set_nonblocking(true)?;
        let listener = tokio::net::TcpListener::from_std(listener)?;
        info!(?listener, "launching server");
        launch(listener, self.credentials.clone())
            .await
            .map_err(io::Error::other)
    }

    async fn is_healthy(&self, client: &mut RestClient) -> Result<HealthStatus, Self::Error> {
        let status = match client.get(PING).expect_status(StatusCode::CREATED).await {
            Ok(_) => HealthStatus::Healthy,
            Err(_) => HealthStatus::Unhealthy,
        };
        Ok(status)
    }
}

#[derive(Debug, derive_more::Deref, derive_more::DerefMut)]
pub struct TestApp {
    #[deref]
    #[deref_mut]
    client: TestClient<BookingTestServer>,
}

impl TestApp {
    pub async fn start() -> anyhow::Result<Self> {
        let client = TestClient::start(BookingTestServer::default()).await?;
        Ok(Self { client })
    }

    pub fn credentials(&self) -> &Credentials {
        &self.client.server().credentials
    }

    /// Log in with the server account
    pub async fn token(&self) -> anyhow::Result<SecureString> {
        let Credentials { username, password } = self.credentials();
        let token = Auth::new(self)
            .login(username, password)
            .await
            .context("login")?;
        Ok(token)
    }
}
