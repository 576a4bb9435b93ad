//! In-process servers for integration tests.
//!
//! A [`TestClient`] binds an ephemeral port on 127.0.0.1, launches a
//! [`TestServer`] on it in a background task, waits until it answers, and
//! then behaves as a [`RestClient`] pointed at it. Dropping the client stops
//! the server.
//!
//! ```rust,no_run
//! # use booking_harness::test_client::{TestClient, TestServer};
//! # #[derive(Debug)] struct BookingServer;
//! # impl TestServer for BookingServer {
//! #     type Error = std::io::Error;
//! #     async fn launch(&self, _listener: std::net::TcpListener) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = TestClient::start(BookingServer).await?;
//! client.get("/ping").expect_status(http::StatusCode::CREATED).await?;
//! # Ok(())
//! # }
//! ```

use std::net::{Ipv4Addr, SocketAddr, TcpListener};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use backon::{ExponentialBuilder, Retryable};
use tracing::{debug, error, info};

use crate::RestClient;

mod error;
pub use self::error::TestAppError;

mod test_server;
pub use self::test_server::{HealthStatus, TestServer, TestServerConfig};

/// A [`RestClient`] bound to a server running in the background.
#[derive(Debug, derive_more::Deref, derive_more::DerefMut)]
pub struct TestClient<T> {
    local_addr: SocketAddr,
    #[deref]
    #[deref_mut]
    client: RestClient,
    handle: Option<tokio::task::JoinHandle<()>>,
    test_server: Arc<T>,
}

#[derive(Debug)]
enum Probe {
    NotReady,
    Failed,
}

impl<T> TestClient<T>
where
    T: TestServer + Send + Sync + 'static,
{
    /// Launches `test_server` and waits until it is healthy.
    ///
    /// # Errors
    ///
    /// - [`TestAppError::IoError`] if no port can be bound
    /// - [`TestAppError::ClientError`] if the configured client is invalid
    /// - [`TestAppError::UnhealthyServer`] if the health probes are exhausted
    pub async fn start(test_server: T) -> Result<Self, TestAppError> {
        let listener = TcpListener::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, 0)))?;
        let local_addr = listener.local_addr()?;

        let test_server = Arc::new(test_server);
        let handle = tokio::spawn({
            let server = Arc::clone(&test_server);
            async move {
                if let Err(error) = server.launch(listener).await {
                    error!(%error, "server launch failed");
                }
            }
        });

        let config = test_server.config();
        let client = config
            .client
            .clone()
            .unwrap_or_else(RestClient::builder)
            .with_port(local_addr.port())
            .build()?;

        let attempts = Self::wait_for_health(&test_server, &client, local_addr, &config).await;
        if let Err(attempts) = attempts {
            handle.abort();
            return Err(TestAppError::UnhealthyServer {
                addr: local_addr,
                attempts,
            });
        }
        info!(%local_addr, "test server ready");

        Ok(Self {
            local_addr,
            client,
            handle: Some(handle),
            test_server,
        })
    }

    /// Probes the server with exponential backoff; returns the number of
    /// probes sent when it gives up.
    async fn wait_for_health(
        test_server: &Arc<T>,
        client: &RestClient,
        local_addr: SocketAddr,
        config: &TestServerConfig,
    ) -> Result<(), usize> {
        let mut backoff = ExponentialBuilder::default()
            .with_min_delay(config.min_backoff_delay)
            .with_max_delay(config.max_backoff_delay)
            .with_max_times(config.max_retry_attempts);
        if config.backoff_jitter {
            backoff = backoff.with_jitter();
        }

        let attempts = AtomicUsize::new(0);
        let probe = || {
            let mut client = client.fork();
            let server = Arc::clone(test_server);
            attempts.fetch_add(1, Ordering::Relaxed);
            async move {
                match server.is_healthy(&mut client).await {
                    Ok(HealthStatus::Healthy) => Ok(()),
                    Ok(HealthStatus::Unhealthy) => {
                        debug!("server not healthy yet");
                        Err(Probe::NotReady)
                    }
                    Ok(HealthStatus::Uncheckable) => {
                        match tokio::net::TcpStream::connect(local_addr).await {
                            Ok(_) => Ok(()),
                            Err(err) => {
                                debug!(%err, %local_addr, "server not accepting connections yet");
                                Err(Probe::NotReady)
                            }
                        }
                    }
                    Err(error) => {
                        error!(%error, "health check failed");
                        Err(Probe::Failed)
                    }
                }
            }
        };

        probe
            .retry(backoff)
            .when(|outcome| matches!(outcome, Probe::NotReady))
            .await
            .map_err(|_| attempts.load(Ordering::Relaxed))
    }
}

impl<T> TestClient<T> {
    /// The address the server listens on.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// The launched server.
    pub fn server(&self) -> &T {
        &self.test_server
    }
}

impl<T> Drop for TestClient<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
