use crate::ApiClientError;

/// Failures while bringing a [`TestClient`](super::TestClient) up.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum TestAppError {
    /// Binding the ephemeral port failed.
    #[display("I/O error: {_0}")]
    IoError(std::io::Error),

    /// The client could not be built.
    #[display("API client error: {_0}")]
    ClientError(ApiClientError),

    /// Every health probe failed.
    #[from(skip)]
    #[display("Server at {addr} failed to become healthy after {attempts} probes")]
    UnhealthyServer {
        /// The server address.
        addr: std::net::SocketAddr,
        /// Number of probes sent.
        attempts: usize,
    },
}
