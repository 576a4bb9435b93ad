//! Harness configuration: a YAML file, overridden by environment variables.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use tracing::debug;

use crate::race::{DEFAULT_PARTICIPANTS, DEFAULT_RACE_TIMEOUT};
use crate::{
    ApiClientError, DEFAULT_MAX_RESPONSE_TIME, DEFAULT_REQUEST_TIMEOUT, RaceHarness, RestClient,
    RestClientBuilder, SecureString,
};

/// Default location of the configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/application.yml";

/// Overrides `base_url`.
pub const ENV_BASE_URL: &str = "BOOKING_BASE_URL";
/// Overrides `username`.
pub const ENV_USERNAME: &str = "BOOKING_USERNAME";
/// Overrides `password`, base64 encoded like in the file.
pub const ENV_PASSWORD: &str = "BOOKING_PASSWORD";

/// Configuration errors.
#[derive(Debug, derive_more::Error, derive_more::Display)]
pub enum ConfigError {
    /// The file could not be read.
    #[display("Cannot read configuration {}: {source}", path.display())]
    Io {
        /// The configuration file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not valid YAML, or has values of the wrong type.
    #[display("Invalid YAML configuration: {message}")]
    Yaml {
        /// The parser message.
        message: String,
    },

    /// A required key is absent from both the file and the environment.
    #[display("Missing configuration key '{key}'")]
    Missing {
        /// The key name in the file.
        key: &'static str,
    },

    /// The password is not base64 encoded UTF-8.
    #[display("The password must be base64 encoded UTF-8: {message}")]
    InvalidPassword {
        /// The decoder message.
        message: String,
    },
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    base_url: Option<String>,
    username: Option<String>,
    password: Option<String>,
    max_response_time_ms: Option<u64>,
    request_timeout_ms: Option<u64>,
    #[serde(default)]
    race: RawRaceConfig,
}

#[derive(Debug, Default, Deserialize)]
struct RawRaceConfig {
    participants: Option<usize>,
    timeout_ms: Option<u64>,
}

/// Race settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceConfig {
    /// Concurrent participants per race.
    pub participants: usize,
    /// Time allowed for all participants to finish.
    pub timeout: Duration,
}

/// Where and how the harness reaches the booking API.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Root URL of the booking API.
    pub base_url: String,
    /// Login user name.
    pub username: String,
    /// Login password, already decoded.
    pub password: SecureString,
    /// `None` disables the response-time check.
    pub max_response_time: Option<Duration>,
    /// Transport timeout of every request.
    pub request_timeout: Duration,
    /// Race settings.
    pub race: RaceConfig,
}

impl HarnessConfig {
    /// Loads the file at `path`, then applies the `BOOKING_*` environment
    /// variables.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or is invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "configuration loaded");
        Self::parse(&contents, |key| env::var(key).ok())
    }

    /// Parses YAML contents, looking overrides up with `env`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the YAML is invalid, a required key is
    /// missing, or the password is not base64.
    pub fn parse(
        contents: &str,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_saphyr::from_str(contents).map_err(|err| ConfigError::Yaml {
            message: err.to_string(),
        })?;
        let RawConfig {
            base_url,
            username,
            password,
            max_response_time_ms,
            request_timeout_ms,
            race,
        } = raw;

        let base_url = env(ENV_BASE_URL)
            .or(base_url)
            .ok_or(ConfigError::Missing { key: "base_url" })?;
        let username = env(ENV_USERNAME)
            .or(username)
            .ok_or(ConfigError::Missing { key: "username" })?;
        let password = env(ENV_PASSWORD)
            .or(password)
            .ok_or(ConfigError::Missing { key: "password" })?;
        let password = decode_password(&password)?;

        let max_response_time = match max_response_time_ms {
            None => Some(DEFAULT_MAX_RESPONSE_TIME),
            Some(0) => None,
            Some(ms) => Some(Duration::from_millis(ms)),
        };
        let request_timeout = request_timeout_ms
            .map_or(DEFAULT_REQUEST_TIMEOUT, Duration::from_millis);
        let race = RaceConfig {
            participants: race.participants.unwrap_or(DEFAULT_PARTICIPANTS),
            timeout: race
                .timeout_ms
                .map_or(DEFAULT_RACE_TIMEOUT, Duration::from_millis),
        };

        Ok(Self {
            base_url,
            username,
            password,
            max_response_time,
            request_timeout,
            race,
        })
    }

    /// A client builder targeting the configured API.
    ///
    /// # Errors
    ///
    /// Fails if `base_url` is not a usable URL.
    pub fn client_builder(&self) -> Result<RestClientBuilder, ApiClientError> {
        let builder = RestClient::builder()
            .with_base_url(&self.base_url)?
            .with_max_response_time(self.max_response_time)
            .with_request_timeout(self.request_timeout);
        Ok(builder)
    }

    /// A race harness with the configured participants and timeout.
    pub fn race_harness(&self, client: &RestClient) -> RaceHarness {
        RaceHarness::new(client)
            .with_participants(self.race.participants)
            .with_timeout(self.race.timeout)
    }
}

fn decode_password(encoded: &str) -> Result<SecureString, ConfigError> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|err| ConfigError::InvalidPassword {
            message: err.to_string(),
        })?;
    let password = String::from_utf8(bytes).map_err(|err| ConfigError::InvalidPassword {
        message: err.to_string(),
    })?;
    Ok(SecureString::from(password))
}
