//! Error taxonomy for the farm assistant.
//!
//! Each enum pairs a detailed `Display` for logs with a short `user_message()`
//! a grower can act on.

use thiserror::Error;

/// Anything that can stop the assistant from starting or finishing a command.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("network: {0}")]
    Network(#[from] NetworkError),

    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("weather: {0}")]
    Weather(#[from] WeatherError),

    #[error(transparent)]
    Other(anyhow::Error),
}

/// Recovers a [`ConfigError`] that travelled through `anyhow` so it keeps its message.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<ConfigError>() {
            Ok(config) => Self::Config(config),
            Err(other) => Self::Other(other),
        }
    }
}

impl AppError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Network(e) => e.user_message(),
            Self::Config(e) => e.user_message(),
            Self::Weather(e) => e.user_message(),
            Self::Other(_) => "Something went wrong. Please try again.",
        }
    }
}

/// Transport-level failures talking to a remote service.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("could not connect: {0}")]
    ConnectionFailed(String),

    #[error("timed out")]
    Timeout,

    #[error("HTTP {status}: {message}")]
    ServerError { status: u16, message: String },

    #[error("unreadable body: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::ConnectionFailed(_) => "No connection. Check the farm's internet access.",
            Self::Timeout => "The service took too long to answer.",
            Self::ServerError { status, .. } if *status >= 500 => {
                "The service is having trouble right now. Try again later."
            }
            Self::ServerError { .. } => "The service refused the request.",
            Self::InvalidResponse(_) => "The service answered with something unexpected.",
        }
    }
}

/// Problems with `config.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("invalid settings: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Parse { .. } => "The settings file is damaged. Fix or delete config.toml.",
            Self::Invalid(_) => "Some settings are invalid. Check config.toml.",
        }
    }
}

/// Weather acquisition failures.
///
/// None of these reach the weather panel: each is absorbed where it occurs and
/// turned into "try the next provider" or "use the fallback snapshot".
#[derive(Debug, Error)]
pub enum WeatherError {
    /// A geolocation, forecast or geocoding call failed or returned a non-success status.
    #[error("{provider} unavailable: {source}")]
    ProviderUnavailable {
        provider: String,
        #[source]
        source: NetworkError,
    },

    /// The response parsed but is missing sections the flow requires.
    #[error("invalid response shape: {0}")]
    InvalidResponseShape(String),

    /// Every IP-geolocation provider was tried without a usable record.
    #[error("no usable location after trying {attempted} provider(s)")]
    NoUsableLocation { attempted: usize },

    #[error("HTTP client could not be created: {0}")]
    ClientInit(String),
}

impl WeatherError {
    pub fn provider_unavailable(provider: impl Into<String>, source: NetworkError) -> Self {
        Self::ProviderUnavailable {
            provider: provider.into(),
            source,
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::ProviderUnavailable { .. } => {
                "Weather service unavailable. Showing demo weather."
            }
            Self::InvalidResponseShape(_) => {
                "Weather service sent unexpected data. Showing demo weather."
            }
            Self::NoUsableLocation { .. } => {
                "Could not detect your location. Using the default farm region."
            }
            Self::ClientInit(_) => "Weather service could not start.",
        }
    }
}

/// Classify `reqwest` failures into [`NetworkError`].
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        let detail = self.to_string();
        match self.status() {
            _ if self.is_timeout() => NetworkError::Timeout,
            _ if self.is_decode() => NetworkError::InvalidResponse(detail),
            Some(status) if !self.is_connect() => NetworkError::ServerError {
                status: status.as_u16(),
                message: detail,
            },
            _ => NetworkError::ConnectionFailed(detail),
        }
    }
}
