use axum::http::StatusCode;
use thiserror::Error;

impl From<std::fmt::Error> for NotifierError {
    fn from(err: std::fmt::Error) -> Self {
        Self::RenderError(format!("Failed to format report: {}", err))
    }
}

impl From<config::ConfigError> for NotifierError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum NotifierError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Webhook signature rejected: {0}")]
    InvalidSignature(String),

    #[error("Historical issue lookup failed: {0}")]
    HistoricalFetchFailed(String),

    #[error("Chat delivery failed: {0}")]
    DeliveryFailed(String),

    #[error("Render error: {0}")]
    RenderError(String),
}

impl NotifierError {
    /// HTTP status returned to the webhook caller for this failure.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            Self::InvalidSignature(_) => StatusCode::UNAUTHORIZED,
            Self::HistoricalFetchFailed(_) | Self::DeliveryFailed(_) => StatusCode::BAD_GATEWAY,
            Self::ConfigError(_) | Self::RenderError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn missing_field(field: &str) -> Self {
        Self::MalformedPayload(format!("required field `{}` is missing", field))
    }

    pub fn unexpected_status(service: &str, status: reqwest::StatusCode) -> String {
        format!("{} responded with {}", service, status)
    }
}
