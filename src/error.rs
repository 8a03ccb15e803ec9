use actix_web::http::StatusCode;
use actix_web::ResponseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CspError {
    #[error("Invalid config shape: {0}")]
    InvalidConfig(String),

    #[error("Invalid directive name: {0}")]
    InvalidDirectiveName(String),

    #[error("Crypto error: {0}")]
    CryptoError(String),

    #[error("Header processing error: {0}")]
    HeaderError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl ResponseError for CspError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidConfig(_)
            | Self::InvalidDirectiveName(_)
            | Self::SerializationError(_) => StatusCode::BAD_REQUEST,

            Self::CryptoError(_) | Self::HeaderError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Non-fatal anomalies reported through a [`DiagnosticsSink`](crate::diagnostics::DiagnosticsSink).
///
/// The `Display` output is the exact message handed to the host's logger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CspWarning {
    #[error("invalid config, using defaults")]
    InvalidConfigShape,

    #[error("invalid nonces_for value: {0}")]
    InvalidNonceTarget(String),

    #[error("report_only enabled but no report_uri specified")]
    MissingReportDestination,

    #[error("nonce generation failed for {0}")]
    NonceUnavailable(String),
}
