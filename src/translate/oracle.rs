//! Translation oracle boundary.

use std::collections::HashMap;
use std::future::Future;

use thiserror::Error;

/// Translated text per locale code. Locales the oracle skipped are absent.
pub type OracleResponse = HashMap<String, String>;

/// Error types for oracle requests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    /// Called without target locales
    #[error("No target locales given")]
    NoTargets,

    /// Remote API rejected the request
    #[error("Translation API error: {0}")]
    Api(String),

    /// Connection failure or timeout
    #[error("Network error: {0}")]
    Network(String),

    /// Rate limited by the API
    #[error("Rate limited - try again later")]
    RateLimited,

    /// Credentials missing or rejected
    #[error("Unauthorized - check the API key")]
    Unauthorized,

    /// Server-side failure
    #[error("Translation service unavailable: {0}")]
    Unavailable(String),

    /// The model declined to answer
    #[error("Translation refused: {0}")]
    Refused(String),

    /// Response did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Client could not be configured
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl OracleError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            OracleError::Network(_) | OracleError::RateLimited | OracleError::Unavailable(_)
        )
    }
}

impl From<serde_json::Error> for OracleError {
    fn from(err: serde_json::Error) -> Self {
        OracleError::InvalidResponse(err.to_string())
    }
}

/// A service that translates one source text into several locales at once.
pub trait TranslationOracle {
    /// Translate `source_text` into every locale of `target_locales`.
    ///
    /// A response may cover only some of the targets. Failure is reported as
    /// an [`OracleError`], never as an empty response.
    fn request_translation(
        &self,
        source_text: &str,
        target_locales: &[String],
    ) -> impl Future<Output = Result<OracleResponse, OracleError>> + Send;
}
