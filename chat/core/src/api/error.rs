//! API Errors
//!
//! Every failure of a call to the RAG service is normalized into [`ApiError`].
//! The variants only matter for diagnostics; callers treat them all as
//! "the request failed" and show [`ApiError::message`].

use thiserror::Error;

/// Errors from the RAG service client
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never got a response (connection refused, DNS, timeout)
    #[error("{context}: no response from server ({reason})")]
    NoResponse {
        /// What the client was doing
        context: &'static str,
        /// Transport-level reason
        reason: String,
        /// Whether the transport timed out
        timed_out: bool,
    },

    /// The service answered with a non-2xx status
    #[error("{context} [{status}]: {detail}")]
    Status {
        /// What the client was doing
        context: &'static str,
        /// HTTP status code
        status: u16,
        /// `detail` from the error body, or the canonical status text
        detail: String,
    },

    /// A 2xx response whose body could not be decoded
    #[error("{context}: unreadable response body ({reason})")]
    Decode {
        /// What the client was doing
        context: &'static str,
        /// Decoder message
        reason: String,
    },

    /// The client could not be set up (bad base URL, TLS init failure)
    #[error("Invalid API configuration for {url}: {reason}")]
    Setup {
        /// Offending URL
        url: String,
        /// Why it was rejected
        reason: String,
    },
}

/// Coarse classification of an [`ApiError`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// No response at all
    NoResponse,
    /// Error status from the server
    Status,
    /// Undecodable success body
    Decode,
    /// Client misconfiguration
    Setup,
}

impl ApiError {
    /// Human-readable message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Classification for logging and tests
    pub fn kind(&self) -> ApiErrorKind {
        match self {
            Self::NoResponse { .. } => ApiErrorKind::NoResponse,
            Self::Status { .. } => ApiErrorKind::Status,
            Self::Decode { .. } => ApiErrorKind::Decode,
            Self::Setup { .. } => ApiErrorKind::Setup,
        }
    }

    /// HTTP status, for [`ApiError::Status`]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Emit the diagnostic log line for this failure
    ///
    /// A missing response and an error status are logged differently even
    /// though callers surface them the same way.
    pub fn log(&self) {
        match self {
            Self::NoResponse {
                context,
                reason,
                timed_out,
            } => {
                tracing::error!(
                    timed_out = *timed_out,
                    reason = %reason,
                    "{context}: No response from server. Is the backend running?"
                );
            }
            Self::Status {
                context,
                status,
                detail,
            } => {
                tracing::error!(status = *status, detail = %detail, "{context}");
                match status {
                    429 => tracing::error!("Rate limit exceeded. Please try again later."),
                    500 => tracing::error!("Server error. Please contact support if this persists."),
                    422 => tracing::error!("Invalid request. Please check your input."),
                    _ => {}
                }
            }
            Self::Decode { context, reason } => {
                tracing::error!(reason = %reason, "{context}: could not decode response");
            }
            Self::Setup { url, reason } => {
                tracing::error!(url = %url, reason = %reason, "API client setup failed");
            }
        }
    }
}
