//! Error types for the OpenAlex gateway.
//!
//! Every gateway call resolves to `Result<T, ApiError>`. The interpreter is
//! the only consumer: it turns each variant into a Terminal message and never
//! lets one propagate further.

use thiserror::Error;

/// Outcome taxonomy for a single gateway call.
///
/// `EmptyResult` is not a transport failure: the service answered with a
/// well-formed body containing zero matches. It lives here so callers handle
/// "nothing found" through the same match as the real failures, but it is
/// worded for users rather than operators.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No response at all (DNS, connect, timeout at the transport layer).
    #[error("network failure: could not reach the search service")]
    NetworkFailure,

    /// The service answered with a non-success HTTP status.
    #[error("search service returned HTTP {0}")]
    HttpFailure(u16),

    /// The body arrived but did not match the expected JSON shape.
    #[error("search service response was malformed")]
    MalformedResponse,

    /// Valid response, zero matches.
    #[error("no results found")]
    EmptyResult,
}

impl ApiError {
    /// Classify a reqwest error at the transport boundary.
    ///
    /// Status errors are mapped through [`ApiError::HttpFailure`]; everything
    /// that produced no usable response is a [`ApiError::NetworkFailure`].
    /// Decode errors mean the body did not match our serde shapes.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            ApiError::HttpFailure(status.as_u16())
        } else if err.is_decode() {
            ApiError::MalformedResponse
        } else {
            ApiError::NetworkFailure
        }
    }
}

/// Gateway-local result alias.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_are_user_facing() {
        assert_eq!(
            ApiError::HttpFailure(503).to_string(),
            "search service returned HTTP 503"
        );
        assert_eq!(ApiError::EmptyResult.to_string(), "no results found");
    }
}
