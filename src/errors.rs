//! Error types for the API client.

use thiserror::Error;

/// Errors from Pwned Passwords API operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The supplied argument failed validation; no request was made.
    /// Not retriable until the caller fixes the input.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// The API returned HTTP 429. Retriable after the indicated delay.
    #[error("The API is rate limited, please retry after {retry_after} seconds.")]
    RateLimited {
        /// Seconds to wait, as given by the server's `Retry-After` header.
        retry_after: String,
    },
    /// The service could not be reached, or answered with an unexpected
    /// status. Retriable with backoff, no guarantee.
    #[error("Error connecting to service.")]
    ServiceUnavailable(#[source] ServiceCause),
}

/// Underlying cause of [`Error::ServiceUnavailable`].
#[derive(Error, Debug)]
pub enum ServiceCause {
    /// A response was received but its status is not one the API contract
    /// gives meaning to.
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    /// No usable response: connect failure, timeout, redirect loop, or a
    /// body that could not be read.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}
