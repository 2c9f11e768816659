//! Client for the Pwned Passwords API (v2).
//!
//! Supports the two lookup shapes the service offers: exact search by full
//! password or hash, and k-anonymity range search by the first 5 hex
//! characters of a SHA-1 digest. All HTTP and network outcomes are
//! normalized into [`SearchResult`] or [`Error`]; retry policy is left to
//! the caller.

mod client;
mod errors;
mod types;

pub use self::client::Client;
pub use self::errors::{Error, ServiceCause};
pub use self::types::SearchResult;
