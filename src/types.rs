//! Result type returned by both lookup operations.

use serde::{Deserialize, Serialize};

/// Outcome of a breach-password lookup.
///
/// Immutable; constructed only by the client's response interpreter.
/// For range search, `found` always equals `count > 0`. For exact search
/// the service's own 200 response determines `found`, so a body of `0`
/// still reports `found: true` (queried successfully, zero occurrences).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    found: bool,
    count: u64,
}

impl SearchResult {
    pub(crate) fn new(found: bool, count: u64) -> Self {
        Self { found, count }
    }

    /// Whether the password or hash was located by the service.
    pub fn found(&self) -> bool {
        self.found
    }

    /// Number of times the password appears in the breach corpus.
    pub fn count(&self) -> u64 {
        self.count
    }
}
