//! HTTP client for the Pwned Passwords API.

use std::time::Duration;

use percent_encoding::{percent_encode, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use reqwest::StatusCode;
use url::Url;

use crate::{errors::ServiceCause, Error, SearchResult};

/// Production API endpoint.
const API_URL: &str = "https://api.pwnedpasswords.com";

/// Request timeout for the default HTTP client.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Fixed headers sent with every request.
const USER_AGENT: &str = concat!("pwned_api/", env!("CARGO_PKG_VERSION"));
const API_VERSION: &str = "2";

/// RFC 3986 encoding: everything except unreserved characters is escaped,
/// including `+`, `&`, and `/`.
const RAW_URL_ENCODE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Client for the Pwned Passwords API (v2).
///
/// Holds an immutable base URL and the HTTP transport. Safe to share and
/// call concurrently; timeout and connection policy belong to the
/// `reqwest::Client`, which callers may supply themselves.
pub struct Client {
    http: reqwest::Client,
    base_api_url: String,
}

impl Client {
    /// Creates a client pointing at the production API with a default
    /// transport.
    pub fn new() -> Result<Self, Error> {
        Self::with_base_url(API_URL)
    }

    /// Creates a client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::ServiceUnavailable(ServiceCause::Transport(e))
            })?;
        Ok(Self::with_http_client(http, base_url))
    }

    /// Creates a client around a caller-configured transport.
    pub fn with_http_client(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_api_url: base_url.to_string(),
        }
    }

    /// Looks up a password or full hash via the exact-search endpoint.
    ///
    /// Returns `found: true` with the occurrence count on HTTP 200 (a zero
    /// count still reports `found: true`, mirroring the service contract),
    /// and `found: false` on HTTP 404.
    pub async fn search_by_hash(&self, hash: &str) -> Result<SearchResult, Error> {
        if hash.is_empty() {
            return Err(Error::InvalidArgument(
                "hash must be a string with a minimum length of 1".to_string(),
            ));
        }

        let encoded = utf8_percent_encode(hash, RAW_URL_ENCODE).to_string();
        let url = self.endpoint_url("pwnedpassword", &encoded)?;
        let resp = self.get(url).await?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(SearchResult::new(false, 0));
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(rate_limited(&resp));
        }
        if !status.is_success() {
            tracing::error!("Password search failed with status {}", status);
            return Err(Error::ServiceUnavailable(ServiceCause::Status(
                status.as_u16(),
            )));
        }

        let body = read_body(resp).await?;
        let count = leading_count(strip_bom(&body));
        Ok(SearchResult::new(true, count))
    }

    /// Looks up a 40-character SHA-1 hash via the k-anonymity range
    /// endpoint, transmitting only its first 5 hex characters.
    ///
    /// The returned suffix list is matched locally against the uppercased
    /// remainder of `hash`. Unlike exact search, HTTP 404 is not part of
    /// this endpoint's contract and maps to [`Error::ServiceUnavailable`].
    pub async fn search_by_range(&self, hash: &str) -> Result<SearchResult, Error> {
        if hash.len() != 40 {
            return Err(Error::InvalidArgument(
                "hash must be a sha1 hash with a length of 40".to_string(),
            ));
        }

        // Byte-based split so a multi-byte char in a 40-byte input cannot panic.
        let (prefix, suffix) = hash.as_bytes().split_at(5);
        let prefix = prefix.to_ascii_uppercase();
        let encoded = percent_encode(&prefix, RAW_URL_ENCODE).to_string();
        let url = self.endpoint_url("range", &encoded)?;
        let resp = self.get(url).await?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(rate_limited(&resp));
        }
        if !status.is_success() {
            tracing::error!("Range search failed with status {}", status);
            return Err(Error::ServiceUnavailable(ServiceCause::Status(
                status.as_u16(),
            )));
        }

        let body = read_body(resp).await?;
        let suffix = String::from_utf8_lossy(suffix).to_ascii_uppercase();
        let re = Regex::new(&format!("{}:(\\d+)", regex::escape(&suffix))).map_err(|e| {
            Error::InvalidArgument(format!("hash produced an invalid pattern: {}", e))
        })?;
        match re.captures(strip_bom(&body)) {
            Some(caps) => {
                let count = leading_count(&caps[1]);
                Ok(SearchResult::new(count > 0, count))
            }
            None => Ok(SearchResult::new(false, 0)),
        }
    }

    fn endpoint_url(&self, endpoint: &str, encoded: &str) -> Result<Url, Error> {
        Url::parse(format!("{}/{}/{}", self.base_api_url, endpoint, encoded).as_str()).map_err(
            |e| {
                tracing::error!("Invalid URL constructed: {}", e);
                Error::InvalidArgument(format!("invalid request URL: {}", e))
            },
        )
    }

    async fn get(&self, url: Url) -> Result<reqwest::Response, Error> {
        self.http
            .get(url)
            .header("User-Agent", USER_AGENT)
            .header("api-version", API_VERSION)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to reach the API: {}", e);
                Error::ServiceUnavailable(ServiceCause::Transport(e))
            })
    }
}

fn rate_limited(resp: &reqwest::Response) -> Error {
    let retry_after = resp
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("0")
        .to_string();
    Error::RateLimited { retry_after }
}

async fn read_body(resp: reqwest::Response) -> Result<String, Error> {
    resp.text().await.map_err(|e| {
        tracing::error!("Failed to read response body: {}", e);
        Error::ServiceUnavailable(ServiceCause::Transport(e))
    })
}

/// Strips a leading UTF-8 byte-order-mark (`EF BB BF`), which the API
/// sometimes prefixes to text bodies.
fn strip_bom(s: &str) -> &str {
    s.strip_prefix('\u{feff}').unwrap_or(s)
}

/// Parses the longest leading run of ASCII digits, saturating on overflow.
/// Non-numeric text yields 0.
fn leading_count(s: &str) -> u64 {
    s.bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u64, |n, b| {
            n.saturating_mul(10).saturating_add(u64::from(b - b'0'))
        })
}
