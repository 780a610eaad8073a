//! Error type for `blotter-scrape`.

use thiserror::Error;

/// A failed upstream call.
///
/// The orchestrator treats every variant as "no data from this call":
/// logged, recovered, never propagated past its own boundary.
#[derive(Debug, Error)]
pub enum Error {
  /// Connection, TLS, or timeout failure before a usable response arrived.
  #[error("transport error: {0}")]
  Transport(#[source] reqwest::Error),

  /// The upstream answered with a non-success status.
  #[error("unexpected status {status} from {url}")]
  Status {
    status: reqwest::StatusCode,
    url:    String,
  },

  /// The body was not the JSON shape the endpoint promises.
  #[error("malformed response body: {0}")]
  Parse(#[source] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
