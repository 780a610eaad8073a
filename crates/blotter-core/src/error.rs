//! Error types for `blotter-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A quiz choice was submitted while no pair is on the table. Callers
  /// should present a fresh round rather than treating this as fatal.
  #[error("no round is currently presented")]
  NoActiveRound,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
