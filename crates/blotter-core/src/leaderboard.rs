//! Leaderboard entries — immutable once recorded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::mode::Mode;

/// Name substituted when a player submits a blank one.
pub const DEFAULT_NAME: &str = "Anonymous";

/// A recorded final score. Never updated or deleted; display order is
/// score descending, then creation time ascending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
  pub entry_id:   Uuid,
  pub name:       String,
  pub score:      i64,
  pub mode:       Mode,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::RosterStore::add_leaderboard_entry`].
#[derive(Debug, Clone)]
pub struct NewLeaderboardEntry {
  pub name:  String,
  pub score: i64,
  pub mode:  Mode,
}

impl NewLeaderboardEntry {
  /// Build an entry, substituting [`DEFAULT_NAME`] for a blank name.
  /// Score validation (> 0) is the caller's responsibility — the quiz
  /// adapter refuses to record zero-score games at all.
  pub fn new(name: &str, score: i64, mode: Mode) -> Self {
    let name = name.trim();
    Self {
      name: if name.is_empty() { DEFAULT_NAME.to_string() } else { name.to_string() },
      score,
      mode,
    }
  }
}
