//! Handler for `GET /leaderboard/{mode}`.

use axum::{
  Json,
  extract::{Path, State},
};
use blotter_core::{leaderboard::LeaderboardEntry, mode::Mode, store::RosterStore};

use crate::{ApiState, error::ApiError};

/// How many entries a leaderboard page shows.
pub const LEADERBOARD_LIMIT: usize = 50;

/// `GET /leaderboard/{mode}` — top entries, best first.
pub async fn top<S>(
  State(state): State<ApiState<S>>,
  Path(mode): Path<Mode>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError>
where
  S: RosterStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let entries = state
    .store
    .top_entries(mode, LEADERBOARD_LIMIT)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(entries))
}
