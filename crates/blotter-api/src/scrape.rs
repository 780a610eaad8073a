//! Handler for `POST /scrape`.
//!
//! The body's `filters` string follows the operator shorthand: empty or
//! absent means all 26 letters, a single letter means that letter through
//! `z`, and anything else contributes its distinct alphabetic characters.

use std::collections::BTreeSet;

use axum::{Json, extract::State};
use blotter_core::store::RosterStore;
use blotter_scrape::{
  ScrapeOptions, ScrapeStats, run_scrape, scrape::default_filters,
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ScrapeBody {
  #[serde(default)]
  pub filters:         Option<String>,
  /// Row cap; `0` means uncapped.
  #[serde(default)]
  pub limit:           Option<u32>,
  #[serde(default)]
  pub reset:           bool,
  #[serde(default)]
  pub charge_contains: Option<String>,
}

/// Expand the operator filter shorthand into concrete tokens.
pub fn expand_filters(raw: &str) -> Vec<String> {
  let raw = raw.trim().to_lowercase();
  if raw.is_empty() {
    return default_filters();
  }

  let mut chars = raw.chars();
  if let (Some(only), None) = (chars.next(), chars.next())
    && only.is_ascii_alphabetic()
  {
    return (only..='z').map(|c| c.to_string()).collect();
  }

  raw
    .chars()
    .filter(char::is_ascii_alphabetic)
    .collect::<BTreeSet<char>>()
    .into_iter()
    .map(|c| c.to_string())
    .collect()
}

/// `POST /scrape` — run one scrape pass and report its counters.
pub async fn handler<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<ScrapeBody>,
) -> Result<Json<ScrapeStats>, ApiError>
where
  S: RosterStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let options = ScrapeOptions {
    filters:         body
      .filters
      .as_deref()
      .map(expand_filters)
      .unwrap_or_default(),
    limit:           body.limit.filter(|&l| l > 0),
    reset:           body.reset,
    charge_contains: body
      .charge_contains
      .filter(|s| !s.trim().is_empty()),
  };

  let stats = run_scrape(&state.client, state.store.as_ref(), &options)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(stats))
}

// ─── Tests ───────────────────────────────────────────────────────────────────
