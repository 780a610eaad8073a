//! The `RosterStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `blotter-store-sqlite`).
//! Higher layers (`blotter-scrape`, `blotter-api`) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  leaderboard::{LeaderboardEntry, NewLeaderboardEntry},
  mode::{IndexSide, Mode},
  roster::{Charge, Inmate, NewCharge, NewInmate},
};

/// Abstraction over a blotter roster backend.
///
/// Writes come in two coarse-grained shapes: scrape passes upsert inmates
/// and wholesale-replace their charge sets, and classification passes clear
/// and rebuild whole marker sets. Nothing below the inmate level is ever
/// updated in place.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait RosterStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Inmates ───────────────────────────────────────────────────────────

  /// Create or refresh an inmate keyed by booking number. Every field of
  /// `input` overwrites the stored row, age included.
  ///
  /// The boolean is `true` when the row was newly created.
  fn upsert_inmate(
    &self,
    input: NewInmate,
  ) -> impl Future<Output = Result<(Inmate, bool), Self::Error>> + Send + '_;

  /// Retrieve an inmate by store id. Returns `None` if not found.
  fn get_inmate(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Inmate>, Self::Error>> + Send + '_;

  /// Retrieve an inmate by upstream booking number.
  fn get_inmate_by_booking<'a>(
    &'a self,
    booking_number: &'a str,
  ) -> impl Future<Output = Result<Option<Inmate>, Self::Error>> + Send + 'a;

  /// All inmate ids currently in the store.
  fn list_inmate_ids(
    &self,
  ) -> impl Future<Output = Result<Vec<Uuid>, Self::Error>> + Send + '_;

  fn inmate_count(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Hard-delete every inmate, along with its charges and index markers.
  fn clear_roster(
    &self,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Charges ───────────────────────────────────────────────────────────

  /// Delete all of an inmate's charges and insert `charges` in their place.
  /// Returns the number of rows inserted.
  fn replace_charges(
    &self,
    inmate_id: Uuid,
    charges: Vec<NewCharge>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// All charges for one inmate.
  fn charges_for(
    &self,
    inmate_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Charge>, Self::Error>> + Send + '_;

  /// Every charge in the store. Classification scans this.
  fn list_charges(
    &self,
  ) -> impl Future<Output = Result<Vec<Charge>, Self::Error>> + Send + '_;

  // ── Category indexes ──────────────────────────────────────────────────

  /// Clear one side's marker set and re-insert markers for `ids`.
  /// Duplicate ids are tolerated silently. Returns the marker count.
  fn rebuild_index(
    &self,
    side: IndexSide,
    ids: Vec<Uuid>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// The inmate ids currently marked on one side.
  fn index_ids(
    &self,
    side: IndexSide,
  ) -> impl Future<Output = Result<Vec<Uuid>, Self::Error>> + Send + '_;

  // ── Leaderboard ───────────────────────────────────────────────────────

  fn add_leaderboard_entry(
    &self,
    input: NewLeaderboardEntry,
  ) -> impl Future<Output = Result<LeaderboardEntry, Self::Error>> + Send + '_;

  /// The top `limit` entries for a mode, score descending then oldest first.
  fn top_entries(
    &self,
    mode: Mode,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<LeaderboardEntry>, Self::Error>> + Send + '_;
}
