//! Inmate and Charge — the records a scrape pass produces.
//!
//! An inmate's identity is its upstream booking number; `inmate_id` is the
//! store-assigned key everything else hangs off. Charges are never edited in
//! place: each scrape of an inmate replaces its whole charge set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Inmate ──────────────────────────────────────────────────────────────────

/// A booked inmate as of the latest scrape pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inmate {
  pub inmate_id:      Uuid,
  /// Upstream identifier, stable across scrapes. Unique in the store.
  pub booking_number: String,
  pub first_name:     String,
  pub last_name:      String,
  /// Absent when the upstream birth field is missing or non-numeric.
  pub age:            Option<i64>,
  pub created_at:     DateTime<Utc>,
}

/// Input to [`crate::store::RosterStore::upsert_inmate`].
///
/// Keyed by booking number. Every field overwrites what is stored — age
/// included, even when absent — so the store always reflects the latest
/// scrape snapshot.
#[derive(Debug, Clone)]
pub struct NewInmate {
  pub booking_number: String,
  pub first_name:     String,
  pub last_name:      String,
  pub age:            Option<i64>,
}

// ─── Charge ──────────────────────────────────────────────────────────────────

/// One charge row belonging to an inmate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Charge {
  pub charge_id:         Uuid,
  pub inmate_id:         Uuid,
  /// Free-text charge description. Never empty — blank rows are discarded
  /// at ingestion.
  pub description:       String,
  pub bond_amount:       Option<String>,
  pub court_case_number: Option<String>,
  pub court_location:    Option<String>,
  pub note:              Option<String>,
}

/// Input to [`crate::store::RosterStore::replace_charges`].
#[derive(Debug, Clone)]
pub struct NewCharge {
  pub description:       String,
  pub bond_amount:       Option<String>,
  pub court_case_number: Option<String>,
  pub court_location:    Option<String>,
  pub note:              Option<String>,
}

impl NewCharge {
  /// Convenience constructor with all optional fields absent.
  pub fn new(description: impl Into<String>) -> Self {
    Self {
      description:       description.into(),
      bond_amount:       None,
      court_case_number: None,
      court_location:    None,
      note:              None,
    }
  }
}
