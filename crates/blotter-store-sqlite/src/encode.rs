//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. UUIDs are stored as
//! hyphenated lowercase strings. Mode tags are stored as their URL form.

use blotter_core::{
  leaderboard::LeaderboardEntry,
  mode::{IndexSide, Mode},
  roster::{Charge, Inmate},
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Mode ────────────────────────────────────────────────────────────────────

pub fn encode_mode(m: Mode) -> &'static str { m.as_str() }

pub fn decode_mode(s: &str) -> Result<Mode> {
  match s {
    "child" => Ok(Mode::Child),
    "murder" => Ok(Mode::Murder),
    "drugs" => Ok(Mode::Drugs),
    other => Err(Error::UnknownMode(other.to_string())),
  }
}

// ─── Index tables ────────────────────────────────────────────────────────────

/// The marker table backing one category side. Table names are fixed at
/// compile time; they are safe to splice into SQL.
pub fn index_table(side: IndexSide) -> &'static str {
  match side {
    IndexSide::ChildAbuse => "idx_child_abuse",
    IndexSide::NonChildAbuse => "idx_non_child_abuse",
    IndexSide::Murder => "idx_murder",
    IndexSide::NonMurder => "idx_non_murder",
    IndexSide::Cannabis => "idx_cannabis",
    IndexSide::CocaineFentanyl => "idx_cocaine_fentanyl",
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from an `inmates` row.
pub struct RawInmate {
  pub inmate_id:      String,
  pub booking_number: String,
  pub first_name:     String,
  pub last_name:      String,
  pub age:            Option<i64>,
  pub created_at:     String,
}

impl RawInmate {
  pub fn into_inmate(self) -> Result<Inmate> {
    Ok(Inmate {
      inmate_id:      decode_uuid(&self.inmate_id)?,
      booking_number: self.booking_number,
      first_name:     self.first_name,
      last_name:      self.last_name,
      age:            self.age,
      created_at:     decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `charges` row.
pub struct RawCharge {
  pub charge_id:         String,
  pub inmate_id:         String,
  pub description:       String,
  pub bond_amount:       Option<String>,
  pub court_case_number: Option<String>,
  pub court_location:    Option<String>,
  pub note:              Option<String>,
}

impl RawCharge {
  pub fn into_charge(self) -> Result<Charge> {
    Ok(Charge {
      charge_id:         decode_uuid(&self.charge_id)?,
      inmate_id:         decode_uuid(&self.inmate_id)?,
      description:       self.description,
      bond_amount:       self.bond_amount,
      court_case_number: self.court_case_number,
      court_location:    self.court_location,
      note:              self.note,
    })
  }
}

/// Raw strings read directly from a `leaderboard_entries` row.
pub struct RawEntry {
  pub entry_id:   String,
  pub name:       String,
  pub score:      i64,
  pub mode:       String,
  pub created_at: String,
}

impl RawEntry {
  pub fn into_entry(self) -> Result<LeaderboardEntry> {
    Ok(LeaderboardEntry {
      entry_id:   decode_uuid(&self.entry_id)?,
      name:       self.name,
      score:      self.score,
      mode:       decode_mode(&self.mode)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
