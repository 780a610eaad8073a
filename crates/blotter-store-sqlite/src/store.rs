//! [`SqliteStore`] — the SQLite implementation of [`RosterStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use blotter_core::{
  leaderboard::{LeaderboardEntry, NewLeaderboardEntry},
  mode::{IndexSide, Mode},
  roster::{Charge, Inmate, NewCharge, NewInmate},
  store::RosterStore,
};

use crate::{
  Error, Result,
  encode::{
    RawCharge, RawEntry, RawInmate, encode_dt, encode_mode, encode_uuid,
    index_table,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A blotter roster store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_inmate_where(
    &self,
    column: &'static str,
    key: String,
  ) -> Result<Option<Inmate>> {
    let raw: Option<RawInmate> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT inmate_id, booking_number, first_name, last_name, age, created_at
           FROM inmates WHERE {column} = ?1"
        );
        Ok(
          conn
            .query_row(&sql, rusqlite::params![key], |row| {
              Ok(RawInmate {
                inmate_id:      row.get(0)?,
                booking_number: row.get(1)?,
                first_name:     row.get(2)?,
                last_name:      row.get(3)?,
                age:            row.get(4)?,
                created_at:     row.get(5)?,
              })
            })
            .optional()?,
        )
      })
      .await?;

    raw.map(RawInmate::into_inmate).transpose()
  }
}

// ─── RosterStore impl ────────────────────────────────────────────────────────

impl RosterStore for SqliteStore {
  type Error = Error;

  // ── Inmates ───────────────────────────────────────────────────────────────

  async fn upsert_inmate(&self, input: NewInmate) -> Result<(Inmate, bool)> {
    // Candidate identity, used only when the booking number is new.
    let candidate_id = encode_uuid(Uuid::new_v4());
    let now_str = encode_dt(Utc::now());

    let (raw, created): (RawInmate, bool) = self
      .conn
      .call(move |conn| {
        let existing: Option<String> = conn
          .query_row(
            "SELECT inmate_id FROM inmates WHERE booking_number = ?1",
            rusqlite::params![input.booking_number],
            |r| r.get(0),
          )
          .optional()?;

        let (id_str, created) = match existing {
          Some(id) => {
            // Latest scrape wins: age is overwritten even to NULL.
            conn.execute(
              "UPDATE inmates SET first_name = ?2, last_name = ?3, age = ?4
               WHERE inmate_id = ?1",
              rusqlite::params![id, input.first_name, input.last_name, input.age],
            )?;
            (id, false)
          }
          None => {
            conn.execute(
              "INSERT INTO inmates
                 (inmate_id, booking_number, first_name, last_name, age, created_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
              rusqlite::params![
                candidate_id,
                input.booking_number,
                input.first_name,
                input.last_name,
                input.age,
                now_str,
              ],
            )?;
            (candidate_id, true)
          }
        };

        let raw = conn.query_row(
          "SELECT inmate_id, booking_number, first_name, last_name, age, created_at
           FROM inmates WHERE inmate_id = ?1",
          rusqlite::params![id_str],
          |row| {
            Ok(RawInmate {
              inmate_id:      row.get(0)?,
              booking_number: row.get(1)?,
              first_name:     row.get(2)?,
              last_name:      row.get(3)?,
              age:            row.get(4)?,
              created_at:     row.get(5)?,
            })
          },
        )?;

        Ok((raw, created))
      })
      .await?;

    Ok((raw.into_inmate()?, created))
  }

  async fn get_inmate(&self, id: Uuid) -> Result<Option<Inmate>> {
    self.get_inmate_where("inmate_id", encode_uuid(id)).await
  }

  async fn get_inmate_by_booking(
    &self,
    booking_number: &str,
  ) -> Result<Option<Inmate>> {
    self
      .get_inmate_where("booking_number", booking_number.to_owned())
      .await
  }

  async fn list_inmate_ids(&self) -> Result<Vec<Uuid>> {
    let ids: Vec<String> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT inmate_id FROM inmates")?;
        let rows = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    ids.iter().map(|s| crate::encode::decode_uuid(s)).collect()
  }

  async fn inmate_count(&self) -> Result<u64> {
    let n: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM inmates", [], |r| r.get(0))?)
      })
      .await?;
    Ok(n as u64)
  }

  async fn clear_roster(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        // Charges and index markers go with their inmates via ON DELETE CASCADE.
        conn.execute("DELETE FROM inmates", [])?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Charges ───────────────────────────────────────────────────────────────

  async fn replace_charges(
    &self,
    inmate_id: Uuid,
    charges: Vec<NewCharge>,
  ) -> Result<usize> {
    let inmate_id_str = encode_uuid(inmate_id);
    let rows: Vec<(String, NewCharge)> = charges
      .into_iter()
      .map(|c| (encode_uuid(Uuid::new_v4()), c))
      .collect();

    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "DELETE FROM charges WHERE inmate_id = ?1",
          rusqlite::params![inmate_id_str],
        )?;
        for (charge_id, c) in &rows {
          tx.execute(
            "INSERT INTO charges
               (charge_id, inmate_id, description, bond_amount,
                court_case_number, court_location, note)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
              charge_id,
              inmate_id_str,
              c.description,
              c.bond_amount,
              c.court_case_number,
              c.court_location,
              c.note,
            ],
          )?;
        }
        tx.commit()?;
        Ok(rows.len())
      })
      .await?;

    Ok(inserted)
  }

  async fn charges_for(&self, inmate_id: Uuid) -> Result<Vec<Charge>> {
    let inmate_id_str = encode_uuid(inmate_id);

    let raws: Vec<RawCharge> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT charge_id, inmate_id, description, bond_amount,
                  court_case_number, court_location, note
           FROM charges WHERE inmate_id = ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![inmate_id_str], |row| {
            Ok(RawCharge {
              charge_id:         row.get(0)?,
              inmate_id:         row.get(1)?,
              description:       row.get(2)?,
              bond_amount:       row.get(3)?,
              court_case_number: row.get(4)?,
              court_location:    row.get(5)?,
              note:              row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCharge::into_charge).collect()
  }

  async fn list_charges(&self) -> Result<Vec<Charge>> {
    let raws: Vec<RawCharge> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT charge_id, inmate_id, description, bond_amount,
                  court_case_number, court_location, note
           FROM charges",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawCharge {
              charge_id:         row.get(0)?,
              inmate_id:         row.get(1)?,
              description:       row.get(2)?,
              bond_amount:       row.get(3)?,
              court_case_number: row.get(4)?,
              court_location:    row.get(5)?,
              note:              row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCharge::into_charge).collect()
  }

  // ── Category indexes ──────────────────────────────────────────────────────

  async fn rebuild_index(
    &self,
    side: IndexSide,
    ids: Vec<Uuid>,
  ) -> Result<usize> {
    let table = index_table(side);
    let now_str = encode_dt(Utc::now());
    let id_strs: Vec<String> = ids.into_iter().map(encode_uuid).collect();

    let count = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(&format!("DELETE FROM {table}"), [])?;
        for id in &id_strs {
          // OR IGNORE keeps a rebuild idempotent when handed duplicate ids.
          tx.execute(
            &format!(
              "INSERT OR IGNORE INTO {table} (inmate_id, created_at)
               VALUES (?1, ?2)"
            ),
            rusqlite::params![id, now_str],
          )?;
        }
        let count: i64 =
          tx.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| {
            r.get(0)
          })?;
        tx.commit()?;
        Ok(count as usize)
      })
      .await?;

    Ok(count)
  }

  async fn index_ids(&self, side: IndexSide) -> Result<Vec<Uuid>> {
    let table = index_table(side);

    let ids: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT inmate_id FROM {table}"))?;
        let rows = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    ids.iter().map(|s| crate::encode::decode_uuid(s)).collect()
  }

  // ── Leaderboard ───────────────────────────────────────────────────────────

  async fn add_leaderboard_entry(
    &self,
    input: NewLeaderboardEntry,
  ) -> Result<LeaderboardEntry> {
    let entry = LeaderboardEntry {
      entry_id:   Uuid::new_v4(),
      name:       input.name,
      score:      input.score,
      mode:       input.mode,
      created_at: Utc::now(),
    };

    let id_str   = encode_uuid(entry.entry_id);
    let name     = entry.name.clone();
    let score    = entry.score;
    let mode_str = encode_mode(entry.mode).to_owned();
    let at_str   = encode_dt(entry.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO leaderboard_entries (entry_id, name, score, mode, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, name, score, mode_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(entry)
  }

  async fn top_entries(
    &self,
    mode: Mode,
    limit: usize,
  ) -> Result<Vec<LeaderboardEntry>> {
    let mode_str = encode_mode(mode).to_owned();
    let limit_val = limit as i64;

    let raws: Vec<RawEntry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT entry_id, name, score, mode, created_at
           FROM leaderboard_entries
           WHERE mode = ?1
           ORDER BY score DESC, created_at ASC
           LIMIT ?2",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![mode_str, limit_val], |row| {
            Ok(RawEntry {
              entry_id:   row.get(0)?,
              name:       row.get(1)?,
              score:      row.get(2)?,
              mode:       row.get(3)?,
              created_at: row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEntry::into_entry).collect()
  }
}
