//! The scrape orchestrator.
//!
//! Strictly sequential: one filter at a time, one roster row at a time.
//! Remote calls are never batched or parallelised. Every upstream failure
//! is logged and treated as "no data from this call" — the worst outcome of
//! a bad filter or booking number is stale or absent fields, not a halted
//! run. Store failures do propagate.

use blotter_core::{
  roster::{NewCharge, NewInmate},
  store::RosterStore,
};
use serde::Serialize;

use crate::{client::RecordClient, name::split_name};

/// Filter tokens used when the caller does not restrict the run.
pub fn default_filters() -> Vec<String> {
  ('a'..='z').map(|c| c.to_string()).collect()
}

/// Options for one scrape pass.
#[derive(Debug, Clone, Default)]
pub struct ScrapeOptions {
  /// Search filter tokens, in order. Empty means all 26 letters.
  pub filters:         Vec<String>,
  /// Stop after this many processed roster rows. `None` means no cap.
  pub limit:           Option<u32>,
  /// Clear the whole roster before scraping.
  pub reset:           bool,
  /// When set, keep only charges whose description contains this string,
  /// case-insensitively. Used for narrow re-scrapes.
  pub charge_contains: Option<String>,
}

/// Counters reported by a scrape pass.
///
/// `scanned` counts processed roster rows, not filters. On a capped run
/// these are the partial truth up to the point the cap was hit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScrapeStats {
  pub scanned: u32,
  pub created: u32,
  pub updated: u32,
}

/// Run one scrape pass: fetch, normalise, and persist the roster.
pub async fn run_scrape<S: RosterStore>(
  client: &RecordClient,
  store: &S,
  options: &ScrapeOptions,
) -> Result<ScrapeStats, S::Error> {
  if options.reset {
    store.clear_roster().await?;
    tracing::info!("roster cleared before scrape");
  }

  let filters = if options.filters.is_empty() {
    default_filters()
  } else {
    options.filters.clone()
  };

  let mut stats = ScrapeStats::default();

  for filter in &filters {
    let rows = match client.search(filter).await {
      Ok(rows) => rows,
      Err(e) => {
        // One bad filter must not abort the run.
        tracing::warn!("search '{filter}' failed: {e}");
        continue;
      }
    };
    tracing::info!("filter '{filter}': {} rows", rows.len());

    for row in rows {
      let booking = row.booking_number;
      let (first_name, last_name) = split_name(&row.inmate_name);

      let details = match client.fetch_details(&booking).await {
        Ok(d) => d,
        Err(e) => {
          tracing::warn!("details for '{booking}' failed: {e}");
          Default::default()
        }
      };

      let (inmate, created) = store
        .upsert_inmate(NewInmate {
          booking_number: booking.clone(),
          first_name,
          last_name,
          age: details.age(),
        })
        .await?;
      if created {
        stats.created += 1;
      } else {
        stats.updated += 1;
      }

      let charge_rows = match client.fetch_charges(&booking).await {
        Ok(rows) => rows,
        Err(e) => {
          tracing::warn!("charges for '{booking}' failed: {e}");
          Vec::new()
        }
      };

      let kept: Vec<NewCharge> = charge_rows
        .into_iter()
        .filter_map(|c| {
          let description = c.charge.as_deref().unwrap_or("").trim().to_string();
          if description.is_empty() {
            return None;
          }
          if let Some(needle) = &options.charge_contains
            && !description.to_uppercase().contains(&needle.to_uppercase())
          {
            return None;
          }
          Some(NewCharge {
            description,
            bond_amount:       opt_trim(c.bond_amount),
            court_case_number: opt_trim(c.court_case_number),
            court_location:    opt_trim(c.court_location),
            note:              opt_trim(c.note),
          })
        })
        .collect();
      store.replace_charges(inmate.inmate_id, kept).await?;

      stats.scanned += 1;
      if let Some(limit) = options.limit
        && stats.scanned >= limit
      {
        // The cap applies mid-filter, not just between filters.
        tracing::info!(
          "scrape stopped at cap: scanned={} created={} updated={}",
          stats.scanned,
          stats.created,
          stats.updated
        );
        return Ok(stats);
      }
    }
  }

  tracing::info!(
    "scrape finished: scanned={} created={} updated={}",
    stats.scanned,
    stats.created,
    stats.updated
  );
  Ok(stats)
}

fn opt_trim(s: Option<String>) -> Option<String> {
  s.as_deref()
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(str::to_string)
}
