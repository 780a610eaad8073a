//! Keyword classification over charge text.
//!
//! Each mode marks the inmate population by scanning charge descriptions
//! for fixed keyword sets. The child and murder pairs are exhaustive: the
//! negative side is the true complement, so together the two sides cover
//! every inmate exactly once. The drugs pair is two independent positive
//! sets — an inmate may be in both, one, or neither.
//!
//! A run clears and rebuilds the affected marker sets from scratch;
//! re-running without an intervening scrape yields identical sets.

use std::collections::HashSet;

use serde::Serialize;
use uuid::Uuid;

use crate::{mode::Mode, store::RosterStore};

// ─── Predicates ──────────────────────────────────────────────────────────────

/// Secondary keywords for the child-abuse rule.
///
/// A charge is positive only when `"child"` and at least one of these
/// appear in the SAME description — co-occurrence across separate charges
/// of one inmate does not count.
pub const CHILD_SECONDARY_KEYWORDS: &[&str] = &[
  "assault", "sex", "sexual", "abuse", "molest", "exploitation",
  "pornograph", "indecent", "lewd", "lascivious", "battery",
  "neglect", "endangerment", "solicitation", "entice", "incest",
  "rape", "sodomy", "traffick", "conduct", "exposure", "fondling",
  "statutory", "child abuse", "child neglect", "child porn", "video",
];

pub fn is_child_abuse_charge(description: &str) -> bool {
  let d = description.to_lowercase();
  d.contains("child") && CHILD_SECONDARY_KEYWORDS.iter().any(|kw| d.contains(kw))
}

pub fn is_murder_charge(description: &str) -> bool {
  description.to_lowercase().contains("murder")
}

pub fn is_cannabis_charge(description: &str) -> bool {
  description.to_lowercase().contains("cannabis")
}

pub fn is_cocaine_fentanyl_charge(description: &str) -> bool {
  let d = description.to_lowercase();
  d.contains("cocaine") || d.contains("fentanyl")
}

// ─── Run ─────────────────────────────────────────────────────────────────────

/// Outcome of a classification run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ClassifyReport {
  /// The roster is empty. Nothing was classified and no sets were touched.
  Empty,
  /// Exhaustive pair: the two sides partition the whole roster.
  Partition { positive: usize, negative: usize },
  /// Drugs: two independently-computed marker sets.
  Independent { cannabis: usize, cocaine_fentanyl: usize },
}

/// Recompute both marker sets for `mode` from the current charge store.
pub async fn run_classification<S: RosterStore>(
  store: &S,
  mode: Mode,
) -> Result<ClassifyReport, S::Error> {
  if store.inmate_count().await? == 0 {
    return Ok(ClassifyReport::Empty);
  }

  let charges = store.list_charges().await?;

  match mode {
    Mode::Child | Mode::Murder => {
      let matches: fn(&str) -> bool = match mode {
        Mode::Child => is_child_abuse_charge,
        _ => is_murder_charge,
      };

      let positive: HashSet<Uuid> = charges
        .iter()
        .filter(|c| matches(&c.description))
        .map(|c| c.inmate_id)
        .collect();
      let negative: Vec<Uuid> = store
        .list_inmate_ids()
        .await?
        .into_iter()
        .filter(|id| !positive.contains(id))
        .collect();
      let positive: Vec<Uuid> = positive.into_iter().collect();

      store.rebuild_index(mode.positive_side(), positive.clone()).await?;
      store.rebuild_index(mode.negative_side(), negative.clone()).await?;

      Ok(ClassifyReport::Partition {
        positive: positive.len(),
        negative: negative.len(),
      })
    }

    Mode::Drugs => {
      let cannabis: HashSet<Uuid> = charges
        .iter()
        .filter(|c| is_cannabis_charge(&c.description))
        .map(|c| c.inmate_id)
        .collect();
      let cocaine_fentanyl: HashSet<Uuid> = charges
        .iter()
        .filter(|c| is_cocaine_fentanyl_charge(&c.description))
        .map(|c| c.inmate_id)
        .collect();

      store
        .rebuild_index(mode.positive_side(), cannabis.iter().copied().collect())
        .await?;
      store
        .rebuild_index(
          mode.negative_side(),
          cocaine_fentanyl.iter().copied().collect(),
        )
        .await?;

      Ok(ClassifyReport::Independent {
        cannabis: cannabis.len(),
        cocaine_fentanyl: cocaine_fentanyl.len(),
      })
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
