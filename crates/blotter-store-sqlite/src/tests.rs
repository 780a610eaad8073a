//! Integration tests for `SqliteStore` against an in-memory database.

use std::collections::HashSet;

use blotter_core::{
  classify::{ClassifyReport, run_classification},
  leaderboard::NewLeaderboardEntry,
  mode::{IndexSide, Mode},
  roster::{NewCharge, NewInmate},
  store::RosterStore,
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn inmate(booking: &str, first: &str, last: &str, age: Option<i64>) -> NewInmate {
  NewInmate {
    booking_number: booking.to_string(),
    first_name:     first.to_string(),
    last_name:      last.to_string(),
    age,
  }
}

/// Insert an inmate with one charge per description, returning its id.
async fn booked_with_charges(
  s: &SqliteStore,
  booking: &str,
  descriptions: &[&str],
) -> Uuid {
  let (inm, _) = s
    .upsert_inmate(inmate(booking, "JOHN", "DOE", Some(30)))
    .await
    .unwrap();
  let charges = descriptions.iter().map(|d| NewCharge::new(*d)).collect();
  s.replace_charges(inm.inmate_id, charges).await.unwrap();
  inm.inmate_id
}

// ─── Inmates ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn upsert_creates_then_updates() {
  let s = store().await;

  let (first, created) = s
    .upsert_inmate(inmate("24-001234", "TODERICK", "ADAMS", Some(34)))
    .await
    .unwrap();
  assert!(created);
  assert_eq!(first.age, Some(34));

  let (second, created) = s
    .upsert_inmate(inmate("24-001234", "TODERICK LEONARD", "ADAMS", None))
    .await
    .unwrap();
  assert!(!created);
  // Same row, refreshed fields. Age is overwritten even to absent.
  assert_eq!(second.inmate_id, first.inmate_id);
  assert_eq!(second.first_name, "TODERICK LEONARD");
  assert_eq!(second.age, None);

  assert_eq!(s.inmate_count().await.unwrap(), 1);
}

#[tokio::test]
async fn get_inmate_by_booking_missing_returns_none() {
  let s = store().await;
  assert!(s.get_inmate_by_booking("99-999999").await.unwrap().is_none());
}

#[tokio::test]
async fn get_inmate_roundtrips_both_keys() {
  let s = store().await;
  let (inm, _) = s
    .upsert_inmate(inmate("24-005678", "JANE", "ROE", None))
    .await
    .unwrap();

  let by_id = s.get_inmate(inm.inmate_id).await.unwrap().unwrap();
  assert_eq!(by_id.booking_number, "24-005678");

  let by_booking = s.get_inmate_by_booking("24-005678").await.unwrap().unwrap();
  assert_eq!(by_booking.inmate_id, inm.inmate_id);
}

#[tokio::test]
async fn clear_roster_cascades_to_charges_and_markers() {
  let s = store().await;
  let id = booked_with_charges(&s, "24-000001", &["MURDER IN THE FIRST DEGREE"]).await;
  s.rebuild_index(IndexSide::Murder, vec![id]).await.unwrap();

  s.clear_roster().await.unwrap();

  assert_eq!(s.inmate_count().await.unwrap(), 0);
  assert!(s.list_charges().await.unwrap().is_empty());
  assert!(s.index_ids(IndexSide::Murder).await.unwrap().is_empty());
}

// ─── Charges ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn replace_charges_is_wholesale() {
  let s = store().await;
  let id = booked_with_charges(
    &s,
    "24-000002",
    &["BURGLARY", "GRAND THEFT", "RESISTING ARREST"],
  )
  .await;
  assert_eq!(s.charges_for(id).await.unwrap().len(), 3);

  let inserted = s
    .replace_charges(id, vec![NewCharge::new("TRESPASSING")])
    .await
    .unwrap();
  assert_eq!(inserted, 1);

  let remaining = s.charges_for(id).await.unwrap();
  assert_eq!(remaining.len(), 1);
  assert_eq!(remaining[0].description, "TRESPASSING");
}

#[tokio::test]
async fn replace_charges_with_empty_set_clears() {
  let s = store().await;
  let id = booked_with_charges(&s, "24-000003", &["LOITERING"]).await;

  let inserted = s.replace_charges(id, vec![]).await.unwrap();
  assert_eq!(inserted, 0);
  assert!(s.charges_for(id).await.unwrap().is_empty());
}

#[tokio::test]
async fn charge_optional_fields_roundtrip() {
  let s = store().await;
  let (inm, _) = s
    .upsert_inmate(inmate("24-000004", "JOHN", "DOE", None))
    .await
    .unwrap();

  let mut charge = NewCharge::new("DUI");
  charge.bond_amount = Some("$1,000.00".to_string());
  charge.court_case_number = Some("2024-CF-000123".to_string());
  s.replace_charges(inm.inmate_id, vec![charge]).await.unwrap();

  let stored = s.charges_for(inm.inmate_id).await.unwrap();
  assert_eq!(stored[0].bond_amount.as_deref(), Some("$1,000.00"));
  assert_eq!(stored[0].court_case_number.as_deref(), Some("2024-CF-000123"));
  assert_eq!(stored[0].court_location, None);
}

// ─── Category indexes ────────────────────────────────────────────────────────

#[tokio::test]
async fn rebuild_index_replaces_previous_markers() {
  let s = store().await;
  let a = booked_with_charges(&s, "24-000005", &["A"]).await;
  let b = booked_with_charges(&s, "24-000006", &["B"]).await;

  s.rebuild_index(IndexSide::Cannabis, vec![a]).await.unwrap();
  s.rebuild_index(IndexSide::Cannabis, vec![b]).await.unwrap();

  assert_eq!(s.index_ids(IndexSide::Cannabis).await.unwrap(), vec![b]);
}

#[tokio::test]
async fn rebuild_index_tolerates_duplicate_ids() {
  let s = store().await;
  let a = booked_with_charges(&s, "24-000007", &["A"]).await;

  let count = s
    .rebuild_index(IndexSide::ChildAbuse, vec![a, a, a])
    .await
    .unwrap();
  assert_eq!(count, 1);
}

// ─── Classification ──────────────────────────────────────────────────────────

#[tokio::test]
async fn classification_on_empty_roster_reports_empty() {
  let s = store().await;
  let report = run_classification(&s, Mode::Murder).await.unwrap();
  assert_eq!(report, ClassifyReport::Empty);
  assert!(s.index_ids(IndexSide::Murder).await.unwrap().is_empty());
}

#[tokio::test]
async fn murder_partition_covers_all_inmates() {
  let s = store().await;
  let killer =
    booked_with_charges(&s, "24-000010", &["MURDER IN THE FIRST DEGREE"]).await;
  let thief = booked_with_charges(&s, "24-000011", &["GRAND THEFT AUTO"]).await;
  // No charges at all still lands on the negative side.
  let (quiet, _) = s
    .upsert_inmate(inmate("24-000012", "NO", "CHARGES", None))
    .await
    .unwrap();

  let report = run_classification(&s, Mode::Murder).await.unwrap();
  assert_eq!(report, ClassifyReport::Partition { positive: 1, negative: 2 });

  let positive: HashSet<Uuid> =
    s.index_ids(IndexSide::Murder).await.unwrap().into_iter().collect();
  let negative: HashSet<Uuid> =
    s.index_ids(IndexSide::NonMurder).await.unwrap().into_iter().collect();

  assert!(positive.contains(&killer));
  assert!(negative.contains(&thief));
  assert!(negative.contains(&quiet.inmate_id));
  assert!(positive.is_disjoint(&negative));
  assert_eq!(
    (positive.len() + negative.len()) as u64,
    s.inmate_count().await.unwrap()
  );
}

#[tokio::test]
async fn child_rule_requires_cooccurrence_in_one_charge() {
  let s = store().await;
  // "child" and a secondary keyword split across two charges: negative.
  let split = booked_with_charges(
    &s,
    "24-000020",
    &["INTERFERENCE WITH CHILD CUSTODY", "AGGRAVATED ASSAULT"],
  )
  .await;
  // Both in one description: positive.
  let joint =
    booked_with_charges(&s, "24-000021", &["LEWD ACT UPON A CHILD"]).await;

  let report = run_classification(&s, Mode::Child).await.unwrap();
  assert_eq!(report, ClassifyReport::Partition { positive: 1, negative: 1 });

  assert_eq!(s.index_ids(IndexSide::ChildAbuse).await.unwrap(), vec![joint]);
  assert_eq!(
    s.index_ids(IndexSide::NonChildAbuse).await.unwrap(),
    vec![split]
  );
}

#[tokio::test]
async fn classification_rerun_is_idempotent() {
  let s = store().await;
  booked_with_charges(&s, "24-000030", &["MURDER"]).await;
  booked_with_charges(&s, "24-000031", &["ARSON"]).await;

  let first = run_classification(&s, Mode::Murder).await.unwrap();
  let pos_first: HashSet<Uuid> =
    s.index_ids(IndexSide::Murder).await.unwrap().into_iter().collect();

  let second = run_classification(&s, Mode::Murder).await.unwrap();
  let pos_second: HashSet<Uuid> =
    s.index_ids(IndexSide::Murder).await.unwrap().into_iter().collect();

  assert_eq!(first, second);
  assert_eq!(pos_first, pos_second);
}

#[tokio::test]
async fn drugs_sets_are_independent_and_may_overlap() {
  let s = store().await;
  let both = booked_with_charges(
    &s,
    "24-000040",
    &["TRAFFICKING COCAINE AND CANNABIS"],
  )
  .await;
  let neither = booked_with_charges(&s, "24-000041", &["DUI"]).await;

  let report = run_classification(&s, Mode::Drugs).await.unwrap();
  assert_eq!(
    report,
    ClassifyReport::Independent { cannabis: 1, cocaine_fentanyl: 1 }
  );

  let cannabis = s.index_ids(IndexSide::Cannabis).await.unwrap();
  let cocaine = s.index_ids(IndexSide::CocaineFentanyl).await.unwrap();
  assert_eq!(cannabis, vec![both]);
  assert_eq!(cocaine, vec![both]);
  assert!(!cannabis.contains(&neither));
}

// ─── Leaderboard ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn leaderboard_orders_by_score_then_age() {
  let s = store().await;
  s.add_leaderboard_entry(NewLeaderboardEntry::new("first", 5, Mode::Child))
    .await
    .unwrap();
  s.add_leaderboard_entry(NewLeaderboardEntry::new("top", 9, Mode::Child))
    .await
    .unwrap();
  s.add_leaderboard_entry(NewLeaderboardEntry::new("second", 5, Mode::Child))
    .await
    .unwrap();

  let entries = s.top_entries(Mode::Child, 50).await.unwrap();
  let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
  // Ties rank by earliest submission.
  assert_eq!(names, ["top", "first", "second"]);
}

#[tokio::test]
async fn leaderboard_is_scoped_per_mode() {
  let s = store().await;
  s.add_leaderboard_entry(NewLeaderboardEntry::new("c", 3, Mode::Child))
    .await
    .unwrap();
  s.add_leaderboard_entry(NewLeaderboardEntry::new("m", 7, Mode::Murder))
    .await
    .unwrap();

  let murder = s.top_entries(Mode::Murder, 50).await.unwrap();
  assert_eq!(murder.len(), 1);
  assert_eq!(murder[0].name, "m");
  assert_eq!(murder[0].mode, Mode::Murder);
}

#[tokio::test]
async fn top_entries_respects_limit() {
  let s = store().await;
  for i in 0..5 {
    s.add_leaderboard_entry(NewLeaderboardEntry::new("p", 10 + i, Mode::Drugs))
      .await
      .unwrap();
  }

  let top = s.top_entries(Mode::Drugs, 2).await.unwrap();
  assert_eq!(top.len(), 2);
  assert_eq!(top[0].score, 14);
  assert_eq!(top[1].score, 13);
}

#[tokio::test]
async fn blank_name_defaults_to_placeholder() {
  let s = store().await;
  let entry = s
    .add_leaderboard_entry(NewLeaderboardEntry::new("   ", 4, Mode::Child))
    .await
    .unwrap();
  assert_eq!(entry.name, blotter_core::leaderboard::DEFAULT_NAME);
}
