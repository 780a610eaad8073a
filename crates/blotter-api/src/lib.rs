//! JSON REST API for blotter.
//!
//! Exposes an axum [`Router`] backed by any [`blotter_core::store::RosterStore`]
//! plus the upstream record client. Auth, TLS, and transport concerns are
//! the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", blotter_api::api_router(state))
//! ```

pub mod classify;
pub mod error;
pub mod images;
pub mod leaderboard;
pub mod quiz;
pub mod scrape;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use blotter_core::store::RosterStore;
use blotter_scrape::RecordClient;

pub use error::ApiError;

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub store:  Arc<S>,
  pub client: RecordClient,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store:  self.store.clone(),
      client: self.client.clone(),
    }
  }
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: RosterStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Maintenance
    .route("/scrape", post(scrape::handler::<S>))
    .route("/classify/{mode}", post(classify::handler::<S>))
    // Quiz
    .route("/quiz/start", post(quiz::start::<S>))
    .route("/quiz/round", post(quiz::round::<S>))
    .route("/quiz/choose", post(quiz::choose::<S>))
    .route("/quiz/leaderboard", post(quiz::submit::<S>))
    // Reads
    .route("/leaderboard/{mode}", get(leaderboard::top::<S>))
    .route("/inmates/{booking}/image", get(images::handler::<S>))
    .with_state(state)
}

// ─── Integration tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use blotter_core::{
    classify::run_classification,
    mode::Mode,
    roster::{NewCharge, NewInmate},
    store::RosterStore,
  };
  use blotter_scrape::{ClientConfig, RecordClient};
  use blotter_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  use super::*;

  async fn make_state() -> ApiState<SqliteStore> {
    ApiState {
      store:  Arc::new(SqliteStore::open_in_memory().await.unwrap()),
      client: RecordClient::new(ClientConfig {
        base_url: "http://127.0.0.1:9".to_string(),
      })
      .unwrap(),
    }
  }

  /// Two inmates, one on each side of the murder pair, classified.
  async fn seed_murder_pair(state: &ApiState<SqliteStore>) {
    for (booking, charge) in
      [("24-1", "MURDER IN THE FIRST DEGREE"), ("24-2", "GRAND THEFT")]
    {
      let (inmate, _) = state
        .store
        .upsert_inmate(NewInmate {
          booking_number: booking.to_string(),
          first_name:     "JOHN".to_string(),
          last_name:      "DOE".to_string(),
          age:            Some(40),
        })
        .await
        .unwrap();
      state
        .store
        .replace_charges(inmate.inmate_id, vec![NewCharge::new(charge)])
        .await
        .unwrap();
    }
    run_classification(state.store.as_ref(), Mode::Murder)
      .await
      .unwrap();
  }

  async fn request(
    state: ApiState<SqliteStore>,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let resp = api_router(state)
      .oneshot(builder.body(body).unwrap())
      .await
      .unwrap();

    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  // ── Classify ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn classify_reports_partition_counts() {
    let state = make_state().await;
    seed_murder_pair(&state).await;

    let (status, body) =
      request(state, "POST", "/classify/murder", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "partition");
    assert_eq!(body["positive"], 1);
    assert_eq!(body["negative"], 1);
  }

  #[tokio::test]
  async fn classify_empty_roster_is_informational() {
    let state = make_state().await;
    let (status, body) =
      request(state, "POST", "/classify/child", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "empty");
  }

  #[tokio::test]
  async fn classify_unknown_mode_is_client_error() {
    let state = make_state().await;
    let (status, _) =
      request(state, "POST", "/classify/jaywalking", Some(json!({}))).await;
    assert!(status.is_client_error());
  }

  // ── Quiz flow ───────────────────────────────────────────────────────────

  #[tokio::test]
  async fn quiz_start_round_choose_flow() {
    let state = make_state().await;
    seed_murder_pair(&state).await;

    let (status, session) = request(
      state.clone(),
      "POST",
      "/quiz/start",
      Some(json!({"mode": "murder"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["lives"], 3);
    assert_eq!(session["mode"], "murder");

    let (status, body) = request(
      state.clone(),
      "POST",
      "/quiz/round",
      Some(json!({"session": session})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "round");
    assert!(body["left"]["booking_number"].is_string());
    assert!(body["right"]["booking_number"].is_string());

    // The returned session knows which side holds the positive card.
    let session = body["session"].clone();
    let side = if session["current"]["positive_on_left"] == true {
      "left"
    } else {
      "right"
    };

    let (status, body) = request(
      state.clone(),
      "POST",
      "/quiz/choose",
      Some(json!({"session": session, "side": side})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"]["correct"], true);
    assert_eq!(body["outcome"]["score"], 1);
    assert_eq!(body["outcome"]["lives"], 3);

    // Both one-element pools are now spent: next round is game over.
    let (status, body) = request(
      state,
      "POST",
      "/quiz/round",
      Some(json!({"session": body["session"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "game_over");
    assert_eq!(body["final_score"], 1);
  }

  #[tokio::test]
  async fn quiz_start_on_empty_roster_is_rejected() {
    let state = make_state().await;
    let (status, body) = request(
      state,
      "POST",
      "/quiz/start",
      Some(json!({"mode": "child"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("roster is empty"));
  }

  #[tokio::test]
  async fn choose_without_round_conflicts() {
    let state = make_state().await;
    seed_murder_pair(&state).await;

    let (_, session) = request(
      state.clone(),
      "POST",
      "/quiz/start",
      Some(json!({"mode": "murder"})),
    )
    .await;

    let (status, _) = request(
      state,
      "POST",
      "/quiz/choose",
      Some(json!({"session": session, "side": "left"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
  }

  // ── Leaderboard ─────────────────────────────────────────────────────────

  fn finished_session(score: i64, finished: bool) -> Value {
    json!({
      "mode": "murder",
      "lives": 0,
      "streak": 0,
      "score": score,
      "multiplier": 1,
      "seen_positive": [],
      "seen_negative": [],
      "current": null,
      "finished": finished,
    })
  }

  #[tokio::test]
  async fn finished_game_lands_on_leaderboard() {
    let state = make_state().await;

    let (status, body) = request(
      state.clone(),
      "POST",
      "/quiz/leaderboard",
      Some(json!({"session": finished_session(7, true), "name": "  "})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recorded"], true);
    // Blank names fall back to the placeholder.
    assert_eq!(body["entry"]["name"], "Anonymous");

    let (status, body) =
      request(state, "GET", "/leaderboard/murder", None).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["score"], 7);
    assert_eq!(entries[0]["mode"], "murder");
  }

  #[tokio::test]
  async fn zero_score_is_never_recorded() {
    let state = make_state().await;

    let (status, body) = request(
      state.clone(),
      "POST",
      "/quiz/leaderboard",
      Some(json!({"session": finished_session(0, true), "name": "zero"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recorded"], false);

    let (_, body) = request(state, "GET", "/leaderboard/murder", None).await;
    assert!(body.as_array().unwrap().is_empty());
  }

  #[tokio::test]
  async fn unfinished_game_is_never_recorded() {
    let state = make_state().await;

    let (status, body) = request(
      state,
      "POST",
      "/quiz/leaderboard",
      Some(json!({"session": finished_session(9, false), "name": "early"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recorded"], false);
  }
}
