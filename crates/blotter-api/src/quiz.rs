//! Handlers for the quiz endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/quiz/start` | Body: `{"mode":"child"}` — fresh session |
//! | `POST` | `/quiz/round` | Body: `{"session":...}` — next pair or game over |
//! | `POST` | `/quiz/choose` | Body: `{"session":..., "side":"left"}` |
//! | `POST` | `/quiz/leaderboard` | Body: `{"session":..., "name":"..."}` |
//!
//! The session travels in the body both ways; this service holds no
//! per-client state between requests.

use axum::{Json, extract::State};
use blotter_core::{
  leaderboard::{LeaderboardEntry, NewLeaderboardEntry},
  mode::Mode,
  quiz::{ChoiceOutcome, QuizSession, Side},
  roster::Inmate,
  store::RosterStore,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

// ─── Views ───────────────────────────────────────────────────────────────────

/// What the player is shown for one inmate. Charges are deliberately
/// withheld — they would give the answer away.
#[derive(Debug, Serialize)]
pub struct InmateCard {
  pub inmate_id:      Uuid,
  pub booking_number: String,
  pub first_name:     String,
  pub last_name:      String,
  pub age:            Option<i64>,
}

impl From<Inmate> for InmateCard {
  fn from(i: Inmate) -> Self {
    Self {
      inmate_id:      i.inmate_id,
      booking_number: i.booking_number,
      first_name:     i.first_name,
      last_name:      i.last_name,
      age:            i.age,
    }
  }
}

#[derive(Debug, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RoundResponse {
  /// A fresh pair is on the table.
  Round {
    left:       InmateCard,
    right:      InmateCard,
    lives:      u8,
    streak:     u32,
    score:      i64,
    multiplier: i64,
    session:    QuizSession,
  },
  /// Terminal: no lives left, or one of the pools ran dry.
  GameOver {
    final_score: i64,
    mode:        Mode,
    session:     QuizSession,
  },
}

// ─── Start ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StartBody {
  pub mode: Mode,
}

/// `POST /quiz/start` — a fresh session for one mode.
pub async fn start<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<StartBody>,
) -> Result<Json<QuizSession>, ApiError>
where
  S: RosterStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let count = state
    .store
    .inmate_count()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  if count == 0 {
    return Err(ApiError::BadRequest(
      "roster is empty: scrape and classify before starting a quiz".to_string(),
    ));
  }

  Ok(Json(QuizSession::start(body.mode)))
}

// ─── Round ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RoundBody {
  pub session: QuizSession,
}

/// `POST /quiz/round` — draw the next pair, or report game over.
pub async fn round<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<RoundBody>,
) -> Result<Json<RoundResponse>, ApiError>
where
  S: RosterStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut session = body.session;

  let positive_pool = state
    .store
    .index_ids(session.mode.positive_side())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let negative_pool = state
    .store
    .index_ids(session.mode.negative_side())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let Some(pair) =
    session.present_round(&positive_pool, &negative_pool, &mut rand::thread_rng())
  else {
    return Ok(Json(RoundResponse::GameOver {
      final_score: session.score,
      mode:        session.mode,
      session,
    }));
  };

  let left = load_card(&state, pair.left).await?;
  let right = load_card(&state, pair.right).await?;

  Ok(Json(RoundResponse::Round {
    left,
    right,
    lives:      session.lives,
    streak:     session.streak,
    score:      session.score,
    multiplier: session.multiplier,
    session,
  }))
}

async fn load_card<S>(
  state: &ApiState<S>,
  id: Uuid,
) -> Result<InmateCard, ApiError>
where
  S: RosterStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let inmate = state
    .store
    .get_inmate(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("inmate {id} not found")))?;
  Ok(inmate.into())
}

// ─── Choose ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ChooseBody {
  pub session: QuizSession,
  pub side:    Side,
}

#[derive(Debug, Serialize)]
pub struct ChooseResponse {
  pub outcome: ChoiceOutcome,
  pub session: QuizSession,
}

/// `POST /quiz/choose` — judge a pick against the presented pair.
pub async fn choose<S>(
  State(_state): State<ApiState<S>>,
  Json(body): Json<ChooseBody>,
) -> Result<Json<ChooseResponse>, ApiError>
where
  S: RosterStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut session = body.session;
  match session.submit_choice(body.side) {
    Ok(outcome) => Ok(Json(ChooseResponse { outcome, session })),
    Err(blotter_core::Error::NoActiveRound) => Err(ApiError::Conflict(
      "no round is currently presented; request a round first".to_string(),
    )),
  }
}

// ─── Leaderboard submission ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SubmitBody {
  pub session: QuizSession,
  #[serde(default)]
  pub name:    String,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
  pub recorded: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub entry:    Option<LeaderboardEntry>,
}

/// `POST /quiz/leaderboard` — record a finished game's score.
///
/// Zero-score and unfinished games are acknowledged but never stored.
pub async fn submit<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<SubmitBody>,
) -> Result<Json<SubmitResponse>, ApiError>
where
  S: RosterStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let session = body.session;
  if !session.finished || session.score <= 0 {
    return Ok(Json(SubmitResponse { recorded: false, entry: None }));
  }

  let entry = state
    .store
    .add_leaderboard_entry(NewLeaderboardEntry::new(
      &body.name,
      session.score,
      session.mode,
    ))
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(SubmitResponse { recorded: true, entry: Some(entry) }))
}
