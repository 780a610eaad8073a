//! Quiz session engine.
//!
//! A session is an explicit value object: every operation takes the session,
//! mutates it, and returns it to the caller, which persists it wherever it
//! keeps client state. There is no ambient session store in this crate.
//! Randomness is injected so round selection is reproducible under test.

use std::collections::HashSet;

use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  error::{Error, Result},
  mode::Mode,
};

pub const STARTING_LIVES: u8 = 3;
pub const MAX_LIVES: u8 = 5;

// ─── Round types ─────────────────────────────────────────────────────────────

/// Which card the player picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
  Left,
  Right,
}

/// The pair currently on the table.
///
/// Stored on the session so the choose step validates against exactly what
/// was shown, without re-deriving any randomness.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PresentedPair {
  pub left:             Uuid,
  pub right:            Uuid,
  pub positive:         Uuid,
  pub negative:         Uuid,
  pub positive_on_left: bool,
}

/// Result of judging one choice.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChoiceOutcome {
  pub correct:    bool,
  pub lives:      u8,
  pub streak:     u32,
  pub score:      i64,
  pub multiplier: i64,
  pub game_over:  bool,
}

// ─── Session ─────────────────────────────────────────────────────────────────

/// Per-player quiz state for one mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSession {
  pub mode:          Mode,
  pub lives:         u8,
  pub streak:        u32,
  pub score:         i64,
  /// Derived from `streak`; carried so displays never recompute it.
  pub multiplier:    i64,
  pub seen_positive: HashSet<Uuid>,
  pub seen_negative: HashSet<Uuid>,
  pub current:       Option<PresentedPair>,
  /// Terminal. Set when lives hit zero or either pool runs dry.
  pub finished:      bool,
}

impl QuizSession {
  /// A fresh session with all counters reset.
  pub fn start(mode: Mode) -> Self {
    Self {
      mode,
      lives: STARTING_LIVES,
      streak: 0,
      score: 0,
      multiplier: 1,
      seen_positive: HashSet::new(),
      seen_negative: HashSet::new(),
      current: None,
      finished: false,
    }
  }

  /// Score multiplier for a streak. A step function, not compounding.
  pub fn multiplier_for(streak: u32) -> i64 {
    if streak >= 15 {
      10
    } else if streak >= 10 {
      4
    } else if streak >= 5 {
      2
    } else {
      1
    }
  }

  /// Draw the next pair from the not-yet-seen remainder of each pool.
  ///
  /// Returns `None` when the session is already over or either pool is
  /// exhausted. Exhaustion finishes the session even with lives remaining.
  pub fn present_round(
    &mut self,
    positive_pool: &[Uuid],
    negative_pool: &[Uuid],
    rng: &mut impl Rng,
  ) -> Option<PresentedPair> {
    if self.finished {
      return None;
    }

    let available_positive: Vec<Uuid> = positive_pool
      .iter()
      .filter(|id| !self.seen_positive.contains(*id))
      .copied()
      .collect();
    let available_negative: Vec<Uuid> = negative_pool
      .iter()
      .filter(|id| !self.seen_negative.contains(*id))
      .copied()
      .collect();

    let (Some(&positive), Some(&negative)) =
      (available_positive.choose(rng), available_negative.choose(rng))
    else {
      self.current = None;
      self.finished = true;
      return None;
    };

    let positive_on_left = rng.gen_bool(0.5);
    let (left, right) = if positive_on_left {
      (positive, negative)
    } else {
      (negative, positive)
    };

    self.seen_positive.insert(positive);
    self.seen_negative.insert(negative);

    let pair = PresentedPair {
      left,
      right,
      positive,
      negative,
      positive_on_left,
    };
    self.current = Some(pair);
    Some(pair)
  }

  /// Judge a pick against the stored pair and update the counters.
  ///
  /// Consumes the current pair either way; a second submission without a
  /// fresh round returns [`Error::NoActiveRound`].
  pub fn submit_choice(&mut self, side: Side) -> Result<ChoiceOutcome> {
    let pair = self.current.take().ok_or(Error::NoActiveRound)?;
    let correct = (side == Side::Left) == pair.positive_on_left;

    if correct {
      self.streak += 1;
      self.score += Self::multiplier_for(self.streak);
      if self.streak % 5 == 0 && self.lives < MAX_LIVES {
        self.lives += 1;
      }
    } else {
      self.lives = self.lives.saturating_sub(1);
      self.streak = 0;
    }

    self.multiplier = Self::multiplier_for(self.streak);
    if self.lives == 0 {
      self.finished = true;
    }

    Ok(ChoiceOutcome {
      correct,
      lives:      self.lives,
      streak:     self.streak,
      score:      self.score,
      multiplier: self.multiplier,
      game_over:  self.finished,
    })
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
