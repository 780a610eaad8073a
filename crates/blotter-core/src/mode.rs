//! Quiz modes and the category index sides they draw from.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A quiz mode. Each maps to one classified category pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
  Child,
  Murder,
  Drugs,
}

impl Mode {
  /// The tag stored in leaderboard rows and used in URLs.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Child => "child",
      Self::Murder => "murder",
      Self::Drugs => "drugs",
    }
  }

  /// The side a "this is the one" pick identifies.
  pub fn positive_side(&self) -> IndexSide {
    match self {
      Self::Child => IndexSide::ChildAbuse,
      Self::Murder => IndexSide::Murder,
      Self::Drugs => IndexSide::Cannabis,
    }
  }

  /// The opposing side. For child and murder this is the true complement of
  /// the positive side; for drugs it is an independently-computed set.
  pub fn negative_side(&self) -> IndexSide {
    match self {
      Self::Child => IndexSide::NonChildAbuse,
      Self::Murder => IndexSide::NonMurder,
      Self::Drugs => IndexSide::CocaineFentanyl,
    }
  }
}

impl fmt::Display for Mode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl std::str::FromStr for Mode {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "child" => Ok(Self::Child),
      "murder" => Ok(Self::Murder),
      "drugs" => Ok(Self::Drugs),
      other => Err(format!("unknown mode: {other:?}")),
    }
  }
}

/// One side of a category pair — names the marker set an inmate may hold a
/// membership in. Six sets exist in total, two per mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexSide {
  ChildAbuse,
  NonChildAbuse,
  Murder,
  NonMurder,
  Cannabis,
  CocaineFentanyl,
}

impl IndexSide {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::ChildAbuse => "child_abuse",
      Self::NonChildAbuse => "non_child_abuse",
      Self::Murder => "murder",
      Self::NonMurder => "non_murder",
      Self::Cannabis => "cannabis",
      Self::CocaineFentanyl => "cocaine_fentanyl",
    }
  }
}
