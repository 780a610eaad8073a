//! Roster name parsing.
//!
//! The upstream lists names either as `"LAST, FIRST MIDDLE SUFFIX"` or,
//! without a comma, in last-name-first token order.

/// Split a raw roster name into `(first, last)`.
///
/// Internal whitespace runs are collapsed before splitting. With a comma,
/// the left side is the last name and the right side the first. Without
/// one, the final token is the first name and the rest join as the last
/// name; a lone token is entirely a first name. Always succeeds — either
/// part may come back empty.
pub fn split_name(raw: &str) -> (String, String) {
  let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");

  if let Some((last, first)) = collapsed.split_once(',') {
    return (first.trim().to_string(), last.trim().to_string());
  }

  let tokens: Vec<&str> = collapsed.split(' ').filter(|t| !t.is_empty()).collect();
  match tokens.len() {
    0 => (String::new(), String::new()),
    1 => (tokens[0].to_string(), String::new()),
    n => (tokens[n - 1].to_string(), tokens[..n - 1].join(" ")),
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn comma_splits_last_from_first() {
    assert_eq!(
      split_name("ADAMS, TODERICK LEONARD JR"),
      ("TODERICK LEONARD JR".to_string(), "ADAMS".to_string())
    );
  }

  #[test]
  fn no_comma_takes_final_token_as_first_name() {
    // Upstream lists commaless names last-name-first.
    assert_eq!(
      split_name("JOHN SMITH"),
      ("SMITH".to_string(), "JOHN".to_string())
    );
    assert_eq!(
      split_name("VAN DER BERG ANNA"),
      ("ANNA".to_string(), "VAN DER BERG".to_string())
    );
  }

  #[test]
  fn single_token_is_entirely_first_name() {
    assert_eq!(split_name("MADONNA"), ("MADONNA".to_string(), String::new()));
  }

  #[test]
  fn whitespace_noise_is_collapsed() {
    assert_eq!(
      split_name("  ADAMS ,\t TODERICK   LEONARD  JR "),
      ("TODERICK LEONARD JR".to_string(), "ADAMS".to_string())
    );
  }

  #[test]
  fn empty_input_yields_empty_pair() {
    assert_eq!(split_name(""), (String::new(), String::new()));
    assert_eq!(split_name("   "), (String::new(), String::new()));
  }
}
