//! Async HTTP client for the upstream jail-records service.
//!
//! Three endpoints, all POST with a literal `{}` body and the XHR-style
//! header set the upstream expects. Field shapes are inconsistent at this
//! boundary — string-or-number booking numbers, `IMAGE` vs `Image` keys, a
//! one-element array wrapping the detail record — so the client normalises
//! everything before downstream code sees it.

use std::time::Duration;

use bytes::Bytes;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

const TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = "Mozilla/5.0";

/// Connection settings for the records service.
#[derive(Debug, Clone)]
pub struct ClientConfig {
  pub base_url: String,
}

/// Async HTTP client for the jail-records service.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct RecordClient {
  client: reqwest::Client,
  config: ClientConfig,
}

impl RecordClient {
  pub fn new(config: ClientConfig) -> Result<Self> {
    let client = reqwest::Client::builder()
      .timeout(TIMEOUT)
      .user_agent(USER_AGENT)
      .build()
      .map_err(Error::Transport)?;
    Ok(Self { client, config })
  }

  fn url(&self, endpoint: &str, arg: &str) -> String {
    format!(
      "{}/{endpoint}/{arg}",
      self.config.base_url.trim_end_matches('/')
    )
  }

  /// POST the fixed empty-object body and decode the JSON response.
  async fn fetch_json(&self, url: String) -> Result<Value> {
    let resp = self
      .client
      .post(&url)
      .header("Accept", "application/json, text/javascript, */*; q=0.01")
      .header("X-Requested-With", "XMLHttpRequest")
      .header(
        "Content-Type",
        "application/x-www-form-urlencoded; charset=UTF-8",
      )
      .body("{}")
      .send()
      .await
      .map_err(Error::Transport)?;

    let status = resp.status();
    if !status.is_success() {
      return Err(Error::Status { status, url });
    }

    let text = resp.text().await.map_err(Error::Transport)?;
    serde_json::from_str(&text).map_err(Error::Parse)
  }

  // ── Search ────────────────────────────────────────────────────────────────

  /// `POST {base}/getInmates/{filter}` — the roster rows for one filter.
  pub async fn search(&self, filter: &str) -> Result<Vec<SearchRow>> {
    let body = self.fetch_json(self.url("getInmates", filter)).await?;
    let rows: Vec<Value> = serde_json::from_value(body).map_err(Error::Parse)?;

    Ok(
      rows
        .into_iter()
        .map(|row| SearchRow {
          booking_number: stringly(row.get("bookingNumber")),
          inmate_name:    stringly(row.get("inmateName")),
        })
        .collect(),
    )
  }

  // ── Details ───────────────────────────────────────────────────────────────

  /// `POST {base}/getInmateDetails/{booking}` — the detail record.
  ///
  /// The upstream wraps the record in a one-element array. An absent or
  /// otherwise-shaped payload degrades to an empty record so one inmate's
  /// missing detail cannot abort a whole scrape batch; only transport,
  /// status, and body-level parse failures surface as errors.
  pub async fn fetch_details(&self, booking_number: &str) -> Result<InmateDetails> {
    let body = self
      .fetch_json(self.url("getInmateDetails", booking_number))
      .await?;

    let details = match body {
      Value::Array(mut items) if !items.is_empty() => match items.remove(0) {
        Value::Object(map) => InmateDetails(map),
        _ => InmateDetails::default(),
      },
      _ => InmateDetails::default(),
    };
    Ok(details)
  }

  // ── Charges ───────────────────────────────────────────────────────────────

  /// `POST {base}/getCharges/{booking}` — all charge rows for one inmate.
  pub async fn fetch_charges(&self, booking_number: &str) -> Result<Vec<ChargeRow>> {
    let body = self
      .fetch_json(self.url("getCharges", booking_number))
      .await?;
    serde_json::from_value(body).map_err(Error::Parse)
  }

  // ── Downloads ─────────────────────────────────────────────────────────────

  /// GET an absolute URL, returning the body bytes and the Content-Type
  /// header. Used for URL-shaped image payloads.
  pub async fn download(&self, url: &str) -> Result<(Bytes, Option<String>)> {
    let resp = self
      .client
      .get(url)
      .send()
      .await
      .map_err(Error::Transport)?;

    let status = resp.status();
    if !status.is_success() {
      return Err(Error::Status { status, url: url.to_string() });
    }

    let content_type = resp
      .headers()
      .get(reqwest::header::CONTENT_TYPE)
      .and_then(|v| v.to_str().ok())
      .map(str::to_owned);
    let bytes = resp.bytes().await.map_err(Error::Transport)?;
    Ok((bytes, content_type))
  }
}

// ─── Response shapes ─────────────────────────────────────────────────────────

/// One row of a search response.
#[derive(Debug, Clone)]
pub struct SearchRow {
  pub booking_number: String,
  pub inmate_name:    String,
}

/// The detail record for one inmate, kept as a raw object because the
/// upstream is loose about key casing and field presence.
#[derive(Debug, Clone, Default)]
pub struct InmateDetails(Map<String, Value>);

impl InmateDetails {
  /// Case-insensitive field lookup (`IMAGE` and `Image` both occur).
  pub fn field(&self, name: &str) -> Option<&Value> {
    self
      .0
      .iter()
      .find(|(k, _)| k.eq_ignore_ascii_case(name))
      .map(|(_, v)| v)
  }

  /// The embedded image payload, when present and non-empty.
  pub fn image(&self) -> Option<&str> {
    self
      .field("image")
      .and_then(Value::as_str)
      .map(str::trim)
      .filter(|s| !s.is_empty())
  }

  /// Age from the birth-year-like field.
  ///
  /// Missing, empty, `"NULL"`, and non-integer values all coerce to
  /// absent rather than failing.
  pub fn age(&self) -> Option<i64> {
    match self.field("birth")? {
      Value::Number(n) => n.as_i64(),
      Value::String(s) => {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("null") {
          None
        } else {
          s.parse().ok()
        }
      }
      _ => None,
    }
  }
}

/// One row of a charges response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChargeRow {
  #[serde(rename = "Charge", default)]
  pub charge:            Option<String>,
  #[serde(rename = "BondAmount", default)]
  pub bond_amount:       Option<String>,
  #[serde(rename = "CourtCaseNumber", default)]
  pub court_case_number: Option<String>,
  #[serde(rename = "CourtLocation", default)]
  pub court_location:    Option<String>,
  #[serde(rename = "Note", default)]
  pub note:              Option<String>,
}

/// Coerce a field that may arrive as a JSON string or bare number.
fn stringly(v: Option<&Value>) -> String {
  match v {
    Some(Value::String(s)) => s.trim().to_string(),
    Some(Value::Number(n)) => n.to_string(),
    _ => String::new(),
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
