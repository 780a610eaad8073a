//! Resolution of the detail record's embedded image payload.
//!
//! Three shapes occur upstream, tried in order: an absolute URL, a base64
//! data-URI, and a bare base64 blob. Images are never persisted — callers
//! resolve per display request, and any download or decode failure
//! degrades to "no image available" rather than an error.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use bytes::Bytes;

use crate::client::RecordClient;

/// An image payload decoded to servable bytes.
#[derive(Debug, Clone)]
pub struct ResolvedImage {
  pub bytes:     Bytes,
  /// Lowercase file extension (`png`, `jpg`, ...). Drives the media type.
  pub extension: String,
}

impl ResolvedImage {
  pub fn media_type(&self) -> String {
    match self.extension.as_str() {
      "png" => "image/png".to_string(),
      "jpg" => "image/jpeg".to_string(),
      other => format!("image/{other}"),
    }
  }
}

/// Interpret an image field and produce bytes, or `None` when the payload
/// is absent, undownloadable, or undecodable.
pub async fn resolve(client: &RecordClient, field: &str) -> Option<ResolvedImage> {
  let field = field.trim();
  if field.is_empty() {
    return None;
  }

  // (a) Absolute URL — extension from the Content-Type header.
  if field.starts_with("http://") || field.starts_with("https://") {
    return match client.download(field).await {
      Ok((bytes, content_type)) => {
        let extension = if content_type.as_deref().is_some_and(|ct| ct.contains("png")) {
          "png"
        } else {
          "jpg"
        };
        Some(ResolvedImage { bytes, extension: extension.to_string() })
      }
      Err(e) => {
        tracing::warn!("image download failed: {e}");
        None
      }
    };
  }

  // (b) data-URI — extension from the declared subtype.
  if let Some(rest) = field.strip_prefix("data:image/") {
    let (subtype, payload) = rest.split_once(";base64,")?;
    return match B64.decode(strip_whitespace(payload)) {
      Ok(bytes) => Some(ResolvedImage {
        bytes:     Bytes::from(bytes),
        extension: normalise_subtype(subtype),
      }),
      Err(e) => {
        tracing::warn!("image data-uri decode failed: {e}");
        None
      }
    };
  }

  // (c) Bare base64 blob.
  match B64.decode(strip_whitespace(field)) {
    Ok(bytes) => Some(ResolvedImage {
      bytes:     Bytes::from(bytes),
      extension: "png".to_string(),
    }),
    Err(e) => {
      tracing::warn!("image base64 decode failed: {e}");
      None
    }
  }
}

/// Upstream blobs occasionally carry embedded newlines.
fn strip_whitespace(s: &str) -> String {
  s.chars().filter(|c| !c.is_ascii_whitespace()).collect()
}

fn normalise_subtype(subtype: &str) -> String {
  let subtype = subtype.trim().to_lowercase();
  if subtype == "jpeg" { "jpg".to_string() } else { subtype }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
