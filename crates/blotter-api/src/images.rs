//! Handler for `GET /inmates/{booking}/image`.
//!
//! Images are not persisted. Each request fetches the detail record live
//! and resolves whatever payload shape the upstream embedded. Anything
//! short of a decodable image is a plain 404, never an error page.

use axum::{
  extract::{Path, State},
  http::header,
  response::{IntoResponse, Response},
};
use blotter_core::store::RosterStore;
use blotter_scrape::image;

use crate::{ApiState, error::ApiError};

/// `GET /inmates/{booking}/image` — live-fetched mugshot bytes.
pub async fn handler<S>(
  State(state): State<ApiState<S>>,
  Path(booking): Path<String>,
) -> Result<Response, ApiError>
where
  S: RosterStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let details = match state.client.fetch_details(&booking).await {
    Ok(d) => d,
    Err(e) => {
      tracing::warn!("image details fetch for '{booking}' failed: {e}");
      return Err(no_image(&booking));
    }
  };

  let Some(field) = details.image() else {
    return Err(no_image(&booking));
  };
  let Some(resolved) = image::resolve(&state.client, field).await else {
    return Err(no_image(&booking));
  };

  Ok(
    (
      [(header::CONTENT_TYPE, resolved.media_type())],
      resolved.bytes,
    )
      .into_response(),
  )
}

fn no_image(booking: &str) -> ApiError {
  ApiError::NotFound(format!("no image available for {booking}"))
}
