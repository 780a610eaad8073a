//! Handler for `POST /classify/{mode}`.

use axum::{
  Json,
  extract::{Path, State},
};
use blotter_core::{
  classify::{ClassifyReport, run_classification},
  mode::Mode,
  store::RosterStore,
};

use crate::{ApiState, error::ApiError};

/// `POST /classify/{mode}` — rebuild both marker sets for a mode.
///
/// An empty roster reports `{"result":"empty"}` rather than erroring, so
/// the operator UI can say "nothing to classify".
pub async fn handler<S>(
  State(state): State<ApiState<S>>,
  Path(mode): Path<Mode>,
) -> Result<Json<ClassifyReport>, ApiError>
where
  S: RosterStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let report = run_classification(state.store.as_ref(), mode)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(report))
}
