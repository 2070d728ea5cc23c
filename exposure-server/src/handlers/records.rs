//! Signal record scoring handler (stateless)

use axum::{extract::{rejection::JsonRejection, State}, Json};
use validator::Validate;

use callbreach_core::logic::session::{report_for_record, ExposureReport};

use crate::models::ScoreRecord;
use crate::{AppResult, AppState};

pub async fn score(
    State(state): State<AppState>,
    payload: Result<Json<ScoreRecord>, JsonRejection>,
) -> AppResult<Json<ExposureReport>> {
    let Json(req) = payload?;
    req.validate()?;

    let policy = req.preset.apply(&state.policy);
    Ok(Json(report_for_record(&req.record, &policy)?))
}
