//! Simulation dataset handlers

use axum::{extract::{Path, State}, Json};

use callbreach_core::logic::session::{report_for_dataset, ExposureReport};
use callbreach_core::logic::simulation;

use crate::{AppResult, AppState};

pub async fn list() -> Json<Vec<&'static str>> {
    Json(simulation::DATASETS.to_vec())
}

pub async fn run(
    State(state): State<AppState>,
    Path(dataset): Path<String>,
) -> AppResult<Json<ExposureReport>> {
    let key = dataset.trim().to_lowercase();
    Ok(Json(report_for_dataset(&key, &state.policy)?))
}
