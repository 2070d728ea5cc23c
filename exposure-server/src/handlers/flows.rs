//! Flow analysis handler (finding-based score, stateless)

use axum::{extract::{rejection::JsonRejection, State}, Json};
use validator::Validate;

use callbreach_core::logic::session::{analyze_flows, FlowReport};

use crate::models::AnalyzeFlows;
use crate::{AppResult, AppState};

pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeFlows>, JsonRejection>,
) -> AppResult<Json<FlowReport>> {
    let Json(req) = payload?;
    req.validate()?;

    let policy = req.preset.apply(&state.policy);
    Ok(Json(analyze_flows(&req.flows, &policy)?))
}
