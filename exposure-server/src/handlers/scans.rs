//! Scan session handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use callbreach_core::logic::session::ExposureReport;

use crate::models::{CreateScan, PushCandidates, PushResult, RejectedCandidate, ScanView};
use crate::{AppError, AppResult, AppState};

/// Open a new session in NO_SCAN_RUN
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateScan>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ScanView>)> {
    let Json(req) = payload?;
    req.validate()?;

    let id = state.sessions.create(req.policy(&state.policy))?;
    let view = state.sessions.read_session(id, ScanView::of)?;

    tracing::info!("Scan {} created ({} live)", id, state.sessions.len());
    Ok((StatusCode::CREATED, Json(view)))
}

/// Current state; finalizes a window whose deadline passed
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ScanView>> {
    let view = state.sessions.with_session(id, |session| {
        session.poll()?;
        Ok(ScanView::of(session))
    })?;
    Ok(Json(view))
}

/// Append candidate lines and flows
///
/// Malformed lines are reported per index and skipped; a closed window,
/// an exceeded cap or a malformed flow fails the whole request and leaves
/// the session unchanged.
pub async fn push_candidates(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<PushCandidates>, JsonRejection>,
) -> AppResult<Json<PushResult>> {
    let Json(req) = payload?;
    req.validate()?;

    let result = state.sessions.with_session(id, |session| {
        let outcome = session.push_batch(&req.candidates, &req.flows)?;

        Ok(PushResult {
            accepted: outcome.accepted,
            rejected: outcome
                .rejected
                .into_iter()
                .map(|(index, e)| RejectedCandidate { index, error: e.to_string() })
                .collect(),
            findings_added: outcome.findings_added,
            scan: ScanView::of(session),
        })
    })?;

    tracing::debug!(
        "Scan {}: {} accepted, {} rejected",
        id,
        result.accepted,
        result.rejected.len()
    );
    Ok(Json(result))
}

/// Freeze and score; repeated calls return the same report
pub async fn close(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ExposureReport>> {
    let report = state
        .sessions
        .with_session(id, |session| session.close().map_err(AppError::from))?;
    Ok(Json(report))
}

/// Snapshot of an open window, tagged `provisional: true`
pub async fn provisional(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ExposureReport>> {
    let report = state.sessions.read_session(id, |session| session.provisional())?;
    report
        .map(Json)
        .ok_or_else(|| AppError::Conflict("No capture window open".to_string()))
}

/// Abandon a session; it stays visible as ABANDONED until the reaper drops it
pub async fn abandon(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.sessions.with_session(id, |session| {
        session.abandon();
        Ok(())
    })?;
    Ok(StatusCode::NO_CONTENT)
}
