use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::error::Result;
use crate::middleware::{Authorized, ProgramsView};
use crate::services::fees::FeeBreakdown;
use crate::state::AppState;

pub fn fees_routes(state: AppState) -> Router {
    Router::new()
        .route("/quote", get(quote_fees))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct QuoteParams {
    pub program_id: i64,
    pub year_level: i32,
    pub semester: i32,
}

/// Quote the fees for a (program, year level, semester). Never fails: a
/// missing curriculum degrades to the miscellaneous-only minimum.
async fn quote_fees(
    Authorized(_user, _): Authorized<ProgramsView>,
    State(state): State<AppState>,
    Query(params): Query<QuoteParams>,
) -> Result<Json<FeeBreakdown>> {
    let breakdown = state
        .fees
        .calculate(
            &state.db,
            params.program_id,
            params.year_level,
            params.semester,
        )
        .await;

    Ok(Json(breakdown))
}
