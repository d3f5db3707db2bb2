// handlers/public/team.rs - GET /api/team

use axum::extract::State;

use crate::database::models::TeamMember;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

pub async fn team_get(State(state): State<AppState>) -> ApiResult<Vec<TeamMember>> {
    let team = state.catalog.list_team().await?;
    Ok(ApiResponse::success(team))
}
