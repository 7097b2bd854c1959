use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::api::AppState;
use crate::domain::{PoolPosition, PositionId, PositionStatus};
use crate::error::AppError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionDto {
    pub id: String,
    pub pool_id: String,
    pub status: PositionStatus,
    pub height: i64,
    pub created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_height: Option<i64>,
}

impl From<PoolPosition> for PositionDto {
    fn from(p: PoolPosition) -> Self {
        Self {
            status: p.status(),
            id: p.id.0,
            pool_id: p.pool_id,
            height: p.height.as_i64(),
            created_at: p.created_at.as_i64(),
            closed_at: p.closed_at.map(|t| t.as_i64()),
            closed_height: p.closed_height.map(|h| h.as_i64()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolPositionsResponse {
    pub pool_id: String,
    pub open_count: usize,
    pub positions: Vec<PositionDto>,
}

pub async fn get_position(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<PositionDto>, AppError> {
    let id = PositionId::new(id);
    let position = state
        .repo
        .fetch_position(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no position {}", id)))?;

    Ok(Json(PositionDto::from(position)))
}

pub async fn get_pool_positions(
    Path(pool_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<PoolPositionsResponse>, AppError> {
    let positions: Vec<PositionDto> = state
        .repo
        .query_positions_by_pool(&pool_id)
        .await?
        .into_iter()
        .map(PositionDto::from)
        .collect();
    let open_count = positions
        .iter()
        .filter(|p| p.status == PositionStatus::Open)
        .count();

    Ok(Json(PoolPositionsResponse {
        pool_id,
        open_count,
        positions,
    }))
}
