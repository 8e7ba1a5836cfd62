use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::SalaryRequest;
use super::repo_types::Salary;
use crate::extract::ApiJson;
use crate::{auth::AuthUser, error::AppError, state::AppState};

pub fn salary_routes() -> Router<AppState> {
    Router::new()
        .route("/salary", post(add_salary))
        .route("/salary/:month", get(get_salary))
}

#[instrument(skip(state, payload))]
pub async fn add_salary(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(payload): ApiJson<SalaryRequest>,
) -> Result<(StatusCode, Json<Salary>), AppError> {
    let month = payload.month.trim();
    if month.is_empty() {
        return Err(AppError::InvalidInput("Month is required".into()));
    }
    if payload.amount < 0 {
        return Err(AppError::InvalidInput("Amount must not be negative".into()));
    }

    let salary = state
        .salaries
        .insert(&user.email, month, payload.amount)
        .await?;
    info!(owner = %user.email, month = %salary.month, "salary recorded");
    Ok((StatusCode::CREATED, Json(salary)))
}

#[instrument(skip(state))]
pub async fn get_salary(
    State(state): State<AppState>,
    user: AuthUser,
    Path(month): Path<String>,
) -> Result<Json<Salary>, AppError> {
    state
        .salaries
        .find_by_month(&user.email, month.trim())
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Salary".into()))
}
