use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::dto::{DeleteResponse, MessageResponse, MonthQuery, RecentQuery, TransactionRequest};
use super::repo_types::Transaction;
use super::services;
use super::summary::Summary;
use crate::extract::{ApiJson, ApiQuery};
use crate::{auth::AuthUser, error::AppError, state::AppState};

pub fn transaction_routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions).post(add_transaction))
        .route("/transactions/all", get(list_all))
        .route("/transactions/month", get(list_by_month))
        .route("/transactions/recent", get(list_recent))
        .route("/transactions/summary", get(get_summary))
        .route(
            "/transactions/:id",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
}

#[instrument(skip(state, payload))]
pub async fn add_transaction(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(payload): ApiJson<TransactionRequest>,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    let created = services::add(state.transactions.as_ref(), &user.email, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `?month=` narrows to one month; without it every transaction is listed.
#[instrument(skip(state))]
pub async fn list_transactions(
    State(state): State<AppState>,
    user: AuthUser,
    ApiQuery(q): ApiQuery<MonthQuery>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let items = services::list(state.transactions.as_ref(), &user.email, q.month).await?;
    Ok(Json(items))
}

#[instrument(skip(state))]
pub async fn list_all(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Transaction>>, AppError> {
    Ok(Json(state.transactions.find_all(&user.email).await?))
}

#[instrument(skip(state))]
pub async fn list_by_month(
    State(state): State<AppState>,
    user: AuthUser,
    ApiQuery(q): ApiQuery<MonthQuery>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let month = services::require_month(q.month)?;
    Ok(Json(
        state.transactions.find_by_month(&user.email, &month).await?,
    ))
}

#[instrument(skip(state))]
pub async fn list_recent(
    State(state): State<AppState>,
    user: AuthUser,
    ApiQuery(q): ApiQuery<RecentQuery>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let items = services::recent(state.transactions.as_ref(), &user.email, q.limit).await?;
    Ok(Json(items))
}

#[instrument(skip(state))]
pub async fn get_summary(
    State(state): State<AppState>,
    user: AuthUser,
    ApiQuery(q): ApiQuery<MonthQuery>,
) -> Result<Json<Summary>, AppError> {
    let summary = services::summary(state.transactions.as_ref(), &user.email, q.month).await?;
    Ok(Json(summary))
}

#[instrument(skip(state))]
pub async fn get_transaction(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Transaction>, AppError> {
    let id = services::parse_id(&id)?;
    let found = services::get(state.transactions.as_ref(), &user.email, id).await?;
    Ok(Json(found))
}

#[instrument(skip(state, payload))]
pub async fn update_transaction(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<TransactionRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = services::parse_id(&id)?;
    services::update(state.transactions.as_ref(), &user.email, id, payload).await?;
    Ok(Json(MessageResponse {
        message: "Transaction updated".into(),
    }))
}

#[instrument(skip(state))]
pub async fn delete_transaction(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let id = services::parse_id(&id)?;
    services::delete(state.transactions.as_ref(), &user.email, id).await?;
    Ok(Json(DeleteResponse { success: true }))
}
