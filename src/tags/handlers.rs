use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::dto::{TagRequest, TagUpdateRequest};
use super::repo_types::Tag;
use super::services;
use crate::extract::ApiJson;
use crate::transactions::dto::{DeleteResponse, MessageResponse};
use crate::{auth::AuthUser, error::AppError, state::AppState};

pub fn tag_routes() -> Router<AppState> {
    Router::new()
        .route("/tags", post(add_tag))
        // GET takes a category here, PUT and DELETE a tag id.
        .route(
            "/tags/:key",
            get(list_tags).put(update_tag).delete(delete_tag),
        )
}

#[instrument(skip(state, payload))]
pub async fn add_tag(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(payload): ApiJson<TagRequest>,
) -> Result<(StatusCode, Json<Tag>), AppError> {
    let created = services::create(state.tags.as_ref(), &user.email, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(state))]
pub async fn list_tags(
    State(state): State<AppState>,
    user: AuthUser,
    Path(category): Path<String>,
) -> Result<Json<Vec<Tag>>, AppError> {
    Ok(Json(
        services::list(state.tags.as_ref(), &user.email, &category).await?,
    ))
}

#[instrument(skip(state, payload))]
pub async fn update_tag(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<TagUpdateRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = services::parse_tag_id(&id)?;
    services::update(state.tags.as_ref(), &user.email, id, payload).await?;
    Ok(Json(MessageResponse {
        message: "Tag updated".into(),
    }))
}

#[instrument(skip(state))]
pub async fn delete_tag(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let id = services::parse_tag_id(&id)?;
    services::delete(state.tags.as_ref(), &user.email, id).await?;
    Ok(Json(DeleteResponse { success: true }))
}
