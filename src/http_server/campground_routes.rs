//! Campground HTTP Routes
//!
//! CRUD over campgrounds. Create and update bodies are validated against the
//! campground schema before any repository call. Every handler runs inside
//! [`catch_async`].

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::Value;

use crate::errors::{AppError, ErrorEnvelope};
use crate::repository::{
    Campground, CampgroundDetail, CampgroundInput, CampgroundPatch, RepositoryError,
};
use crate::schema::SchemaName;
use crate::storage::DocumentId;

use super::adapter::catch_async;
use super::response::{DataResponse, ListResponse, MissingNotice, NoticeResponse};
use super::server::page_not_found;
use super::state::{parse_id, AppState};

const ENTITY: &str = "Campground";

/// Create campground routes
pub fn campground_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/campgrounds",
            get(list_campgrounds)
                .post(create_campground)
                .fallback(page_not_found),
        )
        .route(
            "/campgrounds/:id",
            get(show_campground)
                .put(update_campground)
                .delete(delete_campground)
                .fallback(page_not_found),
        )
        .with_state(state)
}

fn input_from(payload: &Value) -> Result<CampgroundInput, AppError> {
    CampgroundInput::from_payload(payload)
        .ok_or_else(|| AppError::BadRequest("campground payload is malformed".to_string()))
}

/// GET /campgrounds
async fn list_campgrounds(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<Campground>>, ErrorEnvelope> {
    catch_async("list_campgrounds", async move {
        let campgrounds = state.campgrounds.list().await?;
        Ok(Json(ListResponse::new(campgrounds)))
    })
    .await
}

/// POST /campgrounds
async fn create_campground(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<DataResponse<Campground>>), ErrorEnvelope> {
    catch_async("create_campground", async move {
        let payload = state.validated(SchemaName::Campground, body)?;
        let input = input_from(&payload)?;
        let id = state.campgrounds.create(input).await?;
        let campground = state.campgrounds.get(id).await?;
        Ok((
            StatusCode::CREATED,
            Json(DataResponse::with_message(
                campground,
                "Successfully made a new campground!",
            )),
        ))
    })
    .await
}

/// GET /campgrounds/:id
///
/// A missing campground is answered with a notice pointing back at the
/// index rather than an error envelope.
async fn show_campground(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ErrorEnvelope> {
    catch_async("show_campground", async move {
        let found = match DocumentId::parse(&id) {
            Some(id) => state.campgrounds.get_with_reviews(id).await,
            None => Err(RepositoryError::not_found(ENTITY, &id)),
        };
        match found {
            Ok(detail) => Ok(Json(DataResponse::<CampgroundDetail>::new(detail)).into_response()),
            Err(e) if e.is_not_found() => Ok((
                StatusCode::NOT_FOUND,
                Json(MissingNotice {
                    error: "Cannot find that campground!",
                    redirect: "/campgrounds",
                }),
            )
                .into_response()),
            Err(e) => Err(e.into()),
        }
    })
    .await
}

/// PUT /campgrounds/:id
async fn update_campground(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<DataResponse<Campground>>, ErrorEnvelope> {
    catch_async("update_campground", async move {
        let payload = state.validated(SchemaName::Campground, body)?;
        let id = parse_id(&id, ENTITY)?;
        let patch = CampgroundPatch::from(input_from(&payload)?);
        let campground = state.campgrounds.update(id, patch).await?;
        Ok(Json(DataResponse::with_message(
            campground,
            "Successfully updated campground!",
        )))
    })
    .await
}

/// DELETE /campgrounds/:id
async fn delete_campground(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<NoticeResponse>, ErrorEnvelope> {
    catch_async("delete_campground", async move {
        let id = parse_id(&id, ENTITY)?;
        state.campgrounds.delete(id).await?;
        Ok(Json(NoticeResponse::new(
            "Successfully deleted campground",
            "/campgrounds",
        )))
    })
    .await
}
