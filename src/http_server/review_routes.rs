//! Review HTTP Routes
//!
//! Reviews are only reachable under their campground. Creation validates
//! against the review schema, persists the review, then links it; deletion
//! unlinks first, then removes the record.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;

use crate::errors::{AppError, ErrorEnvelope};
use crate::repository::{Campground, Review, ReviewInput};
use crate::schema::SchemaName;

use super::adapter::catch_async;
use super::response::{DataResponse, NoticeResponse};
use super::server::page_not_found;
use super::state::{parse_id, AppState};

/// A new review together with the campground that now lists it
#[derive(Debug, Serialize)]
pub struct ReviewCreated {
    pub campground: Campground,
    pub review: Review,
}

/// Create review routes
pub fn review_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/campgrounds/:id/reviews",
            post(create_review).fallback(page_not_found),
        )
        .route(
            "/campgrounds/:id/reviews/:review_id",
            delete(delete_review).fallback(page_not_found),
        )
        .with_state(state)
}

/// POST /campgrounds/:id/reviews
async fn create_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<DataResponse<ReviewCreated>>), ErrorEnvelope> {
    catch_async("create_review", async move {
        let payload = state.validated(SchemaName::Review, body)?;
        let campground_id = parse_id(&id, "Campground")?;
        let input = ReviewInput::from_payload(&payload)
            .ok_or_else(|| AppError::BadRequest("review payload is malformed".to_string()))?;

        let (campground, review) = state.campgrounds.add_review(campground_id, input).await?;
        Ok((
            StatusCode::CREATED,
            Json(DataResponse::with_message(
                ReviewCreated { campground, review },
                "Created new review!",
            )),
        ))
    })
    .await
}

/// DELETE /campgrounds/:id/reviews/:review_id
async fn delete_review(
    State(state): State<AppState>,
    Path((id, review_id)): Path<(String, String)>,
) -> Result<Json<NoticeResponse>, ErrorEnvelope> {
    catch_async("delete_review", async move {
        let campground_id = parse_id(&id, "Campground")?;
        let review_id = parse_id(&review_id, "Review")?;
        state
            .campgrounds
            .remove_review(campground_id, review_id)
            .await?;
        Ok(Json(NoticeResponse::new(
            "Successfully deleted review",
            format!("/campgrounds/{}", campground_id),
        )))
    })
    .await
}
