//! # Review Repository
//!
//! CRUD over review records. Reviews do not know their owner; the owning
//! campground holds the reference. Operations that must keep both sides in
//! step live on [`CampgroundRepository`](super::CampgroundRepository).

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::schema::coerce_number;
use crate::storage::{DocumentId, DocumentStore, UpdateOp};

use super::errors::{RepositoryError, RepositoryResult};
use super::{decode, encode, REVIEWS};

const ENTITY: &str = "Review";

/// A stored review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub rating: u8,
    pub body: String,
}

/// Fields for a new review
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewInput {
    pub rating: u8,
    pub body: String,
}

impl ReviewInput {
    /// Read the `review` wrapper of a payload that already passed validation.
    pub fn from_payload(payload: &Value) -> Option<Self> {
        let review = payload.get("review")?;
        let rating = coerce_number(review.get("rating")?)?;
        if rating.fract() != 0.0 || !(1.0..=5.0).contains(&rating) {
            return None;
        }
        Some(Self {
            rating: rating as u8,
            body: review.get("body")?.as_str()?.to_string(),
        })
    }
}

/// Partial review update; `None` fields are left as they are
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReviewPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Review records over a shared store handle
#[derive(Clone)]
pub struct ReviewRepository {
    store: Arc<dyn DocumentStore>,
}

impl ReviewRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Persist a new review and return it with its assigned id.
    pub async fn create(&self, input: ReviewInput) -> RepositoryResult<Review> {
        let id = self.store.insert(REVIEWS, encode(ENTITY, &input)?).await?;
        debug!(review_id = %id, "review created");
        Ok(Review {
            id,
            rating: input.rating,
            body: input.body,
        })
    }

    pub async fn get(&self, id: DocumentId) -> RepositoryResult<Review> {
        self.find(id)
            .await?
            .ok_or_else(|| RepositoryError::not_found(ENTITY, id))
    }

    /// Like [`get`](Self::get) but absence is `Ok(None)`.
    pub async fn find(&self, id: DocumentId) -> RepositoryResult<Option<Review>> {
        match self.store.find_by_id(REVIEWS, id).await? {
            Some(doc) => decode(ENTITY, doc).map(Some),
            None => Ok(None),
        }
    }

    pub async fn list(&self) -> RepositoryResult<Vec<Review>> {
        self.store
            .find_all(REVIEWS)
            .await?
            .into_iter()
            .map(|doc| decode(ENTITY, doc))
            .collect()
    }

    pub async fn update(&self, id: DocumentId, patch: ReviewPatch) -> RepositoryResult<Review> {
        let fields = encode(ENTITY, &patch)?;
        if fields.is_empty() {
            return self.get(id).await;
        }
        match self.store.update_by_id(REVIEWS, id, UpdateOp::Set(fields)).await? {
            Some(doc) => decode(ENTITY, doc),
            None => Err(RepositoryError::not_found(ENTITY, id)),
        }
    }

    /// Remove the review record only. The owner's reference list is not
    /// touched; use `CampgroundRepository::remove_review` for that.
    pub async fn delete(&self, id: DocumentId) -> RepositoryResult<Review> {
        match self.store.delete_by_id(REVIEWS, id).await? {
            Some(doc) => decode(ENTITY, doc),
            None => Err(RepositoryError::not_found(ENTITY, id)),
        }
    }

    /// Remove every listed review that still exists; returns how many went.
    pub async fn delete_many(&self, ids: &[DocumentId]) -> RepositoryResult<usize> {
        Ok(self.store.delete_many(REVIEWS, ids).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use serde_json::json;

    fn repo() -> ReviewRepository {
        ReviewRepository::new(Arc::new(MemoryStore::new()))
    }

    fn input(rating: u8) -> ReviewInput {
        ReviewInput {
            rating,
            body: "great".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = repo();
        let created = repo.create(input(4)).await.unwrap();
        let fetched = repo.get(created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.rating, 4);
    }

    #[tokio::test]
    async fn test_missing_review_is_not_found() {
        let repo = repo();
        let missing = DocumentId::new();
        assert!(repo.get(missing).await.unwrap_err().is_not_found());
        assert!(repo.delete(missing).await.unwrap_err().is_not_found());
        assert!(repo.update(missing, ReviewPatch { rating: Some(2), body: None })
            .await
            .unwrap_err()
            .is_not_found());
        assert!(repo.find(missing).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_partial_update() {
        let repo = repo();
        let created = repo.create(input(2)).await.unwrap();
        let updated = repo
            .update(created.id, ReviewPatch { rating: Some(5), body: None })
            .await
            .unwrap();
        assert_eq!(updated.rating, 5);
        assert_eq!(updated.body, "great");
    }

    #[tokio::test]
    async fn test_delete_many_counts_existing_only() {
        let repo = repo();
        let a = repo.create(input(1)).await.unwrap();
        let b = repo.create(input(2)).await.unwrap();
        let removed = repo.delete_many(&[a.id, b.id, DocumentId::new()]).await.unwrap();
        assert_eq!(removed, 2);
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[test]
    fn test_input_from_payload() {
        let parsed = ReviewInput::from_payload(&json!({"review": {"rating": "3", "body": "ok"}}));
        assert_eq!(parsed, Some(ReviewInput { rating: 3, body: "ok".into() }));
        assert!(ReviewInput::from_payload(&json!({"review": {"rating": 3.5, "body": "ok"}})).is_none());
        assert!(ReviewInput::from_payload(&json!({})).is_none());
    }
}
