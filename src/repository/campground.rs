//! # Campground Repository
//!
//! CRUD over campground records, and the owner side of the
//! campground → review relationship. Every path that removes a campground
//! goes through [`CampgroundRepository::delete`], which runs the review
//! cascade before the campground itself is removed.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::schema::coerce_number;
use crate::storage::{DocumentId, DocumentStore, UpdateOp};

use super::errors::{RepositoryError, RepositoryResult};
use super::integrity::cascade_reviews;
use super::review::{Review, ReviewInput, ReviewRepository};
use super::{decode, encode, CAMPGROUNDS};

const ENTITY: &str = "Campground";
const REVIEWS_FIELD: &str = "reviews";

/// A stored campground
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campground {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub title: String,
    pub location: String,
    pub image: String,
    pub price: f64,
    pub description: String,
    /// Review ids in insertion order
    #[serde(default)]
    pub reviews: Vec<DocumentId>,
}

/// Fields for a new campground
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampgroundInput {
    pub title: String,
    pub location: String,
    pub image: String,
    pub price: f64,
    pub description: String,
}

impl CampgroundInput {
    /// Read the `campground` wrapper of a payload that already passed
    /// validation. Returns `None` if it does not have the validated shape.
    pub fn from_payload(payload: &Value) -> Option<Self> {
        let c = payload.get("campground")?;
        let text = |key: &str| c.get(key).and_then(Value::as_str).map(str::to_string);
        Some(Self {
            title: text("title")?,
            location: text("location")?,
            image: text("image")?,
            price: coerce_number(c.get("price")?)?,
            description: text("description")?,
        })
    }
}

/// Partial campground update; `None` fields are left as they are
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CampgroundPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<CampgroundInput> for CampgroundPatch {
    fn from(input: CampgroundInput) -> Self {
        Self {
            title: Some(input.title),
            location: Some(input.location),
            image: Some(input.image),
            price: Some(input.price),
            description: Some(input.description),
        }
    }
}

/// A campground with its reviews resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampgroundDetail {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub title: String,
    pub location: String,
    pub image: String,
    pub price: f64,
    pub description: String,
    pub reviews: Vec<Review>,
}

#[derive(Serialize)]
struct NewCampground<'a> {
    #[serde(flatten)]
    input: &'a CampgroundInput,
    reviews: [DocumentId; 0],
}

/// Campground records over a shared store handle
#[derive(Clone)]
pub struct CampgroundRepository {
    store: Arc<dyn DocumentStore>,
    reviews: ReviewRepository,
}

impl CampgroundRepository {
    /// Both repositories share `store`; the review repository is reachable
    /// through [`reviews`](Self::reviews).
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        let reviews = ReviewRepository::new(store.clone());
        Self { store, reviews }
    }

    pub fn reviews(&self) -> &ReviewRepository {
        &self.reviews
    }

    /// Persist a new campground with an empty review list.
    pub async fn create(&self, input: CampgroundInput) -> RepositoryResult<DocumentId> {
        let doc = encode(
            ENTITY,
            &NewCampground {
                input: &input,
                reviews: [],
            },
        )?;
        let id = self.store.insert(CAMPGROUNDS, doc).await?;
        info!(campground_id = %id, title = %input.title, "campground created");
        Ok(id)
    }

    pub async fn get(&self, id: DocumentId) -> RepositoryResult<Campground> {
        self.find(id)
            .await?
            .ok_or_else(|| RepositoryError::not_found(ENTITY, id))
    }

    /// Like [`get`](Self::get) but absence is `Ok(None)`.
    pub async fn find(&self, id: DocumentId) -> RepositoryResult<Option<Campground>> {
        match self.store.find_by_id(CAMPGROUNDS, id).await? {
            Some(doc) => decode(ENTITY, doc).map(Some),
            None => Ok(None),
        }
    }

    /// Campground with its review records resolved in list order.
    ///
    /// A listed id whose review no longer exists is skipped and logged; the
    /// consistency check is what reports and repairs it.
    pub async fn get_with_reviews(&self, id: DocumentId) -> RepositoryResult<CampgroundDetail> {
        let campground = self.get(id).await?;
        let mut reviews = Vec::with_capacity(campground.reviews.len());
        for review_id in &campground.reviews {
            match self.reviews.find(*review_id).await? {
                Some(review) => reviews.push(review),
                None => warn!(
                    campground_id = %id,
                    review_id = %review_id,
                    "dangling review reference"
                ),
            }
        }
        Ok(CampgroundDetail {
            id: campground.id,
            title: campground.title,
            location: campground.location,
            image: campground.image,
            price: campground.price,
            description: campground.description,
            reviews,
        })
    }

    pub async fn list(&self) -> RepositoryResult<Vec<Campground>> {
        self.store
            .find_all(CAMPGROUNDS)
            .await?
            .into_iter()
            .map(|doc| decode(ENTITY, doc))
            .collect()
    }

    /// Replace the given fields. The review list is never touched here.
    pub async fn update(
        &self,
        id: DocumentId,
        patch: CampgroundPatch,
    ) -> RepositoryResult<Campground> {
        let fields = encode(ENTITY, &patch)?;
        if fields.is_empty() {
            return self.get(id).await;
        }
        match self.store.update_by_id(CAMPGROUNDS, id, UpdateOp::Set(fields)).await? {
            Some(doc) => {
                debug!(campground_id = %id, "campground updated");
                decode(ENTITY, doc)
            }
            None => Err(RepositoryError::not_found(ENTITY, id)),
        }
    }

    /// Delete a campground and every review it references.
    ///
    /// Sequence: read the review list, cascade-delete those reviews
    /// (tolerating ones already gone), then remove the campground. Returns
    /// the removed campground.
    ///
    /// # Errors
    ///
    /// `NotFound` if the campground does not exist (including a second
    /// delete of the same id).
    pub async fn delete(&self, id: DocumentId) -> RepositoryResult<Campground> {
        let campground = self.get(id).await?;
        let removed_reviews = cascade_reviews(&self.reviews, &campground).await?;

        let removed = match self.store.delete_by_id(CAMPGROUNDS, id).await? {
            Some(doc) => decode::<Campground>(ENTITY, doc)?,
            // Lost a race with a concurrent delete; its cascade ran too
            None => return Err(RepositoryError::not_found(ENTITY, id)),
        };

        // A review linked between our read and the removal is now an orphan
        let late: Vec<DocumentId> = removed
            .reviews
            .iter()
            .filter(|r| !campground.reviews.contains(r))
            .copied()
            .collect();
        if !late.is_empty() {
            let swept = self.reviews.delete_many(&late).await?;
            debug!(campground_id = %id, swept, "late-linked reviews removed");
        }

        info!(campground_id = %id, removed_reviews, "campground deleted");
        Ok(removed)
    }

    /// Create a review under a campground and link it.
    ///
    /// The review is persisted first and then appended to the owner's list.
    /// If the append fails the review is left behind as an orphan; that is
    /// logged and the error returned.
    pub async fn add_review(
        &self,
        campground_id: DocumentId,
        input: ReviewInput,
    ) -> RepositoryResult<(Campground, Review)> {
        // Fail fast on a missing owner so no orphan is created in the
        // common case
        self.get(campground_id).await?;

        let review = self.reviews.create(input).await?;
        let push = UpdateOp::Push {
            field: REVIEWS_FIELD.to_string(),
            value: review.id.to_value(),
        };
        match self.store.update_by_id(CAMPGROUNDS, campground_id, push).await {
            Ok(Some(doc)) => {
                info!(campground_id = %campground_id, review_id = %review.id, "review added");
                Ok((decode(ENTITY, doc)?, review))
            }
            Ok(None) => {
                warn!(
                    campground_id = %campground_id,
                    review_id = %review.id,
                    "campground vanished while linking review; review is orphaned"
                );
                Err(RepositoryError::not_found(ENTITY, campground_id))
            }
            Err(e) => {
                warn!(
                    campground_id = %campground_id,
                    review_id = %review.id,
                    error = %e,
                    "failed to link review; review is orphaned"
                );
                Err(e.into())
            }
        }
    }

    /// Unlink a review from its campground and delete it.
    ///
    /// The review must be listed by `campground_id`; a review owned by
    /// another campground is left alone. The id is pulled from the list
    /// first, then the review record is deleted.
    ///
    /// # Errors
    ///
    /// `NotFound` for a missing campground or for a review the campground
    /// does not list. Nothing is changed in either case.
    pub async fn remove_review(
        &self,
        campground_id: DocumentId,
        review_id: DocumentId,
    ) -> RepositoryResult<Review> {
        let campground = self.get(campground_id).await?;
        if !campground.reviews.contains(&review_id) {
            debug!(
                campground_id = %campground_id,
                review_id = %review_id,
                "review not listed by campground"
            );
            return Err(RepositoryError::not_found("Review", review_id));
        }

        let pull = UpdateOp::Pull {
            field: REVIEWS_FIELD.to_string(),
            value: review_id.to_value(),
        };
        if self
            .store
            .update_by_id(CAMPGROUNDS, campground_id, pull)
            .await?
            .is_none()
        {
            // Deleted since the read; its cascade owns the review now
            return Err(RepositoryError::not_found(ENTITY, campground_id));
        }

        match self.reviews.delete(review_id).await {
            Ok(review) => {
                info!(campground_id = %campground_id, review_id = %review_id, "review deleted");
                Ok(review)
            }
            Err(RepositoryError::Storage(e)) => {
                warn!(
                    campground_id = %campground_id,
                    review_id = %review_id,
                    error = %e,
                    "review unlinked but not deleted; review is orphaned"
                );
                Err(RepositoryError::Storage(e))
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use serde_json::json;

    fn repo() -> CampgroundRepository {
        CampgroundRepository::new(Arc::new(MemoryStore::new()))
    }

    fn riverbend() -> CampgroundInput {
        CampgroundInput {
            title: "Riverbend".into(),
            location: "CO".into(),
            image: "http://x/i.jpg".into(),
            price: 15.0,
            description: "quiet spot".into(),
        }
    }

    fn review(rating: u8) -> ReviewInput {
        ReviewInput {
            rating,
            body: "great".into(),
        }
    }

    #[tokio::test]
    async fn test_create_starts_with_no_reviews() {
        let repo = repo();
        let id = repo.create(riverbend()).await.unwrap();
        let c = repo.get(id).await.unwrap();
        assert_eq!(c.title, "Riverbend");
        assert_eq!(c.price, 15.0);
        assert!(c.reviews.is_empty());
    }

    #[tokio::test]
    async fn test_update_keeps_reviews() {
        let repo = repo();
        let id = repo.create(riverbend()).await.unwrap();
        let (_, r) = repo.add_review(id, review(4)).await.unwrap();

        let patch = CampgroundPatch {
            price: Some(0.0),
            ..Default::default()
        };
        let updated = repo.update(id, patch).await.unwrap();
        assert_eq!(updated.price, 0.0);
        assert_eq!(updated.title, "Riverbend");
        assert_eq!(updated.reviews, vec![r.id]);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = repo();
        let err = repo
            .update(DocumentId::new(), riverbend().into())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_cascades_and_second_delete_is_not_found() {
        let repo = repo();
        let id = repo.create(riverbend()).await.unwrap();
        let (_, r1) = repo.add_review(id, review(4)).await.unwrap();
        let (_, r2) = repo.add_review(id, review(2)).await.unwrap();

        let removed = repo.delete(id).await.unwrap();
        assert_eq!(removed.reviews, vec![r1.id, r2.id]);
        assert!(repo.find(id).await.unwrap().is_none());
        assert!(repo.reviews().find(r1.id).await.unwrap().is_none());
        assert!(repo.reviews().find(r2.id).await.unwrap().is_none());

        let again = repo.delete(id).await.unwrap_err();
        assert!(again.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_tolerates_already_deleted_review() {
        let repo = repo();
        let id = repo.create(riverbend()).await.unwrap();
        let (_, r1) = repo.add_review(id, review(4)).await.unwrap();
        let (_, r2) = repo.add_review(id, review(5)).await.unwrap();
        repo.reviews().delete(r1.id).await.unwrap();

        repo.delete(id).await.unwrap();
        assert!(repo.reviews().find(r2.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_leaves_other_campgrounds_reviews() {
        let repo = repo();
        let a = repo.create(riverbend()).await.unwrap();
        let b = repo.create(riverbend()).await.unwrap();
        let (_, keep) = repo.add_review(b, review(3)).await.unwrap();
        repo.add_review(a, review(1)).await.unwrap();

        repo.delete(a).await.unwrap();
        assert_eq!(repo.reviews().list().await.unwrap(), vec![keep]);
    }

    #[tokio::test]
    async fn test_add_review_to_missing_campground_creates_nothing() {
        let repo = repo();
        let err = repo
            .add_review(DocumentId::new(), review(4))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(repo.reviews().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_review_unlinks_and_deletes() {
        let repo = repo();
        let id = repo.create(riverbend()).await.unwrap();
        let (_, r1) = repo.add_review(id, review(4)).await.unwrap();
        let (_, r2) = repo.add_review(id, review(1)).await.unwrap();

        repo.remove_review(id, r1.id).await.unwrap();
        assert_eq!(repo.get(id).await.unwrap().reviews, vec![r2.id]);
        assert!(repo.reviews().find(r1.id).await.unwrap().is_none());

        let err = repo.remove_review(id, r1.id).await.unwrap_err();
        assert!(err.is_not_found());
        let err = repo.remove_review(DocumentId::new(), r2.id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { entity: "Campground", .. }));
        assert!(repo.reviews().find(r2.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_get_with_reviews_skips_dangling() {
        let repo = repo();
        let id = repo.create(riverbend()).await.unwrap();
        let (_, r1) = repo.add_review(id, review(4)).await.unwrap();
        let (_, r2) = repo.add_review(id, review(5)).await.unwrap();
        repo.reviews().delete(r1.id).await.unwrap();

        let detail = repo.get_with_reviews(id).await.unwrap();
        assert_eq!(detail.reviews.len(), 1);
        assert_eq!(detail.reviews[0].id, r2.id);
    }

    #[test]
    fn test_input_from_payload() {
        let payload = json!({"campground": {
            "title": "Riverbend", "location": "CO", "image": "http://x/i.jpg",
            "price": "15", "description": "quiet spot"
        }});
        assert_eq!(CampgroundInput::from_payload(&payload), Some(riverbend()));
        assert!(CampgroundInput::from_payload(&json!({"campground": {}})).is_none());
    }

    #[test]
    fn test_new_campground_encodes_empty_reviews() {
        let input = riverbend();
        let doc = encode(ENTITY, &NewCampground { input: &input, reviews: [] }).unwrap();
        assert_eq!(doc["reviews"], json!([]));
        assert_eq!(doc["price"], json!(15.0));
    }
}
