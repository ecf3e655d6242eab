//! # Referential Integrity
//!
//! Campgrounds own reviews by id. Two rules keep the link sound:
//!
//! - Cascade: removing a campground removes every review it lists
//! - Unlink: removing a review pulls its id from the owner's list
//!
//! Neither sequence is atomic across documents, so a failure between steps
//! can leave a dangling reference (listed id, no review) or an orphan review
//! (review no campground lists). [`IntegrityChecker`] detects both and can
//! repair them.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::storage::{DocumentId, DocumentStore, UpdateOp};

use super::campground::Campground;
use super::errors::RepositoryResult;
use super::review::{Review, ReviewRepository};
use super::{decode, CAMPGROUNDS, REVIEWS};

/// Cascade step of a campground delete: remove every review the campground
/// lists. Empty lists and already-deleted reviews are fine. Returns the
/// number of reviews actually removed.
pub(super) async fn cascade_reviews(
    reviews: &ReviewRepository,
    campground: &Campground,
) -> RepositoryResult<usize> {
    if campground.reviews.is_empty() {
        return Ok(0);
    }
    let removed = reviews.delete_many(&campground.reviews).await?;
    if removed < campground.reviews.len() {
        debug!(
            campground_id = %campground.id,
            listed = campground.reviews.len(),
            removed,
            "cascade skipped reviews that were already gone"
        );
    }
    Ok(removed)
}

/// A campground listing a review id that has no review record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingReference {
    pub campground_id: DocumentId,
    pub review_id: DocumentId,
}

/// Result of a consistency scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConsistencyReport {
    pub campgrounds_scanned: usize,
    pub reviews_scanned: usize,
    pub dangling_references: Vec<DanglingReference>,
    pub orphan_reviews: Vec<DocumentId>,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.dangling_references.is_empty() && self.orphan_reviews.is_empty()
    }
}

/// What a repair pass changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepairSummary {
    pub references_pulled: usize,
    pub orphans_deleted: usize,
}

/// Scans the store for broken campground → review links
#[derive(Clone)]
pub struct IntegrityChecker {
    store: Arc<dyn DocumentStore>,
}

impl IntegrityChecker {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Scan both collections and report every dangling reference and orphan.
    ///
    /// The scan reads each collection once; under concurrent writes it can
    /// report a link that was being created or removed at the time.
    pub async fn check(&self) -> RepositoryResult<ConsistencyReport> {
        let campgrounds: Vec<Campground> = self
            .store
            .find_all(CAMPGROUNDS)
            .await?
            .into_iter()
            .map(|doc| decode("Campground", doc))
            .collect::<RepositoryResult<_>>()?;
        let reviews: Vec<Review> = self
            .store
            .find_all(REVIEWS)
            .await?
            .into_iter()
            .map(|doc| decode("Review", doc))
            .collect::<RepositoryResult<_>>()?;

        let existing: HashSet<DocumentId> = reviews.iter().map(|r| r.id).collect();
        let mut referenced = HashSet::new();
        let mut dangling_references = Vec::new();

        for campground in &campgrounds {
            for review_id in &campground.reviews {
                referenced.insert(*review_id);
                if !existing.contains(review_id) {
                    dangling_references.push(DanglingReference {
                        campground_id: campground.id,
                        review_id: *review_id,
                    });
                }
            }
        }

        let orphan_reviews: Vec<DocumentId> = reviews
            .iter()
            .map(|r| r.id)
            .filter(|id| !referenced.contains(id))
            .collect();

        let report = ConsistencyReport {
            campgrounds_scanned: campgrounds.len(),
            reviews_scanned: reviews.len(),
            dangling_references,
            orphan_reviews,
        };
        if report.is_consistent() {
            debug!(
                campgrounds = report.campgrounds_scanned,
                reviews = report.reviews_scanned,
                "consistency check passed"
            );
        } else {
            warn!(
                dangling = report.dangling_references.len(),
                orphans = report.orphan_reviews.len(),
                "consistency check found broken links"
            );
        }
        Ok(report)
    }

    /// Pull every dangling id from its campground and delete every orphan.
    pub async fn repair(&self, report: &ConsistencyReport) -> RepositoryResult<RepairSummary> {
        let mut summary = RepairSummary::default();

        for dangling in &report.dangling_references {
            let pull = UpdateOp::Pull {
                field: "reviews".to_string(),
                value: dangling.review_id.to_value(),
            };
            // A campground deleted since the scan needs no repair
            if self
                .store
                .update_by_id(CAMPGROUNDS, dangling.campground_id, pull)
                .await?
                .is_some()
            {
                summary.references_pulled += 1;
            }
        }

        summary.orphans_deleted = self
            .store
            .delete_many(REVIEWS, &report.orphan_reviews)
            .await?;

        info!(
            references_pulled = summary.references_pulled,
            orphans_deleted = summary.orphans_deleted,
            "consistency repair finished"
        );
        Ok(summary)
    }
}
