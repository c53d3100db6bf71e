// Review aggregation: rounded mean rating and count per hotel

use crate::{
    attributes::non_blank,
    error::CatalogError,
    store::{CatalogStore, POST_TYPE_REVIEW},
};

pub const RATING: &str = "rating";

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReviewSummary {
    // None when count is 0
    pub rating: Option<i64>,
    pub count: u64,
}

pub struct ReviewAggregator<'a, S: CatalogStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: CatalogStore + ?Sized> ReviewAggregator<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    // Reviews authored by `id`. Reviews with a missing or blank rating are not counted.
    pub async fn aggregate(&self, id: u64) -> Result<ReviewSummary, CatalogError> {
        let reviews = self.store.posts_by_author(id, POST_TYPE_REVIEW).await?;

        let mut ratings = Vec::with_capacity(reviews.len());
        for review in &reviews {
            let Some(raw) = self.store.post_meta(review.id, RATING).await?.and_then(non_blank) else {
                continue;
            };
            let rating = raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| CatalogError::malformed(format!("review {}", review.id), RATING, &raw))?;
            ratings.push(rating);
        }

        Ok(summarize(&ratings))
    }
}

pub fn summarize(ratings: &[f64]) -> ReviewSummary {
    if ratings.is_empty() {
        return ReviewSummary::default();
    }

    let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
    ReviewSummary {
        // f64::round rounds half away from zero
        rating: Some(mean.round() as i64),
        count: ratings.len() as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_store::MemoryStore;

    #[test]
    fn test_summarize() {
        assert_eq!(summarize(&[]), ReviewSummary { rating: None, count: 0 });
        assert_eq!(summarize(&[4.0, 5.0]), ReviewSummary { rating: Some(5), count: 2 });
        assert_eq!(summarize(&[3.0, 3.0, 4.0]), ReviewSummary { rating: Some(3), count: 3 });
        assert_eq!(summarize(&[1.0]), ReviewSummary { rating: Some(1), count: 1 });
    }

    #[tokio::test]
    async fn test_aggregate_from_store() {
        let store = MemoryStore::new();
        store
            .add_post(100, 1, "review", "Great")
            .add_post_meta(100, RATING, "4")
            .add_post(101, 1, "review", "Perfect")
            .add_post_meta(101, RATING, "5")
            // no rating attribute, not counted
            .add_post(102, 1, "review", "No stars")
            // room posts are not reviews
            .add_post(103, 1, "room", "Suite")
            .add_post_meta(103, RATING, "1")
            // another author
            .add_post(104, 2, "review", "Meh")
            .add_post_meta(104, RATING, "1");

        let summary = ReviewAggregator::new(&store).aggregate(1).await.unwrap();
        assert_eq!(summary, ReviewSummary { rating: Some(5), count: 2 });
    }

    #[tokio::test]
    async fn test_no_reviews_has_no_rating() {
        let store = MemoryStore::new();
        let summary = ReviewAggregator::new(&store).aggregate(1).await.unwrap();
        assert_eq!(summary.count, 0);
        assert_eq!(summary.rating, None);
    }

    #[tokio::test]
    async fn test_blank_rating_is_not_counted() {
        let store = MemoryStore::new();
        store
            .add_post(98, 1, "review", "Fine")
            .add_post_meta(98, RATING, "3")
            .add_post(99, 1, "review", "Empty")
            .add_post_meta(99, RATING, "")
            .add_post(100, 1, "review", "Spaces")
            .add_post_meta(100, RATING, "   ");

        let summary = ReviewAggregator::new(&store).aggregate(1).await.unwrap();
        assert_eq!(summary, ReviewSummary { rating: Some(3), count: 1 });
    }

    #[tokio::test]
    async fn test_malformed_rating() {
        let store = MemoryStore::new();
        store
            .add_post(100, 1, "review", "Great")
            .add_post_meta(100, RATING, "five stars");

        let err = ReviewAggregator::new(&store).aggregate(1).await.unwrap_err();
        assert!(matches!(err, CatalogError::MalformedData { .. }));
    }
}
