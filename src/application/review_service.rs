use std::sync::Arc;

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::STATUS_COMPLETED;
use crate::domain::ports::ReviewRepository;
use crate::domain::review::{
    NewReview, Review, ReviewSubmission, ReviewView, MAX_RATING, MIN_RATING,
};

#[derive(Clone)]
pub struct ReviewService {
    repo: Arc<dyn ReviewRepository>,
}

impl ReviewService {
    pub fn new(repo: Arc<dyn ReviewRepository>) -> Self {
        Self { repo }
    }

    /// A buyer may only review against one of their own completed orders.
    /// The product itself is not checked against the order's lines.
    pub fn create_review(
        &self,
        user_id: Uuid,
        submission: ReviewSubmission,
    ) -> Result<Review, DomainError> {
        let (Some(order_id), Some(product_id), Some(rating)) =
            (submission.order_id, submission.product_id, submission.rating)
        else {
            return Err(DomainError::InvalidInput(
                "orderId, productId and rating are required".to_string(),
            ));
        };
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(DomainError::InvalidInput(format!(
                "rating must be between {} and {}",
                MIN_RATING, MAX_RATING
            )));
        }

        if !self.repo.order_matches(order_id, user_id, STATUS_COMPLETED)? {
            log::warn!(
                "review rejected: order {} is not a completed order of user {}",
                order_id,
                user_id
            );
            return Err(DomainError::PreconditionFailed(
                "Order not found or not completed".to_string(),
            ));
        }

        let review = self.repo.create(NewReview {
            user_id,
            product_id,
            order_id,
            rating,
            review_text: submission.review_text,
        })?;
        log::info!("user {} reviewed product {}", user_id, product_id);
        Ok(review)
    }

    pub fn list_reviews(&self) -> Result<Vec<ReviewView>, DomainError> {
        self.repo.list()
    }
}

#[cfg(test)]
mod tests {
    use bigdecimal::BigDecimal;

    use super::*;
    use crate::domain::order::{NewOrder, OrderItemInput, STATUS_PROCESSING};
    use crate::domain::ports::{OrderRepository, UserRepository};
    use crate::domain::user::{NewUser, Role};
    use crate::test_utils::InMemoryStore;

    fn seed_order(store: &InMemoryStore, username: &str, status: &str) -> (Uuid, Uuid) {
        let user = UserRepository::create(
            store,
            NewUser {
                username: username.to_string(),
                password_hash: "hash".to_string(),
                role: Role::Buyer,
            },
        )
        .expect("seed user failed");
        let order = OrderRepository::create(
            store,
            NewOrder {
                user_id: user.id,
                status: STATUS_PROCESSING.to_string(),
                total_amount: BigDecimal::from(10),
                items: vec![OrderItemInput {
                    product_id: Uuid::new_v4(),
                    quantity: 1,
                    price: BigDecimal::from(10),
                }],
                shipping: None,
            },
        )
        .expect("seed order failed");
        store.set_order_status(order.id, status);
        (user.id, order.id)
    }

    fn submission(order_id: Uuid, rating: i16) -> ReviewSubmission {
        ReviewSubmission {
            order_id: Some(order_id),
            product_id: Some(Uuid::new_v4()),
            rating: Some(rating),
            review_text: Some("enak".to_string()),
        }
    }

    #[test]
    fn review_on_completed_order_is_stored() {
        let store = InMemoryStore::new();
        let (user_id, order_id) = seed_order(&store, "sari", STATUS_COMPLETED);
        let service = ReviewService::new(store.clone());

        let review = service
            .create_review(user_id, submission(order_id, 4))
            .expect("review failed");

        assert_eq!(review.rating, 4);
        assert_eq!(review.order_id, order_id);
        let listed = service.list_reviews().expect("list failed");
        assert_eq!(listed.len(), 1);
        assert_eq!(
            listed[0].order.as_ref().map(|o| o.status.as_str()),
            Some(STATUS_COMPLETED)
        );
    }

    #[test]
    fn review_on_processing_order_is_rejected() {
        let store = InMemoryStore::new();
        let (user_id, order_id) = seed_order(&store, "sari", STATUS_PROCESSING);
        let service = ReviewService::new(store.clone());

        let err = service
            .create_review(user_id, submission(order_id, 5))
            .unwrap_err();

        assert!(matches!(err, DomainError::PreconditionFailed(_)));
        assert!(store.reviews.lock().unwrap().is_empty());
    }

    #[test]
    fn review_on_someone_elses_order_is_rejected() {
        let store = InMemoryStore::new();
        let (_, order_id) = seed_order(&store, "sari", STATUS_COMPLETED);
        let (other_user, _) = seed_order(&store, "agus", STATUS_COMPLETED);
        let service = ReviewService::new(store.clone());

        assert!(matches!(
            service.create_review(other_user, submission(order_id, 5)),
            Err(DomainError::PreconditionFailed(_))
        ));
    }

    #[test]
    fn rating_out_of_range_is_rejected() {
        let store = InMemoryStore::new();
        let (user_id, order_id) = seed_order(&store, "sari", STATUS_COMPLETED);
        let service = ReviewService::new(store.clone());

        for rating in [0, 6] {
            assert!(matches!(
                service.create_review(user_id, submission(order_id, rating)),
                Err(DomainError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn missing_fields_are_rejected() {
        let service = ReviewService::new(InMemoryStore::new());
        let err = service
            .create_review(Uuid::new_v4(), ReviewSubmission::default())
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[test]
    fn duplicate_reviews_are_both_kept() {
        let store = InMemoryStore::new();
        let (user_id, order_id) = seed_order(&store, "sari", STATUS_COMPLETED);
        let service = ReviewService::new(store.clone());
        let mut first = submission(order_id, 3);
        first.product_id = Some(Uuid::nil());
        let second = first.clone();

        service.create_review(user_id, first).expect("first failed");
        service.create_review(user_id, second).expect("second failed");

        assert_eq!(service.list_reviews().expect("list failed").len(), 2);
    }
}
