use chrono::{DateTime, Utc};
use uuid::Uuid;

pub const MIN_RATING: i16 = 1;
pub const MAX_RATING: i16 = 5;

#[derive(Debug, Clone)]
pub struct NewReview {
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub order_id: Uuid,
    pub rating: i16,
    pub review_text: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Review {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub order_id: Uuid,
    pub rating: i16,
    pub review_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct OrderStatusSummary {
    pub id: Uuid,
    pub status: String,
}

#[derive(Debug, Clone)]
pub struct ReviewView {
    pub review: Review,
    /// `None` when the reviewed order no longer exists.
    pub order: Option<OrderStatusSummary>,
}

/// A review as submitted by a buyer; required fields may be missing.
#[derive(Debug, Clone, Default)]
pub struct ReviewSubmission {
    pub order_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    pub rating: Option<i16>,
    pub review_text: Option<String>,
}
