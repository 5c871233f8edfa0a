use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::AppState;
use crate::auth::{Buyer, Identity};
use crate::domain::review::{OrderStatusSummary, Review, ReviewSubmission, ReviewView};
use crate::errors::AppError;

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub order_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    /// 1 to 5
    pub rating: Option<i16>,
    pub review_text: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderStatusResponse {
    pub id: Uuid,
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub order_id: Uuid,
    pub rating: i16,
    pub review_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A review as listed, with the status of the order it was written against.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewListItem {
    #[serde(flatten)]
    pub review: ReviewResponse,
    /// Null once the order has been deleted.
    pub order: Option<OrderStatusResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewMessageResponse {
    pub message: String,
    pub review: ReviewResponse,
}

impl From<CreateReviewRequest> for ReviewSubmission {
    fn from(r: CreateReviewRequest) -> Self {
        Self {
            order_id: r.order_id,
            product_id: r.product_id,
            rating: r.rating,
            review_text: r.review_text,
        }
    }
}

impl From<Review> for ReviewResponse {
    fn from(r: Review) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            product_id: r.product_id,
            order_id: r.order_id,
            rating: r.rating,
            review_text: r.review_text,
            created_at: r.created_at,
        }
    }
}

impl From<ReviewView> for ReviewListItem {
    fn from(v: ReviewView) -> Self {
        Self {
            review: v.review.into(),
            order: v
                .order
                .map(|OrderStatusSummary { id, status }| OrderStatusResponse { id, status }),
        }
    }
}

/// POST /ratingReview
///
/// Buyers may review products of their own completed orders. Several reviews
/// for the same order and product are accepted.
#[utoipa::path(
    post,
    path = "/ratingReview",
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review stored", body = ReviewMessageResponse),
        (status = 400, description = "Missing fields, rating out of range, or order not completed"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Buyer role required"),
    ),
    security(("bearer_auth" = [])),
    tag = "reviews"
)]
pub async fn create_review(
    buyer: Buyer,
    state: web::Data<AppState>,
    body: web::Json<CreateReviewRequest>,
) -> Result<HttpResponse, AppError> {
    let Buyer(identity) = buyer;
    let submission = ReviewSubmission::from(body.into_inner());
    let reviews = state.reviews.clone();

    let review =
        web::block(move || reviews.create_review(identity.user_id, submission)).await??;

    Ok(HttpResponse::Created().json(ReviewMessageResponse {
        message: "Rating review created successfully".to_string(),
        review: review.into(),
    }))
}

/// GET /ratingReview
#[utoipa::path(
    get,
    path = "/ratingReview",
    responses(
        (status = 200, description = "All reviews with their order status", body = [ReviewListItem]),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Internal server error"),
    ),
    security(("bearer_auth" = [])),
    tag = "reviews"
)]
pub async fn list_reviews(
    _identity: Identity,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let reviews = state.reviews.clone();
    let result = web::block(move || reviews.list_reviews()).await??;

    let body: Vec<ReviewListItem> = result.into_iter().map(ReviewListItem::from).collect();
    Ok(HttpResponse::Ok().json(body))
}
