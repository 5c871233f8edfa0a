use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::ReviewRepository;
use crate::domain::review::{NewReview, OrderStatusSummary, Review, ReviewView};
use crate::schema::{orders, rating_reviews};

use super::models::{NewReviewRow, OrderStatusRow, ReviewRow};

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Review {
            id: row.id,
            user_id: row.user_id,
            product_id: row.product_id,
            order_id: row.order_id,
            rating: row.rating,
            review_text: row.review_text,
            created_at: row.created_at,
        }
    }
}

pub struct DieselReviewRepository {
    pool: DbPool,
}

impl DieselReviewRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl ReviewRepository for DieselReviewRepository {
    fn order_matches(
        &self,
        order_id: Uuid,
        user_id: Uuid,
        status: &str,
    ) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let found = orders::table
            .filter(orders::id.eq(order_id))
            .filter(orders::user_id.eq(user_id))
            .filter(orders::status.eq(status))
            .select(orders::id)
            .first::<Uuid>(&mut conn)
            .optional()?;

        Ok(found.is_some())
    }

    fn create(&self, review: NewReview) -> Result<Review, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(rating_reviews::table)
            .values(&NewReviewRow {
                id: Uuid::new_v4(),
                user_id: review.user_id,
                product_id: review.product_id,
                order_id: review.order_id,
                rating: review.rating,
                review_text: review.review_text.as_deref(),
            })
            .returning(ReviewRow::as_returning())
            .get_result(&mut conn)?;

        Ok(row.into())
    }

    fn list(&self) -> Result<Vec<ReviewView>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows: Vec<(ReviewRow, Option<OrderStatusRow>)> = rating_reviews::table
            .left_join(orders::table.on(orders::id.eq(rating_reviews::order_id)))
            .select((ReviewRow::as_select(), Option::<OrderStatusRow>::as_select()))
            .order(rating_reviews::created_at.asc())
            .load(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|(review, order)| ReviewView {
                review: review.into(),
                order: order.map(|o| OrderStatusSummary {
                    id: o.id,
                    status: o.status,
                }),
            })
            .collect())
    }
}
