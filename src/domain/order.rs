use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;
use super::money;

/// Status assigned to every new order.
pub const STATUS_PROCESSING: &str = "processing";
/// Status an order must have before its products can be reviewed.
pub const STATUS_COMPLETED: &str = "completed";

#[derive(Debug, Clone)]
pub struct OrderItemInput {
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: BigDecimal,
}

#[derive(Debug, Clone, Default)]
pub struct ShippingInput {
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
}

impl ShippingInput {
    /// A shipping record can only be created with an address.
    pub fn require_address(&self) -> Result<&str, DomainError> {
        match self.address.as_deref() {
            Some(address) if !address.trim().is_empty() => Ok(address),
            _ => Err(DomainError::InvalidInput(
                "shipping address must not be empty".to_string(),
            )),
        }
    }
}

/// Everything needed to persist an order aggregate in one go.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: Uuid,
    pub status: String,
    pub total_amount: BigDecimal,
    pub items: Vec<OrderItemInput>,
    pub shipping: Option<ShippingInput>,
}

#[derive(Debug, Clone, Default)]
pub struct OrderUpdate {
    pub status: Option<String>,
    pub shipping: Option<ShippingInput>,
}

#[derive(Debug, Clone)]
pub struct ProductSummary {
    pub id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OrderLineView {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: BigDecimal,
    /// `None` once the product has been removed from the catalog.
    pub product: Option<ProductSummary>,
}

#[derive(Debug, Clone)]
pub struct ShippingDetails {
    pub id: Uuid,
    pub order_id: Uuid,
    pub address: String,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub total_amount: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub lines: Vec<OrderLineView>,
    pub shipping: Option<ShippingDetails>,
}

/// Σ price × quantity over the items exactly as supplied. Once the items pass
/// `validate_items` every price is whole cents, so this equals the sum of the
/// stored lines.
pub fn order_total(items: &[OrderItemInput]) -> BigDecimal {
    items.iter().fold(BigDecimal::zero(), |sum, item| {
        sum + &item.price * BigDecimal::from(item.quantity)
    })
}

pub fn validate_items(items: &[OrderItemInput]) -> Result<(), DomainError> {
    if items.is_empty() {
        return Err(DomainError::InvalidInput(
            "an order needs at least one product".to_string(),
        ));
    }
    for item in items {
        if item.quantity < 1 {
            return Err(DomainError::InvalidInput(format!(
                "quantity for product {} must be at least 1",
                item.product_id
            )));
        }
        let label = format!("price for product {}", item.product_id);
        money::validate_price(&label, &item.price)?;
    }
    Ok(())
}
