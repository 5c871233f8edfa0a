use std::sync::Arc;

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::money;
use crate::domain::order::{
    order_total, validate_items, NewOrder, OrderItemInput, OrderUpdate, OrderView, ShippingInput,
    STATUS_PROCESSING,
};
use crate::domain::ports::OrderRepository;

#[derive(Clone)]
pub struct OrderService {
    repo: Arc<dyn OrderRepository>,
}

impl OrderService {
    pub fn new(repo: Arc<dyn OrderRepository>) -> Self {
        Self { repo }
    }

    /// Totals the items as priced by the caller and stores the whole
    /// aggregate atomically.
    pub fn create_order(
        &self,
        user_id: Uuid,
        items: Vec<OrderItemInput>,
        shipping: Option<ShippingInput>,
    ) -> Result<OrderView, DomainError> {
        validate_items(&items)?;
        if let Some(shipping) = &shipping {
            shipping.require_address()?;
        }
        let total_amount = order_total(&items);
        money::validate_total(&total_amount)?;

        let order = self.repo.create(NewOrder {
            user_id,
            status: STATUS_PROCESSING.to_string(),
            total_amount,
            items,
            shipping,
        })?;

        log::info!(
            "created order {} for user {} ({} lines, total {})",
            order.id,
            order.user_id,
            order.lines.len(),
            order.total_amount
        );
        Ok(order)
    }

    pub fn get_order(&self, id: Uuid) -> Result<OrderView, DomainError> {
        self.repo
            .find_by_id(id)?
            .ok_or_else(|| DomainError::NotFound("Order not found".to_string()))
    }

    pub fn list_orders(&self) -> Result<Vec<OrderView>, DomainError> {
        self.repo.list()
    }

    pub fn update_order(&self, id: Uuid, update: OrderUpdate) -> Result<OrderView, DomainError> {
        if let Some(status) = &update.status {
            if status.trim().is_empty() {
                return Err(DomainError::InvalidInput(
                    "status must not be empty".to_string(),
                ));
            }
        }
        if let Some(ShippingInput {
            address: Some(address),
            ..
        }) = &update.shipping
        {
            if address.trim().is_empty() {
                return Err(DomainError::InvalidInput(
                    "shipping address must not be empty".to_string(),
                ));
            }
        }

        let order = self
            .repo
            .update(id, update)?
            .ok_or_else(|| DomainError::NotFound("Order not found".to_string()))?;
        log::info!("updated order {} (status {})", order.id, order.status);
        Ok(order)
    }

    /// Removes the order with its lines and shipping details.
    pub fn delete_order(&self, id: Uuid) -> Result<(), DomainError> {
        if !self.repo.delete(id)? {
            return Err(DomainError::NotFound("Order not found".to_string()));
        }
        log::info!("deleted order {}", id);
        Ok(())
    }
}
