//! In-memory repository implementations for service and handler tests.

use std::sync::{Arc, Mutex};

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::auth::TokenService;
use crate::config::AuthConfig;
use crate::domain::errors::DomainError;
use crate::domain::order::{
    NewOrder, OrderLineView, OrderUpdate, OrderView, ProductSummary, ShippingDetails,
};
use crate::domain::ports::{OrderRepository, ProductRepository, ReviewRepository, UserRepository};
use crate::domain::product::{NewProduct, Product, ProductPatch};
use crate::domain::review::{NewReview, OrderStatusSummary, Review, ReviewView};
use crate::domain::user::{NewUser, User};

/// Order header as its own row; lines and shipping live in separate tables.
#[derive(Debug, Clone)]
pub struct StoredOrder {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub total_amount: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct StoredLine {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: BigDecimal,
}

/// One shared store backing every repository trait, so reviews can see orders.
///
/// Locks are always taken in field order.
#[derive(Default)]
pub struct InMemoryStore {
    pub users: Mutex<Vec<User>>,
    pub orders: Mutex<Vec<StoredOrder>>,
    pub order_lines: Mutex<Vec<StoredLine>>,
    pub shipping: Mutex<Vec<ShippingDetails>>,
    pub products: Mutex<Vec<Product>>,
    pub reviews: Mutex<Vec<Review>>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Lines and shipping rows still stored for `order_id`.
    pub fn rows_for_order(&self, order_id: Uuid) -> (usize, usize) {
        let lines = self.order_lines.lock().unwrap();
        let shipping = self.shipping.lock().unwrap();
        (
            lines.iter().filter(|l| l.order_id == order_id).count(),
            shipping.iter().filter(|s| s.order_id == order_id).count(),
        )
    }

    /// Joins a header with its lines, shipping and the products still in the
    /// catalog. Callers may hold `orders` but no later lock.
    fn view_of(&self, order: &StoredOrder) -> OrderView {
        let lines = self.order_lines.lock().unwrap();
        let shipping = self.shipping.lock().unwrap();
        let products = self.products.lock().unwrap();
        OrderView {
            id: order.id,
            user_id: order.user_id,
            status: order.status.clone(),
            total_amount: order.total_amount.clone(),
            created_at: order.created_at,
            updated_at: order.updated_at,
            lines: lines
                .iter()
                .filter(|l| l.order_id == order.id)
                .map(|l| OrderLineView {
                    id: l.id,
                    product_id: l.product_id,
                    quantity: l.quantity,
                    price: l.price.clone(),
                    product: products.iter().find(|p| p.id == l.product_id).map(|p| {
                        ProductSummary {
                            id: p.id,
                            name: p.name.clone(),
                            category: p.category.clone(),
                            image_url: p.image_url.clone(),
                        }
                    }),
                })
                .collect(),
            shipping: shipping.iter().find(|s| s.order_id == order.id).cloned(),
        }
    }

    /// Force an order into a status without going through a service.
    pub fn set_order_status(&self, order_id: Uuid, status: &str) {
        let mut orders = self.orders.lock().unwrap();
        if let Some(order) = orders.iter_mut().find(|o| o.id == order_id) {
            order.status = status.to_string();
        }
    }
}

pub fn test_token_service() -> Arc<TokenService> {
    Arc::new(TokenService::new(&AuthConfig {
        jwt_secret: "test-secret".to_string(),
    }))
}

impl UserRepository for InMemoryStore {
    fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == user.username) {
            return Err(DomainError::InvalidInput(
                "duplicate key value violates unique constraint \"users_username_key\""
                    .to_string(),
            ));
        }
        let user = User {
            id: Uuid::new_v4(),
            username: user.username,
            password_hash: user.password_hash,
            role: user.role,
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>, DomainError> {
        let id = Uuid::parse_str(identifier).ok();
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|u| u.username == identifier || Some(u.id) == id)
            .cloned())
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    fn list(&self) -> Result<Vec<User>, DomainError> {
        Ok(self.users.lock().unwrap().clone())
    }
}

impl ProductRepository for InMemoryStore {
    fn list(&self) -> Result<Vec<Product>, DomainError> {
        Ok(self.products.lock().unwrap().clone())
    }

    fn create(&self, product: NewProduct) -> Result<Product, DomainError> {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            name: product.name,
            description: product.description,
            price: product.price,
            stock: product.stock,
            category: product.category,
            image_url: product.image_url,
            created_at: now,
            updated_at: now,
        };
        self.products.lock().unwrap().push(product.clone());
        Ok(product)
    }

    fn update(&self, id: Uuid, patch: ProductPatch) -> Result<Option<Product>, DomainError> {
        let mut products = self.products.lock().unwrap();
        let Some(product) = products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        patch.apply_to(product);
        product.updated_at = Utc::now();
        Ok(Some(product.clone()))
    }

    fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut products = self.products.lock().unwrap();
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() < before)
    }
}

impl OrderRepository for InMemoryStore {
    fn create(&self, order: NewOrder) -> Result<OrderView, DomainError> {
        let known_user = self
            .users
            .lock()
            .unwrap()
            .iter()
            .any(|u| u.id == order.user_id);
        if !known_user {
            return Err(DomainError::InvalidInput(
                "insert or update on table \"orders\" violates foreign key constraint".to_string(),
            ));
        }
        let shipping_address = match &order.shipping {
            Some(shipping) => Some(shipping.require_address()?.to_string()),
            None => None,
        };

        let now = Utc::now();
        let header = StoredOrder {
            id: Uuid::new_v4(),
            user_id: order.user_id,
            status: order.status,
            total_amount: order.total_amount,
            created_at: now,
            updated_at: now,
        };
        let mut orders = self.orders.lock().unwrap();
        self.order_lines
            .lock()
            .unwrap()
            .extend(order.items.into_iter().map(|item| StoredLine {
                id: Uuid::new_v4(),
                order_id: header.id,
                product_id: item.product_id,
                quantity: item.quantity,
                price: item.price,
            }));
        if let Some((s, address)) = order.shipping.zip(shipping_address) {
            self.shipping.lock().unwrap().push(ShippingDetails {
                id: Uuid::new_v4(),
                order_id: header.id,
                address,
                city: s.city,
                postal_code: s.postal_code,
                country: s.country,
                phone: s.phone,
            });
        }
        let view = self.view_of(&header);
        orders.push(header);
        Ok(view)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError> {
        let orders = self.orders.lock().unwrap();
        Ok(orders.iter().find(|o| o.id == id).map(|o| self.view_of(o)))
    }

    fn list(&self) -> Result<Vec<OrderView>, DomainError> {
        let orders = self.orders.lock().unwrap();
        Ok(orders.iter().map(|o| self.view_of(o)).collect())
    }

    fn update(&self, id: Uuid, update: OrderUpdate) -> Result<Option<OrderView>, DomainError> {
        let mut orders = self.orders.lock().unwrap();
        let Some(order) = orders.iter_mut().find(|o| o.id == id) else {
            return Ok(None);
        };
        if let Some(input) = update.shipping {
            let mut shipping = self.shipping.lock().unwrap();
            match shipping.iter_mut().find(|s| s.order_id == id) {
                Some(existing) => {
                    if let Some(address) = input.address {
                        existing.address = address;
                    }
                    existing.city = input.city.or(existing.city.take());
                    existing.postal_code = input.postal_code.or(existing.postal_code.take());
                    existing.country = input.country.or(existing.country.take());
                    existing.phone = input.phone.or(existing.phone.take());
                }
                None => {
                    let address = input.require_address()?.to_string();
                    shipping.push(ShippingDetails {
                        id: Uuid::new_v4(),
                        order_id: id,
                        address,
                        city: input.city,
                        postal_code: input.postal_code,
                        country: input.country,
                        phone: input.phone,
                    });
                }
            }
        }
        if let Some(status) = update.status {
            order.status = status;
        }
        order.updated_at = Utc::now();
        Ok(Some(self.view_of(order)))
    }

    fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut orders = self.orders.lock().unwrap();
        if !orders.iter().any(|o| o.id == id) {
            return Ok(false);
        }
        self.order_lines.lock().unwrap().retain(|l| l.order_id != id);
        self.shipping.lock().unwrap().retain(|s| s.order_id != id);
        orders.retain(|o| o.id != id);
        Ok(true)
    }
}

impl ReviewRepository for InMemoryStore {
    fn order_matches(
        &self,
        order_id: Uuid,
        user_id: Uuid,
        status: &str,
    ) -> Result<bool, DomainError> {
        let orders = self.orders.lock().unwrap();
        Ok(orders
            .iter()
            .any(|o| o.id == order_id && o.user_id == user_id && o.status == status))
    }

    fn create(&self, review: NewReview) -> Result<Review, DomainError> {
        let review = Review {
            id: Uuid::new_v4(),
            user_id: review.user_id,
            product_id: review.product_id,
            order_id: review.order_id,
            rating: review.rating,
            review_text: review.review_text,
            created_at: Utc::now(),
        };
        self.reviews.lock().unwrap().push(review.clone());
        Ok(review)
    }

    fn list(&self) -> Result<Vec<ReviewView>, DomainError> {
        let orders = self.orders.lock().unwrap();
        let reviews = self.reviews.lock().unwrap();
        Ok(reviews
            .iter()
            .map(|r| ReviewView {
                review: r.clone(),
                order: orders
                    .iter()
                    .find(|o| o.id == r.order_id)
                    .map(|o| OrderStatusSummary {
                        id: o.id,
                        status: o.status.clone(),
                    }),
            })
            .collect())
    }
}
