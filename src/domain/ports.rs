use uuid::Uuid;

use super::errors::DomainError;
use super::order::{NewOrder, OrderUpdate, OrderView};
use super::product::{NewProduct, Product, ProductPatch};
use super::review::{NewReview, Review, ReviewView};
use super::user::{NewUser, User};

pub trait UserRepository: Send + Sync + 'static {
    fn create(&self, user: NewUser) -> Result<User, DomainError>;
    /// Match on username, or on id when `identifier` is a UUID.
    fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;
    fn list(&self) -> Result<Vec<User>, DomainError>;
}

pub trait ProductRepository: Send + Sync + 'static {
    fn list(&self) -> Result<Vec<Product>, DomainError>;
    fn create(&self, product: NewProduct) -> Result<Product, DomainError>;
    /// Returns `None` when no product has this id.
    fn update(&self, id: Uuid, patch: ProductPatch) -> Result<Option<Product>, DomainError>;
    /// Returns `false` when no product has this id.
    fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}

pub trait OrderRepository: Send + Sync + 'static {
    /// Persists header, lines and optional shipping atomically.
    fn create(&self, order: NewOrder) -> Result<OrderView, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError>;
    fn list(&self) -> Result<Vec<OrderView>, DomainError>;
    /// Overwrites status and upserts shipping atomically. `None` when the order is absent.
    fn update(&self, id: Uuid, update: OrderUpdate) -> Result<Option<OrderView>, DomainError>;
    /// Deletes shipping, lines, then the header atomically. `false` when the order is absent.
    fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}

pub trait ReviewRepository: Send + Sync + 'static {
    /// True when an order with this id, owner, and status exists.
    fn order_matches(&self, order_id: Uuid, user_id: Uuid, status: &str)
        -> Result<bool, DomainError>;
    fn create(&self, review: NewReview) -> Result<Review, DomainError>;
    fn list(&self) -> Result<Vec<ReviewView>, DomainError>;
}
