use std::sync::Arc;

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::ports::ProductRepository;
use crate::domain::product::{NewProduct, Product, ProductPatch};

#[derive(Clone)]
pub struct CatalogService {
    repo: Arc<dyn ProductRepository>,
}

impl CatalogService {
    pub fn new(repo: Arc<dyn ProductRepository>) -> Self {
        Self { repo }
    }

    pub fn list_products(&self) -> Result<Vec<Product>, DomainError> {
        self.repo.list()
    }

    pub fn create_product(&self, product: NewProduct) -> Result<Product, DomainError> {
        product.validate()?;
        let product = self.repo.create(product)?;
        log::info!("created product {} ({})", product.id, product.name);
        Ok(product)
    }

    pub fn update_product(&self, id: Uuid, patch: ProductPatch) -> Result<Product, DomainError> {
        patch.validate()?;
        self.repo
            .update(id, patch)?
            .ok_or_else(|| DomainError::NotFound("Product not found".to_string()))
    }

    /// Orders that reference the product keep their lines.
    pub fn delete_product(&self, id: Uuid) -> Result<(), DomainError> {
        if !self.repo.delete(id)? {
            return Err(DomainError::NotFound("Product not found".to_string()));
        }
        log::info!("deleted product {}", id);
        Ok(())
    }
}
