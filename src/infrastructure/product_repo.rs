use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::ProductRepository;
use crate::domain::product::{NewProduct, Product, ProductPatch};
use crate::schema::products;

use super::models::{NewProductRow, ProductChangeset, ProductRow};

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            stock: row.stock,
            category: row.category,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct DieselProductRepository {
    pool: DbPool,
}

impl DieselProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl ProductRepository for DieselProductRepository {
    fn list(&self) -> Result<Vec<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = products::table
            .select(ProductRow::as_select())
            .order(products::created_at.asc())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    fn create(&self, product: NewProduct) -> Result<Product, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(products::table)
            .values(&NewProductRow {
                id: Uuid::new_v4(),
                name: &product.name,
                description: product.description.as_deref(),
                price: &product.price,
                stock: product.stock,
                category: product.category.as_deref(),
                image_url: product.image_url.as_deref(),
            })
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)?;

        Ok(row.into())
    }

    fn update(&self, id: Uuid, patch: ProductPatch) -> Result<Option<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::update(products::table.find(id))
            .set(&ProductChangeset {
                name: patch.name.as_deref(),
                description: patch.description.as_ref().map(Option::as_deref),
                price: patch.price.as_ref(),
                stock: patch.stock,
                category: patch.category.as_ref().map(Option::as_deref),
                image_url: patch.image_url.as_ref().map(Option::as_deref),
                updated_at: Utc::now(),
            })
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)
            .optional()?;

        Ok(row.map(Product::from))
    }

    fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let deleted = diesel::delete(products::table.find(id)).execute(&mut conn)?;
        Ok(deleted > 0)
    }
}
