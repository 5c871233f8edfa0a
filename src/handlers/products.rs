use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{de, AppState};
use crate::auth::Seller;
use crate::domain::product::{NewProduct, Product, ProductPatch};
use crate::errors::AppError;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    /// Decimal as a string or a number with at most 2 decimal places, e.g. "9.99"
    #[serde(deserialize_with = "de::decimal")]
    #[schema(value_type = String)]
    pub price: BigDecimal,
    pub stock: i32,
    pub category: Option<String>,
    pub image_url: Option<String>,
}

/// Absent fields keep their stored value. `null` clears `description`,
/// `category` and `imageUrl`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de::nullable")]
    #[schema(value_type = Option<String>, nullable)]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "de::optional_decimal")]
    #[schema(value_type = Option<String>)]
    pub price: Option<BigDecimal>,
    pub stock: Option<i32>,
    #[serde(default, deserialize_with = "de::nullable")]
    #[schema(value_type = Option<String>, nullable)]
    pub category: Option<Option<String>>,
    #[serde(default, deserialize_with = "de::nullable")]
    #[schema(value_type = Option<String>, nullable)]
    pub image_url: Option<Option<String>>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = String)]
    pub price: BigDecimal,
    pub stock: i32,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductMessageResponse {
    pub message: String,
    pub product: ProductResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            price: p.price,
            stock: p.stock,
            category: p.category,
            image_url: p.image_url,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

impl From<CreateProductRequest> for NewProduct {
    fn from(r: CreateProductRequest) -> Self {
        Self {
            name: r.name,
            description: r.description,
            price: r.price,
            stock: r.stock,
            category: r.category,
            image_url: r.image_url,
        }
    }
}

impl From<UpdateProductRequest> for ProductPatch {
    fn from(r: UpdateProductRequest) -> Self {
        Self {
            name: r.name,
            description: r.description,
            price: r.price,
            stock: r.stock,
            category: r.category,
            image_url: r.image_url,
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /products
#[utoipa::path(
    get,
    path = "/products",
    responses(
        (status = 200, description = "All products", body = [ProductResponse]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn list_products(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let catalog = state.catalog.clone();
    let products = web::block(move || catalog.list_products()).await??;

    let body: Vec<ProductResponse> = products.into_iter().map(ProductResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /products
#[utoipa::path(
    post,
    path = "/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductMessageResponse),
        (status = 400, description = "Invalid product"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Seller role required"),
    ),
    security(("bearer_auth" = [])),
    tag = "products"
)]
pub async fn create_product(
    _seller: Seller,
    state: web::Data<AppState>,
    body: web::Json<CreateProductRequest>,
) -> Result<HttpResponse, AppError> {
    let product = NewProduct::from(body.into_inner());
    let catalog = state.catalog.clone();

    let product = web::block(move || catalog.create_product(product)).await??;

    Ok(HttpResponse::Created().json(ProductMessageResponse {
        message: "Product created successfully".to_string(),
        product: product.into(),
    }))
}

/// PUT /products/{id}
#[utoipa::path(
    put,
    path = "/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product UUID"),
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductMessageResponse),
        (status = 400, description = "Invalid field value"),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "products"
)]
pub async fn update_product(
    _seller: Seller,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateProductRequest>,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();
    let patch = ProductPatch::from(body.into_inner());
    let catalog = state.catalog.clone();

    let product = web::block(move || catalog.update_product(product_id, patch)).await??;

    Ok(HttpResponse::Ok().json(ProductMessageResponse {
        message: "Product updated successfully".to_string(),
        product: product.into(),
    }))
}

/// DELETE /products/{id}
#[utoipa::path(
    delete,
    path = "/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product UUID"),
    ),
    responses(
        (status = 200, description = "Product deleted", body = MessageResponse),
        (status = 404, description = "Product not found"),
        (status = 500, description = "Internal server error"),
    ),
    security(("bearer_auth" = [])),
    tag = "products"
)]
pub async fn delete_product(
    _seller: Seller,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();
    let catalog = state.catalog.clone();

    web::block(move || catalog.delete_product(product_id)).await??;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Product deleted successfully".to_string(),
    }))
}
