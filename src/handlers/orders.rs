use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::products::MessageResponse;
use super::{de, AppState};
use crate::auth::{Identity, Seller};
use crate::domain::order::{
    OrderItemInput, OrderLineView, OrderUpdate, OrderView, ProductSummary, ShippingDetails,
    ShippingInput,
};
use crate::errors::AppError;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    #[serde(alias = "id")]
    pub product_id: Uuid,
    pub quantity: i32,
    /// Unit price as charged, decimal as a string or a number with at most
    /// 2 decimal places, e.g. "9.99"
    #[serde(deserialize_with = "de::decimal")]
    #[schema(value_type = String)]
    pub price: BigDecimal,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShippingRequest {
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    /// Owner of the order; defaults to the caller.
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub products: Vec<OrderItemRequest>,
    pub shipping_details: Option<ShippingRequest>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    pub status: Option<String>,
    pub shipping_details: Option<ShippingRequest>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummaryResponse {
    pub id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    #[schema(value_type = String)]
    pub price: BigDecimal,
    /// Absent once the product has been deleted from the catalog.
    pub product: Option<ProductSummaryResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShippingResponse {
    pub id: Uuid,
    pub order_id: Uuid,
    pub address: String,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    #[schema(value_type = String)]
    pub total_amount: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub order_lines: Vec<OrderLineResponse>,
    pub shipping_details: Option<ShippingResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderMessageResponse {
    pub message: String,
    pub order: OrderResponse,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderResponse {
    pub message: String,
    pub order: OrderResponse,
    pub shipping_details: Option<ShippingResponse>,
}

impl From<OrderItemRequest> for OrderItemInput {
    fn from(r: OrderItemRequest) -> Self {
        Self {
            product_id: r.product_id,
            quantity: r.quantity,
            price: r.price,
        }
    }
}

impl From<ShippingRequest> for ShippingInput {
    fn from(r: ShippingRequest) -> Self {
        Self {
            address: r.address,
            city: r.city,
            postal_code: r.postal_code,
            country: r.country,
            phone: r.phone,
        }
    }
}

impl From<ProductSummary> for ProductSummaryResponse {
    fn from(p: ProductSummary) -> Self {
        Self {
            id: p.id,
            name: p.name,
            category: p.category,
            image_url: p.image_url,
        }
    }
}

impl From<OrderLineView> for OrderLineResponse {
    fn from(l: OrderLineView) -> Self {
        Self {
            id: l.id,
            product_id: l.product_id,
            quantity: l.quantity,
            price: l.price,
            product: l.product.map(ProductSummaryResponse::from),
        }
    }
}

impl From<ShippingDetails> for ShippingResponse {
    fn from(s: ShippingDetails) -> Self {
        Self {
            id: s.id,
            order_id: s.order_id,
            address: s.address,
            city: s.city,
            postal_code: s.postal_code,
            country: s.country,
            phone: s.phone,
        }
    }
}

impl From<OrderView> for OrderResponse {
    fn from(o: OrderView) -> Self {
        Self {
            id: o.id,
            user_id: o.user_id,
            status: o.status,
            total_amount: o.total_amount,
            created_at: o.created_at,
            updated_at: o.updated_at,
            order_lines: o.lines.into_iter().map(OrderLineResponse::from).collect(),
            shipping_details: o.shipping.map(ShippingResponse::from),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Creates an order with its lines and optional shipping details in a single
/// database transaction. The total is computed from the submitted prices.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created successfully", body = OrderMessageResponse),
        (status = 400, description = "Invalid order"),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn create_order(
    identity: Identity,
    state: web::Data<AppState>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let user_id = body.user_id.unwrap_or(identity.user_id);
    let items: Vec<OrderItemInput> = body.products.into_iter().map(Into::into).collect();
    let shipping = body.shipping_details.map(ShippingInput::from);
    let orders = state.orders.clone();

    let order = web::block(move || orders.create_order(user_id, items, shipping)).await??;

    Ok(HttpResponse::Created().json(OrderMessageResponse {
        message: "Order created successfully".to_string(),
        order: order.into(),
    }))
}

/// GET /orders
///
/// Returns every order with its lines, product summaries and shipping details.
#[utoipa::path(
    get,
    path = "/orders",
    responses(
        (status = 200, description = "All orders", body = [OrderResponse]),
        (status = 500, description = "Internal server error"),
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn list_orders(
    _seller: Seller,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let orders = state.orders.clone();
    let result = web::block(move || orders.list_orders()).await??;

    let body: Vec<OrderResponse> = result.into_iter().map(OrderResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /orders/{id}
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn get_order(
    _seller: Seller,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let orders = state.orders.clone();

    let order = web::block(move || orders.get_order(order_id)).await??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// PUT /orders/{id}
///
/// Overwrites the status when given and creates or patches the shipping
/// details, all in one transaction.
#[utoipa::path(
    put,
    path = "/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Order updated successfully", body = UpdateOrderResponse),
        (status = 400, description = "Invalid update"),
        (status = 404, description = "Order not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn update_order(
    _seller: Seller,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let body = body.into_inner();
    let update = OrderUpdate {
        status: body.status,
        shipping: body.shipping_details.map(ShippingInput::from),
    };
    let orders = state.orders.clone();

    let order = web::block(move || orders.update_order(order_id, update)).await??;
    let shipping_details = order.shipping.clone().map(ShippingResponse::from);

    Ok(HttpResponse::Ok().json(UpdateOrderResponse {
        message: "Order updated successfully".to_string(),
        order: order.into(),
        shipping_details,
    }))
}

/// DELETE /orders/{id}
///
/// Removes the order together with its lines and shipping details.
#[utoipa::path(
    delete,
    path = "/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order deleted successfully", body = MessageResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn delete_order(
    _seller: Seller,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let orders = state.orders.clone();

    web::block(move || orders.delete_order(order_id)).await??;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Order deleted successfully".to_string(),
    }))
}
