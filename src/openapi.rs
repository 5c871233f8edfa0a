use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::user::Role;
use crate::handlers::auth::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::handlers::orders::{
    CreateOrderRequest, OrderItemRequest, OrderMessageResponse, OrderResponse, ShippingRequest,
    UpdateOrderRequest, UpdateOrderResponse,
};
use crate::handlers::products::{
    CreateProductRequest, MessageResponse, ProductMessageResponse, ProductResponse,
    UpdateProductRequest,
};
use crate::handlers::reviews::{
    CreateReviewRequest, ReviewListItem, ReviewMessageResponse, ReviewResponse,
};
use crate::handlers::users::UserResponse;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token returned by POST /auth/login"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront API",
        version = "0.1.0",
        description = "Products, orders and rating reviews for buyers and sellers."
    ),
    paths(
        crate::handlers::auth::register,
        crate::handlers::auth::login,
        crate::handlers::products::list_products,
        crate::handlers::products::create_product,
        crate::handlers::products::update_product,
        crate::handlers::products::delete_product,
        crate::handlers::orders::list_orders,
        crate::handlers::orders::create_order,
        crate::handlers::orders::get_order,
        crate::handlers::orders::update_order,
        crate::handlers::orders::delete_order,
        crate::handlers::reviews::create_review,
        crate::handlers::reviews::list_reviews,
        crate::handlers::users::list_users,
        crate::handlers::users::get_user,
    ),
    components(
        schemas(
            Role,
            RegisterRequest,
            RegisterResponse,
            LoginRequest,
            LoginResponse,
            UserResponse,
            CreateProductRequest,
            UpdateProductRequest,
            ProductResponse,
            ProductMessageResponse,
            MessageResponse,
            CreateOrderRequest,
            OrderItemRequest,
            ShippingRequest,
            UpdateOrderRequest,
            OrderResponse,
            OrderMessageResponse,
            UpdateOrderResponse,
            CreateReviewRequest,
            ReviewResponse,
            ReviewListItem,
            ReviewMessageResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "products", description = "Catalog; writes require the seller role"),
        (name = "orders", description = "Order placement and seller-side management"),
        (name = "reviews", description = "Rating reviews on completed orders"),
        (name = "users", description = "User lookup for sellers")
    )
)]
pub struct ApiDoc;
