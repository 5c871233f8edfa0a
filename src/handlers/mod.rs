pub mod auth;
mod de;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod users;

use std::sync::Arc;

use actix_web::web;

use crate::application::{CatalogService, OrderService, ReviewService, UserService};
use crate::auth::TokenService;
use crate::domain::ports::{OrderRepository, ProductRepository, ReviewRepository, UserRepository};
use crate::errors::AppError;

/// Services shared by every worker.
#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub catalog: CatalogService,
    pub orders: OrderService,
    pub reviews: ReviewService,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        products: Arc<dyn ProductRepository>,
        orders: Arc<dyn OrderRepository>,
        reviews: Arc<dyn ReviewRepository>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            users: UserService::new(users, tokens),
            catalog: CatalogService::new(products),
            orders: OrderService::new(orders),
            reviews: ReviewService::new(reviews),
        }
    }
}

/// Register every route plus the extractor configs that route body and path
/// failures through [`AppError`].
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::Validation(err.to_string()).into()),
    )
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        log::debug!("rejected path parameter: {}", err);
        AppError::NotFound("Resource not found".to_string()).into()
    }))
    .service(
        web::scope("/auth")
            .route("/register", web::post().to(auth::register))
            .route("/login", web::post().to(auth::login)),
    )
    .service(
        web::scope("/products")
            .route("", web::get().to(products::list_products))
            .route("", web::post().to(products::create_product))
            .route("/{id}", web::put().to(products::update_product))
            .route("/{id}", web::delete().to(products::delete_product)),
    )
    .service(
        web::scope("/orders")
            .route("", web::get().to(orders::list_orders))
            .route("", web::post().to(orders::create_order))
            .route("/{id}", web::get().to(orders::get_order))
            .route("/{id}", web::put().to(orders::update_order))
            .route("/{id}", web::delete().to(orders::delete_order)),
    )
    .service(
        web::scope("/ratingReview")
            .route("", web::get().to(reviews::list_reviews))
            .route("", web::post().to(reviews::create_review)),
    )
    .service(
        web::scope("/users")
            .route("", web::get().to(users::list_users))
            .route("/{id}", web::get().to(users::get_user)),
    );
}
