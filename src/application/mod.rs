pub mod catalog_service;
pub mod order_service;
pub mod review_service;
pub mod user_service;

pub use catalog_service::CatalogService;
pub use order_service::OrderService;
pub use review_service::ReviewService;
pub use user_service::UserService;
