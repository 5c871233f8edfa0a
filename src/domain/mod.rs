pub mod errors;
pub mod money;
pub mod order;
pub mod ports;
pub mod product;
pub mod review;
pub mod user;
