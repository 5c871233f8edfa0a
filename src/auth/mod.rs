pub mod gate;
pub mod password;
pub mod token;

pub use gate::{authenticate, authorize, Buyer, Identity, Seller};
pub use token::{TokenError, TokenService, TOKEN_TTL_SECS};
