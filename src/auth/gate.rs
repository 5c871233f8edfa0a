use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};
use uuid::Uuid;

use super::token::TokenService;
use crate::domain::user::Role;
use crate::errors::AppError;

/// The caller resolved from a verified session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: Role,
}

/// Resolve the bearer token on `req` into an [`Identity`].
///
/// The identity is cached in the request extensions so later extractors on
/// the same request reuse it.
pub fn authenticate(req: &HttpRequest) -> Result<Identity, AppError> {
    let cached = req.extensions().get::<Identity>().copied();
    if let Some(identity) = cached {
        return Ok(identity);
    }

    let tokens = req
        .app_data::<web::Data<TokenService>>()
        .ok_or_else(|| AppError::Internal("token service is not registered".to_string()))?;

    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthenticated("Missing Authorization header".to_string()))?;

    let token = header_value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthenticated("Invalid Authorization header".to_string()))?;

    let identity = tokens.verify(token).map_err(|e| {
        log::debug!("rejected session token: {}", e);
        AppError::Unauthenticated("Invalid or expired token".to_string())
    })?;

    req.extensions_mut().insert(identity);
    Ok(identity)
}

pub fn authorize(identity: &Identity, required: Role) -> Result<(), AppError> {
    match (identity.role, required) {
        (Role::Buyer, Role::Buyer) | (Role::Seller, Role::Seller) => Ok(()),
        (Role::Buyer, Role::Seller) | (Role::Seller, Role::Buyer) => Err(AppError::Forbidden(
            format!("Access denied: {} role required", required),
        )),
    }
}

fn authenticate_as(req: &HttpRequest, required: Role) -> Result<Identity, AppError> {
    let identity = authenticate(req)?;
    authorize(&identity, required)?;
    Ok(identity)
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

/// An authenticated caller holding the seller role.
#[derive(Debug, Clone, Copy)]
pub struct Seller(pub Identity);

impl FromRequest for Seller {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate_as(req, Role::Seller).map(Seller))
    }
}

/// An authenticated caller holding the buyer role.
#[derive(Debug, Clone, Copy)]
pub struct Buyer(pub Identity);

impl FromRequest for Buyer {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate_as(req, Role::Buyer).map(Buyer))
    }
}
