use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::AppState;
use crate::auth::Seller;
use crate::domain::user::{Role, UserView};
use crate::errors::AppError;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<UserView> for UserResponse {
    fn from(u: UserView) -> Self {
        Self {
            id: u.id,
            username: u.username,
            role: u.role,
            created_at: u.created_at,
        }
    }
}

/// GET /users
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "All users", body = [UserResponse]),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Seller role required"),
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn list_users(
    _seller: Seller,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let users = state.users.clone();
    let result = web::block(move || users.list_users()).await??;

    let body: Vec<UserResponse> = result.into_iter().map(UserResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /users/{id}
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User UUID"),
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn get_user(
    _seller: Seller,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    let users = state.users.clone();

    let user = web::block(move || users.get_user(user_id)).await??;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}
