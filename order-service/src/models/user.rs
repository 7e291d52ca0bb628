//! User account model.

use chrono::{DateTime, Utc};
use order_types::{Role, UserResponse};
use sqlx::FromRow;
use uuid::Uuid;

/// User row. The hash never leaves the service.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub user_id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub role: String,
    pub created_utc: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub role: Role,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let role = Role::from_string(&user.role);
        UserResponse {
            id: user.user_id,
            username: user.username,
            name: user.name,
            role,
        }
    }
}
