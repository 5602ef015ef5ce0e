use std::str::FromStr;

use kernel::model::{id::UserId, role::Role, user::User};
use shared::error::AppError;

#[derive(sqlx::FromRow)]
pub struct UserRow {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub role_name: String,
    pub is_superuser: bool,
}

impl UserRow {
    pub fn into_user(self) -> Result<User, AppError> {
        let UserRow {
            user_id,
            name,
            email,
            role_name,
            is_superuser,
        } = self;
        let role = Role::from_str(&role_name)
            .map_err(|e| AppError::ConversionEntityError(e.into()))?;
        Ok(User {
            user_id,
            name,
            email,
            role,
            is_superuser,
        })
    }
}

#[derive(sqlx::FromRow)]
pub struct UserPasswordRow {
    pub user_id: UserId,
    pub password_hash: String,
}
