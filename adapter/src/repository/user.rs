use async_trait::async_trait;
use derive_new::new;
use kernel::{
    model::{
        id::UserId,
        role::Role,
        user::{
            event::{CreateUser, DeleteUser, UpdateUserPassword, UpdateUserRole},
            User,
        },
    },
    repository::user::UserRepository,
};
use shared::error::{AppError, AppResult};

use crate::database::{
    model::user::{UserPasswordRow, UserRow},
    ConnectionPool,
};

#[derive(new)]
pub struct UserRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn create(&self, event: CreateUser) -> AppResult<User> {
        let user_id = UserId::new();
        let hashed_password = bcrypt::hash(&event.password, bcrypt::DEFAULT_COST)?;
        let role = Role::default();

        let res = sqlx::query(
            r#"
                INSERT INTO users (user_id, name, email, password_hash, role_id)
                SELECT $1, $2, $3, $4, role_id
                FROM roles
                WHERE name = $5
            "#,
        )
        .bind(user_id)
        .bind(&event.name)
        .bind(&event.email)
        .bind(&hashed_password)
        .bind(role.as_ref())
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No user record has been created".into(),
            ));
        }

        Ok(User {
            user_id,
            name: event.name,
            email: event.email,
            role,
            is_superuser: false,
        })
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, UserRow>(
            r#"
                SELECT u.user_id, u.name, u.email, r.name AS role_name, u.is_superuser
                FROM users AS u
                INNER JOIN roles AS r ON u.role_id = r.role_id
                ORDER BY u.created_at DESC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(UserRow::into_user)
        .collect::<Result<Vec<_>, _>>()?;

        Ok(users)
    }

    async fn find_current_user(&self, current_user_id: UserId) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
                SELECT u.user_id, u.name, u.email, r.name AS role_name, u.is_superuser
                FROM users AS u
                INNER JOIN roles AS r ON u.role_id = r.role_id
                WHERE u.user_id = $1
            "#,
        )
        .bind(current_user_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        row.map(UserRow::into_user).transpose()
    }

    async fn update_password(&self, event: UpdateUserPassword) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let original_password_hash = sqlx::query_as::<_, UserPasswordRow>(
            r#"
                SELECT user_id, password_hash
                FROM users
                WHERE user_id = $1
            "#,
        )
        .bind(event.user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?
        .ok_or_else(|| AppError::EntityNotFound("specified user not found".into()))?
        .password_hash;

        let valid = bcrypt::verify(&event.current_password, &original_password_hash)?;
        if !valid {
            return Err(AppError::UnauthenticatedError);
        }

        let new_password_hash = bcrypt::hash(&event.new_password, bcrypt::DEFAULT_COST)?;
        sqlx::query(
            r#"
                UPDATE users
                SET password_hash = $2
                WHERE user_id = $1
            "#,
        )
        .bind(event.user_id)
        .bind(&new_password_hash)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }

    async fn update_role(&self, event: UpdateUserRole) -> AppResult<()> {
        let res = sqlx::query(
            r#"
                UPDATE users
                SET role_id = (SELECT role_id FROM roles WHERE name = $2)
                WHERE user_id = $1
            "#,
        )
        .bind(event.user_id)
        .bind(event.role.as_ref())
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound("specified user not found".into()));
        }

        Ok(())
    }

    async fn delete(&self, event: DeleteUser) -> AppResult<()> {
        let res = sqlx::query(
            r#"
                DELETE FROM users
                WHERE user_id = $1
            "#,
        )
        .bind(event.user_id)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound("specified user not found".into()));
        }

        Ok(())
    }
}
