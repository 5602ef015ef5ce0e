use async_trait::async_trait;
use derive_new::new;
use kernel::{model::category::Category, repository::category::CategoryRepository};
use shared::error::{AppError, AppResult};

use crate::database::{model::category::CategoryRow, ConnectionPool};

#[derive(new)]
pub struct CategoryRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl CategoryRepository for CategoryRepositoryImpl {
    async fn find_all(&self) -> AppResult<Vec<Category>> {
        sqlx::query_as::<_, CategoryRow>(
            r#"
                SELECT category_id, name
                FROM categories
                ORDER BY name ASC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map(|rows| rows.into_iter().map(Category::from).collect())
        .map_err(AppError::SpecificOperationError)
    }
}
