use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::category::Category;

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_all(&self) -> AppResult<Vec<Category>>;
}
