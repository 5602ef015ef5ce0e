use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::{
    id::ItemId,
    item::{
        event::{CreateItem, DeleteItem, UpdateItem},
        Item,
    },
    list::{ListOptions, PaginatedList},
};

#[async_trait]
pub trait ItemRepository: Send + Sync {
    async fn create(&self, event: CreateItem) -> AppResult<ItemId>;
    async fn find_all(&self, options: ListOptions) -> AppResult<PaginatedList<Item>>;
    async fn find_by_id(&self, item_id: ItemId) -> AppResult<Option<Item>>;
    async fn update(&self, event: UpdateItem) -> AppResult<()>;
    // Bookings of the item are deleted with it.
    async fn delete(&self, event: DeleteItem) -> AppResult<()>;
}
