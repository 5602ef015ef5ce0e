use kernel::model::{
    category::Category,
    id::{CategoryId, ItemId},
    item::Item,
};

#[derive(sqlx::FromRow)]
pub struct ItemRow {
    pub item_id: ItemId,
    pub name: String,
    pub description: String,
    pub quantity: i32,
    pub category_id: Option<CategoryId>,
    pub category_name: Option<String>,
    pub color: String,
    pub location: String,
    pub checked_out: bool,
    pub in_repair: bool,
}

impl From<ItemRow> for Item {
    fn from(value: ItemRow) -> Self {
        let ItemRow {
            item_id,
            name,
            description,
            quantity,
            category_id,
            category_name,
            color,
            location,
            checked_out,
            in_repair,
        } = value;
        // Both columns come from the same LEFT JOIN row, so they are either
        // both present or both absent.
        let category = match (category_id, category_name) {
            (Some(category_id), Some(name)) => Some(Category { category_id, name }),
            _ => None,
        };
        Item {
            item_id,
            name,
            description,
            quantity,
            category,
            color,
            location,
            checked_out,
            in_repair,
        }
    }
}

// Page of matching ids plus the unpaged total.
#[derive(sqlx::FromRow)]
pub struct PaginatedItemRow {
    pub total: i64,
    pub item_id: ItemId,
}
