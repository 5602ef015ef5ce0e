use derive_new::new;

use crate::model::id::{CategoryId, ItemId};

#[derive(new)]
pub struct CreateItem {
    pub name: String,
    pub description: String,
    pub quantity: i32,
    pub category_id: Option<CategoryId>,
    pub color: String,
    pub location: String,
    pub checked_out: bool,
    pub in_repair: bool,
}

// Partial update: absent fields keep their stored values. For the category,
// `Some(None)` clears it while `None` leaves it untouched.
#[derive(new)]
pub struct UpdateItem {
    pub item_id: ItemId,
    pub name: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<i32>,
    pub category_id: Option<Option<CategoryId>>,
    pub color: Option<String>,
    pub location: Option<String>,
    pub checked_out: Option<bool>,
    pub in_repair: Option<bool>,
}

#[derive(new)]
pub struct DeleteItem {
    pub item_id: ItemId,
}
