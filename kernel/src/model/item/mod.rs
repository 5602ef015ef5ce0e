use crate::model::{category::Category, id::ItemId};

pub mod event;

#[derive(Debug)]
pub struct Item {
    pub item_id: ItemId,
    pub name: String,
    pub description: String,
    pub quantity: i32,
    pub category: Option<Category>,
    pub color: String,
    pub location: String,
    pub checked_out: bool,
    pub in_repair: bool,
}
