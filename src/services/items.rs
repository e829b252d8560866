//! Item management service

use validator::Validate;

use crate::{
    error::AppResult,
    models::item::{CreateItem, Item, UpdateItem},
    repository::Repository,
};

#[derive(Clone)]
pub struct ItemsService {
    repository: Repository,
}

impl ItemsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Item>> {
        self.repository.items.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Item> {
        self.repository.items.get_by_id(id).await
    }

    pub async fn create(&self, item: CreateItem) -> AppResult<Item> {
        item.validate()?;
        // Verify category exists
        self.repository.categories.get_by_id(item.category_id).await?;
        self.repository.items.create(&item).await
    }

    pub async fn update(&self, id: i32, item: UpdateItem) -> AppResult<Item> {
        item.validate()?;
        // Verify category exists
        self.repository.categories.get_by_id(item.category_id).await?;
        self.repository.items.update(id, &item).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.items.delete(id).await
    }
}
