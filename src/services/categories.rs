//! Category management service

use validator::Validate;

use crate::{
    error::AppResult,
    models::category::{Category, CreateCategory, UpdateCategory},
    repository::Repository,
};

#[derive(Clone)]
pub struct CategoriesService {
    repository: Repository,
}

impl CategoriesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Category>> {
        self.repository.categories.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Category> {
        self.repository.categories.get_by_id(id).await
    }

    pub async fn create(&self, category: CreateCategory) -> AppResult<Category> {
        category.validate()?;
        self.repository.categories.create(&category).await
    }

    pub async fn update(&self, id: i32, category: UpdateCategory) -> AppResult<Category> {
        category.validate()?;
        self.repository.categories.update(id, &category).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.categories.delete(id).await
    }
}
