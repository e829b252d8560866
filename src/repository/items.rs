//! Items repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::item::{CreateItem, Item, UpdateItem},
    models::loan::LoanStatus,
};

#[derive(Clone)]
pub struct ItemsRepository {
    pool: Pool<Postgres>,
}

impl ItemsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get item by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Item> {
        sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item with id {} not found", id)))
    }

    /// List all items
    pub async fn list(&self) -> AppResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>("SELECT * FROM items ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    /// Create a new item
    pub async fn create(&self, item: &CreateItem) -> AppResult<Item> {
        let created = sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items (name, category_id, stock)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&item.name)
        .bind(item.category_id)
        .bind(item.stock)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Update an existing item (stock is an administrative override)
    pub async fn update(&self, id: i32, item: &UpdateItem) -> AppResult<Item> {
        sqlx::query_as::<_, Item>(
            r#"
            UPDATE items
            SET name = $1, category_id = $2, stock = $3
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(&item.name)
        .bind(item.category_id)
        .bind(item.stock)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Item with id {} not found", id)))
    }

    /// Delete an item. Refused while the item has outstanding loans.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let outstanding: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM loans WHERE item_id = $1 AND status = $2",
        )
        .bind(id)
        .bind(LoanStatus::Borrowed)
        .fetch_one(&self.pool)
        .await?;

        if outstanding > 0 {
            return Err(AppError::Conflict(format!(
                "Item has {} outstanding loan(s)",
                outstanding
            )));
        }

        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Item with id {} not found", id)));
        }

        Ok(())
    }
}
