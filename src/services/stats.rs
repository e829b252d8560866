//! Inventory statistics service

use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, repository::Repository};

/// Inventory totals for reporting
#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    pub total_categories: i64,
    pub total_items: i64,
    /// Sum of the stock counters over all items
    pub total_stock: i64,
    pub active_loans: i64,
    pub returned_loans: i64,
    pub out_of_stock_items: i64,
}

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Get inventory statistics
    pub async fn get_stats(&self) -> AppResult<StatsResponse> {
        let pool = &self.repository.pool;

        let total_categories: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(pool)
            .await?;

        let total_items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(pool)
            .await?;

        let total_stock: i64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(stock), 0)::bigint FROM items")
                .fetch_one(pool)
                .await?;

        let out_of_stock_items: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM items WHERE stock = 0")
                .fetch_one(pool)
                .await?;

        let active_loans = self.repository.loans.count_active().await?;
        let returned_loans = self.repository.loans.count_returned().await?;

        Ok(StatsResponse {
            total_categories,
            total_items,
            total_stock,
            active_loans,
            returned_loans,
            out_of_stock_items,
        })
    }
}
