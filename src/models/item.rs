//! Item model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Item model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Item {
    pub id: i32,
    pub name: String,
    pub category_id: i32,
    /// Units currently on the shelf (total minus outstanding loans)
    pub stock: i32,
    pub created_at: DateTime<Utc>,
}

/// Create item request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateItem {
    #[validate(length(min = 1, message = "Item name is required"))]
    pub name: String,
    pub category_id: i32,
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: i32,
}

/// Update item request
///
/// Setting `stock` here is an administrative override of the counter;
/// it is not reconciled against outstanding loans.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateItem {
    #[validate(length(min = 1, message = "Item name is required"))]
    pub name: String,
    pub category_id: i32,
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: i32,
}
