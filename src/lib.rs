//! Inventory Tracking System
//!
//! A REST JSON API for managing inventory categories, items, and loan
//! (checkout/return) records, keeping each item's stock counter consistent
//! with its outstanding loans.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod stock;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
