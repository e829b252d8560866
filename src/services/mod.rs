//! Business logic services

pub mod auth;
pub mod categories;
pub mod items;
pub mod loans;
pub mod stats;

use crate::{config::AuthConfig, error::AppResult, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub categories: categories::CategoriesService,
    pub items: items::ItemsService,
    pub loans: loans::LoansService,
    pub stats: stats::StatsService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        Self {
            auth: auth::AuthService::new(repository.clone(), auth_config),
            categories: categories::CategoriesService::new(repository.clone()),
            items: items::ItemsService::new(repository.clone()),
            loans: loans::LoansService::new(repository.clone()),
            stats: stats::StatsService::new(repository.clone()),
            repository,
        }
    }

    /// Round-trip the database, for the readiness endpoint
    pub async fn ping_database(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.repository.pool)
            .await?;
        Ok(())
    }
}
