pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod controllers;
pub mod middleware;
pub mod store;
pub mod services;

use std::sync::Arc;

// Shared state for the whole application
#[derive(Clone)]
pub struct AppState {
    pub db: database::Database,
    pub config: config::Config,
}

impl AppState {
    pub async fn new(config: config::Config) -> Result<Arc<Self>, Box<dyn std::error::Error>> {
        let db = database::Database::connect(&config.database).await?;

        db.run_migrations().await?;

        Ok(Arc::new(Self { db, config }))
    }
}
