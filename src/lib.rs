//! Storefront catalog and cart data layer.
//!
//! Categories, two product variants (notebooks and smartphones) sharing one
//! product schema, customers, and carts whose lines point at any product
//! variant through a content-type tag plus a row id.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod admin;
pub mod catalog;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod media;
pub mod services;

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::ServiceError;
use crate::services::AppServices;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: AppConfig,
    pub services: AppServices,
}

impl AppState {
    /// Connects to the configured database, migrating first when
    /// `auto_migrate` is set, and wires up the services.
    pub async fn from_config(config: AppConfig) -> Result<Self, ServiceError> {
        let pool = db::establish_connection_from_app_config(&config).await?;
        if config.auto_migrate {
            db::run_migrations(&pool).await?;
        }
        let db = Arc::new(pool);
        let services = AppServices::new(db.clone(), &config);
        Ok(Self {
            db,
            config,
            services,
        })
    }
}
