//! Library catalog
//!
//! Two processes share this crate: the catalog service, a REST JSON API
//! owning the `books` table, and the web client, which renders HTML pages
//! and forwards form submissions to that API.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod telemetry;
pub mod web;

pub use crate::config::{ServiceConfig, WebConfig};
pub use crate::error::{AppError, AppResult};

/// Catalog service state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    pub fn new(config: ServiceConfig, repository: repository::Repository) -> Self {
        Self {
            config: Arc::new(config),
            services: Arc::new(services::Services::new(repository)),
        }
    }
}
