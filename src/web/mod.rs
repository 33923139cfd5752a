//! Server-rendered web client of the catalog service

pub mod client;
pub mod flash;
pub mod handlers;
pub mod views;

use axum::{extract::FromRef, routing::get, Router};
use axum_extra::extract::cookie::Key;
use ::config::ConfigError;
use thiserror::Error;
use tower_http::trace::TraceLayer;

use crate::config::WebConfig;
use client::CatalogClient;

/// Failure to build the web client state
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Web client state shared across all handlers
#[derive(Clone)]
pub struct WebState {
    pub client: CatalogClient,
    key: Key,
}

impl WebState {
    pub fn new(config: &WebConfig) -> Result<Self, SetupError> {
        let client = CatalogClient::new(&config.api.base_url, config.api.request_timeout()?)?;
        Ok(Self {
            client,
            key: flash::signing_key(&config.secret_key),
        })
    }
}

impl FromRef<WebState> for Key {
    fn from_ref(state: &WebState) -> Self {
        state.key.clone()
    }
}

/// Create the web client router with all pages
pub fn router(state: WebState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/books", get(handlers::list_books))
        .route(
            "/books/new",
            get(handlers::new_book_form).post(handlers::create_book),
        )
        .route(
            "/books/:id/edit",
            get(handlers::edit_book_form).post(handlers::update_book),
        )
        .route(
            "/books/:id/delete",
            get(handlers::confirm_delete).post(handlers::delete_book),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
