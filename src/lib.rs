//! Library API
//!
//! A REST JSON API for managing a library's book catalog and loan
//! transactions: book CRUD, loans against books, returns, and paginated
//! filtered search over both.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
