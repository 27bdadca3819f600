//! Convention directory kernel library.
//!
//! This library exposes the listing query builder, storage backends and
//! HTTP routes. The main entry point for running the server is the
//! `conventions` binary.

pub mod config;
pub mod db;
pub mod error;
pub mod listing;
pub mod models;
pub mod routes;
pub mod seed;
pub mod services;
pub mod state;
pub mod storage;

pub use config::{Config, StorageBackend};
pub use error::{AppError, AppResult, FieldError};
pub use listing::{ConventionFilters, ConventionQueryBuilder, Predicate};
pub use state::AppState;
