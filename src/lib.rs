#[macro_use]
extern crate diesel;

pub mod config;
pub mod db;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod models;
pub mod query;
pub mod schema;
pub mod seed;

pub use config::Config;
pub use db::{init_pool, DbPool};
pub use error::{ApiError, StoreError};
