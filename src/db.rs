//! Connection pool and schema bootstrap for the SQLite store.

use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection, PoolError};
use diesel::sqlite::SqliteConnection;
use diesel::QueryResult;
use thiserror::Error;

pub type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

const BUSY_TIMEOUT_MS: u64 = 5_000;
const POOL_CONNECTION_TIMEOUT_SECONDS: u64 = 30;

/// Tables are created on startup when absent. The price check mirrors
/// `models::validate_price` so out-of-range rows are refused by the engine too.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS restaurants (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name VARCHAR(50) NOT NULL UNIQUE,
    address TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS pizzas (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    ingredients TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS restaurant_pizzas (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    price REAL NOT NULL CHECK (price >= 1 AND price <= 30),
    pizza_id INTEGER NOT NULL REFERENCES pizzas (id),
    restaurant_id INTEGER NOT NULL REFERENCES restaurants (id)
);

CREATE INDEX IF NOT EXISTS idx_restaurant_pizzas_restaurant_id ON restaurant_pizzas (restaurant_id);
CREATE INDEX IF NOT EXISTS idx_restaurant_pizzas_pizza_id ON restaurant_pizzas (pizza_id);
"#;

/// Per-connection settings. SQLite leaves foreign keys off unless asked.
pub fn prepare_connection(conn: &SqliteConnection) -> QueryResult<()> {
    conn.batch_execute(&format!(
        "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {};",
        BUSY_TIMEOUT_MS
    ))
}

pub fn create_schema(conn: &SqliteConnection) -> QueryResult<()> {
    conn.batch_execute(SCHEMA)
}

#[derive(Debug, Error)]
pub enum InitError {
    #[error("failed to build connection pool: {0}")]
    Pool(#[from] PoolError),
    #[error("failed to create schema: {0}")]
    Schema(#[from] diesel::result::Error),
}

#[derive(Debug)]
struct SqliteCustomizer;

impl CustomizeConnection<SqliteConnection, r2d2::Error> for SqliteCustomizer {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        prepare_connection(conn).map_err(r2d2::Error::QueryError)
    }
}

/// Builds the pool and makes sure the tables exist.
///
/// An in-memory url (`:memory:`) gives every connection its own database, so
/// callers using one should pass `max_size = 1`.
pub fn init_pool(database_url: &str, max_size: u32) -> Result<DbPool, InitError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = r2d2::Pool::builder()
        .max_size(max_size)
        .connection_timeout(Duration::from_secs(POOL_CONNECTION_TIMEOUT_SECONDS))
        .connection_customizer(Box::new(SqliteCustomizer))
        .build(manager)?;
    let conn = pool.get()?;
    create_schema(&conn)?;
    Ok(pool)
}
