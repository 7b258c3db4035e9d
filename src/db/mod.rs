//! Database module: storage gateway contract and its implementations
//!
//! The pipeline only ever sees `StorageGateway`. `PgGateway` talks to PostgreSQL
//! through a sqlx pool; `MemoryGateway` backs demo mode and tests.

pub mod connection;
pub mod gateway;
pub mod memory;
pub mod postgres;
pub mod statement;

pub use connection::{init_pool, DbPool};
pub use gateway::{Row, StorageGateway};
pub use memory::MemoryGateway;
pub use postgres::PgGateway;
pub use statement::{Identifier, KeyType, Param, Statement};
