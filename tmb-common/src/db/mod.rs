//! Database access: schema initialization, models, and the record store

pub mod init;
pub mod models;
pub mod store;

pub use init::init_database;
pub use models::{Achievement, AllowedMap, Category, Person, Product, ProductKind, TargetMap, Unit};
