pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod store;

pub use config::Config;
pub use db::{init_db, Repository};
pub use domain::{ContactId, ContactInsert, ContactRecord, ContactUpdate, Field};
pub use error::{AppError, ContactError};
pub use store::{ContactStore, MemoryContactStore};
