//! Storage layer - generic row-oriented SQL execution

pub mod database;

pub use database::{DatabaseManager, StorageError};
