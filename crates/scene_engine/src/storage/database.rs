//! Generic row-oriented SQL helper
//!
//! The scene manager consumes this as its storage collaborator: connect,
//! execute, insert-returning-id, and query-returning-row-maps. All bound
//! parameters are treated as opaque text, and query results come back as
//! column-name → string maps (NULL renders as the empty string). Schema
//! knowledge lives with the caller, not here.

use rusqlite::types::ValueRef;
use rusqlite::Connection;
use std::collections::HashMap;
use thiserror::Error;

/// One query result row: column name → value rendered as text
pub type Row = HashMap<String, String>;

/// Storage collaborator errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// An operation required an open connection
    #[error("not connected to a database")]
    NotConnected,

    /// `connect` was called while a connection was already open
    #[error("already connected to a database; disconnect first")]
    AlreadyConnected,

    /// Error reported by the SQLite layer
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Row-oriented SQL execution over a single SQLite connection
pub struct DatabaseManager {
    conn: Option<Connection>,
}

impl Default for DatabaseManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DatabaseManager {
    /// Create a disconnected manager
    pub fn new() -> Self {
        Self { conn: None }
    }

    /// Open a database file, creating it if missing
    pub fn connect(&mut self, path: &str) -> Result<(), StorageError> {
        if self.conn.is_some() {
            return Err(StorageError::AlreadyConnected);
        }
        self.conn = Some(Connection::open(path)?);
        log::info!("connected to database: {path}");
        Ok(())
    }

    /// Open an in-memory database (used by tests)
    pub fn connect_in_memory(&mut self) -> Result<(), StorageError> {
        if self.conn.is_some() {
            return Err(StorageError::AlreadyConnected);
        }
        self.conn = Some(Connection::open_in_memory()?);
        Ok(())
    }

    /// Close the connection if one is open
    pub fn disconnect(&mut self) {
        if self.conn.take().is_some() {
            log::info!("disconnected from database");
        }
    }

    /// Whether a connection is currently open
    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Execute a statement with positional text parameters
    ///
    /// Returns the number of rows changed.
    pub fn execute(&self, sql: &str, params: &[&str]) -> Result<usize, StorageError> {
        let conn = self.connection()?;
        let changed = conn.execute(sql, rusqlite::params_from_iter(params.iter().copied()))?;
        Ok(changed)
    }

    /// Execute an INSERT statement and return the generated row id
    pub fn execute_insert(&self, sql: &str, params: &[&str]) -> Result<i64, StorageError> {
        let conn = self.connection()?;
        conn.execute(sql, rusqlite::params_from_iter(params.iter().copied()))?;
        Ok(conn.last_insert_rowid())
    }

    /// Execute a SELECT statement and return the ordered result rows
    pub fn execute_query(&self, sql: &str, params: &[&str]) -> Result<Vec<Row>, StorageError> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().iter().map(ToString::to_string).collect();

        let mut rows = stmt.query(rusqlite::params_from_iter(params.iter().copied()))?;
        let mut results = Vec::new();
        while let Some(row) = rows.next()? {
            let mut mapped = Row::with_capacity(columns.len());
            for (index, column) in columns.iter().enumerate() {
                let value = match row.get_ref(index)? {
                    ValueRef::Null | ValueRef::Blob(_) => String::new(),
                    ValueRef::Integer(v) => v.to_string(),
                    ValueRef::Real(v) => v.to_string(),
                    ValueRef::Text(v) => String::from_utf8_lossy(v).into_owned(),
                };
                mapped.insert(column.clone(), value);
            }
            results.push(mapped);
        }
        Ok(results)
    }

    /// Check whether a table exists in the connected database
    pub fn table_exists(&self, table: &str) -> Result<bool, StorageError> {
        let rows = self.execute_query(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1;",
            &[table],
        )?;
        Ok(!rows.is_empty())
    }

    fn connection(&self) -> Result<&Connection, StorageError> {
        self.conn.as_ref().ok_or(StorageError::NotConnected)
    }
}
