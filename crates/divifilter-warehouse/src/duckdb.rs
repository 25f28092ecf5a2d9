//! `DuckDB` connection pool management.
//!
//! The pool owns one root connection to the database instance. Every other
//! connection is a clone of the root, so they all see the same database,
//! including in-memory ones.

use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ::duckdb::Connection;
use parking_lot::Mutex;

use crate::WarehouseError;

/// Where the pooled connections point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// A database file on disk.
    File(PathBuf),
    /// A private in-memory database that lives as long as the pool.
    InMemory,
}

struct PoolState {
    root: Option<Connection>,
    idle: Vec<Connection>,
}

struct PoolInner {
    location: StoreLocation,
    max_pool_size: usize,
    state: Mutex<PoolState>,
}

/// A connection pool manager for `DuckDB` connections.
#[derive(Clone)]
pub struct DuckDbConnectionManager {
    inner: Arc<PoolInner>,
}

impl DuckDbConnectionManager {
    /// Open the database and create a pool around it.
    ///
    /// # Arguments
    /// * `location` - Database file or in-memory instance
    /// * `max_pool_size` - Maximum number of idle connections kept for reuse
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or configured.
    pub fn open(location: StoreLocation, max_pool_size: usize) -> Result<Self, ::duckdb::Error> {
        let root = match &location {
            StoreLocation::File(path) => Connection::open(path)?,
            StoreLocation::InMemory => Connection::open_in_memory()?,
        };
        configure_connection(&root)?;

        Ok(Self {
            inner: Arc::new(PoolInner {
                location,
                max_pool_size: max_pool_size.max(1),
                state: Mutex::new(PoolState {
                    root: Some(root),
                    idle: Vec::new(),
                }),
            }),
        })
    }

    /// Acquire a connection from the pool.
    ///
    /// # Errors
    /// Returns an error if the pool was closed or a new connection cannot be
    /// cloned from the root.
    pub fn acquire(&self) -> Result<PooledConnection, WarehouseError> {
        let mut state = self.inner.state.lock();
        let connection = match state.idle.pop() {
            Some(connection) => connection,
            None => {
                let root = state.root.as_ref().ok_or(WarehouseError::PoolClosed)?;
                let connection = root.try_clone()?;
                configure_connection(&connection)?;
                connection
            }
        };
        drop(state);

        Ok(PooledConnection {
            pool: Arc::clone(&self.inner),
            connection: Some(connection),
        })
    }

    /// Drop all idle connections and the root connection.
    ///
    /// Connections that are still checked out stay usable until they are
    /// dropped; they are not returned to the pool afterwards.
    pub fn close(&self) {
        let mut state = self.inner.state.lock();
        state.idle.clear();
        state.root = None;
    }

    /// Whether [`close`](Self::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.state.lock().root.is_none()
    }

    /// Number of idle connections currently held.
    #[must_use]
    pub fn idle_connections(&self) -> usize {
        self.inner.state.lock().idle.len()
    }

    /// Get the path to the database file, if the store lives on disk.
    #[must_use]
    pub fn db_path(&self) -> Option<&Path> {
        match &self.inner.location {
            StoreLocation::File(path) => Some(path.as_path()),
            StoreLocation::InMemory => None,
        }
    }
}

/// A pooled connection that returns to the pool when dropped.
pub struct PooledConnection {
    pool: Arc<PoolInner>,
    connection: Option<Connection>,
}

impl Deref for PooledConnection {
    type Target = Connection;

    fn deref(&self) -> &Self::Target {
        self.connection
            .as_ref()
            .expect("pooled connection unexpectedly missing")
    }
}

impl DerefMut for PooledConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.connection
            .as_mut()
            .expect("pooled connection unexpectedly missing")
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        let Some(connection) = self.connection.take() else {
            return;
        };

        let mut state = self.pool.state.lock();
        if state.root.is_some() && state.idle.len() < self.pool.max_pool_size {
            state.idle.push(connection);
        }
    }
}

/// Configure a database connection with appropriate settings.
///
/// # Errors
/// Returns an error if configuration SQL fails to execute.
fn configure_connection(connection: &Connection) -> Result<(), ::duckdb::Error> {
    connection.execute_batch("PRAGMA disable_progress_bar;")?;
    Ok(())
}
