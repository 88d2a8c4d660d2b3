//! # gs-db
//!
//! libSQL membership store for group sync.
//!
//! Holds organizations, groups, group memberships, and per-organization sync
//! settings. All reads and writes made during a sync go through a [`GsTx`],
//! opened with `BEGIN IMMEDIATE` so that concurrent syncs against the same
//! store serialize on the write lock instead of interleaving.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod retry;
mod tx;

#[cfg(test)]
mod test_support;

use std::time::Duration;

use error::DatabaseError;
use gs_config::DatabaseConfig;
use libsql::{Builder, TransactionBehavior};

pub use tx::GsTx;

/// Central database handle.
///
/// File-backed stores open a fresh connection per transaction so that
/// concurrent syncs each hold their own lock. In-memory stores share the
/// single connection, since every connection to `:memory:` is a new database.
pub struct GsDb {
    db: libsql::Database,
    conn: libsql::Connection,
    in_memory: bool,
    busy_timeout: Duration,
}

impl GsDb {
    /// Open a local database at the given path with default settings.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        Self::open(&DatabaseConfig {
            path: path.to_string(),
            ..DatabaseConfig::default()
        })
        .await
    }

    /// Open the database described by `config`. Runs migrations on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(&config.path).build().await?;
        let busy_timeout = Duration::from_millis(config.busy_timeout_ms);
        let conn = db.connect()?;
        configure_connection(&conn, busy_timeout).await?;

        let gs_db = Self {
            db,
            conn,
            in_memory: config.is_in_memory(),
            busy_timeout,
        };
        gs_db.run_migrations().await?;
        tracing::debug!(path = %config.path, "membership store opened");
        Ok(gs_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Begin an immediate (write-locking) transaction.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a connection cannot be opened or the lock
    /// cannot be acquired within the busy timeout.
    pub async fn begin(&self) -> Result<GsTx, DatabaseError> {
        let conn = if self.in_memory {
            self.conn.clone()
        } else {
            let conn = self.db.connect()?;
            configure_connection(&conn, self.busy_timeout).await?;
            conn
        };
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .await
            .inspect_err(|e| {
                if retry::is_transient_error(e) {
                    tracing::debug!(error = %e, "write lock busy");
                }
            })?;
        Ok(GsTx::new(tx))
    }
}

async fn configure_connection(
    conn: &libsql::Connection,
    busy_timeout: Duration,
) -> Result<(), DatabaseError> {
    // Foreign keys must be enabled per connection in SQLite.
    conn.execute("PRAGMA foreign_keys = ON", ())
        .await
        .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;
    conn.busy_timeout(busy_timeout)?;
    Ok(())
}

/// Generate a prefixed ID via libSQL. Returns e.g. `"grp-a3f8b2c1"`.
///
/// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the prefix.
pub(crate) async fn generate_id(
    conn: &libsql::Connection,
    prefix: &str,
) -> Result<String, DatabaseError> {
    let mut rows = conn
        .query("SELECT ?1 || '-' || lower(hex(randomblob(4)))", [prefix])
        .await?;
    let row = rows
        .next()
        .await?
        .ok_or_else(|| DatabaseError::CorruptRow("id generator returned no row".into()))?;
    Ok(row.get::<String>(0)?)
}
