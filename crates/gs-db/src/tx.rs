//! Transaction handle carrying all repository methods.

use crate::error::DatabaseError;

/// An open immediate transaction.
///
/// Repository methods are implemented as `impl GsTx` blocks in [`crate::repos`].
/// Nothing is visible to other connections until [`GsTx::commit`]. Dropping the
/// handle without committing rolls the transaction back.
pub struct GsTx {
    tx: libsql::Transaction,
}

impl GsTx {
    pub(crate) const fn new(tx: libsql::Transaction) -> Self {
        Self { tx }
    }

    /// The connection the transaction runs on.
    pub(crate) fn conn(&self) -> &libsql::Connection {
        &self.tx
    }

    pub(crate) async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        crate::generate_id(self.conn(), prefix).await
    }

    /// Commit all changes made in this transaction.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the commit fails; nothing is applied then.
    pub async fn commit(self) -> Result<(), DatabaseError> {
        self.tx.commit().await?;
        Ok(())
    }

    /// Discard all changes made in this transaction.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the rollback statement fails.
    pub async fn rollback(self) -> Result<(), DatabaseError> {
        self.tx.rollback().await?;
        Ok(())
    }
}
