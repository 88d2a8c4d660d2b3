//! Shared test utilities for gs-db unit tests.

pub(crate) mod helpers {
    use crate::{GsDb, GsTx};

    /// Create an in-memory store.
    pub async fn test_db() -> GsDb {
        GsDb::open_local(":memory:").await.unwrap()
    }

    /// Create an in-memory store with an open transaction.
    ///
    /// The store is returned alongside so it outlives the transaction.
    pub async fn test_tx() -> (GsDb, GsTx) {
        let db = test_db().await;
        let tx = db.begin().await.unwrap();
        (db, tx)
    }
}
