//! redb-based key-value storage for client state
//!
//! A single table holds every piece of state the flow persists, keyed
//! by well-known string keys:
//!
//! | Key | Value | Written by |
//! |-----|-------|------------|
//! | `cart_v1` | product id -> quantity map | cart |
//! | `checkout_location_v1` | delivery location string | checkout |
//! | `checkout_notes_v1` | order notes string | checkout |
//! | `order_state_v1` | submitted order record | checkout |
//! | `customer_table` | resolved table record | table binding |
//! | `customer_name` | guest display name | table binding |
//!
//! Writers publish a [`StorageEvent`] on every mutation so other
//! holders of the same store can rehydrate, the way a second browser
//! tab reacts to a storage event.

use std::path::Path;
use std::sync::Arc;

use redb::backends::InMemoryBackend;
use redb::{Database, ReadableDatabase, TableDefinition};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::broadcast;

use shared::error::OrderError;

/// Single key-value table: key = well-known key, value = JSON bytes
const KV_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("kv");

/// Cart contents, survives page reloads
pub const CART_KEY: &str = "cart_v1";
/// Delivery location, survives leaving checkout
pub const LOCATION_KEY: &str = "checkout_location_v1";
/// Order notes, survives leaving checkout
pub const NOTES_KEY: &str = "checkout_notes_v1";
/// Last submitted order, fallback when the tracking stage has no token
pub const ORDER_STATE_KEY: &str = "order_state_v1";
/// Table resolved from the scanned code
pub const TABLE_KEY: &str = "customer_table";
/// Guest display name
pub const CUSTOMER_NAME_KEY: &str = "customer_name";

/// Notification that a key changed in the store
#[derive(Debug, Clone)]
pub struct StorageEvent {
    pub key: &'static str,
}

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for OrderError {
    fn from(e: StorageError) -> Self {
        OrderError::StorageUnavailable(e.to_string())
    }
}

/// Client state store backed by redb
#[derive(Clone)]
pub struct KvStore {
    db: Arc<Database>,
    events: broadcast::Sender<StorageEvent>,
}

impl KvStore {
    /// Open (or create) the store at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        let (events, _) = broadcast::channel(64);
        let store = Self { db: Arc::new(db), events };
        store.ensure_table()?;
        Ok(store)
    }

    /// Open a store that lives only as long as the process
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(InMemoryBackend::new())?;
        let (events, _) = broadcast::channel(64);
        let store = Self { db: Arc::new(db), events };
        store.ensure_table()?;
        Ok(store)
    }

    fn ensure_table(&self) -> StorageResult<()> {
        let write = self.db.begin_write()?;
        write.open_table(KV_TABLE)?;
        write.commit()?;
        Ok(())
    }

    /// Subscribe to change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.events.subscribe()
    }

    /// Read and deserialize a value, `None` when the key is absent
    pub fn get_json<T: DeserializeOwned>(&self, key: &'static str) -> StorageResult<Option<T>> {
        let read = self.db.begin_read()?;
        let table = read.open_table(KV_TABLE)?;
        match table.get(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(bytes.value())?)),
            None => Ok(None),
        }
    }

    /// Serialize and write a value, then notify subscribers
    pub fn put_json<T: Serialize>(&self, key: &'static str, value: &T) -> StorageResult<()> {
        let bytes = serde_json::to_vec(value)?;
        let write = self.db.begin_write()?;
        {
            let mut table = write.open_table(KV_TABLE)?;
            table.insert(key, bytes.as_slice())?;
        }
        write.commit()?;
        let _ = self.events.send(StorageEvent { key });
        Ok(())
    }

    /// Delete a key, then notify subscribers
    ///
    /// Deleting an absent key is not an error.
    pub fn remove(&self, key: &'static str) -> StorageResult<()> {
        let write = self.db.begin_write()?;
        {
            let mut table = write.open_table(KV_TABLE)?;
            table.remove(key)?;
        }
        write.commit()?;
        let _ = self.events.send(StorageEvent { key });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, KvStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = KvStore::open(dir.path().join("test.redb")).expect("open store");
        (dir, store)
    }

    #[test]
    fn roundtrip_and_remove() {
        let (_dir, store) = temp_store();
        store.put_json(NOTES_KEY, &"no onions".to_string()).unwrap();
        let notes: Option<String> = store.get_json(NOTES_KEY).unwrap();
        assert_eq!(notes.as_deref(), Some("no onions"));

        store.remove(NOTES_KEY).unwrap();
        let notes: Option<String> = store.get_json(NOTES_KEY).unwrap();
        assert_eq!(notes, None);

        // removing again is fine
        store.remove(NOTES_KEY).unwrap();
    }

    #[test]
    fn failed_write_leaves_previous_value_intact() {
        struct Unserializable;

        impl Serialize for Unserializable {
            fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
                Err(serde::ser::Error::custom("nope"))
            }
        }

        let (_dir, store) = temp_store();
        store.put_json(NOTES_KEY, &"keep me".to_string()).unwrap();

        let result = store.put_json(NOTES_KEY, &Unserializable);
        assert!(matches!(result, Err(StorageError::Serialization(_))));

        let notes: Option<String> = store.get_json(NOTES_KEY).unwrap();
        assert_eq!(notes.as_deref(), Some("keep me"));
    }

    #[test]
    fn in_memory_store_behaves_like_disk() {
        let store = KvStore::open_in_memory().expect("open in-memory store");
        store.put_json(CART_KEY, &42i64).unwrap();
        let value: Option<i64> = store.get_json(CART_KEY).unwrap();
        assert_eq!(value, Some(42));
    }

    #[test]
    fn missing_key_is_none() {
        let (_dir, store) = temp_store();
        let value: Option<i64> = store.get_json(CART_KEY).unwrap();
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn mutations_notify_subscribers() {
        let (_dir, store) = temp_store();
        let mut rx = store.subscribe();
        store.put_json(LOCATION_KEY, &"Lantai 2".to_string()).unwrap();
        let event = rx.recv().await.unwrap();
        assert_eq!(event.key, LOCATION_KEY);
    }
}
