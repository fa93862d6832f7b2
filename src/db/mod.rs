mod catalog;
mod clients;
mod company;
mod expenses;
mod postgres;
mod quotes;
mod session;
mod store;

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::Config;
use crate::models::OwnedRecord;

pub use postgres::PgStore;
pub use store::{AnyStore, JsonFileStore, Store};
#[cfg(test)]
pub use store::MemoryStore;

/// Keys of the store, one logical collection or flag each.
pub mod keys {
    pub const MATERIALS: &str = "materials";
    pub const CATEGORIES: &str = "categories";
    pub const CLIENTS: &str = "clients";
    pub const EXPENSES: &str = "expenses";
    pub const QUOTES: &str = "quotes";
    pub const WHITELIST: &str = "whitelist";
    pub const COMPANY_PROFILE: &str = "companyProfile";
    pub const AUTHENTICATED: &str = "authenticated";
    pub const CURRENT_USER_EMAIL: &str = "currentUserEmail";
    pub const IS_ADMIN: &str = "isAdmin";
}

/// Typed access to the collections kept in a [`Store`].
///
/// Every write is a read-modify-write of a whole collection; the last writer wins.
pub struct Database<S = AnyStore> {
    store: S,
}

impl<S: Store> Database<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Load a whole collection for reading. A missing key is an empty collection,
    /// and so is a document that no longer parses. Records that fail to decode are
    /// skipped.
    async fn load_collection<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(Vec::new());
        };

        let values: Vec<Value> = match serde_json::from_str(&raw) {
            Ok(values) => values,
            Err(err) => {
                warn!(key, error = %err, "stored collection is malformed, treating it as empty");
                return Ok(Vec::new());
            }
        };

        Ok(values
            .into_iter()
            .filter_map(|value| match serde_json::from_value(value) {
                Ok(record) => Some(record),
                Err(err) => {
                    warn!(key, error = %err, "skipping malformed record");
                    None
                }
            })
            .collect())
    }

    /// Load a collection that is about to be written back. Records that fail to
    /// decode are carried along untouched; a document that is not a list at all
    /// is refused rather than overwritten.
    async fn load_for_write<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<Stored<T>>> {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(Vec::new());
        };

        let values: Vec<Value> = serde_json::from_str(&raw)
            .with_context(|| format!("stored {key} is malformed, refusing to overwrite it"))?;

        Ok(values
            .into_iter()
            .map(|value| match serde_json::from_value(value.clone()) {
                Ok(record) => Stored::Decoded(record),
                Err(err) => {
                    warn!(key, error = %err, "keeping malformed record as is");
                    Stored::Undecodable(value)
                }
            })
            .collect())
    }

    async fn save_collection<T: Serialize>(&self, key: &str, records: &[T]) -> Result<()> {
        let json = serde_json::to_string(records)?;
        self.store.put(key, &json).await
    }

    /// Load a singleton record, falling back to its default.
    async fn load_record<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T> {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(T::default());
        };

        match serde_json::from_str(&raw) {
            Ok(record) => Ok(record),
            Err(err) => {
                warn!(key, error = %err, "stored record is malformed, using defaults");
                Ok(T::default())
            }
        }
    }

    async fn save_record<T: Serialize>(&self, key: &str, record: &T) -> Result<()> {
        let json = serde_json::to_string(record)?;
        self.store.put(key, &json).await
    }

    async fn list_owned<T>(&self, key: &str, owner_email: &str) -> Result<Vec<T>>
    where
        T: OwnedRecord + DeserializeOwned,
    {
        let records: Vec<T> = self.load_collection(key).await?;
        Ok(records.into_iter().filter(|r| r.owner_email() == owner_email).collect())
    }

    async fn find_owned<T>(&self, key: &str, owner_email: &str, id: &str) -> Result<Option<T>>
    where
        T: OwnedRecord + DeserializeOwned,
    {
        let records: Vec<T> = self.load_collection(key).await?;
        Ok(records
            .into_iter()
            .find(|r| r.id() == id && r.owner_email() == owner_email))
    }

    async fn append<T>(&self, key: &str, record: T) -> Result<()>
    where
        T: Serialize + DeserializeOwned,
    {
        let mut records: Vec<Stored<T>> = self.load_for_write(key).await?;
        records.push(Stored::Decoded(record));
        self.save_collection(key, &records).await
    }

    /// Apply `change` to the record with this id and owner, in place.
    /// Returns the updated record, or `None` when nothing matched.
    async fn update_owned<T, F>(&self, key: &str, owner_email: &str, id: &str, change: F) -> Result<Option<T>>
    where
        T: OwnedRecord + Serialize + DeserializeOwned + Clone,
        F: FnOnce(&mut T),
    {
        let mut records: Vec<Stored<T>> = self.load_for_write(key).await?;
        let Some(record) = records
            .iter_mut()
            .filter_map(Stored::decoded_mut)
            .find(|r| r.id() == id && r.owner_email() == owner_email)
        else {
            return Ok(None);
        };

        change(record);
        let updated = record.clone();
        self.save_collection(key, &records).await?;

        Ok(Some(updated))
    }

    /// Remove the record with this id and owner. Absent ids leave the collection untouched.
    async fn delete_owned<T>(&self, key: &str, owner_email: &str, id: &str) -> Result<bool>
    where
        T: OwnedRecord + Serialize + DeserializeOwned,
    {
        let mut records: Vec<Stored<T>> = self.load_for_write(key).await?;
        let before = records.len();
        records.retain(|stored| {
            !stored
                .decoded()
                .is_some_and(|r| r.id() == id && r.owner_email() == owner_email)
        });

        if records.len() == before {
            return Ok(false);
        }

        self.save_collection(key, &records).await?;
        Ok(true)
    }
}

/// A collection entry as read back from the store.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Stored<T> {
    Decoded(T),
    /// Written back exactly as it was read.
    Undecodable(Value),
}

impl<T> Stored<T> {
    fn decoded(&self) -> Option<&T> {
        match self {
            Stored::Decoded(record) => Some(record),
            Stored::Undecodable(_) => None,
        }
    }

    fn decoded_mut(&mut self) -> Option<&mut T> {
        match self {
            Stored::Decoded(record) => Some(record),
            Stored::Undecodable(_) => None,
        }
    }
}

/// Open the store selected by the configuration
pub async fn init(config: &Config) -> Result<Database> {
    let store = match config.database_url() {
        Some(url) => {
            info!("using postgres store");
            AnyStore::Postgres(PgStore::connect(url).await?)
        }
        None => {
            info!(dir = %config.data_dir.display(), "using json store");
            AnyStore::Json(JsonFileStore::open(&config.data_dir)?)
        }
    };

    Ok(Database::new(store))
}

#[cfg(test)]
pub(crate) fn memory_db() -> Database<MemoryStore> {
    Database::new(MemoryStore::new())
}
