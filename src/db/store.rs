//! Key-value backends. Every key holds one JSON document: a whole collection,
//! a singleton record or a session flag.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use super::postgres::PgStore;

/// Storage service injected into [`super::Database`].
#[allow(async_fn_in_trait)]
pub trait Store {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn put(&self, key: &str, value: &str) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

#[cfg(test)]
pub use memory::MemoryStore;

#[cfg(test)]
mod memory {
    use std::collections::HashMap;
    use std::sync::RwLock;

    use anyhow::{Result, anyhow};

    use super::Store;

    /// In-process store for tests.
    #[derive(Debug, Default)]
    pub struct MemoryStore {
        entries: RwLock<HashMap<String, String>>,
    }

    impl MemoryStore {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl Store for MemoryStore {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            let entries = self.entries.read().map_err(|_| anyhow!("memory store lock poisoned"))?;
            Ok(entries.get(key).cloned())
        }

        async fn put(&self, key: &str, value: &str) -> Result<()> {
            let mut entries = self.entries.write().map_err(|_| anyhow!("memory store lock poisoned"))?;
            entries.insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn remove(&self, key: &str) -> Result<()> {
            let mut entries = self.entries.write().map_err(|_| anyhow!("memory store lock poisoned"))?;
            entries.remove(key);
            Ok(())
        }
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.exists() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("could not create data directory {}", dir.display()))?;
        }

        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Store for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("could not read {key}")),
        }
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));

        // Write then rename so a crash never leaves a half-written collection.
        tokio::fs::write(&tmp, value)
            .await
            .with_context(|| format!("could not write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .with_context(|| format!("could not replace {}", path.display()))?;

        debug!(key, bytes = value.len(), "stored");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| format!("could not remove {key}")),
        }
    }
}

/// The backend picked at startup.
pub enum AnyStore {
    Json(JsonFileStore),
    Postgres(PgStore),
    #[cfg(test)]
    Memory(MemoryStore),
}

impl Store for AnyStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match self {
            AnyStore::Json(store) => store.get(key).await,
            AnyStore::Postgres(store) => store.get(key).await,
            #[cfg(test)]
            AnyStore::Memory(store) => store.get(key).await,
        }
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        match self {
            AnyStore::Json(store) => store.put(key, value).await,
            AnyStore::Postgres(store) => store.put(key, value).await,
            #[cfg(test)]
            AnyStore::Memory(store) => store.put(key, value).await,
        }
    }

    async fn remove(&self, key: &str) -> Result<()> {
        match self {
            AnyStore::Json(store) => store.remove(key).await,
            AnyStore::Postgres(store) => store.remove(key).await,
            #[cfg(test)]
            AnyStore::Memory(store) => store.remove(key).await,
        }
    }
}
