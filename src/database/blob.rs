use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::Result;

/// Resume bytes keyed by candidate id. `put` returns only once the blob is
/// durable and readable under its final key.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, key: Uuid, data: Bytes) -> Result<()>;

    async fn get(&self, key: Uuid) -> Result<Option<Bytes>>;

    /// Removing a missing key is not an error.
    async fn remove(&self, key: Uuid) -> Result<()>;
}

pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: Uuid) -> PathBuf {
        self.root.join(key.to_string())
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(&self, key: Uuid, data: Bytes) -> Result<()> {
        fs::create_dir_all(&self.root).await?;

        let final_path = self.path_for(key);
        let temp_path = self.root.join(format!("{}.part", key));

        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(&data).await?;
        file.sync_all().await?;
        drop(file);

        if let Err(e) = fs::rename(&temp_path, &final_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        Ok(())
    }

    async fn get(&self, key: Uuid) -> Result<Option<Bytes>> {
        match fs::read(self.path_for(key)).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn remove(&self, key: Uuid) -> Result<()> {
        match fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<Uuid, Bytes>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, key: Uuid, data: Bytes) -> Result<()> {
        self.blobs.write().await.insert(key, data);
        Ok(())
    }

    async fn get(&self, key: Uuid) -> Result<Option<Bytes>> {
        Ok(self.blobs.read().await.get(&key).cloned())
    }

    async fn remove(&self, key: Uuid) -> Result<()> {
        self.blobs.write().await.remove(&key);
        Ok(())
    }
}
