//! Durable contact storage.
//!
//! The contact fields of the last checkout are remembered locally so the next
//! order starts pre-filled.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use mockall::automock;
use posy::prelude::*;
use thiserror::Error;
use tokio::fs;

/// File the contact record is kept in, under the storage directory.
pub const CONTACT_FILE: &str = "checkout_contact.json";

/// Errors raised by contact storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the file failed.
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// The stored record could not be encoded or decoded.
    #[error("stored contact is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where the saved contact lives.
#[automock]
#[async_trait]
pub trait ContactStorage: Send + Sync {
    /// The saved contact, if one was ever stored.
    async fn load(&self) -> Result<Option<SavedContact>, StorageError>;

    /// Replace the saved contact.
    async fn save(&self, contact: &SavedContact) -> Result<(), StorageError>;
}

/// Stores the contact as a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Keep the contact in [`CONTACT_FILE`] under `dir`.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(CONTACT_FILE),
        }
    }

    /// Full path of the contact file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ContactStorage for JsonFileStorage {
    async fn load(&self) -> Result<Option<SavedContact>, StorageError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };

        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    async fn save(&self, contact: &SavedContact) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).await?;
        }

        let bytes = serde_json::to_vec_pretty(contact)?;
        let staging = self.path.with_extension("json.tmp");

        fs::write(&staging, bytes).await?;
        fs::rename(&staging, &self.path).await?;

        Ok(())
    }
}
