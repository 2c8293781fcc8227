//! Schemaless document storage.
//!
//! The store knows nothing about expenses: it keeps JSON objects grouped in
//! named collections and can list a collection newest first by its `date`
//! field. Decoding and defaulting happen in the repository.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::error::StoreError;

/// A stored JSON object and the id the store assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    /// Store-assigned id.
    pub id: String,
    /// Document body.
    pub data: Value,
}

impl StoredDocument {
    fn date(&self) -> Option<DateTime<Utc>> {
        self.data
            .get("date")
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|d| d.with_timezone(&Utc))
    }
}

/// Orders documents by their `date` field, newest first. Documents without
/// a readable date go last, keeping insertion order among themselves.
pub fn sort_by_date_desc(documents: &mut [StoredDocument]) {
    documents.sort_by(|a, b| b.date().cmp(&a.date()));
}

/// A collection-oriented document store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Appends `data` to `collection` and returns the new document id.
    async fn insert(&self, collection: &str, data: Value) -> Result<String, StoreError>;

    /// All documents of `collection`, newest `date` first.
    async fn list_by_date_desc(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError>;
}

fn new_document_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Documents held in process memory.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<BTreeMap<String, Vec<StoredDocument>>>,
}

impl MemoryDocumentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert(&self, collection: &str, data: Value) -> Result<String, StoreError> {
        let id = new_document_id();
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(StoredDocument {
                id: id.clone(),
                data,
            });
        Ok(id)
    }

    async fn list_by_date_desc(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
        let mut documents = self
            .collections
            .read()
            .await
            .get(collection)
            .cloned()
            .unwrap_or_default();
        sort_by_date_desc(&mut documents);
        Ok(documents)
    }
}

/// Documents kept in one JSON file, rewritten on every insert.
///
/// A missing file reads as an empty store.
#[derive(Debug)]
pub struct JsonFileDocumentStore {
    path: PathBuf,
    lock: Mutex<()>,
}

type Collections = BTreeMap<String, Vec<StoredDocument>>;

impl JsonFileDocumentStore {
    /// Uses the file at `path`, creating it on first insert.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    async fn read_all(&self) -> Result<Collections, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(Collections::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Collections::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl DocumentStore for JsonFileDocumentStore {
    async fn insert(&self, collection: &str, data: Value) -> Result<String, StoreError> {
        let _guard = self.lock.lock().await;
        let mut collections = self.read_all().await?;

        let id = new_document_id();
        collections
            .entry(collection.to_string())
            .or_default()
            .push(StoredDocument {
                id: id.clone(),
                data,
            });

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, serde_json::to_vec_pretty(&collections)?).await?;
        Ok(id)
    }

    async fn list_by_date_desc(&self, collection: &str) -> Result<Vec<StoredDocument>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut documents = self
            .read_all()
            .await?
            .remove(collection)
            .unwrap_or_default();
        sort_by_date_desc(&mut documents);
        Ok(documents)
    }
}
