//! Backing-store adapters
//!
//! Each trait covers one external system. Handlers only see the traits, so
//! the production adapters (MySQL, S3, DynamoDB) can be swapped for fakes.

pub mod metadata;
pub mod objects;
pub mod users;

pub use metadata::DynamoMetadataStore;
pub use objects::S3ObjectStore;
pub use users::MySqlUserStore;

use async_trait::async_trait;
use bytes::Bytes;
use shared::database::DatabaseError;
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

use crate::models::{Page, User};

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Object store error: {0}")]
    ObjectStore(String),

    #[error("Metadata store error: {0}")]
    MetadataStore(String),

    #[error("Invalid page token: {0}")]
    InvalidPageToken(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(DatabaseError::Connection(err))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// User records in the relational store
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert one user and return the id assigned by the store
    async fn insert_user(&self, name: &str) -> StoreResult<i64>;

    /// Every user record, ordered by id
    async fn fetch_users(&self) -> StoreResult<Vec<User>>;
}

/// File blobs in the object store
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `body` under `key`, replacing any existing object
    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        content_type: Option<String>,
    ) -> StoreResult<()>;

    /// One page of object keys
    async fn list_objects(&self, page_token: Option<String>) -> StoreResult<Page<String>>;
}

/// File metadata items in the key-value store
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// One page of a full-table scan, each item rendered as a JSON object
    async fn scan_items(
        &self,
        page_token: Option<String>,
    ) -> StoreResult<Page<serde_json::Value>>;
}
