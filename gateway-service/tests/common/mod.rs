//! In-memory stand-ins for the three backing stores

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, Response},
    Router,
};
use bytes::Bytes;
use gateway_service::{
    create_router,
    models::{Page, User},
    stores::{MetadataStore, ObjectStore, StoreError, StoreResult, UserStore},
    AppState,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

pub const BOUNDARY: &str = "gateway-test-boundary";
pub const MAX_UPLOAD_BYTES: usize = 1024 * 1024;

#[derive(Default)]
pub struct MemoryUserStore {
    rows: Mutex<Vec<User>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert_user(&self, name: &str) -> StoreResult<i64> {
        let mut rows = self.rows.lock().unwrap();
        let id = rows.last().map(|u| u.id + 1).unwrap_or(1);
        rows.push(User {
            id,
            name: name.to_string(),
        });
        Ok(id)
    }

    async fn fetch_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.rows.lock().unwrap().clone())
    }
}

/// Bucket keyed like S3: sorted keys, last write wins, paged by `page_size`.
/// Page tokens are the last key of the previous page.
pub struct MemoryObjectStore {
    objects: Mutex<BTreeMap<String, (Bytes, Option<String>)>>,
    page_size: usize,
}

impl MemoryObjectStore {
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            objects: Mutex::new(BTreeMap::new()),
            page_size,
        }
    }

    pub fn object(&self, key: &str) -> Option<(Bytes, Option<String>)> {
        self.objects.lock().unwrap().get(key).cloned()
    }
}

impl Default for MemoryObjectStore {
    fn default() -> Self {
        Self::with_page_size(1000)
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        content_type: Option<String>,
    ) -> StoreResult<()> {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (body, content_type));
        Ok(())
    }

    async fn list_objects(&self, page_token: Option<String>) -> StoreResult<Page<String>> {
        let objects = self.objects.lock().unwrap();
        if let Some(token) = &page_token {
            if !objects.contains_key(token) {
                return Err(StoreError::InvalidPageToken(token.clone()));
            }
        }

        let keys: Vec<String> = objects
            .keys()
            .filter(|key| page_token.as_ref().map_or(true, |after| *key > after))
            .take(self.page_size + 1)
            .cloned()
            .collect();

        Ok(page_of(keys, self.page_size, |key| key.clone()))
    }
}

/// Table of metadata items scanned in insertion order, paged by `page_size`.
/// Page tokens are the index of the next item.
pub struct MemoryMetadataStore {
    items: Vec<Value>,
    page_size: usize,
}

impl MemoryMetadataStore {
    pub fn new(items: Vec<Value>, page_size: usize) -> Self {
        Self { items, page_size }
    }
}

#[async_trait]
impl MetadataStore for MemoryMetadataStore {
    async fn scan_items(&self, page_token: Option<String>) -> StoreResult<Page<Value>> {
        let start = match page_token {
            Some(token) => token
                .parse::<usize>()
                .ok()
                .filter(|start| *start < self.items.len())
                .ok_or(StoreError::InvalidPageToken(token))?,
            None => 0,
        };

        let end = (start + self.page_size).min(self.items.len());
        let next_page_token = (end < self.items.len()).then(|| end.to_string());
        Ok(Page::new(self.items[start..end].to_vec(), next_page_token))
    }
}

/// Fails every call, standing in for an unreachable backend
pub struct UnavailableStore;

#[async_trait]
impl UserStore for UnavailableStore {
    async fn insert_user(&self, _name: &str) -> StoreResult<i64> {
        Err(StoreError::from(sqlx::Error::PoolTimedOut))
    }

    async fn fetch_users(&self) -> StoreResult<Vec<User>> {
        Err(StoreError::from(sqlx::Error::PoolTimedOut))
    }
}

#[async_trait]
impl ObjectStore for UnavailableStore {
    async fn put_object(&self, _: &str, _: Bytes, _: Option<String>) -> StoreResult<()> {
        Err(StoreError::ObjectStore("connection refused".to_string()))
    }

    async fn list_objects(&self, _: Option<String>) -> StoreResult<Page<String>> {
        Err(StoreError::ObjectStore("connection refused".to_string()))
    }
}

fn page_of<T, K>(mut items: Vec<T>, page_size: usize, token_of: K) -> Page<T>
where
    K: Fn(&T) -> String,
{
    if items.len() > page_size {
        items.truncate(page_size);
        let token = items.last().map(&token_of);
        Page::new(items, token)
    } else {
        Page::new(items, None)
    }
}

/// Stores behind a router, kept around so tests can inspect them directly
pub struct TestApp {
    pub router: Router,
    pub users: Arc<MemoryUserStore>,
    pub objects: Arc<MemoryObjectStore>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_stores(
            MemoryObjectStore::default(),
            MemoryMetadataStore::new(Vec::new(), 100),
        )
    }

    pub fn with_stores(objects: MemoryObjectStore, metadata: MemoryMetadataStore) -> Self {
        let users = Arc::new(MemoryUserStore::default());
        let objects = Arc::new(objects);
        let state = AppState::new(users.clone(), objects.clone(), Arc::new(metadata));

        Self {
            router: create_router(state, MAX_UPLOAD_BYTES),
            users,
            objects,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(
            Request::builder()
                .method(Method::GET)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn post_json(&self, uri: &str, body: &str) -> Response<Body> {
        self.send(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn upload(&self, field: &str, filename: &str, data: &[u8]) -> Response<Body> {
        self.upload_parts(&[(field, filename, data)]).await
    }

    pub async fn upload_parts(&self, parts: &[(&str, &str, &[u8])]) -> Response<Body> {
        self.send(
            Request::builder()
                .method(Method::POST)
                .uri("/upload")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", BOUNDARY),
                )
                .body(Body::from(multipart_body(parts)))
                .unwrap(),
        )
        .await
    }
}

/// A multipart body with one part per `(field, filename, data)`
pub fn multipart_body(parts: &[(&str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (field, filename, data) in parts {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
                 Content-Type: text/plain\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
