use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row of the `users` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
}

/// Request payload for `POST /insert`
///
/// `name` is optional here so that a missing field reaches the handler and
/// becomes a structured client error instead of a body rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct InsertUserRequest {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertUserResponse {
    pub message: String,
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Query string accepted by the listing routes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page_token: Option<String>,
}

/// One page of a listing plus the token for the next one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_page_token: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_page_token: Option<String>) -> Self {
        Self {
            items,
            next_page_token,
        }
    }
}

/// Response body for `GET /list_files`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileListing {
    pub files: Vec<String>,
    pub next_page_token: Option<String>,
}

impl From<Page<String>> for FileListing {
    fn from(page: Page<String>) -> Self {
        Self {
            files: page.items,
            next_page_token: page.next_page_token,
        }
    }
}

/// Response body for `GET /get_file_metadata`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataListing {
    pub items: Vec<serde_json::Value>,
    pub next_page_token: Option<String>,
}

impl From<Page<serde_json::Value>> for MetadataListing {
    fn from(page: Page<serde_json::Value>) -> Self {
        Self {
            items: page.items,
            next_page_token: page.next_page_token,
        }
    }
}
