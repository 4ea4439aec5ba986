//! MySQL-backed user store
//!
//! No pool: every call opens its own connection, runs one statement and
//! closes the connection before returning, whether or not the statement
//! succeeded.
use async_trait::async_trait;
use shared::database::{close_connection, connect_database, DatabaseConfig, DbConnection};
use sqlx::Connection;
use tracing::debug;

use super::{StoreResult, UserStore};
use crate::models::User;

pub struct MySqlUserStore {
    config: DatabaseConfig,
}

impl MySqlUserStore {
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl UserStore for MySqlUserStore {
    async fn insert_user(&self, name: &str) -> StoreResult<i64> {
        let mut conn = connect_database(&self.config).await?;
        let inserted = insert(&mut conn, name).await;
        close_connection(conn).await;

        let id = inserted?;
        debug!("Inserted user row id={}", id);
        Ok(id)
    }

    async fn fetch_users(&self) -> StoreResult<Vec<User>> {
        let mut conn = connect_database(&self.config).await?;
        let fetched = fetch_all(&mut conn).await;
        close_connection(conn).await;

        let users = fetched?;
        debug!("Fetched {} user rows", users.len());
        Ok(users)
    }
}

async fn insert(conn: &mut DbConnection, name: &str) -> Result<i64, sqlx::Error> {
    let mut tx = conn.begin().await?;

    let result = sqlx::query("INSERT INTO users (name) VALUES (?)")
        .bind(name)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    i64::try_from(result.last_insert_id()).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

async fn fetch_all(conn: &mut DbConnection) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT id, name FROM users ORDER BY id")
        .fetch_all(conn)
        .await
}
