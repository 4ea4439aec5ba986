pub mod connection;
pub mod identifier;
pub mod schema;

pub use connection::{close_connection, connect_database, connect_server, DbConnection};
pub use identifier::SqlIdentifier;
pub use schema::{initialize_database, USERS_TABLE};

// Re-export common database types for convenience
pub use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};

use serde::{Deserialize, Serialize};

// Database configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "CHANGE_ME".to_string(),
            port: 3306,
            username: "CHANGE_ME".to_string(),
            password: "CHANGE_ME".to_string(),
            database: "demo".to_string(),
        }
    }
}

impl DatabaseConfig {
    /// Connection options for the server itself, with no database selected
    pub fn server_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
    }

    /// Connection options with the configured database selected
    pub fn database_options(&self) -> DatabaseResult<MySqlConnectOptions> {
        let database = SqlIdentifier::parse(&self.database)?;
        Ok(self.server_options().database(database.as_str()))
    }
}

// Error types for database operations
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
