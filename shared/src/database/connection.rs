use sqlx::{mysql::MySqlConnection, Connection};
use tracing::{debug, error, warn};

use super::{DatabaseConfig, DatabaseError, DatabaseResult};

/// Type alias for a single, unpooled database connection
pub type DbConnection = MySqlConnection;

/// Open a connection to the server without selecting a database
pub async fn connect_server(config: &DatabaseConfig) -> DatabaseResult<DbConnection> {
    debug!("Connecting to MySQL server at {}:{}", config.host, config.port);

    MySqlConnection::connect_with(&config.server_options())
        .await
        .map_err(|e| {
            error!("Failed to connect to MySQL server: {}", e);
            DatabaseError::Connection(e)
        })
}

/// Open a connection with the configured database selected
pub async fn connect_database(config: &DatabaseConfig) -> DatabaseResult<DbConnection> {
    debug!(
        "Connecting to database {} at {}:{}",
        config.database, config.host, config.port
    );

    let options = config.database_options()?;
    MySqlConnection::connect_with(&options).await.map_err(|e| {
        error!("Failed to connect to database {}: {}", config.database, e);
        DatabaseError::Connection(e)
    })
}

/// Close a connection, logging instead of failing if the goodbye is lost.
///
/// Callers close after their statement has already succeeded or failed, so a
/// close error must not replace that outcome.
pub async fn close_connection(conn: DbConnection) {
    if let Err(e) = conn.close().await {
        warn!("Failed to close database connection cleanly: {}", e);
    }
}

