//! Idempotent startup DDL for the user database
use tracing::info;

use super::{
    close_connection, connect_database, connect_server, DatabaseConfig, DatabaseResult,
    SqlIdentifier,
};

/// Table holding user records
pub const USERS_TABLE: &str = "users";

const CREATE_USERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id INT AUTO_INCREMENT PRIMARY KEY,
        name VARCHAR(255) NOT NULL
    )
"#;

/// Create the configured database and the `users` table if they are absent.
///
/// Both statements are conditional on absence, so running this on every
/// startup is safe. Each step uses its own connection, closed before the
/// step's result is inspected.
pub async fn initialize_database(config: &DatabaseConfig) -> DatabaseResult<()> {
    let database = SqlIdentifier::parse(&config.database)?;

    ensure_database(config, &database).await?;
    ensure_users_table(config).await?;

    info!("Database {} initialized", database);
    Ok(())
}

async fn ensure_database(config: &DatabaseConfig, database: &SqlIdentifier) -> DatabaseResult<()> {
    let statement = create_database_statement(database);

    let mut conn = connect_server(config).await?;
    let created = sqlx::query(&statement).execute(&mut conn).await;
    close_connection(conn).await;

    created?;
    Ok(())
}

async fn ensure_users_table(config: &DatabaseConfig) -> DatabaseResult<()> {
    let mut conn = connect_database(config).await?;
    let created = sqlx::query(CREATE_USERS_TABLE).execute(&mut conn).await;
    close_connection(conn).await;

    created?;
    Ok(())
}

fn create_database_statement(database: &SqlIdentifier) -> String {
    format!("CREATE DATABASE IF NOT EXISTS {}", database.quoted())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_database_statement_quotes_name() {
        let database = SqlIdentifier::parse("demo").unwrap();
        assert_eq!(
            create_database_statement(&database),
            "CREATE DATABASE IF NOT EXISTS `demo`"
        );
    }

    #[test]
    fn test_users_table_statement_is_conditional() {
        assert!(CREATE_USERS_TABLE.contains("CREATE TABLE IF NOT EXISTS users"));
        assert!(CREATE_USERS_TABLE.contains("AUTO_INCREMENT PRIMARY KEY"));
    }

    #[tokio::test]
    async fn test_invalid_database_name_fails_before_connecting() {
        let config = DatabaseConfig {
            database: "bad name".to_string(),
            ..Default::default()
        };

        let err = initialize_database(&config).await.unwrap_err();
        assert!(matches!(err, crate::database::DatabaseError::InvalidIdentifier(_)));
    }
}
