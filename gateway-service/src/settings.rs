use serde::{Deserialize, Serialize};
use shared::database::{DatabaseConfig, SqlIdentifier};
use shared::observability::{LogConfig, LogFormat, LogLevel, ObservabilityError};

/// Prefix for environment overrides, e.g. `GATEWAY_DATABASE__HOST`
const ENV_PREFIX: &str = "GATEWAY";

/// Optional settings file in the working directory (`gateway.toml`, `.yaml`, `.json`)
const SETTINGS_FILE: &str = "gateway";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub aws: AwsConfig,
    pub object_store: ObjectStoreConfig,
    pub metadata_store: MetadataStoreConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AwsConfig {
    /// Falls back to the SDK's region provider chain when unset
    #[serde(default)]
    pub region: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectStoreConfig {
    pub bucket: String,
    #[serde(default)]
    pub endpoint: Option<String>,
    pub force_path_style: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataStoreConfig {
    pub table_name: String,
    #[serde(default)]
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
                max_upload_bytes: 100 * 1024 * 1024,
            },
            database: DatabaseConfig::default(),
            aws: AwsConfig::default(),
            object_store: ObjectStoreConfig {
                bucket: "CHANGE_ME".to_string(),
                endpoint: None,
                force_path_style: false,
            },
            metadata_store: MetadataStoreConfig {
                table_name: "demo-app-file-metadata-dynamodb".to_string(),
                endpoint: None,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}

impl Settings {
    /// Load settings: compiled-in defaults, then `gateway.*`, then `GATEWAY_*`
    /// environment variables.
    pub fn load() -> Result<Self, SettingsError> {
        let settings: Settings = ::config::Config::builder()
            .add_source(::config::Config::try_from(&Settings::default())?)
            .add_source(::config::File::with_name(SETTINGS_FILE).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.server.port == 0 {
            return Err(SettingsError::Invalid("server.port must be > 0".to_string()));
        }

        if self.server.max_upload_bytes == 0 {
            return Err(SettingsError::Invalid(
                "server.max_upload_bytes must be > 0".to_string(),
            ));
        }

        SqlIdentifier::parse(&self.database.database)
            .map_err(|e| SettingsError::Invalid(format!("database.database: {}", e)))?;

        if self.object_store.bucket.trim().is_empty() {
            return Err(SettingsError::Invalid("object_store.bucket is empty".to_string()));
        }

        if self.metadata_store.table_name.trim().is_empty() {
            return Err(SettingsError::Invalid(
                "metadata_store.table_name is empty".to_string(),
            ));
        }

        self.logging.to_log_config()?;
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl LoggingConfig {
    pub fn to_log_config(&self) -> Result<LogConfig, ObservabilityError> {
        Ok(LogConfig {
            level: self.level.parse::<LogLevel>()?,
            format: self.format.parse::<LogFormat>()?,
            ..LogConfig::default()
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Invalid logging configuration: {0}")]
    Logging(#[from] ObservabilityError),
}
