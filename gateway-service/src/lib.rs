//! Gateway service: a thin HTTP layer over MySQL (users), S3 (files) and
//! DynamoDB (file metadata).

pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod settings;
pub mod stores;

use std::sync::Arc;

use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;

pub use routes::create_router;
pub use settings::Settings;

use stores::{
    DynamoMetadataStore, MetadataStore, MySqlUserStore, ObjectStore, S3ObjectStore, UserStore,
};

/// Application state shared across handlers.
///
/// Holds one client per backing store, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub objects: Arc<dyn ObjectStore>,
    pub metadata: Arc<dyn MetadataStore>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserStore>,
        objects: Arc<dyn ObjectStore>,
        metadata: Arc<dyn MetadataStore>,
    ) -> Self {
        Self {
            users,
            objects,
            metadata,
        }
    }

    /// Build the production stores. AWS credentials come from the ambient
    /// provider chain (environment, profile, instance role).
    pub async fn from_settings(settings: &Settings) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &settings.aws.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let sdk_config = loader.load().await;

        Self::new(
            Arc::new(MySqlUserStore::new(settings.database.clone())),
            Arc::new(S3ObjectStore::from_sdk_config(
                &sdk_config,
                &settings.object_store,
            )),
            Arc::new(DynamoMetadataStore::from_sdk_config(
                &sdk_config,
                &settings.metadata_store,
            )),
        )
    }
}
