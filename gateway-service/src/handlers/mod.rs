pub mod files;
pub mod health;
pub mod metadata;
pub mod users;
