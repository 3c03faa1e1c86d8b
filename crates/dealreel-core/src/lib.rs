pub mod app_config;
pub mod categories;
pub mod config;
pub mod deal;
pub mod snapshot;

use thiserror::Error;

pub use app_config::AppConfig;
pub use categories::{load_categories, CategoriesFile, CategoryConfig};
pub use config::{load_app_config, load_app_config_from_env};
pub use deal::{Deal, Promotion};
pub use snapshot::{load_snapshot, save_snapshot, DealSnapshot, SnapshotError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read categories file {path}: {source}")]
    CategoriesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse categories file: {0}")]
    CategoriesFileParse(#[source] serde_yaml::Error),

    #[error("categories validation failed: {0}")]
    Validation(String),
}
