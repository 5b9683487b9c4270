pub mod app_config;
pub mod config;
pub mod content;
pub mod reconcile;
pub mod report;

use thiserror::Error;

pub use app_config::{AppConfig, EmailProvider, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use content::{
    CommonMeta, ContentItem, ContentMeta, ContentStatus, MetaAttributes, RawStatus, Snapshot,
    HIATUS_BADGE_MARKER,
};
pub use reconcile::{
    diff_transitions, plan_sync, ContentWrite, PersistedContent, PersistedState, SyncPlan,
    CONTENT_TYPE_WEBTOON,
};
pub use report::{RunReport, RunStatus};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
