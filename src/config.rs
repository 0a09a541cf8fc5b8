//! Workspace configuration (`.market-i18n.json`).
/// Config file loader
mod loader;
/// Configuration manager
mod manager;
/// Merge input matcher
mod matcher;
/// Configuration types and settings
mod types;

pub use loader::{
    CONFIG_FILE_NAME,
    resolve_path,
};
pub use manager::ConfigManager;
pub use matcher::{
    InputMatcher,
    MatcherError,
};
pub use types::{
    BatchConfig,
    ConfigError,
    CoverageConfig,
    I18nSettings,
    SessionConfig,
    SkipConfig,
    ValidationError,
};
