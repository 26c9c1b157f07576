//! `.relay-l10n.json` の読み込みと検証
mod loader;
mod manager;
mod types;

pub use loader::CONFIG_FILE_NAME;
pub use manager::ConfigManager;
pub use types::{
    ConfigError,
    L10nSettings,
    ResolvedPaths,
    ToolsConfig,
    ValidationError,
};
