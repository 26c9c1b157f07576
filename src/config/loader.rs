//! 設定ファイルの探索と読み込み

use std::io::ErrorKind;
use std::path::{
    Path,
    PathBuf,
};

use super::{
    ConfigError,
    L10nSettings,
};

/// 設定ファイル名
pub const CONFIG_FILE_NAME: &str = ".relay-l10n.json";

/// 読み込んだ設定と、その読み込み元
#[derive(Debug, Clone)]
pub(super) struct LoadedSettings {
    pub(super) settings: L10nSettings,
    pub(super) path: PathBuf,
}

/// 設定ファイルのパスを決める
///
/// 明示されたパスが相対パスならルート基準で解決する。
/// 指定がなければ `<root>/.relay-l10n.json`。
fn config_path(root: &Path, explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(path) if path.is_absolute() => path.to_path_buf(),
        Some(path) => root.join(path),
        None => root.join(CONFIG_FILE_NAME),
    }
}

/// 設定を読み込む
///
/// - 明示されたファイルが存在しない場合は `ConfigError::NotFound`
/// - 既定のファイルが存在しない場合は `Ok(None)`（デフォルト設定で動く）
pub(super) fn load(root: &Path, explicit: Option<&Path>) -> Result<Option<LoadedSettings>, ConfigError> {
    let path = config_path(root, explicit);

    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            if explicit.is_some() {
                return Err(ConfigError::NotFound(path));
            }
            tracing::debug!("No configuration file at {}", path.display());
            return Ok(None);
        }
        Err(e) => return Err(ConfigError::IoError(e)),
    };

    let settings: L10nSettings = serde_json::from_str(&content)?;
    tracing::info!("Loaded configuration from {}", path.display());

    Ok(Some(LoadedSettings { settings, path }))
}
