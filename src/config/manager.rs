//! 設定管理を行うモジュール

use std::path::{
    Path,
    PathBuf,
};

use super::{
    ConfigError,
    L10nSettings,
    ResolvedPaths,
    loader,
};

/// 設定管理を行う
#[derive(Debug, Clone)]
pub struct ConfigManager {
    /// 現在の設定
    current_settings: L10nSettings,

    /// 作業ルートパス
    root: PathBuf,

    /// `--config` で指定された設定ファイル
    config_file: Option<PathBuf>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new(PathBuf::from("."))
    }
}

impl ConfigManager {
    /// 新しい設定マネージャーを作成
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { current_settings: L10nSettings::default(), root, config_file: None }
    }

    /// 既定の `.relay-l10n.json` の代わりに読む設定ファイルを指定する
    ///
    /// 相対パスはルート基準。指定したファイルがなければ読み込みはエラーになる。
    #[must_use]
    pub fn with_config_file(mut self, config_file: Option<PathBuf>) -> Self {
        self.config_file = config_file;
        self
    }

    /// 設定を読み込む
    ///
    /// # Returns
    /// - `Ok(())`: 設定の読み込みとバリデーション成功
    /// - `Err(ConfigError)`: エラー
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load_settings(&mut self) -> Result<(), ConfigError> {
        tracing::debug!("Loading settings for root: {:?}", self.root);

        let settings = loader::load(&self.root, self.config_file.as_deref())?.map_or_else(
            L10nSettings::default,
            |loaded| {
                tracing::debug!("Settings from {}: {:?}", loaded.path.display(), loaded.settings);
                loaded.settings
            },
        );

        self.update_settings(settings)
    }

    /// 設定を更新する（CLI の上書き用）
    pub fn update_settings(&mut self, new_settings: L10nSettings) -> Result<(), ConfigError> {
        new_settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = new_settings;
        tracing::debug!("Settings updated: {:?}", self.current_settings);

        Ok(())
    }

    /// 現在の設定を取得
    #[must_use]
    pub const fn get_settings(&self) -> &L10nSettings {
        &self.current_settings
    }

    /// 作業ルートを取得
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// ルート基準で解決したパスを取得
    #[must_use]
    pub fn paths(&self) -> ResolvedPaths {
        self.current_settings.resolve(&self.root)
    }
}
