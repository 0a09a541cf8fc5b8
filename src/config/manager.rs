//! 設定管理を行うモジュール

use std::path::{
    Path,
    PathBuf,
};

use super::loader::resolve_path;
use super::{
    ConfigError,
    I18nSettings,
    loader,
};

/// 設定管理を行う
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 現在の設定
    current_settings: I18nSettings,

    /// ワークスペースのルートパス
    workspace_root: PathBuf,
}

impl ConfigManager {
    /// 新しい設定マネージャーを作成
    #[must_use]
    pub fn new(workspace_root: PathBuf) -> Self {
        Self { current_settings: I18nSettings::default(), workspace_root }
    }

    /// 設定を読み込む
    ///
    /// `config_file` が指定された場合はそのファイルを、
    /// 指定がない場合はワークスペース直下の設定ファイルを読み込む。
    ///
    /// # Returns
    /// - `Ok(())`: 設定の読み込みとバリデーション成功
    /// - `Err(ConfigError)`: エラー
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load_settings(&mut self, config_file: Option<&Path>) -> Result<(), ConfigError> {
        tracing::debug!(workspace_root = %self.workspace_root.display(), "Loading settings");

        let settings = match config_file {
            Some(path) => loader::load_from_file(&resolve_path(
                &self.workspace_root,
                &path.to_string_lossy(),
            ))?,
            None => loader::load_from_workspace(&self.workspace_root)?.map_or_else(
                I18nSettings::default,
                |ws| {
                    tracing::debug!("Loaded workspace settings: {:?}", ws);
                    ws
                },
            ),
        };

        // バリデーション
        settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = settings;
        tracing::debug!("Settings loaded successfully: {:?}", self.current_settings);

        Ok(())
    }

    /// 現在の設定を取得
    #[must_use]
    pub const fn get_settings(&self) -> &I18nSettings {
        &self.current_settings
    }

    /// ワークスペースルートを取得
    #[must_use]
    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// 辞書ディレクトリの絶対パス
    #[must_use]
    pub fn locales_dir(&self) -> PathBuf {
        resolve_path(&self.workspace_root, &self.current_settings.locales_dir)
    }

    /// バッチ出力ディレクトリの絶対パス
    #[must_use]
    pub fn batch_dir(&self) -> PathBuf {
        resolve_path(&self.workspace_root, &self.current_settings.batch.output_dir)
    }

    /// ロケール永続化ファイルの絶対パス
    #[must_use]
    pub fn session_storage_file(&self) -> PathBuf {
        resolve_path(&self.workspace_root, &self.current_settings.session.storage_file)
    }
}
