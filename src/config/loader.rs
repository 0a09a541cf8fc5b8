//! 設定ファイルの読み込み関数

use std::path::{
    Path,
    PathBuf,
};

use super::{
    ConfigError,
    I18nSettings,
};

/// ワークスペース直下の設定ファイル名
pub const CONFIG_FILE_NAME: &str = ".market-i18n.json";

/// ワークスペースから設定を読み込む
///
/// `.market-i18n.json` ファイルを探して読み込む
///
/// # Arguments
/// * `workspace_root` - ワークスペースのルートパス
///
/// # Returns
/// - `Ok(Some(settings))`: 設定ファイルが見つかり、読み込みに成功
/// - `Ok(None)`: 設定ファイルが見つからない
/// - `Err(ConfigError)`: ファイル読み込みまたはパースエラー
pub(super) fn load_from_workspace(
    workspace_root: &Path,
) -> Result<Option<I18nSettings>, ConfigError> {
    let config_path = workspace_root.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!("Configuration file not found: {:?}", config_path);
        return Ok(None);
    }

    load_from_file(&config_path).map(Some)
}

/// 明示的に指定された設定ファイルを読み込む
///
/// # Errors
/// - ファイル読み込みエラー (存在しない場合を含む)
/// - JSON パースエラー
pub(super) fn load_from_file(config_path: &Path) -> Result<I18nSettings, ConfigError> {
    tracing::debug!("Loading configuration from: {:?}", config_path);

    let content = std::fs::read_to_string(config_path)?;
    let settings: I18nSettings = serde_json::from_str(&content)?;

    Ok(settings)
}

/// 設定値の相対パスをワークスペース基準で解決する
#[must_use]
pub fn resolve_path(workspace_root: &Path, configured: &str) -> PathBuf {
    let path = Path::new(configured);
    if path.is_absolute() { path.to_path_buf() } else { workspace_root.join(path) }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::fs;

    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    /// `load_from_workspace`: 設定ファイルが存在する場合
    #[rstest]
    fn test_load_from_workspace_with_valid_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_content = r#"{"keySeparator": "/", "localesDir": "i18n"}"#;
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), config_content).unwrap();

        let result = load_from_workspace(temp_dir.path());

        assert!(result.is_ok());
        let settings = result.unwrap().unwrap();
        assert_eq!(settings.key_separator, "/");
        assert_eq!(settings.locales_dir, "i18n");
    }

    /// `load_from_workspace`: 設定ファイルが存在しない場合
    #[rstest]
    fn test_load_from_workspace_no_config_file() {
        let temp_dir = TempDir::new().unwrap();

        let result = load_from_workspace(temp_dir.path());

        assert!(result.is_ok());
        assert!(result.unwrap().is_none());
    }

    /// `load_from_workspace`: JSON パースエラー
    #[rstest]
    fn test_load_from_workspace_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), "invalid json").unwrap();

        let result = load_from_workspace(temp_dir.path());

        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    /// `load_from_file`: 指定ファイルが存在しない場合は IO エラー
    #[rstest]
    fn test_load_from_file_missing() {
        let temp_dir = TempDir::new().unwrap();

        let result = load_from_file(&temp_dir.path().join("custom.json"));

        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }

    #[rstest]
    #[case::relative("/workspace", "locales", "/workspace/locales")]
    #[case::absolute("/workspace", "/srv/locales", "/srv/locales")]
    fn test_resolve_path(#[case] root: &str, #[case] configured: &str, #[case] expected: &str) {
        assert_eq!(resolve_path(Path::new(root), configured), PathBuf::from(expected));
    }
}
