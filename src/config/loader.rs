//! 設定ファイルの読み込み関数

use std::path::Path;

use super::{
    ConfigError,
    SwitcherSettings,
};

/// Name of the settings file looked up in a project root.
pub(super) const CONFIG_FILE_NAME: &str = ".page-lingo.json";

/// プロジェクトルートから設定を読み込む
///
/// `.page-lingo.json` ファイルを探して読み込む
///
/// # Returns
/// - `Ok(Some(settings))`: 設定ファイルが見つかり、読み込みに成功
/// - `Ok(None)`: 設定ファイルが見つからない
///
/// # Errors
/// - ファイル読み込みエラー
/// - JSON パースエラー
pub(super) fn load_from_root(root: &Path) -> Result<Option<SwitcherSettings>, ConfigError> {
    let config_path = root.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!("Configuration file not found: {:?}", config_path);
        return Ok(None);
    }

    tracing::debug!("Loading configuration from: {:?}", config_path);

    let content = std::fs::read_to_string(&config_path)?;
    let settings: SwitcherSettings = serde_json::from_str(&content)?;

    Ok(Some(settings))
}
