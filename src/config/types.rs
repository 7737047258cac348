use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

/// 設定項目一つ分の検証エラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "available[0]")
    pub field_path: String,
    /// 利用者向けのメッセージ
    pub message: String,
}

impl ValidationError {
    /// 検証エラーを作成
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

/// 設定の読み込み・検証エラー
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 検証エラー（全件）
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    /// 設定ファイルを読めない
    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON として解析できない
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// 検証エラーを番号付きの一覧に整形
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `.page-lingo.json` の設定
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SwitcherSettings {
    /// Mount point for the controls: `#id`, `.class` or a tag name.
    pub selector: String,

    /// Used when nothing valid is persisted.
    pub default_lang: String,

    /// Languages offered in the picker, in this order.
    ///
    /// - `None`: every language with a dictionary, sorted by code (default)
    /// - `Some([...])`: only these; entries without a dictionary are dropped
    pub available: Option<Vec<String>>,

    /// Key under which the chosen language is persisted.
    pub storage_key: String,

    /// 辞書ファイルの探索設定
    pub translation_files: TranslationFilesConfig,
}

/// 辞書ファイルの探索設定
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslationFilesConfig {
    /// 対象とする glob パターン（プロジェクトルートからの相対パス）
    pub include_patterns: Vec<String>,
    /// 除外する glob パターン
    pub exclude_patterns: Vec<String>,
}

impl SwitcherSettings {
    /// 設定を検証し、問題をすべて集める
    ///
    /// # Errors
    /// - Required field is empty
    /// - Empty entry in `available`
    /// - Invalid glob pattern
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.selector.trim().is_empty() {
            errors.push(ValidationError::new(
                "selector",
                "The selector cannot be empty. Example: \"#lang-switcher\"",
            ));
        }

        if self.default_lang.trim().is_empty() {
            errors.push(ValidationError::new(
                "defaultLang",
                "The default language cannot be empty. Example: \"en\"",
            ));
        }

        if let Some(available) = &self.available {
            for (index, code) in available.iter().enumerate() {
                if code.trim().is_empty() {
                    errors.push(ValidationError::new(
                        format!("available[{index}]"),
                        "Language codes cannot be empty",
                    ));
                }
            }
        }

        if self.storage_key.is_empty() {
            errors.push(ValidationError::new(
                "storageKey",
                "The storage key cannot be empty. Example: \"page-lingo.lang\"",
            ));
        }

        if self.translation_files.include_patterns.is_empty() {
            errors.push(ValidationError::new(
                "translationFiles.includePatterns",
                "At least one pattern is required. Example: [\"**/locales/*.json\"]",
            ));
        }

        for (index, pattern) in self.translation_files.include_patterns.iter().enumerate() {
            if let Err(e) = globset::Glob::new(pattern) {
                errors.push(ValidationError::new(
                    format!("translationFiles.includePatterns[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        for (index, pattern) in self.translation_files.exclude_patterns.iter().enumerate() {
            if let Err(e) = globset::Glob::new(pattern) {
                errors.push(ValidationError::new(
                    format!("translationFiles.excludePatterns[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl Default for TranslationFilesConfig {
    fn default() -> Self {
        Self {
            include_patterns: vec!["**/locales/*.json".to_string()],
            exclude_patterns: vec!["node_modules/**".to_string()],
        }
    }
}

impl Default for SwitcherSettings {
    fn default() -> Self {
        Self {
            selector: "#lang-switcher".to_string(),
            default_lang: "en".to_string(),
            available: None,
            storage_key: "page-lingo.lang".to_string(),
            translation_files: TranslationFilesConfig::default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::expect_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    /// validate: デフォルト値は有効
    #[rstest]
    fn validate_valid_settings() {
        let settings = SwitcherSettings::default();

        assert_that!(settings.validate(), ok(anything()));
    }

    /// 一部のフィールドだけの JSON
    #[rstest]
    fn deserialize_partial_settings() {
        let json = r#"{"defaultLang": "hi", "available": ["hi", "en"]}"#;

        let settings: SwitcherSettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.default_lang, eq("hi"));
        assert_that!(settings.selector, eq("#lang-switcher"));
        assert_that!(settings.available, some(elements_are![eq("hi"), eq("en")]));
    }

    /// 空の JSON はデフォルト値
    #[rstest]
    fn deserialize_empty_settings() {
        let json = "{}";

        let settings: SwitcherSettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.storage_key, eq("page-lingo.lang"));
        assert_that!(settings.available, none());
        assert_that!(
            settings.translation_files.include_patterns,
            elements_are![eq("**/locales/*.json")]
        );
        assert_that!(
            settings.translation_files.exclude_patterns,
            elements_are![eq("node_modules/**")]
        );
    }

    /// ネストした `translationFiles`
    #[rstest]
    fn deserialize_nested_translation_files() {
        let json = r#"{"translationFiles": {"includePatterns": ["i18n/*.json"]}}"#;

        let settings: SwitcherSettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.translation_files.include_patterns, elements_are![eq("i18n/*.json")]);
        assert_that!(settings.translation_files.exclude_patterns, len(eq(1)));
    }

    /// validate: selector が空
    #[rstest]
    fn validate_invalid_selector_empty() {
        let settings = SwitcherSettings { selector: "  ".to_string(), ..SwitcherSettings::default() };
        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("selector")),
                field!(ValidationError.message, contains_substring("cannot be empty"))
            ]])
        );
    }

    /// validate: defaultLang が空
    #[rstest]
    fn validate_invalid_default_lang_empty() {
        let settings = SwitcherSettings { default_lang: String::new(), ..SwitcherSettings::default() };
        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![field!(ValidationError.field_path, eq("defaultLang"))])
        );
    }

    /// validate: available に空のコード
    #[rstest]
    fn validate_invalid_available_entry() {
        let settings = SwitcherSettings {
            available: Some(vec!["en".to_string(), String::new()]),
            ..SwitcherSettings::default()
        };
        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("available[1]")),
                field!(ValidationError.message, contains_substring("cannot be empty"))
            ]])
        );
    }

    /// validate: storageKey が空
    #[rstest]
    fn validate_invalid_storage_key_empty() {
        let settings = SwitcherSettings { storage_key: String::new(), ..SwitcherSettings::default() };
        let result = settings.validate();

        assert_that!(result, err(elements_are![field!(ValidationError.field_path, eq("storageKey"))]));
    }

    /// validate: includePatterns が空
    #[rstest]
    fn validate_invalid_include_patterns_empty() {
        let settings = SwitcherSettings {
            translation_files: TranslationFilesConfig {
                include_patterns: vec![],
                ..TranslationFilesConfig::default()
            },
            ..SwitcherSettings::default()
        };
        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("translationFiles.includePatterns")),
                field!(ValidationError.message, contains_substring("At least one pattern"))
            ]])
        );
    }

    /// validate: 不正な exclude パターン
    #[rstest]
    fn validate_invalid_exclude_pattern_invalid_glob() {
        let settings = SwitcherSettings {
            translation_files: TranslationFilesConfig {
                exclude_patterns: vec!["node_modules/**".to_string(), "invalid[pattern".to_string()],
                ..TranslationFilesConfig::default()
            },
            ..SwitcherSettings::default()
        };

        let result = settings.validate();

        assert_that!(
            result,
            err(elements_are![all![
                field!(ValidationError.field_path, eq("translationFiles.excludePatterns[1]")),
                field!(ValidationError.message, contains_substring("Invalid glob pattern")),
                field!(ValidationError.message, contains_substring("invalid[pattern"))
            ]])
        );
    }

    /// ValidationErrors のメッセージ書式
    #[rstest]
    fn config_error_validation_errors_format() {
        let settings = SwitcherSettings {
            selector: String::new(),
            storage_key: String::new(),
            ..SwitcherSettings::default()
        };

        let errors = settings.validate().unwrap_err();
        let config_error = ConfigError::ValidationErrors(errors);

        let error_message = format!("{config_error}");
        assert_that!(error_message, contains_substring("Configuration validation failed"));
        assert_that!(error_message, contains_substring("1. selector"));
        assert_that!(error_message, contains_substring("2. storageKey"));
    }
}
