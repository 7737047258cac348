//! 選択言語の永続化
//!
//! A single string value per key; last write wins.

use std::collections::{
    BTreeMap,
    HashMap,
};
use std::path::{
    Path,
    PathBuf,
};

use thiserror::Error;

/// ストレージの読み書きエラー
#[derive(Debug, Error)]
pub enum StorageError {
    /// ファイルの読み書きに失敗
    #[error("Failed to access storage file {}: {source}", .path.display())]
    Io {
        /// 対象ファイル
        path: PathBuf,
        /// 元の I/O エラー
        #[source]
        source: std::io::Error,
    },

    /// 内容が文字列の JSON オブジェクトではない
    #[error("Storage file {} is not a JSON object of strings: {source}", .path.display())]
    Format {
        /// 対象ファイル
        path: PathBuf,
        /// パースエラー
        #[source]
        source: serde_json::Error,
    },
}

/// Key-value backend the switcher persists the chosen language in.
pub trait LanguageStorage {
    /// `key` の値を読む
    ///
    /// # Errors
    /// Returns [`StorageError`] when the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// `key` に `value` を書く
    ///
    /// # Errors
    /// Returns [`StorageError`] when the backend cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Storage that lives as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    /// キー → 値
    values: HashMap<String, String>,
}

impl MemoryStorage {
    /// 空のストレージ
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `key` already holding `value`.
    #[must_use]
    pub fn with_value(key: &str, value: &str) -> Self {
        let mut storage = Self::new();
        storage.values.insert(key.to_string(), value.to_string());
        storage
    }
}

impl LanguageStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Storage backed by a JSON object file, e.g. `{"page-lingo.lang": "hi"}`.
///
/// A missing file reads as empty and is created on the first write. Other
/// keys already in the file are preserved.
#[derive(Debug, Clone)]
pub struct FileStorage {
    /// JSON ファイルのパス
    path: PathBuf,
}

impl FileStorage {
    /// `path` のファイルを使うストレージ
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// JSON ファイルのパス
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// ファイル全体を読む。無いか空なら空のマップ
    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                return Ok(BTreeMap::new());
            }
            Err(source) => return Err(StorageError::Io { path: self.path.clone(), source }),
        };
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content)
            .map_err(|source| StorageError::Format { path: self.path.clone(), source })
    }
}

impl LanguageStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());
        let content = serde_json::to_string_pretty(&values)
            .map_err(|source| StorageError::Format { path: self.path.clone(), source })?;
        std::fs::write(&self.path, content)
            .map_err(|source| StorageError::Io { path: self.path.clone(), source })?;
        tracing::debug!(key, value, path = %self.path.display(), "Persisted value");
        Ok(())
    }
}
