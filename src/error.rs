//! Errors surfaced by the loading side of the crate.
//!
//! Page operations never fail; everything that reads files does.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::dictionary::DictionaryError;
use crate::dom::HtmlError;
use crate::storage::StorageError;

/// 読み込み処理のエラー（CLI が報告する）
#[derive(Error, Debug)]
pub enum LingoError {
    /// 設定エラー
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// 辞書の読み込みエラー
    #[error(transparent)]
    Dictionary(#[from] DictionaryError),

    /// ストレージエラー
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// HTML の解析エラー
    #[error("Malformed HTML: {0}")]
    Html(#[from] HtmlError),

    /// 辞書が無い、または許可されていない言語
    #[error("Language '{0}' has no dictionary or is not offered")]
    UnknownLanguage(String),

    /// 入出力ファイルのエラー
    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        /// 対象のパス
        path: PathBuf,
        /// 元の I/O エラー
        #[source]
        source: std::io::Error,
    },
}

/// [`LingoError`] を既定とする `Result`
pub type Result<T, E = LingoError> = std::result::Result<T, E>;
