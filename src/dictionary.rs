//! 辞書ストア
//!
//! Static language dictionaries: the built-in set plus any flat JSON files
//! found under a project root.

/// 組み込み辞書
mod builtin;
/// 辞書ファイルの探索と解析
mod loader;
/// 辞書とストア
mod store;

use std::path::PathBuf;

use thiserror::Error;

pub use loader::{
    ParseFailure,
    load_from_directory,
    parse_dictionary,
};
pub use store::{
    Dictionary,
    DictionaryStore,
};

/// Errors while loading dictionary files.
#[derive(Error, Debug)]
pub enum DictionaryError {
    /// glob パターンが不正
    #[error("Invalid dictionary file pattern '{pattern}': {source}")]
    InvalidPattern {
        /// 問題のパターン
        pattern: String,
        /// globset のエラー
        #[source]
        source: globset::Error,
    },

    /// glob セットの構築に失敗
    #[error("Failed to build glob set: {0}")]
    GlobSetBuild(#[from] globset::Error),

    /// ファイルを読めない
    #[error("Failed to read dictionary file {}: {source}", .path.display())]
    Read {
        /// 辞書ファイル
        path: PathBuf,
        /// 元の I/O エラー
        #[source]
        source: std::io::Error,
    },

    /// JSON として解析できない
    #[error("Failed to parse dictionary file {}: {message}", .path.display())]
    Parse {
        /// 辞書ファイル
        path: PathBuf,
        /// パーサーのメッセージ
        message: String,
    },

    /// トップレベルがオブジェクトではない
    #[error("Dictionary file {} must contain a JSON object", .path.display())]
    NotAnObject {
        /// 辞書ファイル
        path: PathBuf,
    },
}
