//! page-lingo
//!
//! ページ内テキストの可逆的な言語切り替え。静的辞書による文字列置換、
//! 原文の保持、選択言語の永続化、追加コンテンツの自動翻訳を行う。

pub mod config;
pub mod dictionary;
pub mod dom;
pub mod error;
pub mod ledger;
pub mod storage;
pub mod substitute;
pub mod switcher;
pub mod walker;
pub mod watcher;

pub use error::{
    LingoError,
    Result,
};
pub use switcher::{
    Switcher,
    UiEvent,
};
