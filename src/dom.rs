//! メモリ上のドキュメントモデル
//!
//! An arena of nodes addressed by [`NodeId`], with the handful of DOM
//! operations the switcher relies on and observer-style mutation records.

/// ドキュメント本体
mod document;
/// DOM 操作と HTML 解析のエラー
mod error;
pub mod html;
/// 変更レコード
mod mutation;
/// ノード
mod node;

pub use document::Document;
pub use error::{
    DomError,
    HtmlError,
};
pub use mutation::{
    MutationObserverInit,
    MutationRecord,
};
pub use node::{
    ElementData,
    NodeId,
    NodeKind,
};
