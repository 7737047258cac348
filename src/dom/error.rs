use thiserror::Error;

use super::NodeId;

/// Errors from structural document operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// The id does not belong to this document
    #[error("Unknown node {0}")]
    UnknownNode(NodeId),
    /// Text, comment and the like cannot hold children
    #[error("Node {0} cannot have children")]
    NotAContainer(NodeId),
    /// The child is the parent itself or one of its ancestors
    #[error("Inserting {child} under {parent} would create a cycle")]
    HierarchyCycle {
        /// 挿入先
        parent: NodeId,
        /// 挿入しようとしたノード
        child: NodeId,
    },
    /// `remove_child` / `insert_before` with a node that is not a child
    #[error("Node {child} is not a child of {parent}")]
    NotAChild {
        /// 親として指定したノード
        parent: NodeId,
        /// 子ではなかったノード
        child: NodeId,
    },
    /// Attribute access on a non-element
    #[error("Node {0} is not an element")]
    NotAnElement(NodeId),
    /// Text access on a non-text node
    #[error("Node {0} is not a text node")]
    NotText(NodeId),
}

/// Errors from the HTML fragment parser
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HtmlError {
    /// `<!--` に対応する `-->` が無い
    #[error("Unclosed comment starting at byte {0}")]
    UnclosedComment(usize),
    /// `>` で閉じていないタグ
    #[error("Unclosed tag starting at byte {0}")]
    UnclosedTag(usize),
    /// 引用符で閉じていない属性値
    #[error("Unclosed quoted attribute value starting at byte {0}")]
    UnclosedAttributeValue(usize),
    /// `<` の直後にタグ名が無い
    #[error("Empty tag name at byte {0}")]
    EmptyTagName(usize),
    /// `script` などの終了タグが無い
    #[error("Unclosed <{tag}> raw text element")]
    UnclosedRawText {
        /// 要素名
        tag: String,
    },
    /// 木の構築に失敗
    #[error(transparent)]
    Dom(#[from] DomError),
}
