//! 変更レコードと監視オプション

use super::NodeId;

/// Which changes an observation reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MutationObserverInit {
    /// Child insertions and removals.
    pub child_list: bool,
    /// Attribute value changes.
    pub attributes: bool,
    /// Extend both to every descendant of the observed root.
    pub subtree: bool,
}

impl MutationObserverInit {
    /// Child-list and attribute changes anywhere below the root.
    #[must_use]
    pub const fn subtree_changes() -> Self {
        Self { child_list: true, attributes: true, subtree: true }
    }
}

/// One queued change, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationRecord {
    /// 子ノードの追加・削除
    ChildList {
        /// Parent whose children changed.
        target: NodeId,
        /// 追加されたノード
        added: Vec<NodeId>,
        /// 取り外されたノード
        removed: Vec<NodeId>,
    },
    /// 属性値の変更
    Attributes {
        /// 変更された要素
        target: NodeId,
        /// 属性名
        name: String,
    },
}

impl MutationRecord {
    /// 変更のあったノード
    #[must_use]
    pub const fn target(&self) -> NodeId {
        match self {
            Self::ChildList { target, .. } | Self::Attributes { target, .. } => *target,
        }
    }
}

/// A registered observation root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Observation {
    /// 監視のルート
    pub(crate) root: NodeId,
    /// 報告する変更の種類
    pub(crate) options: MutationObserverInit,
}
