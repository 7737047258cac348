//! 原文レジャー
//!
//! テキストノードと要素属性の「最初に観測した値」を保持する。
//! 一度記録した値は上書きしない（翻訳は常に原文から導出する）。

use std::collections::{
    BTreeMap,
    HashMap,
};

use crate::dom::{
    Document,
    NodeId,
};

/// Write-once side tables of pristine values, keyed by node identity.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    /// テキストノード → 原文
    text: HashMap<NodeId, String>,
    /// 要素 → (属性名 → 原文)
    attributes: HashMap<NodeId, BTreeMap<String, String>>,
}

impl Ledger {
    /// 空のレジャー
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// テキストノードの原文を記録（未記録の場合のみ）
    pub fn record_text_original(&mut self, doc: &Document, node: NodeId) {
        if self.text.contains_key(&node) {
            return;
        }
        if let Some(text) = doc.text(node) {
            self.text.insert(node, text.to_string());
        }
    }

    /// 記録済みの原文。未記録ならノードの現在値
    #[must_use]
    pub fn text_original(&self, doc: &Document, node: NodeId) -> Option<String> {
        self.text.get(&node).cloned().or_else(|| doc.text(node).map(str::to_string))
    }

    /// 要素の属性原文をまとめて記録
    ///
    /// 要素に記録が一つも無い場合のみ、`names` のうち存在する属性を記録する。
    /// 存在する属性が無ければ何も記録しない。
    pub fn record_attribute_originals(&mut self, doc: &Document, element: NodeId, names: &[&str]) {
        if self.attributes.contains_key(&element) {
            return;
        }
        let captured: BTreeMap<String, String> = names
            .iter()
            .filter_map(|name| {
                doc.attribute(element, name).map(|value| ((*name).to_string(), value.to_string()))
            })
            .collect();
        if !captured.is_empty() {
            self.attributes.insert(element, captured);
        }
    }

    /// 属性一つ分の原文を記録（その属性が未記録の場合のみ）
    ///
    /// 属性変更の通知から呼ばれる。既に原文があれば外部からの変更で
    /// 上書きしない。
    pub fn record_attribute_original(&mut self, doc: &Document, element: NodeId, name: &str) {
        let Some(value) = doc.attribute(element, name) else {
            return;
        };
        self.attributes
            .entry(element)
            .or_default()
            .entry(name.to_string())
            .or_insert_with(|| value.to_string());
    }

    /// 記録済みの属性原文。未記録なら現在の属性値
    #[must_use]
    pub fn attribute_original(&self, doc: &Document, element: NodeId, name: &str) -> Option<String> {
        self.attributes
            .get(&element)
            .and_then(|originals| originals.get(name))
            .cloned()
            .or_else(|| doc.attribute(element, name).map(str::to_string))
    }

    /// テキストの原文が記録済みか
    #[must_use]
    pub fn has_text_original(&self, node: NodeId) -> bool {
        self.text.contains_key(&node)
    }

    /// 属性の原文が記録済みか
    #[must_use]
    pub fn has_attribute_original(&self, element: NodeId, name: &str) -> bool {
        self.attributes.get(&element).is_some_and(|originals| originals.contains_key(name))
    }

    /// Drops every entry for `root` and its descendants.
    ///
    /// Only for subtrees that will never be reinserted; returns the number
    /// of nodes that had entries.
    pub fn forget_subtree(&mut self, doc: &Document, root: NodeId) -> usize {
        doc.descendants(root)
            .into_iter()
            .filter(|node| {
                let had_text = self.text.remove(node).is_some();
                let had_attributes = self.attributes.remove(node).is_some();
                had_text || had_attributes
            })
            .count()
    }

    /// Number of tracked nodes (text nodes plus elements).
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len() + self.attributes.len()
    }

    /// 記録が一つも無いか
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.attributes.is_empty()
    }
}
