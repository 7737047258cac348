//! 翻訳パス
//!
//! サブツリー内のテキスト・属性・`option` ラベルを辞書で置き換える。
//!
//! Every write derives from the [`Ledger`] original, never from the live
//! value, and happens only when the result differs from what is already in
//! the document. Running a pass twice with the same dictionary therefore
//! writes nothing the second time.

use crate::dictionary::Dictionary;
use crate::dom::{
    Document,
    NodeId,
};
use crate::ledger::Ledger;
use crate::substitute::substitute;

/// 表示テキストを持つ属性
pub(crate) const TRANSLATABLE_ATTRIBUTES: [&str; 5] = ["placeholder", "title", "aria-label", "alt", "value"];

/// 中身がページ本文ではない要素
const NON_CONTENT_CONTAINERS: [&str; 3] = ["script", "style", "noscript"];

/// `root` 配下のテキスト・追跡属性・`option` ラベルを翻訳
///
/// Returns the number of DOM writes performed.
pub fn translate_subtree(
    doc: &mut Document,
    ledger: &mut Ledger,
    root: NodeId,
    dictionary: &Dictionary,
) -> usize {
    let nodes = doc.descendants(root);
    let mut writes = 0;

    for node in &nodes {
        if doc.text(*node).is_some() && translate_text_node(doc, ledger, *node, dictionary) {
            writes += 1;
        }
    }

    for element in &nodes {
        if !has_translatable_attribute(doc, *element) {
            continue;
        }
        ledger.record_attribute_originals(doc, *element, &TRANSLATABLE_ATTRIBUTES);
        for name in TRANSLATABLE_ATTRIBUTES {
            if translate_attribute(doc, ledger, *element, name, dictionary) {
                writes += 1;
            }
        }
    }

    // Option labels get their own pass; a no-op when the text pass already
    // reached them.
    let options: Vec<NodeId> =
        nodes.iter().copied().filter(|node| doc.tag_name(*node) == Some("option")).collect();
    for option in options {
        if let Some(label) = doc.first_child(option)
            && doc.text(label).is_some()
            && translate_text_node(doc, ledger, label, dictionary)
        {
            writes += 1;
        }
    }

    tracing::trace!(root = %root, writes, "Translated subtree");
    writes
}

/// テキストノード一つを原文から翻訳
///
/// Blank nodes and nodes inside `script`/`style`/`noscript` are skipped.
/// Returns whether the node was rewritten.
pub fn translate_text_node(
    doc: &mut Document,
    ledger: &mut Ledger,
    node: NodeId,
    dictionary: &Dictionary,
) -> bool {
    if !is_translatable_text(doc, node) {
        return false;
    }
    ledger.record_text_original(doc, node);
    let Some(original) = ledger.text_original(doc, node) else {
        return false;
    };

    let translated = substitute(&original, dictionary);
    if doc.text(node) == Some(translated.as_str()) {
        return false;
    }
    match doc.set_text(node, &translated) {
        Ok(()) => true,
        Err(error) => {
            tracing::debug!(%error, "Failed to write translated text");
            false
        }
    }
}

/// 属性一つを原文から翻訳
///
/// Returns whether the attribute was rewritten. The original must already
/// be recorded; otherwise the live value is used as the source.
pub fn translate_attribute(
    doc: &mut Document,
    ledger: &Ledger,
    element: NodeId,
    name: &str,
    dictionary: &Dictionary,
) -> bool {
    if doc.attribute(element, name).is_none() {
        return false;
    }
    let Some(original) = ledger.attribute_original(doc, element, name) else {
        return false;
    };

    let translated = substitute(&original, dictionary);
    if doc.attribute(element, name) == Some(translated.as_str()) {
        return false;
    }
    match doc.set_attribute(element, name, &translated) {
        Ok(()) => true,
        Err(error) => {
            tracing::debug!(%error, "Failed to write translated attribute");
            false
        }
    }
}

/// `root` 配下の原文を記録する（DOM は変更しない）
pub fn record_subtree(doc: &Document, ledger: &mut Ledger, root: NodeId) {
    for node in doc.descendants(root) {
        if doc.text(node).is_some() {
            if is_translatable_text(doc, node) {
                ledger.record_text_original(doc, node);
            }
        } else if has_translatable_attribute(doc, node) {
            ledger.record_attribute_originals(doc, node, &TRANSLATABLE_ATTRIBUTES);
        }
    }
}

/// `placeholder`, `title`, `aria-label`, `alt`, `value` のいずれか
#[must_use]
pub fn is_translatable_attribute(name: &str) -> bool {
    TRANSLATABLE_ATTRIBUTES.contains(&name)
}

/// 追跡属性を一つでも持つ要素か
fn has_translatable_attribute(doc: &Document, element: NodeId) -> bool {
    doc.element(element)
        .is_some_and(|data| TRANSLATABLE_ATTRIBUTES.iter().any(|name| data.attribute(name).is_some()))
}

/// 空白のみでなく、`script` 等の外にあるテキスト
fn is_translatable_text(doc: &Document, node: NodeId) -> bool {
    let Some(text) = doc.text(node) else {
        return false;
    };
    if text.trim().is_empty() {
        return false;
    }
    !doc
        .parent_element(node)
        .and_then(|parent| doc.tag_name(parent))
        .is_some_and(|tag| NON_CONTENT_CONTAINERS.contains(&tag))
}
