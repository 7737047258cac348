//! ノードの識別子と中身

/// Stable identity of a node inside one [`Document`](super::Document).
///
/// Ids are never reused, so a detached node keeps its id and can be
/// reinserted later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Raw arena index, mostly useful for diagnostics.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a node holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The document root.
    Document,
    /// An element with its tag and attributes.
    Element(ElementData),
    /// A text node.
    Text(String),
    /// A comment. Kept so serialization round-trips, never translated.
    Comment(String),
}

/// Tag name and attributes of an element.
///
/// Attributes keep insertion order; names are stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// 小文字のタグ名
    pub tag_name: String,
    /// (属性名, 値) の挿入順リスト
    pub attributes: Vec<(String, String)>,
}

impl ElementData {
    /// 属性の無い要素
    #[must_use]
    pub fn new(tag_name: &str) -> Self {
        Self { tag_name: tag_name.to_ascii_lowercase(), attributes: Vec::new() }
    }

    /// 属性値
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
    }

    /// Sets `name`, returning the previous value.
    pub(crate) fn set_attribute(&mut self, name: &str, value: &str) -> Option<String> {
        if let Some((_, existing)) = self.attributes.iter_mut().find(|(key, _)| key == name) {
            return Some(std::mem::replace(existing, value.to_string()));
        }
        self.attributes.push((name.to_string(), value.to_string()));
        None
    }

    /// 属性を削除し、元の値を返す
    pub(crate) fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let position = self.attributes.iter().position(|(key, _)| key == name)?;
        Some(self.attributes.remove(position).1)
    }

    /// Whitespace-separated `class` tokens.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attribute("class").unwrap_or_default().split_ascii_whitespace()
    }
}

/// Arena slot.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    /// 親（取り外し中は `None`）
    pub(crate) parent: Option<NodeId>,
    /// 子ノード（文書順）
    pub(crate) children: Vec<NodeId>,
    /// 中身
    pub(crate) kind: NodeKind,
}

impl Node {
    /// 親も子も無いノード
    pub(crate) const fn new(kind: NodeKind) -> Self {
        Self { parent: None, children: Vec::new(), kind }
    }
}
