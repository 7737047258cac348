//! アリーナ上のドキュメントツリーと変更記録

use super::mutation::Observation;
use super::node::Node;
use super::{
    DomError,
    ElementData,
    MutationObserverInit,
    MutationRecord,
    NodeId,
    NodeKind,
};

/// A document tree.
///
/// Nodes live in an arena and are addressed by [`NodeId`]. Removing a node
/// only detaches it; the id stays valid so it can be inserted again.
///
/// Structural and attribute changes below an observed root are queued as
/// [`MutationRecord`]s in the order they happen and handed out by
/// [`Document::take_records`].
#[derive(Debug, Clone)]
pub struct Document {
    /// ノードのアリーナ（`NodeId` が添字）
    nodes: Vec<Node>,
    /// ドキュメントルート
    root: NodeId,
    /// `<!DOCTYPE ...>` の中身
    doctype: Option<String>,
    /// 監視中のルート
    observations: Vec<Observation>,
    /// 未取得の変更レコード
    pending: Vec<MutationRecord>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// 空のドキュメントを作成
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Document)],
            root: NodeId(0),
            doctype: None,
            observations: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// ドキュメントルート
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// DOCTYPE 宣言
    #[must_use]
    pub fn doctype(&self) -> Option<&str> {
        self.doctype.as_deref()
    }

    /// DOCTYPE 宣言を設定
    pub fn set_doctype(&mut self, doctype: Option<String>) {
        self.doctype = doctype;
    }

    /// ノードを参照
    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// ノードを可変参照
    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, DomError> {
        self.nodes.get_mut(id.0).ok_or(DomError::UnknownNode(id))
    }

    /// ノードの種類
    #[must_use]
    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.node(id).map(|node| &node.kind)
    }

    /// 要素データ（要素以外は `None`）
    #[must_use]
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match self.kind(id)? {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    /// タグ名
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|element| element.tag_name.as_str())
    }

    /// Content of a text node; `None` for every other kind.
    #[must_use]
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.kind(id)? {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    /// 属性値
    #[must_use]
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attribute(name)
    }

    /// 親ノード
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    /// 子ノード（未知の id なら空）
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|node| node.children.as_slice()).unwrap_or_default()
    }

    /// 最初の子ノード
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    /// アリーナにノードを追加
    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(kind));
        id
    }

    /// Creates a detached element.
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.push(NodeKind::Element(ElementData::new(tag_name)))
    }

    /// Creates a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.to_string()))
    }

    /// Creates a detached comment.
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Comment(text.to_string()))
    }

    /// Appends `child` as the last child of `parent`, detaching it from its
    /// current parent first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.insert_before(parent, child, None)
    }

    /// Inserts `child` before `reference` (or at the end when `None`).
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), DomError> {
        let parent_node = self.node(parent).ok_or(DomError::UnknownNode(parent))?;
        if !matches!(parent_node.kind, NodeKind::Document | NodeKind::Element(_)) {
            return Err(DomError::NotAContainer(parent));
        }
        if self.node(child).is_none() {
            return Err(DomError::UnknownNode(child));
        }
        if child == self.root || self.contains(child, parent) {
            return Err(DomError::HierarchyCycle { parent, child });
        }
        if let Some(reference) = reference
            && self.parent(reference) != Some(parent)
        {
            return Err(DomError::NotAChild { parent, child: reference });
        }

        if let Some(old_parent) = self.parent(child) {
            self.remove_child(old_parent, child)?;
        }

        let node = self.node_mut(parent)?;
        let position = reference
            .and_then(|reference| node.children.iter().position(|id| *id == reference))
            .unwrap_or(node.children.len());
        node.children.insert(position, child);
        self.node_mut(child)?.parent = Some(parent);

        self.queue_child_list(parent, vec![child], Vec::new());
        Ok(())
    }

    /// Detaches `child` from `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if self.parent(child) != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        let node = self.node_mut(parent)?;
        node.children.retain(|id| *id != child);
        self.node_mut(child)?.parent = None;

        self.queue_child_list(parent, Vec::new(), vec![child]);
        Ok(())
    }

    /// Detaches `id` from wherever it is. A no-op for detached nodes.
    pub fn remove(&mut self, id: NodeId) -> Result<(), DomError> {
        match self.parent(id) {
            Some(parent) => self.remove_child(parent, id),
            None if self.node(id).is_some() => Ok(()),
            None => Err(DomError::UnknownNode(id)),
        }
    }

    /// Replaces the content of a text node.
    ///
    /// Character data changes are not observed.
    pub fn set_text(&mut self, id: NodeId, value: &str) -> Result<(), DomError> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Text(text) => {
                value.clone_into(text);
                Ok(())
            }
            _ => Err(DomError::NotText(id)),
        }
    }

    /// 属性を設定（監視中なら変更を記録）
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let name = name.to_ascii_lowercase();
        match &mut self.node_mut(id)?.kind {
            NodeKind::Element(element) => {
                element.set_attribute(&name, value);
            }
            _ => return Err(DomError::NotAnElement(id)),
        }
        self.queue_attribute(id, name);
        Ok(())
    }

    /// 属性を削除し、元の値を返す
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<Option<String>, DomError> {
        let name = name.to_ascii_lowercase();
        let previous = match &mut self.node_mut(id)?.kind {
            NodeKind::Element(element) => element.remove_attribute(&name),
            _ => return Err(DomError::NotAnElement(id)),
        };
        if previous.is_some() {
            self.queue_attribute(id, name);
        }
        Ok(previous)
    }

    /// Whether `node` is `ancestor` or lies below it.
    #[must_use]
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Whether `id` is attached to the document root.
    #[must_use]
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.contains(self.root, id)
    }

    /// The closest element strictly above `id`.
    #[must_use]
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.parent(id);
        while let Some(candidate) = current {
            if self.element(candidate).is_some() {
                return Some(candidate);
            }
            current = self.parent(candidate);
        }
        None
    }

    /// `root` and all of its descendants in document order.
    #[must_use]
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if self.node(root).is_none() {
            return out;
        }
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// Concatenated text below `id`.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id).into_iter().filter_map(|node| self.text(node)).collect()
    }

    /// The `body` element, if the document has one.
    #[must_use]
    pub fn body(&self) -> Option<NodeId> {
        self.query_selector("body")
    }

    /// First element in document order matching `selector`.
    ///
    /// Supports `#id`, `.class` and bare tag names.
    #[must_use]
    pub fn query_selector(&self, selector: &str) -> Option<NodeId> {
        self.query_selector_from(self.root, selector)
    }

    /// `root` 配下で `selector` に一致する最初の要素
    #[must_use]
    pub fn query_selector_from(&self, root: NodeId, selector: &str) -> Option<NodeId> {
        let selector = Selector::parse(selector)?;
        self.descendants(root)
            .into_iter()
            .find(|id| self.element(*id).is_some_and(|element| selector.matches(element)))
    }

    /// Every element below `root` (inclusive) matching `selector`.
    #[must_use]
    pub fn query_selector_all(&self, root: NodeId, selector: &str) -> Vec<NodeId> {
        let Some(selector) = Selector::parse(selector) else {
            return Vec::new();
        };
        self.descendants(root)
            .into_iter()
            .filter(|id| self.element(*id).is_some_and(|element| selector.matches(element)))
            .collect()
    }

    /// 監視を開始する
    ///
    /// 同じルートを再登録した場合はオプションを置き換える。
    pub fn observe(&mut self, root: NodeId, options: MutationObserverInit) {
        if let Some(existing) = self.observations.iter_mut().find(|obs| obs.root == root) {
            existing.options = options;
            return;
        }
        self.observations.push(Observation { root, options });
    }

    /// Stops every observation and drops queued records.
    pub fn disconnect(&mut self) {
        self.observations.clear();
        self.pending.clear();
    }

    /// Drains queued records in the order they were produced.
    pub fn take_records(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.pending)
    }

    /// 未取得の変更レコードがあるか
    #[must_use]
    pub fn has_pending_records(&self) -> bool {
        !self.pending.is_empty()
    }

    /// `target` の変更が監視対象か
    fn is_observed(&self, target: NodeId, wants: impl Fn(&MutationObserverInit) -> bool) -> bool {
        self.observations.iter().any(|obs| {
            wants(&obs.options)
                && (obs.root == target || (obs.options.subtree && self.contains(obs.root, target)))
        })
    }

    /// 子ノードの変更を記録
    fn queue_child_list(&mut self, target: NodeId, added: Vec<NodeId>, removed: Vec<NodeId>) {
        if self.is_observed(target, |options| options.child_list) {
            self.pending.push(MutationRecord::ChildList { target, added, removed });
        }
    }

    /// 属性の変更を記録
    fn queue_attribute(&mut self, target: NodeId, name: String) {
        if self.is_observed(target, |options| options.attributes) {
            self.pending.push(MutationRecord::Attributes { target, name });
        }
    }
}

/// The selector subset the switcher needs for its mount point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selector<'a> {
    /// `#id`
    Id(&'a str),
    /// `.class`
    Class(&'a str),
    /// タグ名
    Tag(&'a str),
}

impl<'a> Selector<'a> {
    /// 対応外の書式なら `None`
    fn parse(selector: &'a str) -> Option<Self> {
        let selector = selector.trim();
        let parsed = if let Some(id) = selector.strip_prefix('#') {
            Self::Id(id)
        } else if let Some(class) = selector.strip_prefix('.') {
            Self::Class(class)
        } else {
            Self::Tag(selector)
        };
        let name = match parsed {
            Self::Id(name) | Self::Class(name) | Self::Tag(name) => name,
        };
        let valid = !name.is_empty()
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        valid.then_some(parsed)
    }

    /// 要素が一致するか
    fn matches(self, element: &ElementData) -> bool {
        match self {
            Self::Id(id) => element.attribute("id") == Some(id),
            Self::Class(class) => element.classes().any(|token| token == class),
            Self::Tag(tag) => element.tag_name.eq_ignore_ascii_case(tag),
        }
    }
}
