//! マウントポイントに描画するコントロール

use super::language::language_label;
use crate::dom::{
    Document,
    DomError,
    NodeId,
};
use crate::ledger::Ledger;

/// Source label of the apply button; translated like page content.
const APPLY_LABEL: &str = "Apply";
/// Text of the rotate button.
const ROTATE_LABEL: &str = "⇄";
/// Tooltip of the rotate button.
const ROTATE_TITLE: &str = "Next language";
/// Accessible name of the picker.
const PICKER_LABEL: &str = "Language";

/// Handles to the rendered controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    /// Element matched by the configured selector.
    pub mount: NodeId,
    /// `select` with one `option` per offered code.
    pub picker: NodeId,
    /// 選択中の言語を適用するボタン
    pub apply: NodeId,
    /// 次の言語へ切り替えるボタン
    pub rotate: NodeId,
}

impl Controls {
    /// Builds the picker and both buttons and appends them to `mount`.
    ///
    /// # Errors
    /// Returns [`DomError`] when `mount` cannot hold children.
    pub fn render(
        doc: &mut Document,
        mount: NodeId,
        allowed: &[String],
        current: &str,
    ) -> Result<Self, DomError> {
        let picker = doc.create_element("select");
        doc.set_attribute(picker, "class", "page-lingo-picker")?;
        doc.set_attribute(picker, "aria-label", PICKER_LABEL)?;
        for code in allowed {
            let option = doc.create_element("option");
            doc.set_attribute(option, "value", code)?;
            if code == current {
                doc.set_attribute(option, "selected", "")?;
            }
            let label = doc.create_text(&language_label(code));
            doc.append_child(option, label)?;
            doc.append_child(picker, option)?;
        }

        let apply = button(doc, "page-lingo-apply", APPLY_LABEL)?;
        let rotate = button(doc, "page-lingo-rotate", ROTATE_LABEL)?;
        doc.set_attribute(rotate, "title", ROTATE_TITLE)?;

        doc.append_child(mount, picker)?;
        doc.append_child(mount, apply)?;
        doc.append_child(mount, rotate)?;

        Ok(Self { mount, picker, apply, rotate })
    }

    /// `option` elements of the picker.
    #[must_use]
    pub fn options(&self, doc: &Document) -> Vec<NodeId> {
        doc.children(self.picker)
            .iter()
            .copied()
            .filter(|child| doc.tag_name(*child) == Some("option"))
            .collect()
    }

    /// Code of the selected option, or of the first option when none is
    /// marked.
    ///
    /// Option values are tracked attributes, so the code is read from the
    /// recorded original rather than the possibly translated live value.
    #[must_use]
    pub fn selected_code(&self, doc: &Document, ledger: &Ledger) -> Option<String> {
        let options = self.options(doc);
        let selected = options
            .iter()
            .copied()
            .find(|option| doc.attribute(*option, "selected").is_some())
            .or_else(|| options.first().copied())?;
        ledger.attribute_original(doc, selected, "value")
    }

    /// Marks `option` as the only selected option. Returns `false` when it is
    /// not one of the picker's options.
    pub fn select_option(&self, doc: &mut Document, option: NodeId) -> bool {
        let options = self.options(doc);
        if !options.contains(&option) {
            return false;
        }
        for candidate in options {
            mark_selected(doc, candidate, candidate == option);
        }
        true
    }

    /// Marks the option whose code is `code` as selected and clears the rest.
    pub fn sync_picker(&self, doc: &mut Document, ledger: &Ledger, code: &str) {
        for option in self.options(doc) {
            let matches = ledger.attribute_original(doc, option, "value").as_deref() == Some(code);
            mark_selected(doc, option, matches);
        }
    }

    /// Whether `node` is the apply button or inside it.
    #[must_use]
    pub fn is_apply(&self, doc: &Document, node: NodeId) -> bool {
        doc.contains(self.apply, node)
    }

    /// Whether `node` is the rotate button or inside it.
    #[must_use]
    pub fn is_rotate(&self, doc: &Document, node: NodeId) -> bool {
        doc.contains(self.rotate, node)
    }

    /// Text node holding the apply button's label.
    #[must_use]
    pub fn apply_label(&self, doc: &Document) -> Option<NodeId> {
        doc.first_child(self.apply).filter(|child| doc.text(*child).is_some())
    }
}

/// `type=button` のボタンを作成
fn button(doc: &mut Document, class: &str, label: &str) -> Result<NodeId, DomError> {
    let button = doc.create_element("button");
    doc.set_attribute(button, "type", "button")?;
    doc.set_attribute(button, "class", class)?;
    let text = doc.create_text(label);
    doc.append_child(button, text)?;
    Ok(button)
}

/// `selected` 属性を付け外しする（変化がある場合のみ書き込む）
fn mark_selected(doc: &mut Document, option: NodeId, selected: bool) {
    let result = match (selected, doc.attribute(option, "selected").is_some()) {
        (true, false) => doc.set_attribute(option, "selected", ""),
        (false, true) => doc.remove_attribute(option, "selected").map(|_| ()),
        _ => Ok(()),
    };
    if let Err(error) = result {
        tracing::debug!(%error, "Failed to update picker selection");
    }
}
