//! 言語切り替えコントローラー

use super::language::{
    next_language,
    resolve_allowed,
    resolve_initial,
};
use super::widget::Controls;
use crate::config::SwitcherSettings;
use crate::dictionary::DictionaryStore;
use crate::dom::{
    Document,
    NodeId,
};
use crate::ledger::Ledger;
use crate::storage::LanguageStorage;
use crate::walker;
use crate::watcher::MutationWatcher;

/// User interaction delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    /// A click on `node` (or on something inside it).
    Click(NodeId),
    /// The user picked `option` in the language picker.
    Select(NodeId),
}

/// Owns the current language and keeps a document rendered in it.
///
/// One instance per document; all state lives here.
#[derive(Debug)]
pub struct Switcher<S> {
    /// 利用可能な辞書
    dictionaries: DictionaryStore,
    /// 選択言語の保存先
    storage: S,
    /// 設定
    settings: SwitcherSettings,
    /// 切り替え可能な言語コード
    allowed: Vec<String>,
    /// 現在の言語
    current: String,
    /// 原文レジャー
    ledger: Ledger,
    /// コンテンツルートの変更監視
    watcher: MutationWatcher,
    /// 描画済みのコントロール（マウントポイントが無ければ `None`）
    controls: Option<Controls>,
}

impl<S: LanguageStorage> Switcher<S> {
    /// 初期化
    ///
    /// 1. 現在の言語を決定（保存値 → `defaultLang` → 先頭の許可言語）
    /// 2. マウントポイントにコントロールを描画（無ければ警告のみ）
    /// 3. コンテンツルート全体の原文を記録
    /// 4. 現在の言語で全体を翻訳
    /// 5. 変更の監視を開始
    pub fn init(
        doc: &mut Document,
        dictionaries: DictionaryStore,
        storage: S,
        settings: SwitcherSettings,
    ) -> Self {
        let allowed = resolve_allowed(&dictionaries, settings.available.as_deref());
        let stored = match storage.get(&settings.storage_key) {
            Ok(stored) => stored,
            Err(error) => {
                tracing::warn!(%error, "Failed to read persisted language, using default");
                None
            }
        };
        let current = resolve_initial(stored.as_deref(), &settings.default_lang, &allowed);
        tracing::debug!(current = %current, allowed = ?allowed, "Resolved initial language");

        let controls = Self::render_controls(doc, &settings.selector, &allowed, &current);
        let content_root = doc.body().unwrap_or_else(|| doc.root());

        let mut switcher = Self {
            dictionaries,
            storage,
            settings,
            allowed,
            current,
            ledger: Ledger::new(),
            watcher: MutationWatcher::new(content_root),
            controls,
        };

        walker::record_subtree(doc, &mut switcher.ledger, content_root);
        switcher.render(doc);
        switcher.watcher.observe(doc);
        switcher
    }

    /// マウントポイントを探してコントロールを描画
    fn render_controls(
        doc: &mut Document,
        selector: &str,
        allowed: &[String],
        current: &str,
    ) -> Option<Controls> {
        let Some(mount) = doc.query_selector(selector) else {
            tracing::warn!(selector, "Mount point not found, rendering no controls");
            return None;
        };
        match Controls::render(doc, mount, allowed, current) {
            Ok(controls) => Some(controls),
            Err(error) => {
                tracing::warn!(%error, selector, "Failed to render controls");
                None
            }
        }
    }

    /// Routes a UI event. Returns whether the current language changed.
    pub fn handle_event(&mut self, doc: &mut Document, event: UiEvent) -> bool {
        let Some(controls) = self.controls else {
            return false;
        };
        match event {
            UiEvent::Click(node) if controls.is_apply(doc, node) => self.apply(doc),
            UiEvent::Click(node) if controls.is_rotate(doc, node) => self.rotate(doc),
            UiEvent::Click(_) => false,
            UiEvent::Select(option) => {
                if !controls.select_option(doc, option) {
                    tracing::debug!(option = %option, "Ignoring selection outside the picker");
                }
                false
            }
        }
    }

    /// Switches to the language selected in the picker.
    pub fn apply(&mut self, doc: &mut Document) -> bool {
        let Some(code) = self.controls.and_then(|controls| controls.selected_code(doc, &self.ledger))
        else {
            tracing::debug!("No picker selection to apply");
            return false;
        };
        self.switch_to(doc, &code)
    }

    /// Switches to the next offered language, wrapping around.
    pub fn rotate(&mut self, doc: &mut Document) -> bool {
        let Some(next) = next_language(&self.allowed, &self.current).map(str::to_string) else {
            tracing::warn!("No languages to rotate through");
            return false;
        };
        self.switch_to(doc, &next)
    }

    /// Makes `code` current: persist, re-translate, sync the controls.
    ///
    /// Codes without a dictionary or not offered are rejected with a warning
    /// and leave every piece of state untouched.
    pub fn switch_to(&mut self, doc: &mut Document, code: &str) -> bool {
        if !self.dictionaries.contains(code) {
            tracing::warn!(code, "No dictionary for language");
            return false;
        }
        if !self.allowed.iter().any(|allowed| allowed == code) {
            tracing::warn!(code, "Language is not offered");
            return false;
        }

        // Originals of anything that arrived since the last flush must be
        // captured before the page is rewritten.
        self.flush_mutations(doc);

        self.current = code.to_string();
        if let Err(error) = self.storage.set(&self.settings.storage_key, code) {
            tracing::error!(%error, code, "Failed to persist language");
        }
        self.render(doc);
        self.flush_mutations(doc);
        tracing::info!(code, "Switched language");
        true
    }

    /// Drains pending mutation records and brings the new content into the
    /// current language. Returns the number of DOM writes.
    pub fn flush_mutations(&mut self, doc: &mut Document) -> usize {
        let records = doc.take_records();
        if records.is_empty() {
            return 0;
        }
        let dictionary = self.dictionaries.get(&self.current);
        self.watcher.handle(doc, &mut self.ledger, &records, dictionary)
    }

    /// Drops the ledger entries of a subtree the host has discarded for good.
    ///
    /// Detached nodes keep their originals so that re-inserting them later
    /// still restores the source text; this is the explicit release for
    /// subtrees that will never come back. A node still in the document is
    /// left alone. Returns the number of nodes forgotten.
    pub fn release(&mut self, doc: &Document, node: NodeId) -> usize {
        if doc.is_connected(node) {
            tracing::debug!(node = %node, "Refusing to release a connected node");
            return 0;
        }
        let forgotten = self.ledger.forget_subtree(doc, node);
        tracing::trace!(node = %node, forgotten, "Released detached subtree");
        forgotten
    }

    /// Full pass over the content root plus control refresh.
    fn render(&mut self, doc: &mut Document) {
        if let Some(controls) = self.controls {
            controls.sync_picker(doc, &self.ledger, &self.current);
        }

        let Some(dictionary) = self.dictionaries.get(&self.current) else {
            tracing::warn!(code = %self.current, "No dictionary for language, leaving the page as is");
            return;
        };
        let writes = walker::translate_subtree(doc, &mut self.ledger, self.watcher.root(), dictionary);

        // The mount point may sit outside the content root.
        if let Some(label) = self.controls.and_then(|controls| controls.apply_label(doc)) {
            walker::translate_text_node(doc, &mut self.ledger, label, dictionary);
        }
        tracing::debug!(code = %self.current, writes, "Rendered document");
    }

    /// 現在の言語
    #[must_use]
    pub fn current(&self) -> &str {
        &self.current
    }

    /// 切り替え可能な言語コード
    #[must_use]
    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    /// 描画済みのコントロール
    #[must_use]
    pub const fn controls(&self) -> Option<Controls> {
        self.controls
    }

    /// 原文レジャー
    #[must_use]
    pub const fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Element whose subtree is translated and observed.
    #[must_use]
    pub const fn content_root(&self) -> NodeId {
        self.watcher.root()
    }

    /// 選択言語の保存先
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// 設定
    #[must_use]
    pub const fn settings(&self) -> &SwitcherSettings {
        &self.settings
    }
}
