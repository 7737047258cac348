//! 変更監視
//!
//! 初回パスの後に追加されたコンテンツを現在の言語へ収束させる。
//! 追加されたテキストと要素サブツリーは原文を記録してから翻訳し、
//! 追跡対象の属性が変わった場合は原文から訳文を導出し直す。
//!
//! Removed nodes keep their ledger entries. A detached `NodeId` stays valid
//! and may come back, so only [`Switcher::release`](crate::Switcher::release)
//! drops them.

use crate::dictionary::Dictionary;
use crate::dom::{
    Document,
    MutationObserverInit,
    MutationRecord,
    NodeId,
};
use crate::ledger::Ledger;
use crate::walker;

/// 一つのコンテンツルート配下の変更バッチを処理する
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationWatcher {
    /// 監視対象のルート
    root: NodeId,
}

impl MutationWatcher {
    /// `root` 配下を担当する監視を作成
    #[must_use]
    pub const fn new(root: NodeId) -> Self {
        Self { root }
    }

    /// 監視対象のルート
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Starts observation of child-list and attribute changes in the whole
    /// subtree. Old values are not needed.
    pub fn observe(&self, doc: &mut Document) {
        doc.observe(self.root, MutationObserverInit::subtree_changes());
    }

    /// Processes one batch in delivery order.
    ///
    /// Without a dictionary originals are still recorded but nothing is
    /// rewritten. Returns the number of DOM writes performed.
    pub fn handle(
        &self,
        doc: &mut Document,
        ledger: &mut Ledger,
        records: &[MutationRecord],
        dictionary: Option<&Dictionary>,
    ) -> usize {
        let mut writes = 0;
        for record in records {
            if !doc.contains(self.root, record.target()) {
                tracing::trace!(target = %record.target(), "Ignoring mutation outside the content root");
                continue;
            }
            writes += match record {
                MutationRecord::ChildList { added, .. } => {
                    added.iter().map(|node| Self::handle_added(doc, ledger, *node, dictionary)).sum()
                }
                MutationRecord::Attributes { target, name } => {
                    Self::handle_attribute(doc, ledger, *target, name, dictionary)
                }
            };
        }
        writes
    }

    /// 追加されたノードの原文を記録して翻訳
    fn handle_added(
        doc: &mut Document,
        ledger: &mut Ledger,
        node: NodeId,
        dictionary: Option<&Dictionary>,
    ) -> usize {
        // Comments carry nothing to translate. A text node is a subtree of
        // its own, so both remaining kinds take the same path.
        if doc.text(node).is_none() && doc.element(node).is_none() {
            return 0;
        }
        walker::record_subtree(doc, ledger, node);
        dictionary.map_or(0, |dictionary| walker::translate_subtree(doc, ledger, node, dictionary))
    }

    /// 追跡対象の属性変更を原文から訳し直す
    fn handle_attribute(
        doc: &mut Document,
        ledger: &mut Ledger,
        element: NodeId,
        name: &str,
        dictionary: Option<&Dictionary>,
    ) -> usize {
        if !walker::is_translatable_attribute(name) {
            return 0;
        }
        ledger.record_attribute_original(doc, element, name);
        dictionary.map_or(0, |dictionary| {
            usize::from(walker::translate_attribute(doc, ledger, element, name, dictionary))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;
    use crate::dictionary::DictionaryStore;
    use crate::dom::html;

    /// 監視済みのドキュメント一式
    struct Fixture {
        /// ドキュメント
        doc: Document,
        /// 原文レジャー
        ledger: Ledger,
        /// `body` を監視する watcher
        watcher: MutationWatcher,
        /// 組み込みのヒンディー語辞書
        hindi: Dictionary,
    }

    impl Fixture {
        /// `markup` を解析し、原文を記録して監視を開始
        fn new(markup: &str) -> Self {
            let mut doc = html::parse(markup).unwrap();
            let body = doc.body().unwrap();
            let mut ledger = Ledger::new();
            walker::record_subtree(&doc, &mut ledger, body);
            let watcher = MutationWatcher::new(body);
            watcher.observe(&mut doc);
            let hindi = DictionaryStore::builtin().get("hi").cloned().unwrap();
            Self { doc, ledger, watcher, hindi }
        }

        /// 溜まった変更を処理
        fn flush(&mut self, dictionary: Option<&Dictionary>) -> usize {
            let records = self.doc.take_records();
            self.watcher.handle(&mut self.doc, &mut self.ledger, &records, dictionary)
        }
    }

    /// 追加されたサブツリーを翻訳する
    #[rstest]
    fn inserted_subtree_is_translated() {
        let mut fx = Fixture::new("<body><main></main></body>");
        let main = fx.doc.query_selector("main").unwrap();

        html::append_fragment(
            &mut fx.doc,
            main,
            r#"<form><h2>Report an Issue</h2><input placeholder="Your Name"></form>"#,
        )
        .unwrap();
        let hindi = fx.hindi.clone();
        let writes = fx.flush(Some(&hindi));

        let input = fx.doc.query_selector("input").unwrap();
        let h2 = fx.doc.query_selector("h2").unwrap();
        assert_that!(writes, eq(2));
        assert_that!(fx.doc.text_content(h2), eq("समस्या दर्ज करें"));
        assert_that!(fx.doc.attribute(input, "placeholder"), some(eq("आपका नाम")));
        assert_that!(fx.ledger.text_original(&fx.doc, fx.doc.first_child(h2).unwrap()), some(eq("Report an Issue")));
    }

    /// 追加されたテキストノードを翻訳する
    #[rstest]
    fn inserted_text_node_is_translated() {
        let mut fx = Fixture::new("<body><p></p></body>");
        let p = fx.doc.query_selector("p").unwrap();
        let text = fx.doc.create_text("Thank you");

        fx.doc.append_child(p, text).unwrap();
        let hindi = fx.hindi.clone();
        fx.flush(Some(&hindi));

        assert_that!(fx.doc.text(text), some(eq("धन्यवाद")));
        assert_that!(fx.ledger.text_original(&fx.doc, text), some(eq("Thank you")));
    }

    /// `script` 内に追加されたテキストは対象外
    #[rstest]
    fn text_inserted_into_script_is_left_alone() {
        let mut fx = Fixture::new("<body><script></script></body>");
        let script = fx.doc.query_selector("script").unwrap();
        let text = fx.doc.create_text("Home");

        fx.doc.append_child(script, text).unwrap();
        let hindi = fx.hindi.clone();
        let writes = fx.flush(Some(&hindi));

        assert_that!(writes, eq(0));
        assert_that!(fx.doc.text(text), some(eq("Home")));
        assert_that!(fx.ledger.has_text_original(text), eq(false));
    }

    /// 外部からの属性変更は原文から訳し直す
    #[rstest]
    fn external_attribute_change_is_retranslated_from_original() {
        let mut fx = Fixture::new(r#"<body><input placeholder="Your Name"></body>"#);
        let input = fx.doc.query_selector("input").unwrap();
        let hindi = fx.hindi.clone();
        let body = fx.doc.body().unwrap();
        walker::translate_subtree(&mut fx.doc, &mut fx.ledger, body, &hindi);
        fx.doc.take_records();

        fx.doc.set_attribute(input, "placeholder", "Your Email").unwrap();
        fx.flush(Some(&hindi));

        // The first-seen original stays authoritative.
        assert_that!(fx.doc.attribute(input, "placeholder"), some(eq("आपका नाम")));
    }

    /// 後から追加された属性も記録・翻訳する
    #[rstest]
    fn attribute_added_later_gets_recorded_and_translated() {
        let mut fx = Fixture::new("<body><button>Close</button></body>");
        let button = fx.doc.query_selector("button").unwrap();

        fx.doc.set_attribute(button, "title", "Close").unwrap();
        let hindi = fx.hindi.clone();
        fx.flush(Some(&hindi));

        assert_that!(fx.doc.attribute(button, "title"), some(eq("बंद करें")));
        assert_that!(fx.ledger.attribute_original(&fx.doc, button, "title"), some(eq("Close")));
    }

    /// 自身の書き込みは次の処理で収束する
    #[rstest]
    fn own_writes_settle_on_the_next_flush() {
        let mut fx = Fixture::new("<body><main></main></body>");
        let main = fx.doc.query_selector("main").unwrap();
        html::append_fragment(&mut fx.doc, main, r#"<img alt="Camera">"#).unwrap();
        let hindi = fx.hindi.clone();

        let first = fx.flush(Some(&hindi));
        // The alt write above queued an attribute record of its own.
        let second = fx.flush(Some(&hindi));

        assert_that!(first, eq(1));
        assert_that!(second, eq(0));
        assert_that!(fx.doc.has_pending_records(), eq(false));
    }

    /// 追跡対象外の属性は無視する
    #[rstest]
    fn untracked_attributes_are_ignored() {
        let mut fx = Fixture::new("<body><div>Home</div></body>");
        let div = fx.doc.query_selector("div").unwrap();

        fx.doc.set_attribute(div, "data-label", "Home").unwrap();
        let hindi = fx.hindi.clone();
        let writes = fx.flush(Some(&hindi));

        assert_that!(writes, eq(0));
        assert_that!(fx.doc.attribute(div, "data-label"), some(eq("Home")));
    }

    /// 辞書が無ければ記録のみ行う
    #[rstest]
    fn missing_dictionary_records_without_writing() {
        let mut fx = Fixture::new("<body><main></main></body>");
        let main = fx.doc.query_selector("main").unwrap();

        let added = html::append_fragment(&mut fx.doc, main, "<p>Home</p>").unwrap();
        let writes = fx.flush(None);

        let text = fx.doc.first_child(added[0]).unwrap();
        assert_that!(writes, eq(0));
        assert_that!(fx.ledger.has_text_original(text), eq(true));
        assert_that!(fx.doc.text(text), some(eq("Home")));
    }

    /// 取り外して戻したノードは最初の原文を保持する
    #[rstest]
    fn reattached_subtree_keeps_its_originals() {
        let mut fx = Fixture::new(r#"<body><section><p title="Home">Report an Issue</p></section><aside></aside></body>"#);
        let hindi = fx.hindi.clone();
        let body = fx.doc.body().unwrap();
        walker::translate_subtree(&mut fx.doc, &mut fx.ledger, body, &hindi);
        fx.doc.take_records();
        let p = fx.doc.query_selector("p").unwrap();
        let aside = fx.doc.query_selector("aside").unwrap();
        let text = fx.doc.first_child(p).unwrap();

        fx.doc.remove(p).unwrap();
        fx.flush(Some(&hindi));
        fx.doc.append_child(aside, p).unwrap();
        fx.flush(Some(&hindi));

        assert_that!(fx.ledger.text_original(&fx.doc, text), some(eq("Report an Issue")));
        assert_that!(fx.ledger.attribute_original(&fx.doc, p, "title"), some(eq("Home")));

        let english = DictionaryStore::builtin().get("en").cloned().unwrap();
        walker::translate_subtree(&mut fx.doc, &mut fx.ledger, body, &english);
        assert_that!(fx.doc.text(text), some(eq("Report an Issue")));
        assert_that!(fx.doc.attribute(p, "title"), some(eq("Home")));
    }

    /// 取り外しだけではレジャーから消えない
    #[rstest]
    fn removal_alone_keeps_ledger_entries() {
        let mut fx = Fixture::new(r#"<body><section><p title="Home">Home</p></section></body>"#);
        let section = fx.doc.query_selector("section").unwrap();

        fx.doc.remove(section).unwrap();
        fx.flush(None);

        assert_that!(fx.ledger.len(), eq(2));
    }

    /// 移動したサブツリーは原文を保持する
    #[rstest]
    fn moved_subtree_keeps_its_originals() {
        let mut fx = Fixture::new(r#"<body><section><p>Home</p></section><aside></aside></body>"#);
        let hindi = fx.hindi.clone();
        let body = fx.doc.body().unwrap();
        walker::translate_subtree(&mut fx.doc, &mut fx.ledger, body, &hindi);
        fx.doc.take_records();
        let p = fx.doc.query_selector("p").unwrap();
        let aside = fx.doc.query_selector("aside").unwrap();

        fx.doc.append_child(aside, p).unwrap();
        fx.flush(Some(&hindi));

        let text = fx.doc.first_child(p).unwrap();
        assert_that!(fx.doc.text(text), some(eq("होम")));
        assert_that!(fx.ledger.text_original(&fx.doc, text), some(eq("Home")));
    }

    /// ルート外の変更は無視する
    #[rstest]
    fn records_outside_the_root_are_ignored() {
        let mut doc = html::parse("<body><main><p>Home</p></main><footer></footer></body>").unwrap();
        let main = doc.query_selector("main").unwrap();
        let footer = doc.query_selector("footer").unwrap();
        let mut ledger = Ledger::new();
        let watcher = MutationWatcher::new(main);
        let hindi = DictionaryStore::builtin().get("hi").cloned().unwrap();
        let text = doc.create_text("Home");
        doc.append_child(footer, text).unwrap();
        let records =
            vec![MutationRecord::ChildList { target: footer, added: vec![text], removed: vec![] }];

        let writes = watcher.handle(&mut doc, &mut ledger, &records, Some(&hindi));

        assert_that!(writes, eq(0));
        assert_that!(doc.text(text), some(eq("Home")));
    }
}
