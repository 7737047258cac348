//! 言語切り替えのエンドツーエンドテスト

#![allow(clippy::unwrap_used)]
#![allow(clippy::indexing_slicing)]
#![allow(missing_docs)]

use std::fs;

use googletest::prelude::*;
use page_lingo::config::{
    ConfigManager,
    SwitcherSettings,
};
use page_lingo::dictionary::{
    self,
    Dictionary,
    DictionaryStore,
};
use page_lingo::dom::{
    Document,
    html,
};
use page_lingo::storage::{
    FileStorage,
    LanguageStorage,
    MemoryStorage,
};
use page_lingo::{
    Switcher,
    UiEvent,
};
use rstest::*;
use tempfile::TempDir;

/// 問題報告フォームのページ
const ISSUE_FORM: &str = r#"<!DOCTYPE html>
<html><head><title>Issues</title></head>
<body>
<header id="lang-switcher"></header>
<main>
<h1>Report an Issue</h1>
<form><input placeholder="Your Name"><button title="Open Camera">Open Camera</button></form>
<script>const label = "Report an Issue";</script>
</main>
</body></html>"#;

/// `ISSUE_FORM` を解析
fn page() -> Document {
    html::parse(ISSUE_FORM).unwrap()
}

/// 組み込み辞書・メモリストレージ・既定設定で初期化
fn start(doc: &mut Document) -> Switcher<MemoryStorage> {
    Switcher::init(doc, DictionaryStore::builtin(), MemoryStorage::new(), SwitcherSettings::default())
}

/// `selector` に一致する要素のテキスト
fn text_of(doc: &Document, selector: &str) -> String {
    doc.text_content(doc.query_selector(selector).unwrap())
}

/// `selector` に一致する要素の属性値
fn attribute_of(doc: &Document, selector: &str, name: &str) -> Option<String> {
    doc.attribute(doc.query_selector(selector).unwrap(), name).map(str::to_string)
}

/// 見出しをヒンディー語にして英語へ戻す
#[rstest]
fn report_an_issue_round_trip() {
    let mut doc = page();
    let mut switcher = start(&mut doc);

    assert!(switcher.switch_to(&mut doc, "hi"));
    assert_that!(text_of(&doc, "h1"), eq("समस्या दर्ज करें"));

    assert!(switcher.switch_to(&mut doc, "en"));
    assert_that!(text_of(&doc, "h1"), eq("Report an Issue"));
}

/// placeholder をヒンディー語にして英語へ戻す
#[rstest]
fn placeholder_round_trip() {
    let mut doc = page();
    let mut switcher = start(&mut doc);

    switcher.switch_to(&mut doc, "hi");
    assert_that!(attribute_of(&doc, "input", "placeholder"), some(eq("आपका नाम")));

    switcher.switch_to(&mut doc, "en");
    assert_that!(attribute_of(&doc, "input", "placeholder"), some(eq("Your Name")));
}

/// ページ上でも長いキーが優先される
#[rstest]
fn longest_key_wins_on_the_page() {
    let mut doc = page();
    let mut switcher = start(&mut doc);

    switcher.switch_to(&mut doc, "hi");

    let button = doc.query_selector("form").and_then(|form| doc.children(form).get(1).copied()).unwrap();
    assert_that!(doc.text_content(button), eq("कैमरा खोलें"));
    assert_that!(doc.attribute(button, "title"), some(eq("कैमरा खोलें")));
}

/// `script` の中身は書き換えない
#[rstest]
fn script_content_is_never_rewritten() {
    let mut doc = page();
    let mut switcher = start(&mut doc);

    switcher.switch_to(&mut doc, "hi");

    assert_that!(text_of(&doc, "script"), eq(r#"const label = "Report an Issue";"#));
}

/// hi → en → hi で同じ結果になる
#[rstest]
fn reversibility_across_three_switches() {
    let mut doc = page();
    let mut switcher = start(&mut doc);

    switcher.switch_to(&mut doc, "hi");
    let first_hindi = html::serialize(&doc);
    switcher.switch_to(&mut doc, "en");
    switcher.switch_to(&mut doc, "hi");

    assert_that!(html::serialize(&doc), eq(first_hindi.as_str()));
}

/// 同じ言語への切り替えは何も変えない
#[rstest]
fn switching_to_the_same_language_changes_nothing() {
    let mut doc = page();
    let mut switcher = start(&mut doc);
    switcher.switch_to(&mut doc, "hi");
    let snapshot = html::serialize(&doc);

    switcher.switch_to(&mut doc, "hi");

    assert_that!(html::serialize(&doc), eq(snapshot.as_str()));
    assert_that!(doc.has_pending_records(), eq(false));
}

/// 後から追加した内容も現在の言語になる
#[rstest]
fn inserted_content_converges_to_current_language() {
    let mut doc = page();
    let mut switcher = start(&mut doc);
    switcher.switch_to(&mut doc, "hi");
    let main = doc.query_selector("main").unwrap();

    html::append_fragment(
        &mut doc,
        main,
        r#"<section class="late"><h2>Report an Issue</h2><input alt="Camera" placeholder="Your Name"></section>"#,
    )
    .unwrap();
    switcher.flush_mutations(&mut doc);

    assert_that!(text_of(&doc, "h2"), eq("समस्या दर्ज करें"));
    let late_input = doc.query_selector_all(main, "input")[1];
    assert_that!(doc.attribute(late_input, "placeholder"), some(eq("आपका नाम")));
    assert_that!(doc.attribute(late_input, "alt"), some(eq("कैमरा")));

    // Late content is reversible like everything else.
    switcher.switch_to(&mut doc, "en");
    assert_that!(text_of(&doc, "h2"), eq("Report an Issue"));
    assert_that!(doc.attribute(late_input, "placeholder"), some(eq("Your Name")));
}

/// 取り外して戻したパネルも英語へ戻せる
#[rstest]
fn reattached_panel_switches_back_to_source_text() {
    let mut doc = page();
    let mut switcher = start(&mut doc);
    switcher.switch_to(&mut doc, "hi");
    let main = doc.query_selector("main").unwrap();
    let h1 = doc.query_selector("h1").unwrap();

    doc.remove(h1).unwrap();
    switcher.flush_mutations(&mut doc);
    doc.append_child(main, h1).unwrap();
    switcher.flush_mutations(&mut doc);
    assert_that!(doc.text_content(h1), eq("समस्या दर्ज करें"));

    assert!(switcher.switch_to(&mut doc, "en"));
    assert_that!(doc.text_content(h1), eq("Report an Issue"));
}

/// 未知の言語はページも保存値も変えない
#[rstest]
fn unknown_language_leaves_page_and_storage_alone() {
    let mut doc = page();
    let mut switcher = start(&mut doc);
    switcher.switch_to(&mut doc, "hi");
    let snapshot = html::serialize(&doc);

    assert!(!switcher.switch_to(&mut doc, "tlh"));

    assert_that!(switcher.current(), eq("hi"));
    assert_that!(switcher.storage().get("page-lingo.lang").unwrap(), some(eq("hi")));
    assert_that!(html::serialize(&doc), eq(snapshot.as_str()));
}

/// ピッカー・適用・回転ボタンで切り替える
#[rstest]
fn picker_apply_and_rotate_drive_the_page() {
    let mut doc = page();
    let mut switcher = start(&mut doc);
    let controls = switcher.controls().unwrap();
    let options = controls.options(&doc);

    switcher.handle_event(&mut doc, UiEvent::Select(options[1]));
    switcher.handle_event(&mut doc, UiEvent::Click(controls.apply));
    assert_that!(switcher.current(), eq("hi"));
    assert_that!(doc.text_content(controls.apply), eq("लागू करें"));
    assert_that!(doc.attribute(controls.rotate, "title"), some(eq("अगली भाषा")));

    switcher.handle_event(&mut doc, UiEvent::Click(controls.rotate));
    assert_that!(switcher.current(), eq("en"));
    assert_that!(doc.text_content(controls.apply), eq("Apply"));
    assert_that!(doc.attribute(options[0], "selected"), some(eq("")));
}

/// 保存した言語は再読み込み後も有効
#[rstest]
fn persisted_language_survives_reload() {
    let dir = TempDir::new().unwrap();
    let state = dir.path().join("state.json");

    let mut doc = page();
    let mut switcher = Switcher::init(
        &mut doc,
        DictionaryStore::builtin(),
        FileStorage::new(&state),
        SwitcherSettings::default(),
    );
    switcher.switch_to(&mut doc, "hi");

    let mut reloaded = page();
    let switcher =
        Switcher::init(&mut reloaded, DictionaryStore::builtin(), FileStorage::new(&state), SwitcherSettings::default());

    assert_that!(switcher.current(), eq("hi"));
    assert_that!(text_of(&reloaded, "h1"), eq("समस्या दर्ज करें"));
}

/// 許可リストが回転の対象を制限する
#[rstest]
fn allow_list_limits_rotation() {
    let store = DictionaryStore::builtin().merged(DictionaryStore::from_entries([(
        "fr".to_string(),
        Dictionary::new([("Report an Issue", "Signaler un problème")]),
    )]));
    let settings = SwitcherSettings {
        available: Some(vec!["fr".to_string(), "en".to_string()]),
        ..SwitcherSettings::default()
    };
    let mut doc = page();
    let mut switcher = Switcher::init(&mut doc, store, MemoryStorage::new(), settings);

    assert_eq!(switcher.allowed(), ["fr", "en"]);
    assert!(switcher.rotate(&mut doc));
    assert_that!(switcher.current(), eq("fr"));
    assert_that!(text_of(&doc, "h1"), eq("Signaler un problème"));
    assert!(!switcher.switch_to(&mut doc, "hi"));
}

/// プロジェクトの辞書と設定をディスクから読む
#[rstest]
fn project_dictionaries_and_settings_from_disk() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("locales")).unwrap();
    fs::write(
        dir.path().join("locales/fr.json"),
        r#"{
            // form
            "Report an Issue": "Signaler un problème",
            "Your Name": "Votre nom",
        }"#,
    )
    .unwrap();
    fs::write(dir.path().join(".page-lingo.json"), r#"{"defaultLang": "fr", "selector": "header"}"#)
        .unwrap();

    let mut manager = ConfigManager::new();
    manager.load_settings(Some(dir.path().to_path_buf())).unwrap();
    let settings = manager.get_settings().clone();
    let loaded = dictionary::load_from_directory(dir.path(), &settings.translation_files).unwrap();
    let store = DictionaryStore::builtin().merged(loaded);

    let mut doc = page();
    let switcher = Switcher::init(&mut doc, store, MemoryStorage::new(), settings);

    assert_that!(switcher.current(), eq("fr"));
    assert_eq!(switcher.allowed(), ["en", "fr", "hi"]);
    assert_that!(text_of(&doc, "h1"), eq("Signaler un problème"));
    assert_that!(attribute_of(&doc, "input", "placeholder"), some(eq("Votre nom")));
    assert_eq!(switcher.controls().map(|controls| controls.mount), doc.query_selector("header"));
}
