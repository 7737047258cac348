//! 辞書ファイルの検出と読み込み

use std::path::{
    Path,
    PathBuf,
};

use globset::{
    Glob,
    GlobSet,
    GlobSetBuilder,
};
use ignore::WalkBuilder;
use jsonc_parser::ParseOptions;
use serde_json::Value;

use super::{
    Dictionary,
    DictionaryError,
    DictionaryStore,
};
use crate::config::TranslationFilesConfig;

/// Directory names that group dictionaries without naming a language.
const COMMON_PARENTS: [&str; 6] = ["locales", "messages", "translations", "i18n", "lang", "langs"];

/// ディレクトリ配下の辞書ファイルをすべて読み込む
///
/// Files are discovered with `config`'s include/exclude globs (relative to
/// `root`, `.gitignore` honoured). Several files for the same language are
/// merged in path order.
///
/// # Errors
/// - 不正なグロブパターン
/// - ファイル読み込み / JSON パースエラー
pub fn load_from_directory(
    root: &Path,
    config: &TranslationFilesConfig,
) -> Result<DictionaryStore, DictionaryError> {
    tracing::debug!(root = %root.display(), "Loading dictionaries");

    let mut entries = Vec::new();
    for path in find_dictionary_files(root, config)? {
        let Some(code) = detect_language(&path) else {
            tracing::warn!("Cannot tell the language of {:?}, skipping", path);
            continue;
        };
        let text = std::fs::read_to_string(&path)
            .map_err(|source| DictionaryError::Read { path: path.clone(), source })?;
        let dictionary = parse_dictionary(&text).map_err(|failure| match failure {
            ParseFailure::Syntax(message) => DictionaryError::Parse { path: path.clone(), message },
            ParseFailure::NotAnObject => DictionaryError::NotAnObject { path: path.clone() },
        })?;
        tracing::debug!(code = %code, entries = dictionary.len(), path = %path.display(), "Loaded dictionary");
        entries.push((code, dictionary));
    }

    Ok(DictionaryStore::from_entries(entries))
}

/// パターン一覧から `GlobSet` を構築
fn build_glob_set<F>(patterns: &[String], make_error: F) -> Result<GlobSet, DictionaryError>
where
    F: Fn(String, globset::Error) -> DictionaryError,
{
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| make_error(pattern.clone(), e))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

/// 辞書ファイルを検索（パス順にソート）
fn find_dictionary_files(
    root: &Path,
    config: &TranslationFilesConfig,
) -> Result<Vec<PathBuf>, DictionaryError> {
    let include_set = build_glob_set(&config.include_patterns, |pattern, source| {
        DictionaryError::InvalidPattern { pattern, source }
    })?;
    let exclude_set = build_glob_set(&config.exclude_patterns, |pattern, source| {
        DictionaryError::InvalidPattern { pattern, source }
    })?;

    let mut found_files = Vec::new();
    for result in WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .follow_links(false)
        .build()
    {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!(?err, "Failed to read directory entry");
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = entry.path();
        let Ok(relative_path) = path.strip_prefix(root) else {
            continue;
        };
        if !include_set.is_match(relative_path) || exclude_set.is_match(relative_path) {
            continue;
        }

        found_files.push(path.to_path_buf());
    }

    found_files.sort();
    Ok(found_files)
}

/// Why a dictionary text was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    /// Not valid JSON (comments and trailing commas are accepted).
    Syntax(String),
    /// Valid JSON, but the top level is not an object.
    NotAnObject,
}

/// Parses a dictionary file body.
///
/// The top level must be an object. Nested objects are flattened with `.`
/// so `{"nav": {"Home": "होम"}}` yields the key `nav.Home`; this keeps
/// grouped files usable even though pages rarely contain such keys.
/// Non-string leaves are skipped.
pub fn parse_dictionary(text: &str) -> Result<Dictionary, ParseFailure> {
    let value = jsonc_parser::parse_to_serde_value(text, &ParseOptions::default())
        .map_err(|e| ParseFailure::Syntax(e.to_string()))?;
    let Some(Value::Object(_)) = &value else {
        return Err(ParseFailure::NotAnObject);
    };

    let mut entries = Vec::new();
    if let Some(value) = &value {
        flatten_entries(value, None, &mut entries);
    }
    Ok(Dictionary::new(entries))
}

/// ネストしたオブジェクトを `.` 区切りのキーに展開
fn flatten_entries(value: &Value, prefix: Option<&str>, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, value) in map {
                let full_key = prefix.map_or_else(|| key.clone(), |p| format!("{p}.{key}"));
                flatten_entries(value, Some(&full_key), out);
            }
        }
        Value::String(s) => {
            if let Some(key) = prefix {
                out.push((key.to_string(), s.clone()));
            }
        }
        _ => {
            tracing::warn!(key = prefix.unwrap_or_default(), "Ignoring non-string dictionary value");
        }
    }
}

/// Language code from the file path.
///
/// - `locales/hi.json` → `hi`
/// - `locales/pt-BR.json` → `pt-BR`
/// - `locales/hi/common.json` → `hi`
/// - `locales/common.json` → `None`
fn detect_language(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_string_lossy();
    if looks_like_language_code(&stem) {
        return Some(stem.into_owned());
    }

    let parent = path.parent()?.file_name()?.to_string_lossy();
    if looks_like_language_code(&parent) && !COMMON_PARENTS.contains(&parent.to_lowercase().as_str())
    {
        return Some(parent.into_owned());
    }

    None
}

/// `xx`, `xxx`, optionally followed by `-`/`_` subtags of 2–4 alphanumerics.
fn looks_like_language_code(candidate: &str) -> bool {
    let mut parts = candidate.split(['-', '_']);
    let primary_ok = parts
        .next()
        .is_some_and(|p| (2..=3).contains(&p.len()) && p.chars().all(|c| c.is_ascii_alphabetic()));
    primary_ok
        && parts.all(|p| (2..=4).contains(&p.len()) && p.chars().all(|c| c.is_ascii_alphanumeric()))
}
