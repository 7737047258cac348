//! 言語コード → 辞書 の読み取り専用ストア

use std::collections::BTreeMap;

use super::builtin;

/// Source phrase → target phrase for one language.
///
/// Keys are unique and never empty. The substitution order (longest key
/// first) is computed once on construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    /// 原文 → 訳文
    entries: BTreeMap<String, String>,
    /// Keys by substitution precedence.
    ordered_keys: Vec<String>,
}

impl Dictionary {
    /// Builds a dictionary; empty keys are dropped, later duplicates win.
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries: BTreeMap<String, String> = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .filter(|(key, _)| !key.is_empty())
            .collect();
        Self::from_map(entries)
    }

    /// マップから構築し、適用順を計算する
    fn from_map(entries: BTreeMap<String, String>) -> Self {
        let mut ordered_keys: Vec<String> = entries.keys().cloned().collect();
        // Stable: equal lengths keep the map's lexical order.
        ordered_keys.sort_by_key(|key| std::cmp::Reverse(key.chars().count()));
        Self { entries, ordered_keys }
    }

    /// `source` の訳文
    #[must_use]
    pub fn get(&self, source: &str) -> Option<&str> {
        self.entries.get(source).map(String::as_str)
    }

    /// エントリー数
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// エントリーが無いか
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in the order substitution applies them: longest key first.
    pub fn entries_by_precedence(&self) -> impl Iterator<Item = (&str, &str)> {
        self.ordered_keys
            .iter()
            .filter_map(|key| self.entries.get_key_value(key))
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Overlays `other`; its values win on shared keys.
    #[must_use]
    pub fn merged(mut self, other: Self) -> Self {
        self.entries.extend(other.entries);
        Self::from_map(self.entries)
    }
}

/// Read-only lookup from language code to [`Dictionary`].
///
/// A missing code is an ordinary outcome; callers decide how to degrade.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DictionaryStore {
    /// 言語コード → 辞書
    dictionaries: BTreeMap<String, Dictionary>,
}

impl DictionaryStore {
    /// 組み込み辞書（`en`, `hi`）を持つストア
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_entries([
            ("en".to_string(), builtin::english()),
            ("hi".to_string(), builtin::hindi()),
        ])
    }

    /// Builds a store; dictionaries for a repeated code are merged.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Dictionary)>,
    {
        let mut dictionaries: BTreeMap<String, Dictionary> = BTreeMap::new();
        for (code, dictionary) in entries {
            let merged = match dictionaries.remove(&code) {
                Some(existing) => existing.merged(dictionary),
                None => dictionary,
            };
            dictionaries.insert(code, merged);
        }
        Self { dictionaries }
    }

    /// Overlays `other` on top of this store.
    #[must_use]
    pub fn merged(self, other: Self) -> Self {
        Self::from_entries(self.dictionaries.into_iter().chain(other.dictionaries))
    }

    /// `code` の辞書
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&Dictionary> {
        self.dictionaries.get(code)
    }

    /// `code` の辞書があるか
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.dictionaries.contains_key(code)
    }

    /// Known codes, sorted.
    #[must_use]
    pub fn codes(&self) -> Vec<&str> {
        self.dictionaries.keys().map(String::as_str).collect()
    }

    /// 言語数
    #[must_use]
    pub fn len(&self) -> usize {
        self.dictionaries.len()
    }

    /// 辞書が一つも無いか
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dictionaries.is_empty()
    }
}
