//! 言語コードの選択ロジック

use crate::dictionary::DictionaryStore;

/// 切り替え可能な言語コード（ピッカーの順序）
///
/// An explicit allow-list keeps its order; entries without a dictionary and
/// repeated entries are dropped. Without one, every known code is offered.
#[must_use]
pub fn resolve_allowed(dictionaries: &DictionaryStore, available: Option<&[String]>) -> Vec<String> {
    let Some(available) = available else {
        return dictionaries.codes().into_iter().map(str::to_string).collect();
    };

    let mut allowed: Vec<String> = Vec::with_capacity(available.len());
    for code in available {
        if !dictionaries.contains(code) {
            tracing::warn!(code = %code, "No dictionary for allowed language, dropping it");
            continue;
        }
        if !allowed.contains(code) {
            allowed.push(code.clone());
        }
    }
    allowed
}

/// 初期言語を決定
///
/// The persisted value wins over `default_lang`; when the candidate is not
/// offered the first allowed code is used instead. With nothing allowed the
/// candidate is kept as is.
#[must_use]
pub fn resolve_initial(stored: Option<&str>, default_lang: &str, allowed: &[String]) -> String {
    let candidate = stored.filter(|code| !code.is_empty()).unwrap_or(default_lang);
    if allowed.iter().any(|code| code == candidate) {
        return candidate.to_string();
    }
    allowed.first().map_or_else(|| candidate.to_string(), Clone::clone)
}

/// Next code after `current`, wrapping around; the first code when
/// `current` is not offered.
#[must_use]
pub fn next_language<'a>(allowed: &'a [String], current: &str) -> Option<&'a str> {
    let next = allowed
        .iter()
        .position(|code| code == current)
        .map_or(0, |index| (index + 1) % allowed.len());
    allowed.get(next).map(String::as_str)
}

/// ピッカーの表示名（既知の言語は自称）
#[must_use]
pub fn language_label(code: &str) -> String {
    match code {
        "en" => "English".to_string(),
        "hi" => "हिन्दी".to_string(),
        other => other.to_uppercase(),
    }
}
