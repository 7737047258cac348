//! 文字列置換エンジン
//!
//! 辞書のキーを長い順に、リテラルとして全出現箇所へ適用する。

use crate::dictionary::Dictionary;

/// `text` 内の全キーの全出現箇所を置換
///
/// Keys are applied longest first, so `"Open Camera"` wins over `"Camera"`.
/// Each key is matched as a literal, case-sensitive substring, and each
/// key's pass runs over the output of the previous one.
///
/// ```
/// use page_lingo::dictionary::Dictionary;
/// use page_lingo::substitute::substitute;
///
/// let dictionary = Dictionary::new([("Camera", "X"), ("Open Camera", "Y")]);
/// assert_eq!(substitute("Open Camera", &dictionary), "Y");
/// ```
#[must_use]
pub fn substitute(text: &str, dictionary: &Dictionary) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut output = text.to_string();
    for (source, target) in dictionary.entries_by_precedence() {
        if output.contains(source) {
            output = output.replace(source, target);
        }
    }
    output
}
