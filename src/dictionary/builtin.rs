//! 組み込み辞書
//!
//! English is the source language of the page, so its dictionary is empty:
//! translating to `en` restores every recorded original.

use super::Dictionary;

/// Identity dictionary for the source language.
pub(super) fn english() -> Dictionary {
    Dictionary::default()
}

/// English → Hindi.
pub(super) fn hindi() -> Dictionary {
    Dictionary::new([
        ("Report an Issue", "समस्या दर्ज करें"),
        ("Describe the issue", "समस्या का वर्णन करें"),
        ("Your Name", "आपका नाम"),
        ("Your Email", "आपका ईमेल"),
        ("Phone Number", "फ़ोन नंबर"),
        ("Open Camera", "कैमरा खोलें"),
        ("Take Photo", "फ़ोटो लें"),
        ("Camera", "कैमरा"),
        ("Upload", "अपलोड करें"),
        ("Submit", "जमा करें"),
        ("Cancel", "रद्द करें"),
        ("Close", "बंद करें"),
        ("Search", "खोजें"),
        ("Settings", "सेटिंग्स"),
        ("Home", "होम"),
        ("Contact Us", "संपर्क करें"),
        ("Welcome", "स्वागत है"),
        ("Thank you", "धन्यवाद"),
        // switcher controls
        ("Apply", "लागू करें"),
        ("Language", "भाषा"),
        ("Next language", "अगली भाषा"),
    ])
}
