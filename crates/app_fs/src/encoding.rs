//! Character encoding detection and conversion
//!
//! Archive member names and text content are not guaranteed to be UTF-8
//! (legacy tar and zip tools write names in the system code page).

use chardetng::EncodingDetector;
use encoding_rs::Encoding;

/// Hint for encoding detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingHint {
    /// Prefer Cyrillic encodings (windows-1251, KOI8-R)
    Cyrillic,
    /// Prefer Japanese encodings (Shift_JIS)
    Japanese,
    /// Prefer Chinese Simplified (GBK/GB18030)
    ChineseSimplified,
    /// Prefer Korean (EUC-KR)
    Korean,
    /// No preference
    None,
}

impl EncodingHint {
    /// Top-level domain passed to chardetng as a locale signal
    fn tld(self) -> Option<&'static [u8]> {
        match self {
            EncodingHint::Cyrillic => Some(b"ru"),
            EncodingHint::Japanese => Some(b"jp"),
            EncodingHint::ChineseSimplified => Some(b"cn"),
            EncodingHint::Korean => Some(b"kr"),
            EncodingHint::None => None,
        }
    }

    /// Encoding used when detection falls back to windows-1252
    fn fallback(self) -> Option<&'static Encoding> {
        match self {
            EncodingHint::Cyrillic => Some(encoding_rs::WINDOWS_1251),
            EncodingHint::Japanese => Some(encoding_rs::SHIFT_JIS),
            EncodingHint::ChineseSimplified => Some(encoding_rs::GBK),
            EncodingHint::Korean => Some(encoding_rs::EUC_KR),
            EncodingHint::None => None,
        }
    }
}

/// Detect the most likely encoding of a byte sequence
pub fn detect_encoding(bytes: &[u8], hint: EncodingHint) -> &'static Encoding {
    if std::str::from_utf8(bytes).is_ok() {
        return encoding_rs::UTF_8;
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let detected = detector.guess(hint.tld(), true);

    match hint.fallback() {
        Some(preferred) if detected == encoding_rs::WINDOWS_1252 => preferred,
        _ => detected,
    }
}

/// Decode bytes to a UTF-8 string
///
/// Returns the decoded string and a flag indicating replacement characters
/// were inserted.
pub fn decode_bytes(bytes: &[u8], hint: EncodingHint) -> (String, bool) {
    if let Ok(s) = std::str::from_utf8(bytes) {
        return (s.to_string(), false);
    }

    let encoding = detect_encoding(bytes, hint);
    let (result, _, had_errors) = encoding.decode(bytes);

    if had_errors {
        tracing::warn!("Lossy decode with {}", encoding.name());
    } else {
        tracing::debug!("Decoded non-UTF-8 bytes as {}", encoding.name());
    }

    (result.into_owned(), had_errors)
}

/// Get the encoding hint from the process locale
pub fn system_encoding_hint() -> EncodingHint {
    ["LC_ALL", "LC_CTYPE", "LANG"]
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
        .map(|lang| hint_from_locale(&lang))
        .unwrap_or(EncodingHint::None)
}

fn hint_from_locale(lang: &str) -> EncodingHint {
    let lang = lang.to_lowercase();
    if lang.starts_with("ru") || lang.starts_with("uk") || lang.starts_with("be") {
        EncodingHint::Cyrillic
    } else if lang.starts_with("ja") {
        EncodingHint::Japanese
    } else if lang.starts_with("zh_cn") || lang.starts_with("zh-cn") {
        EncodingHint::ChineseSimplified
    } else if lang.starts_with("ko") {
        EncodingHint::Korean
    } else {
        EncodingHint::None
    }
}
