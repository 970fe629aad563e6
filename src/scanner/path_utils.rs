//! Unicode normalization of file names.
//!
//! macOS stores file names in NFD (decomposed) form while Linux and Windows
//! usually hold NFC (composed) names. The same visible title can therefore
//! arrive with different byte representations:
//!
//! - NFC: `café` - 'é' is U+00E9 (single code point)
//! - NFD: `café` - 'e' U+0065 + combining acute accent U+0301
//!
//! A library copied between machines ends up with both. Names are brought
//! to NFC before they are compared, otherwise the similarity score of two
//! otherwise identical titles drops with every accented character.
//!
//! # Example
//!
//! ```
//! use trackdupe::scanner::path_utils::normalize_name;
//!
//! let nfc = "café.flac";
//! let nfd = "cafe\u{0301}.flac";
//! assert_eq!(normalize_name(nfc), normalize_name(nfd));
//! ```

use std::borrow::Cow;
use unicode_normalization::{is_nfc_quick, IsNormalized, UnicodeNormalization};

/// Normalize a file name to NFC, borrowing when it already is.
#[must_use]
pub fn normalize_name(s: &str) -> Cow<'_, str> {
    match is_nfc_quick(s.chars()) {
        IsNormalized::Yes => Cow::Borrowed(s),
        _ => Cow::Owned(s.nfc().collect()),
    }
}
