//! Character-set normalization seam.
//!
//! The server emits UTF-8; embedding applications that want another output
//! charset (or additional text cleanup) supply their own normalizer. Every
//! attribute value and every character-data chunk passes through it before
//! reaching the state machine.

use std::borrow::Cow;

pub trait TextNormalizer {
    fn normalize<'a>(&self, raw: Cow<'a, str>) -> Cow<'a, str>;
}

/// Default normalizer: hands the UTF-8 text through untouched.
pub struct Utf8Passthrough;

impl TextNormalizer for Utf8Passthrough {
    fn normalize<'a>(&self, raw: Cow<'a, str>) -> Cow<'a, str> {
        raw
    }
}
