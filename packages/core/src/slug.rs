//! Slug derivation.
//!
//! A slug is the immutable, URL-safe public identifier of an entity. It is
//! derived once from the display name when the entity is created:
//!
//! 1. lowercase,
//! 2. apply the language's symbol and letter substitutions (`&` → `and`),
//! 3. decompose (NFKD), drop combining marks, transliterate the few letters
//!    that do not decompose (`ß` → `ss`, `ø` → `o`, ...),
//! 4. replace every run of characters outside `[a-z0-9_-]` with `-`,
//! 5. collapse repeated dashes and trim `-`/`_` from both ends.
//!
//! Input that leaves nothing behind (empty, punctuation only, scripts with no
//! Latin transliteration) produces [`FALLBACK_SLUG`].

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Slug used when a name has no representable characters.
pub const FALLBACK_SLUG: &str = "untitled";

static NON_AUTHORIZED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9_-]+").expect("valid regex"));

static MULTIPLE_DASHES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-{2,}").expect("valid regex"));

/// Language tag controlling symbol and letter substitutions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lang {
    #[default]
    En,
    De,
}

impl Lang {
    fn substitute(self, c: char) -> Option<&'static str> {
        match (self, c) {
            (Lang::En, '&') => Some(" and "),
            (Lang::En, '@') => Some(" at "),
            (Lang::De, '&') => Some(" und "),
            (Lang::De, '@') => Some(" an "),
            (Lang::De, 'ä') => Some("ae"),
            (Lang::De, 'ö') => Some("oe"),
            (Lang::De, 'ü') => Some("ue"),
            _ => None,
        }
    }
}

/// Letters with no canonical decomposition to ASCII.
fn transliterate(c: char) -> Option<&'static str> {
    match c {
        'ß' => Some("ss"),
        'æ' => Some("ae"),
        'œ' => Some("oe"),
        'ø' => Some("o"),
        'đ' | 'ð' => Some("d"),
        'þ' => Some("th"),
        'ł' => Some("l"),
        'ı' => Some("i"),
        'ħ' => Some("h"),
        _ => None,
    }
}

/// Derive a slug using English substitutions.
pub fn derive(name: &str) -> String {
    derive_with_lang(name, Lang::En)
}

pub fn derive_with_lang(name: &str, lang: Lang) -> String {
    let mut substituted = String::with_capacity(name.len());
    for c in name.to_lowercase().chars() {
        match lang.substitute(c) {
            Some(rep) => substituted.push_str(rep),
            None => substituted.push(c),
        }
    }

    let mut folded = String::with_capacity(substituted.len());
    for c in substituted.nfkd().filter(|c| !is_combining_mark(*c)) {
        match transliterate(c) {
            Some(rep) => folded.push_str(rep),
            None => folded.push(c),
        }
    }
    // Compatibility decomposition can yield uppercase (e.g. `Ⅻ` → `XII`).
    let folded = folded.to_lowercase();

    let dashed = NON_AUTHORIZED.replace_all(&folded, "-");
    let collapsed = MULTIPLE_DASHES.replace_all(&dashed, "-");
    let slug = collapsed.trim_matches(|c| c == '-' || c == '_');

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug.to_string()
    }
}
