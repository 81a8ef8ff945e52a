//! Label translation with humanized fallback
//!
//! Labels are presentation-only: every function here degrades instead of
//! failing.

use std::collections::{BTreeMap, HashMap};

/// Translation parameters, substituted verbatim (`%name%` → value)
pub type TranslationParams = BTreeMap<String, String>;

/// Catalogue-backed translation lookup
pub trait Translator: Send + Sync {
    /// Translate `key`, or `None` when the catalogue has no entry for it
    fn translate(&self, key: &str, params: &TranslationParams) -> Option<String>;
}

/// Translator over an in-memory key → message catalogue
#[derive(Debug, Clone, Default)]
pub struct MapTranslator {
    catalogue: HashMap<String, String>,
}

impl MapTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, message: impl Into<String>) -> Self {
        self.insert(key, message);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.catalogue.insert(key.into(), message.into());
    }

    pub fn len(&self) -> usize {
        self.catalogue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalogue.is_empty()
    }
}

impl From<HashMap<String, String>> for MapTranslator {
    fn from(catalogue: HashMap<String, String>) -> Self {
        Self { catalogue }
    }
}

impl Translator for MapTranslator {
    fn translate(&self, key: &str, params: &TranslationParams) -> Option<String> {
        let message = self.catalogue.get(key)?;
        Some(
            params
                .iter()
                .fold(message.clone(), |acc, (name, value)| acc.replace(name, value)),
        )
    }
}

/// Try each key in order, then fall back to `fallback`
///
/// Returns `None` only when nothing matched and no fallback was given.
pub fn try_translate<S: AsRef<str>>(
    translator: Option<&dyn Translator>,
    keys: &[S],
    params: &TranslationParams,
    fallback: Option<&str>,
    humanize_fallback: bool,
) -> Option<String> {
    if let Some(translator) = translator {
        for key in keys {
            if let Some(label) = translator.translate(key.as_ref(), params) {
                return Some(label);
            }
        }
    }

    let fallback = fallback?;
    if humanize_fallback {
        Some(humanize(fallback))
    } else {
        Some(fallback.to_string())
    }
}

/// Display label for `code`: the first translated key, else the humanized
/// code without the leading space humanization may add
pub(crate) fn resolve_label(
    translator: Option<&dyn Translator>,
    keys: &[String],
    code: &str,
) -> String {
    try_translate(translator, keys, &TranslationParams::new(), None, false)
        .unwrap_or_else(|| humanize(code).trim_start_matches(' ').to_string())
}

/// Split a code into words for display
///
/// A space goes before: an uppercase letter following a lowercase one, an
/// uppercase letter that starts a capitalized word (`HTMLParser` splits
/// before `P`), and the first digit of a digit run. At position 0 only a
/// capitalized word or a digit gets one; a leading acronym does not.
/// Underscores then become spaces.
///
/// ```
/// use eav_core::translator::humanize;
///
/// assert_eq!(humanize("userFirstName"), "user First Name");
/// assert_eq!(humanize("HTTPServerError"), "HTTP Server Error");
/// assert_eq!(humanize("line_2"), "line  2");
/// assert_eq!(humanize("BlogPost"), " Blog Post");
/// ```
pub fn humanize(code: &str) -> String {
    let chars: Vec<char> = code.chars().collect();
    let mut out = String::with_capacity(code.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if starts_word(&chars, i) {
            out.push(' ');
        }
        out.push(if c == '_' { ' ' } else { c });
    }
    out
}

fn starts_word(chars: &[char], i: usize) -> bool {
    let c = chars[i];
    let next_is_lower = chars.get(i + 1).is_some_and(|next| next.is_ascii_lowercase());
    let Some(prev) = i.checked_sub(1).map(|p| chars[p]) else {
        return c.is_ascii_digit() || (c.is_ascii_uppercase() && next_is_lower);
    };
    if c.is_ascii_digit() {
        return !prev.is_ascii_digit();
    }
    if !c.is_ascii_uppercase() {
        return false;
    }
    if prev.is_ascii_lowercase() {
        return true;
    }
    // end of an acronym or a capital after a digit/underscore
    next_is_lower
}
