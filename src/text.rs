//! Canonical text utilities shared by the normalizer, the entity registry
//! and both renderers.
//!
//! Identifier derivation is a cross-path contract: any collaborator that
//! needs to address the same entities (for example a secondary compiler
//! handling leftovers) must reproduce [`slugify`] byte for byte.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

static SLUG_FORBIDDEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s_-]").expect("slug charset pattern"));

static SLUG_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s-]+").expect("slug separator pattern"));

/// Strip diacritics: NFD decomposition, then drop combining marks.
/// `"José"` → `"Jose"`, `"años"` → `"anos"`.
#[must_use]
pub fn strip_accents(input: &str) -> String {
    input.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Canonical form of free text: trimmed, lower-cased, accent-stripped,
/// internal whitespace runs collapsed to single spaces.
///
/// Two mentions of the same entity must canonicalize equal before any
/// identifier is derived from them.
#[must_use]
pub fn canonicalize(input: &str) -> String {
    let lowered = strip_accents(input.trim()).to_lowercase();
    WHITESPACE_RUN.replace_all(&lowered, " ").into_owned()
}

/// Identifier-safe slug: canonicalize, drop every character outside
/// `[a-z0-9 _-]`, then collapse whitespace/hyphen runs into one underscore.
///
/// Pure and idempotent; case- and accent-insensitive
/// (`slugify("José") == slugify("jose")`).
#[must_use]
pub fn slugify(input: &str) -> String {
    let canonical = canonicalize(input);
    let kept = SLUG_FORBIDDEN.replace_all(&canonical, "");
    SLUG_SEPARATOR.replace_all(&kept, "_").into_owned()
}

/// Title-case each whitespace-separated word (person display names).
#[must_use]
pub fn title_case(input: &str) -> String {
    input
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
