//! Triplet normalization: text canonicalization, verb vocabulary lookup,
//! age and date parsing.
//!
//! Everything here is a pure function over one triplet and never fails:
//! unparseable dates and ages degrade to `None`, a deliberate
//! lossy-but-safe policy. Keeping an incomplete entity beats blocking the
//! batch.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::compile::Backend;
use crate::schema::{self, DATE_INPUT_FORMATS};
use crate::text::canonicalize;
use crate::triplet::Triplet;

// `años` survives as either form depending on whether accents were
// stripped before the match.
static AGE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,3})\s*a[nñ]os?$").expect("age pattern"));

/// Canonicalize a whole triplet: subject and object through
/// [`canonicalize`], the verb additionally through the vocabulary lookup.
#[must_use]
pub fn normalize(triplet: &Triplet, backend: Backend) -> Triplet {
    Triplet {
        subject: canonicalize(&triplet.subject),
        verb: canonical_verb(&triplet.verb, backend),
        object: canonicalize(&triplet.object),
    }
}

/// Canonical verb form. After text cleaning, a verb that is not in the
/// vocabulary gets one more chance with a single trailing `r` stripped,
/// catching infinitive drift from the extractor (`tomar` → `toma`,
/// `padecer` → `padece`). Unknown verbs pass through unchanged so the
/// partitioner can tag them.
#[must_use]
pub fn canonical_verb(verb: &str, backend: Backend) -> String {
    let v = canonicalize(verb);
    if schema::is_schema_verb(&v, backend) || v == schema::AGE_VERB {
        return v;
    }
    if let Some(base) = v.strip_suffix('r') {
        if schema::is_schema_verb(base, backend) || base == schema::AGE_VERB {
            return base.to_string();
        }
    }
    v
}

/// Parse an age object: `"25 años"`, `"25 anos"` or a bare integer.
#[must_use]
pub fn parse_age(object: &str) -> Option<u32> {
    let o = canonicalize(object);
    if let Some(caps) = AGE_PATTERN.captures(&o) {
        return caps[1].parse().ok();
    }
    if !o.is_empty() && o.chars().all(|c| c.is_ascii_digit()) {
        return o.parse().ok();
    }
    None
}

/// Parse a date object against the accepted input formats, in order, and
/// re-emit it as ISO `YYYY-MM-DD`. `None` when no format matches; the
/// associated property write is then skipped rather than defaulted.
#[must_use]
pub fn parse_date(object: &str) -> Option<String> {
    let t = object.trim();
    if t.is_empty() {
        return None;
    }
    DATE_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(t, fmt).ok())
        .map(|d| d.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_cleans_all_three_fields() {
        let t = Triplet::new("  Juan  Pérez ", "REALIZA", "  Yoga ");
        let n = normalize(&t, Backend::Sql);
        assert_eq!(n.subject, "juan perez");
        assert_eq!(n.verb, "realiza");
        assert_eq!(n.object, "yoga");
    }

    #[test]
    fn canonical_verb_strips_one_trailing_r() {
        assert_eq!(canonical_verb("tomar", Backend::Sql), "toma");
        assert_eq!(canonical_verb("padecer", Backend::Sql), "padece");
        assert_eq!(canonical_verb("realizar", Backend::Sql), "realiza");
        assert_eq!(canonical_verb("conocer", Backend::Cypher), "conoce");
        // `tener` does not become `tiene` once the `r` is gone
        assert_eq!(canonical_verb("tener", Backend::Sql), "tener");
        // unknown verbs pass through for the partitioner to tag
        assert_eq!(canonical_verb("volar", Backend::Sql), "volar");
    }

    #[test]
    fn parse_age_accepts_anos_suffix_and_bare_integers() {
        assert_eq!(parse_age("25 años"), Some(25));
        assert_eq!(parse_age("25 anos"), Some(25));
        assert_eq!(parse_age("3 año"), Some(3));
        assert_eq!(parse_age("42"), Some(42));
        assert_eq!(parse_age("muchos"), None);
        assert_eq!(parse_age(""), None);
    }

    #[test]
    fn parse_date_tries_formats_in_order() {
        assert_eq!(parse_date("15/01/2023"), Some("2023-01-15".to_string()));
        assert_eq!(parse_date("2023-01-15"), Some("2023-01-15".to_string()));
        assert_eq!(parse_date("15-01-2023"), Some("2023-01-15".to_string()));
        assert_eq!(parse_date("15/01/23"), Some("2023-01-15".to_string()));
    }

    #[test]
    fn parse_date_degrades_to_none() {
        assert_eq!(parse_date("hace dos semanas"), None);
        assert_eq!(parse_date("31/02/2023"), None);
        assert_eq!(parse_date(""), None);
    }
}
