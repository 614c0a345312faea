//! Data types flowing between the partitioner, the compiler and callers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A `(subject, verb, object)` fact statement, raw or canonical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triplet {
    pub subject: String,
    pub verb: String,
    pub object: String,
}

impl Triplet {
    pub fn new(
        subject: impl Into<String>,
        verb: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            verb: verb.into(),
            object: object.into(),
        }
    }
}

impl fmt::Display for Triplet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.subject, self.verb, self.object)
    }
}

/// Why a triplet was rejected by the deterministic schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    /// Verb outside the fixed vocabulary.
    VerbNotAllowed,
    /// Age verb whose object does not parse as an age.
    HasWithoutAge,
    /// Property triplet whose subject was never established as an entity
    /// earlier in the same batch.
    PropertyWithoutPriorEntity,
}

impl ReasonCode {
    /// Wire string shared with downstream log sinks and fallback
    /// compilers.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::VerbNotAllowed => "verb_not_allowed",
            Self::HasWithoutAge => "has_without_age",
            Self::PropertyWithoutPriorEntity => "property_without_prior_entity",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A triplet the deterministic path could not express, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leftover {
    pub triplet: Triplet,
    pub reason: ReasonCode,
}

impl Leftover {
    #[must_use]
    pub fn new(triplet: Triplet, reason: ReasonCode) -> Self {
        Self { triplet, reason }
    }
}

/// Counters from one compilation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileStats {
    /// Distinct entities rendered.
    pub entities: usize,
    /// Distinct relations rendered (after dedup).
    pub relations: usize,
    /// Total statements emitted.
    pub statements: usize,
    /// Property triplets applied to an existing entity.
    pub properties_applied: usize,
    /// Date-kind properties skipped because no input format matched.
    pub dates_skipped: usize,
    /// Triplets rejected with a reason code.
    pub leftovers: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_codes_serialize_as_wire_strings() {
        let json = serde_json::to_string(&ReasonCode::PropertyWithoutPriorEntity).unwrap();
        assert_eq!(json, "\"property_without_prior_entity\"");
        assert_eq!(ReasonCode::VerbNotAllowed.as_str(), "verb_not_allowed");
        assert_eq!(ReasonCode::HasWithoutAge.as_str(), "has_without_age");
    }

    #[test]
    fn triplet_display_is_readable() {
        let t = Triplet::new("juan", "realiza", "yoga");
        assert_eq!(t.to_string(), "(juan, realiza, yoga)");
    }
}
