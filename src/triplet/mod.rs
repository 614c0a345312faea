//! Triplet input types, normalization and schema partitioning.
//!
//! A triplet is a `(subject, verb, object)` fact statement produced by an
//! external extraction step. No assumption is made about extraction
//! quality: the partitioner's job is exactly to quarantine anything
//! non-conforming, with a reason code, so nothing is ever dropped
//! silently.

pub mod normalize;
pub mod partition;
pub mod types;

pub use self::normalize::{canonical_verb, normalize, parse_age, parse_date};
pub use self::partition::partition;
pub use self::types::{CompileStats, Leftover, ReasonCode, Triplet};
