//! Strict schema partitioning.
//!
//! A total, pure classification: every input triplet lands in exactly one
//! of the two output lists, order preserved within each. Leftovers always
//! carry a reason code so the orchestration layer can route them to a
//! fallback compiler or a data-quality log. This completeness is the
//! contract that makes hybrid (deterministic + LLM) operation safe
//! upstream.

use crate::compile::Backend;
use crate::schema;
use crate::triplet::normalize::{normalize, parse_age};
use crate::triplet::types::{Leftover, ReasonCode, Triplet};

/// Split raw triplets into schema-supported (normalized) triplets and
/// reason-tagged leftovers.
///
/// Backend-aware because the `conoce` relation verb only exists in the
/// graph vocabulary.
#[must_use]
pub fn partition(triplets: &[Triplet], backend: Backend) -> (Vec<Triplet>, Vec<Leftover>) {
    let mut supported = Vec::new();
    let mut leftovers = Vec::new();

    for raw in triplets {
        let t = normalize(raw, backend);
        if schema::is_schema_verb(&t.verb, backend) {
            supported.push(t);
            continue;
        }
        if t.verb == schema::AGE_VERB {
            if parse_age(&t.object).is_some() {
                supported.push(t);
            } else {
                leftovers.push(Leftover::new(t, ReasonCode::HasWithoutAge));
            }
            continue;
        }
        leftovers.push(Leftover::new(t, ReasonCode::VerbNotAllowed));
    }

    (supported, leftovers)
}
