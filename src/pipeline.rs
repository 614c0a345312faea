//! Batch facade: partition, compile, assemble one script.
//!
//! This is the seam the orchestration layer calls. It stays pure (no
//! execution, no store drivers); leftovers come back as data and are also
//! surfaced through `tracing` so a subscriber can feed a data-quality
//! log. Routing leftovers to a secondary compiler is the caller's
//! decision.

use serde::Serialize;

use crate::compile::{compile, Backend};
use crate::triplet::{partition, CompileStats, Leftover, Triplet};

/// Everything one batch produced.
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    pub backend: Backend,
    /// Final script, entities before relations, one statement per line.
    pub script: String,
    /// Triplets the partitioner accepted.
    pub supported: usize,
    /// Partition-time leftovers in input order, then post-hoc property
    /// leftovers from the compiler.
    pub leftovers: Vec<Leftover>,
    pub stats: CompileStats,
}

/// Run the full deterministic path over one batch of raw triplets.
#[must_use]
pub fn compile_batch(triplets: &[Triplet], backend: Backend) -> BatchResult {
    let (supported, mut leftovers) = partition(triplets, backend);
    let outcome = compile(&supported, backend);

    let supported_count = supported.len();
    let script = outcome.script();
    leftovers.extend(outcome.leftovers);

    let mut stats = outcome.stats;
    stats.leftovers = leftovers.len();

    if !leftovers.is_empty() {
        if let Ok(payload) = serde_json::to_string(&leftovers) {
            tracing::warn!(
                backend = backend.as_str(),
                count = leftovers.len(),
                leftovers = %payload,
                "triplets outside the deterministic schema"
            );
        }
    }
    tracing::debug!(
        backend = backend.as_str(),
        input = triplets.len(),
        supported = supported_count,
        statements = stats.statements,
        "batch compiled"
    );

    BatchResult {
        backend,
        script,
        supported: supported_count,
        leftovers,
        stats,
    }
}
