//! habitgraph: a deterministic triplet-to-store compiler.
//!
//! Takes free-form `(subject, verb, object)` triplets about a person's
//! health and activity habits and compiles them into idempotent upsert
//! scripts for a fixed entity/relationship schema (Person, Symptom,
//! Activity, Medication). Triplets the schema cannot express are never
//! dropped silently: they come back as reason-tagged leftovers so an
//! upstream orchestrator can route them elsewhere (a secondary LLM
//! compiler, a data-quality log).
//!
//! # Architecture
//!
//! ```text
//! raw triplets → partition ──supported──→ compile ──→ script (SQL or Cypher)
//!                    │                       │
//!                    └──leftovers──┐   post-hoc leftovers
//!                                  ▼         ▼
//!                        (triplet, reason) pairs → caller
//! ```
//!
//! The whole crate is pure, synchronous computation: no I/O, no store
//! drivers. The emitted script is a plain string handed unmodified to an
//! external statement executor.
//!
//! # Usage
//!
//! ```
//! use habitgraph::{compile_batch, Backend, Triplet};
//!
//! let triplets = vec![
//!     Triplet::new("Ana", "padece", "mareos"),
//!     Triplet::new("mareos", "inicio", "15/01/2023"),
//! ];
//! let result = compile_batch(&triplets, Backend::Sql);
//! assert!(result.leftovers.is_empty());
//! assert!(result.script.contains("ON CONFLICT(user_id)"));
//! ```

pub mod compile;
pub mod error;
pub mod pipeline;
pub mod registry;
pub mod schema;
pub mod text;
pub mod triplet;

pub use compile::{compile, Backend, CompileOutcome};
pub use error::{CompilerError, Result};
pub use pipeline::{compile_batch, BatchResult};
pub use registry::{Entity, EntityRegistry, Relation, Value};
pub use schema::{EntityKind, IdScheme, RelationKind};
pub use triplet::{partition, CompileStats, Leftover, ReasonCode, Triplet};
