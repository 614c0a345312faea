//! Two-pass triplet compiler with a relational and a graph renderer.
//!
//! Pass 1 walks the supported triplets and builds the entity registry:
//! age triplets set the person's age, relation triplets create both
//! endpoints and record a relation, property triplets are buffered
//! (their owning entity kind is unknown until the registry exists).
//! Pass 2 resolves the buffered properties against the registry; a
//! property whose subject was never established becomes a post-hoc
//! leftover rather than a guess.
//!
//! Rendering is deterministic: entities first, sorted by
//! (kind, identifier), then relations sorted by (kind, left, right).
//! Compiling the same triplet set twice, in any input order, yields
//! byte-identical scripts.

pub mod cypher;
pub mod sql;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CompilerError;
use crate::registry::{Entity, EntityRegistry, Relation, Value};
use crate::schema::{self, IdScheme, ValueKind};
use crate::triplet::normalize::{normalize, parse_age, parse_date};
use crate::triplet::types::{CompileStats, Leftover, ReasonCode, Triplet};

use self::cypher::CypherRenderer;
use self::sql::SqlRenderer;

/// Rendering target, selected explicitly at the orchestration boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// Relational upserts (SQLite dialect).
    Sql,
    /// Graph merges (Cypher).
    Cypher,
}

impl Backend {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sql => "sql",
            Self::Cypher => "cypher",
        }
    }

    pub(crate) fn id_scheme(self) -> IdScheme {
        match self {
            Self::Sql => IdScheme::Relational,
            Self::Cypher => IdScheme::Graph,
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = CompilerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sql" | "sqlite" => Ok(Self::Sql),
            "neo4j" | "cypher" => Ok(Self::Cypher),
            other => Err(CompilerError::UnknownBackend(other.to_string())),
        }
    }
}

/// Statement renderer for one backend. Both implementations walk the same
/// registry; only the emitted dialect differs.
pub(crate) trait Renderer {
    fn entity_statement(&self, entity: &Entity) -> String;
    fn relation_statement(&self, relation: &Relation) -> String;
}

/// Result of one compilation: ordered statements, post-hoc leftovers and
/// counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOutcome {
    /// One idempotent upsert/merge per entity, sorted by (kind, id).
    pub entity_statements: Vec<String>,
    /// One idempotent insert/merge per relation, sorted by
    /// (kind, left, right).
    pub relation_statements: Vec<String>,
    /// Property triplets whose subject was never established, plus any
    /// unclassifiable triplet that bypassed the partitioner.
    pub leftovers: Vec<Leftover>,
    pub stats: CompileStats,
}

impl CompileOutcome {
    /// The full script: entities first, then relations, one statement per
    /// line. Empty string when nothing was compiled.
    #[must_use]
    pub fn script(&self) -> String {
        self.entity_statements
            .iter()
            .chain(self.relation_statements.iter())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Compile supported triplets into an idempotent script for the given
/// backend.
///
/// Inputs are normalized again on entry (normalization is idempotent), so
/// calling this directly with raw triplets is safe: anything the
/// partitioner would have rejected is quarantined here as a leftover
/// instead of being dropped. This function never fails on input data.
#[must_use]
pub fn compile(triplets: &[Triplet], backend: Backend) -> CompileOutcome {
    let mut registry = EntityRegistry::new(backend.id_scheme());
    let mut buffered: Vec<(Triplet, &'static str, ValueKind)> = Vec::new();
    let mut leftovers: Vec<Leftover> = Vec::new();
    let mut stats = CompileStats::default();

    // Pass 1: entities from relations and age; relation records.
    for raw in triplets {
        let t = normalize(raw, backend);

        if t.verb == schema::AGE_VERB {
            match parse_age(&t.object) {
                Some(age) => {
                    registry
                        .person_by_name(&t.subject)
                        .set("edad", Value::Int(i64::from(age)));
                }
                None => leftovers.push(Leftover::new(t, ReasonCode::HasWithoutAge)),
            }
            continue;
        }

        if let Some(kind) = schema::relation_for_verb(&t.verb, backend) {
            let left = registry.person_by_name(&t.subject).id.clone();
            let right = match kind.object_kind() {
                schema::EntityKind::Person => registry.person_by_name(&t.object).id.clone(),
                schema::EntityKind::Symptom => registry.symptom_by_type(&t.object).id.clone(),
                schema::EntityKind::Activity => registry.activity_by_name(&t.object).id.clone(),
                schema::EntityKind::Medication => registry.medication_by_type(&t.object).id.clone(),
            };
            registry.push_relation(kind, left, right);
            continue;
        }

        if let Some((prop, value_kind)) = schema::property_for_verb(&t.verb) {
            buffered.push((t, prop, value_kind));
            continue;
        }

        leftovers.push(Leftover::new(t, ReasonCode::VerbNotAllowed));
    }

    // Pass 2: apply buffered properties to entities that now exist.
    for (t, prop, value_kind) in buffered {
        let Some((kind, id)) = registry.property_target(&t.subject) else {
            leftovers.push(Leftover::new(t, ReasonCode::PropertyWithoutPriorEntity));
            continue;
        };
        let value = match value_kind {
            ValueKind::Text => Some(Value::Text(t.object.clone())),
            ValueKind::Date => parse_date(&t.object).map(Value::Text),
        };
        match value {
            Some(value) => {
                if let Some(entity) = registry.entity_mut(kind, &id) {
                    entity.set(prop, value);
                    stats.properties_applied += 1;
                }
            }
            // unparseable date: skip the write, keep the entity
            None => stats.dates_skipped += 1,
        }
    }

    let renderer: &dyn Renderer = match backend {
        Backend::Sql => &SqlRenderer,
        Backend::Cypher => &CypherRenderer,
    };
    let entity_statements: Vec<String> = registry
        .entities()
        .map(|e| renderer.entity_statement(e))
        .collect();
    let relation_statements: Vec<String> = registry
        .relations()
        .map(|r| renderer.relation_statement(r))
        .collect();

    stats.entities = entity_statements.len();
    stats.relations = relation_statements.len();
    stats.statements = stats.entities + stats.relations;
    stats.leftovers = leftovers.len();

    tracing::debug!(
        backend = backend.as_str(),
        entities = stats.entities,
        relations = stats.relations,
        leftovers = stats.leftovers,
        "compiled triplet batch"
    );

    CompileOutcome {
        entity_statements,
        relation_statements,
        leftovers,
        stats,
    }
}
