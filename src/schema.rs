//! The fixed entity/relationship schema and its verb vocabulary.
//!
//! Everything the deterministic compiler can express lives here: the four
//! entity kinds, the relation verbs, the property verbs and the per-kind
//! column layout both renderers share. The partitioner quarantines any
//! triplet that falls outside this vocabulary.

use serde::{Deserialize, Serialize};

use crate::compile::Backend;

/// Verb that carries a person's age (`"Juan tiene 25 años"`).
pub const AGE_VERB: &str = "tiene";

/// Accepted input date formats, tried in order. Output is always ISO
/// `%Y-%m-%d`.
pub const DATE_INPUT_FORMATS: [&str; 4] = ["%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y", "%d/%m/%y"];

/// Identifier prefix convention. The relational schema uses lower-case
/// prefixes (`persona_juan`), the graph schema capitalized ones
/// (`Persona_juan`). Apart from the prefix case the derivation is shared
/// bit for bit across both paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdScheme {
    Relational,
    Graph,
}

/// The four entity kinds the schema knows about.
///
/// The derived `Ord` gives the stable kind order used when sorting
/// entities for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Person,
    Symptom,
    Activity,
    Medication,
}

impl EntityKind {
    /// Relational table name.
    #[must_use]
    pub fn table(self) -> &'static str {
        match self {
            Self::Person => "persona",
            Self::Symptom => "sintoma",
            Self::Activity => "actividad",
            Self::Medication => "medicacion",
        }
    }

    /// Graph node label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Person => "Persona",
            Self::Symptom => "Sintoma",
            Self::Activity => "Actividad",
            Self::Medication => "Medicacion",
        }
    }

    /// Natural-key column holding the derived identifier.
    #[must_use]
    pub fn key_column(self) -> &'static str {
        match self {
            Self::Person => "user_id",
            Self::Symptom => "sintoma_id",
            Self::Activity => "actividad_id",
            Self::Medication => "medicacion_id",
        }
    }

    /// The one property each kind must never render as NULL. When it was
    /// never explicitly set, renderers substitute the identifier-derived
    /// canonical text.
    #[must_use]
    pub fn minimal_property(self) -> &'static str {
        match self {
            Self::Person | Self::Activity => "nombre",
            Self::Symptom | Self::Medication => "tipo",
        }
    }

    /// Non-key columns in their fixed render order.
    #[must_use]
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Self::Person => &["nombre", "edad"],
            Self::Symptom => &[
                "tipo",
                "fecha_inicio",
                "fecha_fin",
                "categoria",
                "frecuencia",
                "gravedad",
            ],
            Self::Activity => &["nombre", "categoria", "frecuencia"],
            Self::Medication => &["tipo", "periodicidad"],
        }
    }

    /// Identifier prefix for the given scheme.
    #[must_use]
    pub fn id_prefix(self, scheme: IdScheme) -> &'static str {
        match scheme {
            IdScheme::Relational => match self {
                Self::Person => "persona_",
                Self::Symptom => "sintoma_",
                Self::Activity => "actividad_",
                Self::Medication => "medicacion_",
            },
            IdScheme::Graph => match self {
                Self::Person => "Persona_",
                Self::Symptom => "Sintoma_",
                Self::Activity => "Actividad_",
                Self::Medication => "Medicacion_",
            },
        }
    }
}

/// Canonical relations between a person and the entity on the right-hand
/// side of the triplet. `Knows` (verb `conoce`, Person→Person) exists in
/// the graph vocabulary only; the relational schema has no table for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Takes,
    HasSymptom,
    Performs,
    Knows,
}

impl RelationKind {
    /// Entity kind expected on the right-hand side.
    #[must_use]
    pub fn object_kind(self) -> EntityKind {
        match self {
            Self::Takes => EntityKind::Medication,
            Self::HasSymptom => EntityKind::Symptom,
            Self::Performs => EntityKind::Activity,
            Self::Knows => EntityKind::Person,
        }
    }

    /// Relational N:M table name. `None` for graph-only relations.
    #[must_use]
    pub fn table(self) -> Option<&'static str> {
        match self {
            Self::Takes => Some("persona_toma_medicacion"),
            Self::HasSymptom => Some("persona_padece_sintoma"),
            Self::Performs => Some("persona_realiza_actividad"),
            Self::Knows => None,
        }
    }

    /// Graph relationship type.
    #[must_use]
    pub fn rel_type(self) -> &'static str {
        match self {
            Self::Takes => "TOMA",
            Self::HasSymptom => "PADECE",
            Self::Performs => "REALIZA",
            Self::Knows => "CONOCE",
        }
    }
}

/// Map a canonical verb to its relation kind, if the backend supports it.
#[must_use]
pub fn relation_for_verb(verb: &str, backend: Backend) -> Option<RelationKind> {
    match verb {
        "toma" => Some(RelationKind::Takes),
        "padece" => Some(RelationKind::HasSymptom),
        "realiza" => Some(RelationKind::Performs),
        "conoce" if backend == Backend::Cypher => Some(RelationKind::Knows),
        _ => None,
    }
}

/// How a property value is interpreted before it is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Date,
}

/// Map a canonical property verb to its (column, value kind) pair.
#[must_use]
pub fn property_for_verb(verb: &str) -> Option<(&'static str, ValueKind)> {
    match verb {
        "categoria" => Some(("categoria", ValueKind::Text)),
        "frecuencia" => Some(("frecuencia", ValueKind::Text)),
        "gravedad" => Some(("gravedad", ValueKind::Text)),
        "inicio" => Some(("fecha_inicio", ValueKind::Date)),
        "fin" => Some(("fecha_fin", ValueKind::Date)),
        "se toma" | "periodicidad" => Some(("periodicidad", ValueKind::Text)),
        _ => None,
    }
}

/// True when the verb belongs to the deterministic vocabulary (relation or
/// property; the age verb is checked separately because it also constrains
/// the object).
#[must_use]
pub fn is_schema_verb(verb: &str, backend: Backend) -> bool {
    relation_for_verb(verb, backend).is_some() || property_for_verb(verb).is_some()
}
