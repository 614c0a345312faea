//! In-memory entity registry (collector) for one compilation run.
//!
//! Caller-owned and batch-scoped: every call to
//! [`compile`](crate::compile::compile) constructs its own registry and
//! discards it afterwards, so independent batches never share state.
//! Repeated mentions of the same canonical text resolve to the same
//! entity; that dedup is the invariant the whole idempotent-upsert story
//! rests on.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::schema::{EntityKind, IdScheme, RelationKind};
use crate::text::{canonicalize, slugify, title_case};

/// A property value. Ages are integers, everything else (including ISO
/// dates) is text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Int(i64),
}

impl Value {
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Int(_) => None,
        }
    }
}

/// One discovered entity: kind, derived identifier and the properties
/// accumulated across all mentions in the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub kind: EntityKind,
    pub id: String,
    props: BTreeMap<&'static str, Value>,
}

impl Entity {
    pub(crate) fn new(kind: EntityKind, id: String) -> Self {
        Self {
            kind,
            id,
            props: BTreeMap::new(),
        }
    }

    /// Set a property. Later writes for the same property win within a
    /// batch; a property is never removed once set. Absent values never
    /// reach this method (date parse failures skip the write upstream).
    pub fn set(&mut self, prop: &'static str, value: Value) {
        self.props.insert(prop, value);
    }

    #[must_use]
    pub fn get(&self, prop: &str) -> Option<&Value> {
        self.props.get(prop)
    }

    /// Presentation fallback for the kind-defining property: the explicit
    /// value when one was set, otherwise canonical text recovered from the
    /// identifier (prefix stripped, underscores back to spaces). Never
    /// absent, never fabricated beyond the input.
    #[must_use]
    pub fn minimal_text(&self) -> String {
        if let Some(Value::Text(s)) = self.get(self.kind.minimal_property()) {
            return s.clone();
        }
        self.id
            .split_once('_')
            .map(|(_, rest)| rest.replace('_', " "))
            .unwrap_or_else(|| self.id.clone())
    }
}

/// A deduplicated (relation-kind, left id, right id) record. The derived
/// `Ord` is the stable render order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Relation {
    pub kind: RelationKind,
    pub left: String,
    pub right: String,
}

/// Deduplicated index of discovered entities plus the relation set.
#[derive(Debug)]
pub struct EntityRegistry {
    scheme: IdScheme,
    entities: BTreeMap<(EntityKind, String), Entity>,
    index: HashMap<(EntityKind, String), String>,
    relations: BTreeSet<Relation>,
}

impl EntityRegistry {
    #[must_use]
    pub fn new(scheme: IdScheme) -> Self {
        Self {
            scheme,
            entities: BTreeMap::new(),
            index: HashMap::new(),
            relations: BTreeSet::new(),
        }
    }

    fn get_or_create(&mut self, kind: EntityKind, text: &str) -> &mut Entity {
        let canonical = canonicalize(text);
        let id = match self.index.get(&(kind, canonical.clone())) {
            Some(id) => id.clone(),
            None => {
                let id = format!("{}{}", kind.id_prefix(self.scheme), slugify(&canonical));
                self.index.insert((kind, canonical), id.clone());
                id
            }
        };
        self.entities
            .entry((kind, id.clone()))
            .or_insert_with(|| Entity::new(kind, id))
    }

    /// Get or create the Person for a (raw or canonical) name. Stores the
    /// display name in Title Case.
    pub fn person_by_name(&mut self, name: &str) -> &mut Entity {
        let display = title_case(&canonicalize(name));
        let entity = self.get_or_create(EntityKind::Person, name);
        entity.set("nombre", Value::Text(display));
        entity
    }

    /// Get or create the Symptom for a symptom type.
    pub fn symptom_by_type(&mut self, tipo: &str) -> &mut Entity {
        let canonical = canonicalize(tipo);
        let entity = self.get_or_create(EntityKind::Symptom, tipo);
        entity.set("tipo", Value::Text(canonical));
        entity
    }

    /// Get or create the Activity for an activity name.
    pub fn activity_by_name(&mut self, nombre: &str) -> &mut Entity {
        let canonical = canonicalize(nombre);
        let entity = self.get_or_create(EntityKind::Activity, nombre);
        entity.set("nombre", Value::Text(canonical));
        entity
    }

    /// Get or create the Medication for a medication type.
    pub fn medication_by_type(&mut self, tipo: &str) -> &mut Entity {
        let canonical = canonicalize(tipo);
        let entity = self.get_or_create(EntityKind::Medication, tipo);
        entity.set("tipo", Value::Text(canonical));
        entity
    }

    /// Record a relation. The set dedups and keeps the stable
    /// (kind, left, right) order for free.
    pub fn push_relation(&mut self, kind: RelationKind, left: String, right: String) {
        self.relations.insert(Relation { kind, left, right });
    }

    /// Resolve a property subject against the Symptom, then Activity,
    /// then Medication indexes. Person is deliberately excluded:
    /// properties never attach to a person in this schema, and a person
    /// name colliding with a symptom text must not swallow the property.
    #[must_use]
    pub fn property_target(&self, subject: &str) -> Option<(EntityKind, String)> {
        let canonical = canonicalize(subject);
        for kind in [
            EntityKind::Symptom,
            EntityKind::Activity,
            EntityKind::Medication,
        ] {
            if let Some(id) = self.index.get(&(kind, canonical.clone())) {
                return Some((kind, id.clone()));
            }
        }
        None
    }

    pub fn entity_mut(&mut self, kind: EntityKind, id: &str) -> Option<&mut Entity> {
        self.entities.get_mut(&(kind, id.to_string()))
    }

    /// Entities in stable (kind, identifier) order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Relations in stable (kind, left, right) order.
    pub fn relations(&self) -> impl Iterator<Item = &Relation> {
        self.relations.iter()
    }

    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn relation_count(&self) -> usize {
        self.relations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_canonical_text_resolves_to_the_same_entity() {
        let mut reg = EntityRegistry::new(IdScheme::Relational);
        let id_a = reg.person_by_name("José").id.clone();
        let id_b = reg.person_by_name("  jose ").id.clone();
        assert_eq!(id_a, id_b);
        assert_eq!(id_a, "persona_jose");
        assert_eq!(reg.entity_count(), 1);
    }

    #[test]
    fn id_prefix_follows_the_scheme() {
        let mut reg = EntityRegistry::new(IdScheme::Graph);
        assert_eq!(reg.symptom_by_type("mareos").id, "Sintoma_mareos");
        let mut reg = EntityRegistry::new(IdScheme::Relational);
        assert_eq!(reg.symptom_by_type("mareos").id, "sintoma_mareos");
    }

    #[test]
    fn person_display_name_is_title_cased() {
        let mut reg = EntityRegistry::new(IdScheme::Relational);
        let person = reg.person_by_name("juan perez");
        assert_eq!(person.get("nombre"), Some(&Value::text("Juan Perez")));
    }

    #[test]
    fn later_property_writes_win() {
        let mut reg = EntityRegistry::new(IdScheme::Relational);
        reg.symptom_by_type("mareos").set("gravedad", Value::text("leve"));
        reg.symptom_by_type("mareos").set("gravedad", Value::text("grave"));
        assert_eq!(
            reg.symptom_by_type("mareos").get("gravedad"),
            Some(&Value::text("grave"))
        );
    }

    #[test]
    fn relations_dedup_and_sort() {
        let mut reg = EntityRegistry::new(IdScheme::Relational);
        reg.push_relation(
            RelationKind::Performs,
            "persona_juan".into(),
            "actividad_yoga".into(),
        );
        reg.push_relation(
            RelationKind::Performs,
            "persona_juan".into(),
            "actividad_yoga".into(),
        );
        reg.push_relation(
            RelationKind::Takes,
            "persona_juan".into(),
            "medicacion_levodopa".into(),
        );
        let rels: Vec<_> = reg.relations().collect();
        assert_eq!(rels.len(), 2);
        assert_eq!(rels[0].kind, RelationKind::Takes);
        assert_eq!(rels[1].kind, RelationKind::Performs);
    }

    #[test]
    fn property_target_checks_symptom_then_activity_then_medication() {
        let mut reg = EntityRegistry::new(IdScheme::Relational);
        reg.activity_by_name("natacion");
        reg.medication_by_type("natacion");
        assert_eq!(
            reg.property_target("natacion"),
            Some((EntityKind::Activity, "actividad_natacion".to_string()))
        );
        assert_eq!(reg.property_target("desconocido"), None);
    }

    #[test]
    fn property_target_never_resolves_to_a_person() {
        let mut reg = EntityRegistry::new(IdScheme::Relational);
        reg.person_by_name("dolor");
        assert_eq!(reg.property_target("dolor"), None);
    }

    #[test]
    fn minimal_text_falls_back_to_the_identifier() {
        let entity = Entity::new(EntityKind::Activity, "actividad_tai_chi".to_string());
        assert_eq!(entity.minimal_text(), "tai chi");
    }
}
