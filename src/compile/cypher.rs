//! Graph renderer: Cypher merges.
//!
//! Entities become `MERGE` statements on the natural identifier with the
//! identity field (`nombre`/`tipo`) set only on create and the updatable
//! fields set on both branches, so immutable identity is written once and
//! everything else follows last-batch-wins. Relation statements always
//! `MATCH` both endpoints by identifier before merging the relationship;
//! a bare label-only match would cartesian-join every node of the label.

use crate::registry::{Entity, Relation, Value};

use super::Renderer;

pub(crate) struct CypherRenderer;

/// Cypher literal for a present value. Single quotes are
/// backslash-escaped.
fn quote(value: &Value) -> String {
    match value {
        Value::Text(s) => format!("'{}'", s.replace('\'', "\\'")),
        Value::Int(i) => i.to_string(),
    }
}

/// `n.<col> = <value>` assignments for the given columns, skipping absent
/// properties. The identity column gets the minimal-text fallback so it is
/// never absent.
fn set_clauses(entity: &Entity, include_identity: bool) -> Vec<String> {
    let identity = entity.kind.minimal_property();
    entity
        .kind
        .columns()
        .iter()
        .filter_map(|col| {
            if *col == identity {
                if !include_identity {
                    return None;
                }
                return Some(format!(
                    "n.{col} = {}",
                    quote(&Value::Text(entity.minimal_text()))
                ));
            }
            entity.get(col).map(|v| format!("n.{col} = {}", quote(v)))
        })
        .collect()
}

impl Renderer for CypherRenderer {
    fn entity_statement(&self, entity: &Entity) -> String {
        let label = entity.kind.label();
        let key_column = entity.kind.key_column();
        let id = quote(&Value::text(entity.id.clone()));

        let on_create = set_clauses(entity, true);
        let on_match = set_clauses(entity, false);

        let on_create = if on_create.is_empty() {
            "n._created = true".to_string()
        } else {
            on_create.join(", ")
        };
        let on_match = if on_match.is_empty() {
            "n._seen = true".to_string()
        } else {
            on_match.join(", ")
        };

        format!(
            "MERGE (n:{label} {{{key_column}: {id}}}) ON CREATE SET {on_create} ON MATCH SET {on_match};"
        )
    }

    fn relation_statement(&self, relation: &Relation) -> String {
        let target = relation.kind.object_kind();
        let left = quote(&Value::text(relation.left.clone()));
        let right = quote(&Value::text(relation.right.clone()));
        format!(
            "MATCH (p:Persona {{user_id: {left}}}), (x:{} {{{}: {right}}}) MERGE (p)-[:{}]->(x);",
            target.label(),
            target.key_column(),
            relation.kind.rel_type(),
        )
    }
}

/// Uniqueness constraints and lookup indexes for the four labels.
/// Execution is the caller's job; every statement is `IF NOT EXISTS` so
/// re-running is harmless.
#[must_use]
pub fn bootstrap_statements() -> Vec<&'static str> {
    vec![
        "CREATE CONSTRAINT persona_id IF NOT EXISTS FOR (n:Persona) REQUIRE n.user_id IS UNIQUE",
        "CREATE CONSTRAINT sintoma_id IF NOT EXISTS FOR (n:Sintoma) REQUIRE n.sintoma_id IS UNIQUE",
        "CREATE CONSTRAINT actividad_id IF NOT EXISTS FOR (n:Actividad) REQUIRE n.actividad_id IS UNIQUE",
        "CREATE CONSTRAINT medicacion_id IF NOT EXISTS FOR (n:Medicacion) REQUIRE n.medicacion_id IS UNIQUE",
        "CREATE INDEX persona_nombre IF NOT EXISTS FOR (n:Persona) ON (n.nombre)",
        "CREATE INDEX sintoma_tipo IF NOT EXISTS FOR (n:Sintoma) ON (n.tipo)",
        "CREATE INDEX actividad_nombre IF NOT EXISTS FOR (n:Actividad) ON (n.nombre)",
        "CREATE INDEX medicacion_tipo IF NOT EXISTS FOR (n:Medicacion) ON (n.tipo)",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::{compile, Backend};
    use crate::triplet::Triplet;

    fn t(s: &str, v: &str, o: &str) -> Triplet {
        Triplet::new(s, v, o)
    }

    #[test]
    fn entity_merge_splits_create_and_match_branches() {
        let outcome = compile(
            &[t("Juan", "tiene", "25 años"), t("Juan", "padece", "temblor")],
            Backend::Cypher,
        );
        let person = &outcome.entity_statements[0];
        assert!(person.starts_with("MERGE (n:Persona {user_id: 'Persona_juan'})"));
        assert!(person.contains("ON CREATE SET n.nombre = 'Juan', n.edad = 25"));
        // identity is create-only; age updates on match
        assert!(person.contains("ON MATCH SET n.edad = 25"));
        assert!(!person.contains("ON MATCH SET n.nombre"));
    }

    #[test]
    fn empty_match_branch_falls_back_to_seen_marker() {
        let outcome = compile(&[t("Juan", "realiza", "yoga")], Backend::Cypher);
        let activity = &outcome.entity_statements[1];
        assert!(activity.contains("ON MATCH SET n._seen = true"));
    }

    #[test]
    fn relation_matches_both_endpoints_by_identifier() {
        let outcome = compile(&[t("Ana", "padece", "mareos")], Backend::Cypher);
        let stmt = &outcome.relation_statements[0];
        assert_eq!(
            stmt,
            "MATCH (p:Persona {user_id: 'Persona_ana'}), (x:Sintoma {sintoma_id: 'Sintoma_mareos'}) MERGE (p)-[:PADECE]->(x);"
        );
    }

    #[test]
    fn knows_links_two_persons() {
        let outcome = compile(&[t("Juan", "conoce", "Ana")], Backend::Cypher);
        assert_eq!(outcome.stats.entities, 2);
        let stmt = &outcome.relation_statements[0];
        assert!(stmt.contains("(x:Persona {user_id: 'Persona_ana'})"));
        assert!(stmt.contains("MERGE (p)-[:CONOCE]->(x);"));
    }

    #[test]
    fn single_quotes_are_backslash_escaped() {
        assert_eq!(quote(&Value::text("l'hospitalet")), "'l\\'hospitalet'");
    }

    #[test]
    fn missing_minimal_property_falls_back_to_identifier_text() {
        use crate::registry::Entity;
        use crate::schema::EntityKind;

        let entity = Entity::new(EntityKind::Medication, "Medicacion_levodopa".to_string());
        let stmt = CypherRenderer.entity_statement(&entity);
        assert!(stmt.contains("ON CREATE SET n.tipo = 'levodopa'"));
    }

    #[test]
    fn bootstrap_covers_constraints_and_indexes_for_every_label() {
        let statements = bootstrap_statements();
        for label in ["Persona", "Sintoma", "Actividad", "Medicacion"] {
            assert!(statements.iter().any(|s| s.contains("CONSTRAINT") && s.contains(label)));
            assert!(statements.iter().any(|s| s.contains("INDEX") && s.contains(label)));
        }
    }
}
