//! Relational renderer: SQLite-dialect upserts.
//!
//! Entities become `INSERT ... ON CONFLICT(<natural key>) DO UPDATE`
//! statements that overwrite every non-key column, so re-running a batch
//! against persistent storage is last-batch-wins. Relations become
//! `INSERT OR IGNORE ... SELECT` statements that resolve both surrogate
//! keys through correlated subqueries on the natural identifiers, making
//! repeat inserts idempotent no-ops.

use crate::registry::{Entity, Relation, Value};
use crate::schema::RelationKind;

use super::Renderer;

pub(crate) struct SqlRenderer;

/// SQL literal for a present value. Single quotes are doubled.
fn quote(value: &Value) -> String {
    match value {
        Value::Text(s) => format!("'{}'", s.replace('\'', "''")),
        Value::Int(i) => i.to_string(),
    }
}

fn quote_opt(value: Option<&Value>) -> String {
    value.map_or_else(|| "NULL".to_string(), quote)
}

impl Renderer for SqlRenderer {
    fn entity_statement(&self, entity: &Entity) -> String {
        let table = entity.kind.table();
        let key_column = entity.kind.key_column();
        let columns = entity.kind.columns();

        let mut cols = vec![key_column];
        cols.extend(columns);

        let mut vals = vec![quote(&Value::text(entity.id.clone()))];
        for col in columns {
            if *col == entity.kind.minimal_property() {
                vals.push(quote(&Value::Text(entity.minimal_text())));
            } else {
                vals.push(quote_opt(entity.get(col)));
            }
        }

        let updates = columns
            .iter()
            .map(|col| format!("{col} = excluded.{col}"))
            .collect::<Vec<_>>()
            .join(",\n  ");

        format!(
            "INSERT INTO {table} ({}) VALUES ({})\nON CONFLICT({key_column}) DO UPDATE SET\n  {updates};",
            cols.join(", "),
            vals.join(", "),
        )
    }

    fn relation_statement(&self, relation: &Relation) -> String {
        let left = relation.left.replace('\'', "''");
        let right = relation.right.replace('\'', "''");
        match relation.kind {
            RelationKind::Takes => format!(
                "INSERT OR IGNORE INTO persona_toma_medicacion (persona_id, medicacion_id, pauta)\n\
                 SELECT p.id, m.id, m.periodicidad FROM persona p, medicacion m\n\
                 WHERE p.user_id = '{left}' AND m.medicacion_id = '{right}';"
            ),
            RelationKind::HasSymptom => format!(
                "INSERT OR IGNORE INTO persona_padece_sintoma (persona_id, sintoma_id, desde)\n\
                 SELECT p.id, s.id, s.fecha_inicio FROM persona p, sintoma s\n\
                 WHERE p.user_id = '{left}' AND s.sintoma_id = '{right}';"
            ),
            RelationKind::Performs => format!(
                "INSERT OR IGNORE INTO persona_realiza_actividad (persona_id, actividad_id)\n\
                 SELECT p.id, a.id FROM persona p, actividad a\n\
                 WHERE p.user_id = '{left}' AND a.actividad_id = '{right}';"
            ),
            // the partitioner never lets `conoce` through on this backend
            RelationKind::Knows => unreachable!("CONOCE has no relational mapping"),
        }
    }
}

/// Domain DDL for the relational store: entity tables keyed by natural
/// identifier, N:M relation tables with composite primary keys, lookup
/// indexes. Execution is the caller's job.
#[must_use]
pub fn bootstrap_script() -> &'static str {
    r#"PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS persona (
  id         INTEGER PRIMARY KEY AUTOINCREMENT,
  user_id    TEXT UNIQUE NOT NULL,
  nombre     TEXT NOT NULL,
  edad       INTEGER CHECK (edad >= 0),
  created_at TEXT NOT NULL DEFAULT (datetime('now')),
  updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS sintoma (
  id           INTEGER PRIMARY KEY AUTOINCREMENT,
  sintoma_id   TEXT UNIQUE,
  tipo         TEXT NOT NULL,
  fecha_inicio TEXT,
  fecha_fin    TEXT,
  categoria    TEXT,
  frecuencia   TEXT,
  gravedad     TEXT CHECK (gravedad IN ('leve','moderada','grave')),
  created_at   TEXT NOT NULL DEFAULT (datetime('now')),
  updated_at   TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS actividad (
  id           INTEGER PRIMARY KEY AUTOINCREMENT,
  actividad_id TEXT UNIQUE,
  nombre       TEXT NOT NULL,
  categoria    TEXT,
  frecuencia   TEXT,
  created_at   TEXT NOT NULL DEFAULT (datetime('now')),
  updated_at   TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS medicacion (
  id            INTEGER PRIMARY KEY AUTOINCREMENT,
  medicacion_id TEXT UNIQUE,
  tipo          TEXT NOT NULL,
  periodicidad  TEXT,
  created_at    TEXT NOT NULL DEFAULT (datetime('now')),
  updated_at    TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS persona_toma_medicacion (
  persona_id    INTEGER NOT NULL,
  medicacion_id INTEGER NOT NULL,
  pauta         TEXT,
  desde         TEXT,
  hasta         TEXT,
  PRIMARY KEY (persona_id, medicacion_id),
  FOREIGN KEY (persona_id)    REFERENCES persona(id)    ON DELETE CASCADE,
  FOREIGN KEY (medicacion_id) REFERENCES medicacion(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS persona_padece_sintoma (
  persona_id INTEGER NOT NULL,
  sintoma_id INTEGER NOT NULL,
  desde      TEXT,
  hasta      TEXT,
  PRIMARY KEY (persona_id, sintoma_id),
  FOREIGN KEY (persona_id) REFERENCES persona(id) ON DELETE CASCADE,
  FOREIGN KEY (sintoma_id) REFERENCES sintoma(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS persona_realiza_actividad (
  persona_id   INTEGER NOT NULL,
  actividad_id INTEGER NOT NULL,
  desde        TEXT,
  hasta        TEXT,
  PRIMARY KEY (persona_id, actividad_id),
  FOREIGN KEY (persona_id)   REFERENCES persona(id)   ON DELETE CASCADE,
  FOREIGN KEY (actividad_id) REFERENCES actividad(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_persona_user_id ON persona(user_id);
CREATE INDEX IF NOT EXISTS idx_sintoma_tipo ON sintoma(tipo);
CREATE INDEX IF NOT EXISTS idx_actividad_nombre ON actividad(nombre);
CREATE INDEX IF NOT EXISTS idx_medicacion_tipo ON medicacion(tipo);
CREATE INDEX IF NOT EXISTS idx_toma_persona ON persona_toma_medicacion(persona_id);
CREATE INDEX IF NOT EXISTS idx_toma_medicacion ON persona_toma_medicacion(medicacion_id);
CREATE INDEX IF NOT EXISTS idx_padece_persona ON persona_padece_sintoma(persona_id);
CREATE INDEX IF NOT EXISTS idx_padece_sintoma ON persona_padece_sintoma(sintoma_id);
CREATE INDEX IF NOT EXISTS idx_realiza_persona ON persona_realiza_actividad(persona_id);
CREATE INDEX IF NOT EXISTS idx_realiza_actividad ON persona_realiza_actividad(actividad_id);
"#
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
    fn entity_upsert_overwrites_every_non_key_column() {
        let outcome = compile(&[t("Juan", "tiene", "25 años")], Backend::Sql);
        let stmt = &outcome.entity_statements[0];
        assert!(stmt.starts_with("INSERT INTO persona (user_id, nombre, edad) VALUES"));
        assert!(stmt.contains("'persona_juan', 'Juan', 25"));
        assert!(stmt.contains("ON CONFLICT(user_id) DO UPDATE SET"));
        assert!(stmt.contains("nombre = excluded.nombre"));
        assert!(stmt.contains("edad = excluded.edad"));
        assert!(stmt.ends_with(';'));
    }

    #[test]
    fn relation_insert_resolves_surrogate_keys_by_natural_id() {
        let outcome = compile(&[t("Juan", "toma", "levodopa")], Backend::Sql);
        let stmt = &outcome.relation_statements[0];
        assert!(stmt.starts_with("INSERT OR IGNORE INTO persona_toma_medicacion"));
        assert!(stmt.contains("WHERE p.user_id = 'persona_juan'"));
        assert!(stmt.contains("m.medicacion_id = 'medicacion_levodopa'"));
    }

    #[test]
    fn symptom_relation_carries_the_start_date_column() {
        let outcome = compile(&[t("Ana", "padece", "mareos")], Backend::Sql);
        let stmt = &outcome.relation_statements[0];
        assert!(stmt.contains("(persona_id, sintoma_id, desde)"));
        assert!(stmt.contains("s.fecha_inicio"));
    }

    #[test]
    fn single_quotes_are_doubled() {
        assert_eq!(quote(&Value::text("l'hospitalet")), "'l''hospitalet'");
        assert_eq!(quote(&Value::Int(7)), "7");
        assert_eq!(quote_opt(None), "NULL");
    }

    #[test]
    fn absent_optional_columns_render_null() {
        let outcome = compile(&[t("Juan", "realiza", "yoga")], Backend::Sql);
        let activity = &outcome.entity_statements[1];
        assert!(activity.contains("VALUES ('actividad_yoga', 'yoga', NULL, NULL)"));
    }

    #[test]
    fn missing_minimal_property_renders_identifier_text_not_null() {
        use crate::registry::Entity;
        use crate::schema::EntityKind;

        let entity = Entity::new(EntityKind::Symptom, "sintoma_dolor_lumbar".to_string());
        let stmt = SqlRenderer.entity_statement(&entity);
        assert!(stmt.contains("'dolor lumbar'"));
        assert!(!stmt.contains("VALUES ('sintoma_dolor_lumbar', NULL"));
    }

    #[test]
    fn bootstrap_creates_every_domain_table() {
        let ddl = bootstrap_script();
        for table in [
            "persona",
            "sintoma",
            "actividad",
            "medicacion",
            "persona_toma_medicacion",
            "persona_padece_sintoma",
            "persona_realiza_actividad",
        ] {
            assert!(ddl.contains(&format!("CREATE TABLE IF NOT EXISTS {table} (")));
        }
    }
}
