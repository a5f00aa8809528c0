//! Mapping tables from natural-language phrasing to schema identifiers.
//!
//! Lookups are exact and case-sensitive. An unknown table or key is not an
//! error: callers get `None` and decide how to degrade.

use std::collections::HashMap;

use serde::Deserialize;

/// Maps attribute phrasings ("what is") to stored property names.
pub const ATTRIBUTE_MAPPING: &str = "attribute-mapping";

/// Maps entity-type phrases ("business model") to schema type names.
pub const ENTITY_TYPE_MAPPING: &str = "entity-type-mapping";

/// One configured mapping entry.
///
/// The phrase is carried as a value, never as a map key, so its case
/// survives configuration loaders that fold keys.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MappingEntry {
    pub table: String,
    pub key: String,
    pub value: String,
}

/// Read-only lookup tables, keyed by table name.
#[derive(Debug, Clone, Default)]
pub struct MappingTables {
    tables: HashMap<String, HashMap<String, String>>,
}

impl MappingTables {
    /// The built-in tables.
    pub fn builtin() -> Self {
        let mut tables = Self::default();
        tables.insert(ATTRIBUTE_MAPPING, "what is", "n4sch__comment");
        tables.insert(ATTRIBUTE_MAPPING, "What is", "n4sch__comment");
        tables.insert(ENTITY_TYPE_MAPPING, "business model", "BusinessModel");
        tables
    }

    /// Layer configured entries on top: new tables are added and existing
    /// keys are replaced. Later entries win.
    pub fn with_overrides(mut self, entries: &[MappingEntry]) -> Self {
        for entry in entries {
            self.insert(&entry.table, &entry.key, &entry.value);
        }
        self
    }

    pub fn insert(&mut self, table: &str, key: &str, value: &str) {
        self.tables
            .entry(table.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    /// Resolve `key` in `table`.
    pub fn resolve(&self, table: &str, key: &str) -> Option<&str> {
        let value = self
            .tables
            .get(table)
            .and_then(|entries| entries.get(key))
            .map(String::as_str);
        if value.is_none() {
            tracing::debug!(table, key, "No mapping entry");
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(table: &str, key: &str, value: &str) -> MappingEntry {
        MappingEntry {
            table: table.to_string(),
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_builtin_entity_type_mapping() {
        let tables = MappingTables::builtin();
        assert_eq!(
            tables.resolve(ENTITY_TYPE_MAPPING, "business model"),
            Some("BusinessModel")
        );
        assert_eq!(tables.resolve(ENTITY_TYPE_MAPPING, "nonexistent"), None);
    }

    #[test]
    fn test_builtin_attribute_mapping() {
        let tables = MappingTables::builtin();
        assert_eq!(tables.resolve(ATTRIBUTE_MAPPING, "what is"), Some("n4sch__comment"));
        assert_eq!(tables.resolve(ATTRIBUTE_MAPPING, "What is"), Some("n4sch__comment"));
    }

    #[test]
    fn test_lookup_is_case_sensitive_and_exact() {
        let tables = MappingTables::builtin();
        assert_eq!(tables.resolve(ENTITY_TYPE_MAPPING, "Business Model"), None);
        assert_eq!(tables.resolve(ENTITY_TYPE_MAPPING, "business model "), None);
        assert_eq!(tables.resolve(ATTRIBUTE_MAPPING, "WHAT IS"), None);
    }

    #[test]
    fn test_unknown_table_is_absent() {
        let tables = MappingTables::builtin();
        assert_eq!(tables.resolve("color-mapping", "what is"), None);
    }

    #[test]
    fn test_resolve_is_repeatable() {
        let tables = MappingTables::builtin();
        let first = tables.resolve(ENTITY_TYPE_MAPPING, "business model");
        let second = tables.resolve(ENTITY_TYPE_MAPPING, "business model");
        assert_eq!(first, second);
        assert_eq!(tables.resolve("missing", "x"), tables.resolve("missing", "x"));
    }

    #[test]
    fn test_overrides_add_and_replace() {
        let overrides = vec![
            entry(ENTITY_TYPE_MAPPING, "business model", "BusinessPlan"),
            entry(ENTITY_TYPE_MAPPING, "tax benefits", "TaxBenefit"),
            entry("relation-mapping", "related to", "relatedTo"),
        ];

        let tables = MappingTables::builtin().with_overrides(&overrides);
        assert_eq!(
            tables.resolve(ENTITY_TYPE_MAPPING, "business model"),
            Some("BusinessPlan")
        );
        assert_eq!(tables.resolve(ENTITY_TYPE_MAPPING, "tax benefits"), Some("TaxBenefit"));
        assert_eq!(tables.resolve("relation-mapping", "related to"), Some("relatedTo"));
        assert_eq!(tables.resolve(ATTRIBUTE_MAPPING, "what is"), Some("n4sch__comment"));
    }

    #[test]
    fn test_overrides_keep_key_case() {
        let overrides = vec![entry(ATTRIBUTE_MAPPING, "What Does", "n4sch__comment")];
        let tables = MappingTables::builtin().with_overrides(&overrides);
        assert_eq!(tables.resolve(ATTRIBUTE_MAPPING, "What Does"), Some("n4sch__comment"));
        assert_eq!(tables.resolve(ATTRIBUTE_MAPPING, "what does"), None);
    }
}
