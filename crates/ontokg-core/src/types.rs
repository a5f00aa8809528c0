//! Core domain types for the ontology knowledge graph.
//!
//! Nodes and edges are read from Neo4j and flattened into uniform records:
//! a database id, a semantic type, and every stored property.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Attribute filters for entity lookups, keyed by property name.
pub type Attributes = BTreeMap<String, String>;

// ── Entity Kinds ──────────────────────────────────────────────────

/// Semantic type of an ontology node, inferred from its label set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EntityKind {
    Class,
    Relationship,
    SubClass,
    Individual,
    /// None of the schema labels are present.
    #[default]
    Unknown,
}

/// Recognized schema labels, in classification priority order.
pub const SCHEMA_LABELS: [(&str, EntityKind); 4] = [
    ("n4sch__Class", EntityKind::Class),
    ("n4sch__Relationship", EntityKind::Relationship),
    ("n4sch__SubClass", EntityKind::SubClass),
    ("n4sch__Individual", EntityKind::Individual),
];

impl EntityKind {
    /// Classify a label set. The first entry of [`SCHEMA_LABELS`] found in
    /// `labels` wins; a node with no schema label is `Unknown`.
    pub fn classify<S: AsRef<str>>(labels: &[S]) -> Self {
        SCHEMA_LABELS
            .iter()
            .find(|(schema_label, _)| labels.iter().any(|l| l.as_ref() == *schema_label))
            .map(|(_, kind)| *kind)
            .unwrap_or_default()
    }

    /// The type label written into normalized records (`""` for `Unknown`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Class => "Class",
            Self::Relationship => "Relationship",
            Self::SubClass => "SubClass",
            Self::Individual => "Individual",
            Self::Unknown => "",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EntityKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// ── Entities ──────────────────────────────────────────────────────

/// A normalized graph node.
///
/// Serializes as a flat dictionary: `id`, `type`, then every stored property.
/// A property named `id` or `type` overwrites the synthetic key.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Database-assigned identifier, opaque and unique per database instance.
    pub id: i64,
    pub kind: EntityKind,
    pub properties: Map<String, Value>,
}

impl Entity {
    pub fn new(id: i64, kind: EntityKind) -> Self {
        Self {
            id,
            kind,
            properties: Map::new(),
        }
    }

    /// Builder-style property setter.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Look up a stored property.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Look up a stored property holding a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }

    /// Flatten into a dictionary.
    pub fn to_map(&self) -> Map<String, Value> {
        flatten(self.id, self.kind.as_str(), &self.properties)
    }
}

impl Serialize for Entity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_map().serialize(serializer)
    }
}

// ── Relations ─────────────────────────────────────────────────────

/// A normalized edge whose endpoints have not been attached yet.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRecord {
    pub id: i64,
    pub rel_type: String,
    pub properties: Map<String, Value>,
}

impl EdgeRecord {
    /// Attach the two normalized endpoints, producing a full relation.
    pub fn attach(self, start: Entity, end: Entity) -> Relation {
        Relation {
            id: self.id,
            rel_type: self.rel_type,
            start,
            end,
            properties: self.properties,
        }
    }
}

/// A normalized edge with both endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    pub id: i64,
    /// The edge label, e.g. an ontology relationship name.
    pub rel_type: String,
    pub start: Entity,
    pub end: Entity,
    pub properties: Map<String, Value>,
}

impl Relation {
    pub fn is_self_loop(&self) -> bool {
        self.start.id == self.end.id
    }

    /// Flatten into a dictionary with nested `start` and `end` entities.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = flatten(self.id, &self.rel_type, &self.properties);
        map.insert("start".to_string(), Value::Object(self.start.to_map()));
        map.insert("end".to_string(), Value::Object(self.end.to_map()));
        map
    }
}

impl Serialize for Relation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_map().serialize(serializer)
    }
}

fn flatten(id: i64, type_label: &str, properties: &Map<String, Value>) -> Map<String, Value> {
    let mut map = Map::with_capacity(properties.len() + 2);
    map.insert("id".to_string(), Value::from(id));
    map.insert("type".to_string(), Value::from(type_label));
    for (key, value) in properties {
        map.insert(key.clone(), value.clone());
    }
    map
}

// ── Attribute Lookups ─────────────────────────────────────────────

/// Outcome of reading one attribute from an entity expected to be unique.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "values", rename_all = "snake_case")]
pub enum AttributeLookup {
    /// No entity matched.
    NotFound,
    /// Exactly one entity matched; the values of its row.
    Unique(Vec<Value>),
    /// Several entities matched; every row is reported.
    Ambiguous(Vec<Vec<Value>>),
}

impl AttributeLookup {
    /// Classify the rows returned by an attribute query.
    pub fn from_rows(mut rows: Vec<Vec<Value>>) -> Self {
        match rows.len() {
            0 => Self::NotFound,
            1 => Self::Unique(rows.remove(0)),
            _ => Self::Ambiguous(rows),
        }
    }

    /// The values when exactly one entity matched.
    pub fn unique(&self) -> Option<&[Value]> {
        match self {
            Self::Unique(values) => Some(values),
            _ => None,
        }
    }
}

// ── Siblings ──────────────────────────────────────────────────────

/// How sibling lists are combined when several relations share a type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiblingMerge {
    /// Append, skipping entities already listed.
    #[default]
    Accumulate,
    /// The last relation of a type replaces earlier results.
    Overwrite,
}

/// Entities sharing a relation type with an anchor entity, keyed by type.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SiblingMap {
    entries: BTreeMap<String, Vec<Entity>>,
}

impl SiblingMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the siblings found through one relation of `rel_type`.
    pub fn insert(&mut self, rel_type: &str, entities: Vec<Entity>, merge: SiblingMerge) {
        match merge {
            SiblingMerge::Overwrite => {
                self.entries.insert(rel_type.to_string(), entities);
            }
            SiblingMerge::Accumulate => {
                let slot = self.entries.entry(rel_type.to_string()).or_default();
                for entity in entities {
                    if !slot.iter().any(|e| e.id == entity.id) {
                        slot.push(entity);
                    }
                }
            }
        }
    }

    pub fn get(&self, rel_type: &str) -> Option<&[Entity]> {
        self.entries.get(rel_type).map(Vec::as_slice)
    }

    pub fn relation_types(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(id: i64, name: &str) -> Entity {
        Entity::new(id, EntityKind::Class).with_property("n4sch__name", name)
    }

    #[test]
    fn test_classify_single_label() {
        assert_eq!(EntityKind::classify(&["n4sch__Class"]), EntityKind::Class);
        assert_eq!(
            EntityKind::classify(&["Resource", "n4sch__Individual"]),
            EntityKind::Individual
        );
    }

    #[test]
    fn test_classify_no_schema_label() {
        let kind = EntityKind::classify(&["Resource", "_GraphConfig"]);
        assert_eq!(kind, EntityKind::Unknown);
        assert_eq!(kind.as_str(), "");

        let empty: [&str; 0] = [];
        assert_eq!(EntityKind::classify(&empty), EntityKind::Unknown);
    }

    #[test]
    fn test_classify_priority_order() {
        assert_eq!(
            EntityKind::classify(&["n4sch__Individual", "n4sch__SubClass", "n4sch__Class"]),
            EntityKind::Class
        );
        assert_eq!(
            EntityKind::classify(&["n4sch__SubClass", "n4sch__Relationship"]),
            EntityKind::Relationship
        );
        assert_eq!(
            EntityKind::classify(&["n4sch__Individual", "n4sch__SubClass"]),
            EntityKind::SubClass
        );
    }

    #[test]
    fn test_entity_to_map_flattens_properties() {
        let entity = named(7, "BusinessModel").with_property("n4sch__comment", "A plan for X");
        let map = entity.to_map();
        assert_eq!(map["id"], 7);
        assert_eq!(map["type"], "Class");
        assert_eq!(map["n4sch__name"], "BusinessModel");
        assert_eq!(map["n4sch__comment"], "A plan for X");
    }

    #[test]
    fn test_property_overwrites_synthetic_key() {
        let entity = Entity::new(3, EntityKind::Class).with_property("type", "custom");
        let map = entity.to_map();
        assert_eq!(map["type"], "custom");
        assert_eq!(map["id"], 3);
    }

    #[test]
    fn test_relation_serializes_endpoints() {
        let edge = EdgeRecord {
            id: 10,
            rel_type: "relatedTo".to_string(),
            properties: Map::new(),
        };
        let rel = edge.attach(named(1, "TaxBenefit"), named(2, "Subsidy"));
        assert!(!rel.is_self_loop());

        let json = serde_json::to_value(&rel).unwrap();
        assert_eq!(json["type"], "relatedTo");
        assert_eq!(json["start"]["n4sch__name"], "TaxBenefit");
        assert_eq!(json["end"]["n4sch__name"], "Subsidy");
    }

    #[test]
    fn test_attribute_lookup_classification() {
        assert_eq!(AttributeLookup::from_rows(vec![]), AttributeLookup::NotFound);

        let unique = AttributeLookup::from_rows(vec![vec![Value::from("A plan")]]);
        assert_eq!(unique.unique(), Some(&[Value::from("A plan")][..]));

        let ambiguous =
            AttributeLookup::from_rows(vec![vec![Value::from("a")], vec![Value::from("b")]]);
        assert!(matches!(ambiguous, AttributeLookup::Ambiguous(ref rows) if rows.len() == 2));
        assert_eq!(ambiguous.unique(), None);
    }

    #[test]
    fn test_attribute_lookup_json_shape() {
        let json = serde_json::to_value(AttributeLookup::NotFound).unwrap();
        assert_eq!(json["status"], "not_found");
    }

    #[test]
    fn test_sibling_overwrite_keeps_last() {
        let mut map = SiblingMap::new();
        map.insert("relatedTo", vec![named(1, "A")], SiblingMerge::Overwrite);
        map.insert("relatedTo", vec![named(2, "B")], SiblingMerge::Overwrite);

        let siblings = map.get("relatedTo").unwrap();
        assert_eq!(siblings.len(), 1);
        assert_eq!(siblings[0].id, 2);
    }

    #[test]
    fn test_sibling_accumulate_merges_without_duplicates() {
        let mut map = SiblingMap::new();
        map.insert("relatedTo", vec![named(1, "A"), named(2, "B")], SiblingMerge::Accumulate);
        map.insert("relatedTo", vec![named(2, "B"), named(3, "C")], SiblingMerge::Accumulate);

        let ids: Vec<i64> = map.get("relatedTo").unwrap().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_sibling_empty_list_still_keyed() {
        let mut map = SiblingMap::new();
        assert!(map.is_empty());
        map.insert("subClassOf", vec![], SiblingMerge::Accumulate);
        assert!(!map.is_empty());
        assert_eq!(map.len(), 1);
        assert_eq!(map.relation_types().collect::<Vec<_>>(), vec!["subClassOf"]);
        assert!(map.get("subClassOf").unwrap().is_empty());
    }
}
