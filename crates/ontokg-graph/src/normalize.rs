//! Conversion of raw Neo4j nodes and edges into normalized records.

use serde_json::{Map, Value};

use ontokg_core::{EdgeRecord, Entity, EntityKind};

/// A node as read from the driver: id, label set, and decoded properties.
#[derive(Debug, Clone, PartialEq)]
pub struct RawNode {
    pub id: i64,
    pub labels: Vec<String>,
    pub properties: Map<String, Value>,
}

/// An edge as read from the driver.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRelation {
    pub id: i64,
    pub rel_type: String,
    pub start_id: i64,
    pub end_id: i64,
    pub properties: Map<String, Value>,
}

impl From<&neo4rs::Node> for RawNode {
    fn from(node: &neo4rs::Node) -> Self {
        let mut properties = Map::new();
        for key in node.keys() {
            match node.get::<Value>(&key) {
                Ok(value) => {
                    properties.insert(key.to_string(), value);
                }
                Err(e) => {
                    tracing::warn!(node_id = node.id(), key = %key, error = %e, "Skipping undecodable node property");
                }
            }
        }
        Self {
            id: node.id(),
            labels: node.labels().iter().map(|l| l.to_string()).collect(),
            properties,
        }
    }
}

impl From<&neo4rs::Relation> for RawRelation {
    fn from(rel: &neo4rs::Relation) -> Self {
        let mut properties = Map::new();
        for key in rel.keys() {
            match rel.get::<Value>(&key) {
                Ok(value) => {
                    properties.insert(key.to_string(), value);
                }
                Err(e) => {
                    tracing::warn!(rel_id = rel.id(), key = %key, error = %e, "Skipping undecodable relation property");
                }
            }
        }
        Self {
            id: rel.id(),
            rel_type: rel.typ().to_string(),
            start_id: rel.start_node_id(),
            end_id: rel.end_node_id(),
            properties,
        }
    }
}

/// Normalize a node: classify its labels and keep every property.
pub fn normalize_node(raw: RawNode) -> Entity {
    warn_on_synthetic_collision(raw.id, &raw.properties);
    Entity {
        id: raw.id,
        kind: EntityKind::classify(raw.labels.as_slice()),
        properties: raw.properties,
    }
}

/// Normalize an edge. Endpoints are attached separately with
/// [`EdgeRecord::attach`].
pub fn normalize_relation(raw: RawRelation) -> EdgeRecord {
    warn_on_synthetic_collision(raw.id, &raw.properties);
    EdgeRecord {
        id: raw.id,
        rel_type: raw.rel_type,
        properties: raw.properties,
    }
}

/// Order two normalized nodes as (start, end) using the edge's own endpoint
/// ids. Falls back to the given order if neither node is the start.
pub fn order_endpoints(rel: &RawRelation, a: Entity, b: Entity) -> (Entity, Entity) {
    if a.id == rel.start_id {
        (a, b)
    } else if b.id == rel.start_id {
        (b, a)
    } else {
        tracing::warn!(
            rel_id = rel.id,
            start_id = rel.start_id,
            "Relation start node not among returned endpoints"
        );
        (a, b)
    }
}

fn warn_on_synthetic_collision(id: i64, properties: &Map<String, Value>) {
    for key in ["id", "type"] {
        if properties.contains_key(key) {
            tracing::warn!(id, key, "Stored property shadows synthetic key");
        }
    }
}
