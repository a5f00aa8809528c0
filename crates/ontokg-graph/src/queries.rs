//! Query execution and result shaping.
//!
//! Each method runs one query and turns the rows into normalized records:
//! an entity list, an attribute lookup, or a relation list with endpoints.

use serde_json::Value;

use ontokg_core::{AttributeLookup, Entity, Relation};

use crate::client::{GraphClient, GraphError};
use crate::cypher::CypherQuery;
use crate::normalize::{normalize_node, normalize_relation, order_endpoints, RawNode, RawRelation};

impl GraphClient {
    /// Run a query returning nodes in `column`; database order is kept.
    pub async fn fetch_entities(
        &self,
        query: CypherQuery,
        column: &str,
    ) -> Result<Vec<Entity>, GraphError> {
        let rows = self.query_rows(query).await?;
        let mut entities = Vec::with_capacity(rows.len());
        for row in rows {
            let node = row_node(&row, column)?;
            entities.push(normalize_node(RawNode::from(&node)));
        }
        Ok(entities)
    }

    /// Run a query returning one `value` column and classify the row count.
    pub async fn fetch_attribute(&self, query: CypherQuery) -> Result<AttributeLookup, GraphError> {
        let rows = self.query_rows(query).await?;
        let mut values = Vec::with_capacity(rows.len());
        for row in rows {
            let value: Value = row.get("value").map_err(|e| {
                GraphError::Serialization(format!("Failed to deserialize attribute value: {e}"))
            })?;
            values.push(vec![value]);
        }
        Ok(AttributeLookup::from_rows(values))
    }

    /// Run a query returning `n, r, m` and attach both endpoints to each edge.
    pub async fn fetch_relations(&self, query: CypherQuery) -> Result<Vec<Relation>, GraphError> {
        let rows = self.query_rows(query).await?;
        let mut relations = Vec::with_capacity(rows.len());
        for row in rows {
            let n = normalize_node(RawNode::from(&row_node(&row, "n")?));
            let m = normalize_node(RawNode::from(&row_node(&row, "m")?));
            let neo_rel: neo4rs::Relation = row
                .get("r")
                .map_err(|e| GraphError::Serialization(format!("Failed to get relation: {e}")))?;

            let raw = RawRelation::from(&neo_rel);
            let (start, end) = order_endpoints(&raw, n, m);
            relations.push(normalize_relation(raw).attach(start, end));
        }
        Ok(relations)
    }
}

fn row_node(row: &neo4rs::Row, column: &str) -> Result<neo4rs::Node, GraphError> {
    row.get(column)
        .map_err(|e| GraphError::Serialization(format!("Failed to deserialize node: {e}")))
}
