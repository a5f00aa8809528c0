//! Parameterized Cypher builders for the fixed set of lookup shapes.
//!
//! Values always travel as bound parameters. Labels, relationship types and
//! property keys cannot be bound in Cypher, so they are emitted backtick-quoted
//! with embedded backticks doubled. Any non-empty name the graph can store is
//! accepted, including hyphens, spaces and non-ASCII letters.

use ontokg_core::Attributes;

use crate::client::GraphError;

/// A Cypher statement and its string parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CypherQuery {
    text: String,
    params: Vec<(String, String)>,
}

impl CypherQuery {
    fn new(text: String) -> Self {
        Self {
            text,
            params: Vec::new(),
        }
    }

    fn param(mut self, key: &str, value: &str) -> Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn into_query(self) -> neo4rs::Query {
        let Self { text, params } = self;
        params
            .into_iter()
            .fold(neo4rs::query(&text), |q, (key, value)| q.param(&key, value))
    }
}

/// Which way the shared relation points relative to the other endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `(other)<-[:T]-(n)`
    Incoming,
    /// `(other)-[:T]->(n)`
    Outgoing,
}

/// Quote `raw` for use as a label, relationship type, or property key.
///
/// Only empty names and names containing control characters are rejected.
pub fn identifier(kind: &'static str, raw: &str) -> Result<String, GraphError> {
    if raw.is_empty() || raw.chars().any(char::is_control) {
        return Err(GraphError::InvalidIdentifier {
            kind,
            value: raw.to_string(),
        });
    }
    Ok(format!("`{}`", raw.replace('`', "``")))
}

/// `MATCH (n:<type> {k: $a0, ...}) RETURN n`; the filter block is omitted
/// when there are no attributes.
pub fn entity_query(
    entity_type: &str,
    attributes: Option<&Attributes>,
) -> Result<CypherQuery, GraphError> {
    let label = identifier("label", entity_type)?;

    let mut pairs = Vec::new();
    let mut params = Vec::new();
    for (i, (key, value)) in attributes.into_iter().flatten().enumerate() {
        let param = format!("a{i}");
        pairs.push(format!("{}: ${param}", identifier("property", key)?));
        params.push((param, value.clone()));
    }

    let filter = if pairs.is_empty() {
        String::new()
    } else {
        format!(" {{{}}}", pairs.join(", "))
    };

    Ok(CypherQuery {
        text: format!("MATCH (n:{label}{filter}) RETURN n"),
        params,
    })
}

/// Read one property of the entity named `entity`. The property name is a
/// parameter too, through dynamic property access.
pub fn attribute_query(
    name_property: &str,
    entity: &str,
    attribute: &str,
) -> Result<CypherQuery, GraphError> {
    let name = identifier("property", name_property)?;
    Ok(CypherQuery::new(format!(
        "MATCH (n {{{name}: $entity}}) RETURN n[$attribute] AS value"
    ))
    .param("entity", entity)
    .param("attribute", attribute))
}

/// Every relation touching the entity, with both endpoints.
pub fn relations_query(
    entity_type: &str,
    name_property: &str,
    entity: &str,
) -> Result<CypherQuery, GraphError> {
    let label = identifier("label", entity_type)?;
    let name = identifier("property", name_property)?;
    Ok(CypherQuery::new(format!(
        "MATCH (n:{label} {{{name}: $entity}})-[r]-(m) RETURN n, r, m"
    ))
    .param("entity", entity))
}

/// Entities joined to the named entity by a `rel_type` edge, either direction.
pub fn direct_relation_query(
    name_property: &str,
    entity: &str,
    rel_type: &str,
) -> Result<CypherQuery, GraphError> {
    let name = identifier("property", name_property)?;
    let rel = identifier("relationship type", rel_type)?;
    Ok(
        CypherQuery::new(format!("MATCH (a {{{name}: $entity}})-[r:{rel}]-(n) RETURN n"))
            .param("entity", entity),
    )
}

/// Entities sharing a `rel_type` edge with the named endpoint.
pub fn sibling_query(
    name_property: &str,
    other: &str,
    rel_type: &str,
    direction: Direction,
) -> Result<CypherQuery, GraphError> {
    let name = identifier("property", name_property)?;
    let rel = identifier("relationship type", rel_type)?;
    let pattern = match direction {
        Direction::Incoming => format!("<-[r:{rel}]-"),
        Direction::Outgoing => format!("-[r:{rel}]->"),
    };
    Ok(
        CypherQuery::new(format!("MATCH (a {{{name}: $entity}}){pattern}(n) RETURN n"))
            .param("entity", other),
    )
}
