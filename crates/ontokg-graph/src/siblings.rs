//! Sibling discovery planning.
//!
//! Siblings of an anchor are found in two hops: the anchor's relations, then
//! for each relation every entity attached to the other endpoint by an edge
//! of the same type and direction. Planning and filtering are pure, and the
//! second-hop queries go through an injected fetch function.

use std::future::Future;

use ontokg_core::{Entity, Relation, SiblingMap, SiblingMerge};

use crate::client::GraphError;
use crate::cypher::{self, CypherQuery, Direction};

/// One second-hop lookup derived from a relation of the anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct SiblingHop<'a> {
    pub rel_type: &'a str,
    /// The endpoint that is not the anchor.
    pub other: &'a Entity,
    pub direction: Direction,
}

impl SiblingHop<'_> {
    /// Drop the anchor and the other endpoint from a second-hop result.
    pub fn retain_siblings(
        &self,
        found: Vec<Entity>,
        anchor: &str,
        name_property: &str,
    ) -> Vec<Entity> {
        found
            .into_iter()
            .filter(|e| e.id != self.other.id && e.get_str(name_property) != Some(anchor))
            .collect()
    }
}

/// Plan one hop per relation.
///
/// When the anchor is the start of the edge, siblings are the other
/// entities pointing into the end: `(end)<-[:T]-(n)`. Otherwise the anchor
/// is the end and siblings are what the start points to: `(start)-[:T]->(n)`.
pub fn sibling_hops<'a>(
    anchor: &str,
    name_property: &str,
    relations: &'a [Relation],
) -> Vec<SiblingHop<'a>> {
    relations
        .iter()
        .map(|rel| {
            if rel.start.get_str(name_property) == Some(anchor) {
                SiblingHop {
                    rel_type: &rel.rel_type,
                    other: &rel.end,
                    direction: Direction::Incoming,
                }
            } else {
                SiblingHop {
                    rel_type: &rel.rel_type,
                    other: &rel.start,
                    direction: Direction::Outgoing,
                }
            }
        })
        .collect()
}

/// Run the second hop for every relation of `anchor` and merge the results.
///
/// Every relation type gets a key, even when its list is empty. A relation
/// whose other endpoint has no name, or whose type cannot be quoted, is
/// logged and keyed with an empty list instead of failing the whole call.
pub async fn collect_siblings<F, Fut>(
    anchor: &str,
    name_property: &str,
    merge: SiblingMerge,
    relations: &[Relation],
    mut fetch: F,
) -> Result<SiblingMap, GraphError>
where
    F: FnMut(CypherQuery) -> Fut,
    Fut: Future<Output = Result<Vec<Entity>, GraphError>>,
{
    let mut siblings = SiblingMap::new();

    for hop in sibling_hops(anchor, name_property, relations) {
        let Some(other_name) = hop.other.get_str(name_property) else {
            tracing::warn!(
                rel_type = hop.rel_type,
                node_id = hop.other.id,
                "Related entity has no name; no siblings looked up"
            );
            siblings.insert(hop.rel_type, Vec::new(), merge);
            continue;
        };

        let query =
            cypher::sibling_query(name_property, other_name, hop.rel_type, hop.direction);
        let q = match query {
            Ok(q) => q,
            Err(GraphError::InvalidIdentifier { kind, value }) => {
                tracing::warn!(kind, value = %value, "Unusable identifier; no siblings looked up");
                siblings.insert(hop.rel_type, Vec::new(), merge);
                continue;
            }
            Err(e) => return Err(e),
        };

        let found = fetch(q).await?;
        let kept = hop.retain_siblings(found, anchor, name_property);
        siblings.insert(hop.rel_type, kept, merge);
    }

    tracing::debug!(anchor, relation_types = siblings.len(), "Siblings collected");
    Ok(siblings)
}
