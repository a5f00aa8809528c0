//! The knowledge-graph facade: lookup intents over the ontology graph.

use async_trait::async_trait;

use ontokg_core::{
    AttributeLookup, Attributes, Entity, KnowledgeBase, MappingTables, Relation, SiblingMap,
    SiblingMerge,
};

use crate::client::{GraphClient, GraphError};
use crate::cypher;
use crate::siblings::collect_siblings;

/// Property holding an entity's unique name within its type.
pub const DEFAULT_NAME_PROPERTY: &str = "n4sch__name";

/// Read-only lookups over an ontology stored in Neo4j.
pub struct KnowledgeGraph {
    client: GraphClient,
    mappings: MappingTables,
    name_property: String,
    sibling_merge: SiblingMerge,
}

impl KnowledgeGraph {
    /// Create a facade with the built-in mapping tables.
    pub fn new(client: GraphClient) -> Self {
        Self {
            client,
            mappings: MappingTables::builtin(),
            name_property: DEFAULT_NAME_PROPERTY.to_string(),
            sibling_merge: SiblingMerge::default(),
        }
    }

    pub fn with_mappings(mut self, mappings: MappingTables) -> Self {
        self.mappings = mappings;
        self
    }

    pub fn with_name_property(mut self, name_property: impl Into<String>) -> Self {
        self.name_property = name_property.into();
        self
    }

    pub fn with_sibling_merge(mut self, merge: SiblingMerge) -> Self {
        self.sibling_merge = merge;
        self
    }

    pub fn name_property(&self) -> &str {
        &self.name_property
    }

    /// Release the underlying connection pool.
    pub fn close(self) {
        self.client.close();
    }

    // ── Entity Lookups ───────────────────────────────────────────

    /// All entities of `entity_type` matching every attribute.
    pub async fn get_entities(
        &self,
        entity_type: &str,
        attributes: Option<&Attributes>,
    ) -> Result<Vec<Entity>, GraphError> {
        let q = cypher::entity_query(entity_type, attributes)?;
        self.client.fetch_entities(q, "n").await
    }

    /// The value of `attribute` on the entity named `entity`.
    pub async fn get_attribute_of(
        &self,
        entity: &str,
        attribute: &str,
    ) -> Result<AttributeLookup, GraphError> {
        let q = cypher::attribute_query(&self.name_property, entity, attribute)?;
        let lookup = self.client.fetch_attribute(q).await?;
        if let AttributeLookup::Ambiguous(rows) = &lookup {
            tracing::warn!(entity, attribute, matches = rows.len(), "Attribute lookup is ambiguous");
        }
        Ok(lookup)
    }

    /// Find the entity of `entity_type` whose `key_attribute` is `entity`.
    pub async fn validate_entity(
        &self,
        entity_type: &str,
        entity: &str,
        key_attribute: &str,
        attributes: Option<&Attributes>,
    ) -> Result<Option<Entity>, GraphError> {
        let mut filter = attributes.cloned().unwrap_or_default();
        filter.insert(key_attribute.to_string(), entity.to_string());

        let mut found = self.get_entities(entity_type, Some(&filter)).await?;
        if found.len() > 1 {
            tracing::warn!(
                entity_type,
                entity,
                matches = found.len(),
                "Entity is not unique; using first match"
            );
        }
        Ok(if found.is_empty() {
            None
        } else {
            Some(found.swap_remove(0))
        })
    }

    // ── Relation Lookups ─────────────────────────────────────────

    /// Entities joined to `entity` by a `rel_type` edge in either direction,
    /// e.g. `isA` for individuals or `subClassOf` for subclasses.
    pub async fn get_direct_relation_of(
        &self,
        entity: &str,
        rel_type: &str,
    ) -> Result<Vec<Entity>, GraphError> {
        let q = cypher::direct_relation_query(&self.name_property, entity, rel_type)?;
        self.client.fetch_entities(q, "n").await
    }

    /// Every relation touching `entity`, with both endpoints attached.
    pub async fn get_all_relations(
        &self,
        entity_type: &str,
        entity: &str,
    ) -> Result<Vec<Relation>, GraphError> {
        let q = cypher::relations_query(entity_type, &self.name_property, entity)?;
        self.client.fetch_relations(q).await
    }

    /// Entities sharing a relation type with `entity`, keyed by that type.
    pub async fn get_sibling_entities(
        &self,
        entity_type: &str,
        entity: &str,
    ) -> Result<SiblingMap, GraphError> {
        let relations = self.get_all_relations(entity_type, entity).await?;
        let client = &self.client;
        collect_siblings(
            entity,
            &self.name_property,
            self.sibling_merge,
            &relations,
            move |q| client.fetch_entities(q, "n"),
        )
        .await
    }

    // ── Mappings ─────────────────────────────────────────────────

    /// Resolve `mapping_key` in the mapping table `mapping_type`.
    pub fn map(&self, mapping_type: &str, mapping_key: &str) -> Option<&str> {
        self.mappings.resolve(mapping_type, mapping_key)
    }
}

#[async_trait]
impl KnowledgeBase for KnowledgeGraph {
    type Error = GraphError;

    async fn get_entities(
        &self,
        entity_type: &str,
        attributes: Option<&Attributes>,
    ) -> Result<Vec<Entity>, GraphError> {
        KnowledgeGraph::get_entities(self, entity_type, attributes).await
    }

    async fn get_attribute_of(
        &self,
        entity: &str,
        attribute: &str,
    ) -> Result<AttributeLookup, GraphError> {
        KnowledgeGraph::get_attribute_of(self, entity, attribute).await
    }

    async fn validate_entity(
        &self,
        entity_type: &str,
        entity: &str,
        key_attribute: &str,
        attributes: Option<&Attributes>,
    ) -> Result<Option<Entity>, GraphError> {
        KnowledgeGraph::validate_entity(self, entity_type, entity, key_attribute, attributes).await
    }

    fn map(&self, mapping_type: &str, mapping_key: &str) -> Option<&str> {
        KnowledgeGraph::map(self, mapping_type, mapping_key)
    }
}
