//! The knowledge-base contract consumed by intent handlers.

use async_trait::async_trait;

use crate::types::{AttributeLookup, Attributes, Entity};

/// Read-only lookups over a domain knowledge base.
///
/// Every method is required: a backend that cannot answer one of these
/// lookups does not compile, instead of failing at run time.
#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// All entities of `entity_type` whose properties equal every entry in
    /// `attributes`. `None` and an empty map both mean "no filter".
    async fn get_entities(
        &self,
        entity_type: &str,
        attributes: Option<&Attributes>,
    ) -> Result<Vec<Entity>, Self::Error>;

    /// The value of `attribute` on the entity named `entity`.
    async fn get_attribute_of(
        &self,
        entity: &str,
        attribute: &str,
    ) -> Result<AttributeLookup, Self::Error>;

    /// The entity of `entity_type` whose `key_attribute` equals `entity` and
    /// that matches `attributes`, if any.
    async fn validate_entity(
        &self,
        entity_type: &str,
        entity: &str,
        key_attribute: &str,
        attributes: Option<&Attributes>,
    ) -> Result<Option<Entity>, Self::Error>;

    /// Resolve `mapping_key` in the mapping table `mapping_type`.
    fn map(&self, mapping_type: &str, mapping_key: &str) -> Option<&str>;
}
