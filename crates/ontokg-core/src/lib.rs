//! ontokg-core: Shared types for the ontology knowledge graph.
//!
//! This crate provides the foundational pieces used by every ontokg component:
//! - Normalized entity and relation records read from the graph
//! - Sibling maps and attribute lookup outcomes
//! - Mapping tables from natural-language phrasing to schema identifiers
//! - The `KnowledgeBase` contract implemented by concrete backends

pub mod knowledge_base;
pub mod mapping;
pub mod types;

pub use knowledge_base::KnowledgeBase;
pub use mapping::{MappingEntry, MappingTables, ATTRIBUTE_MAPPING, ENTITY_TYPE_MAPPING};
pub use types::{
    AttributeLookup, Attributes, EdgeRecord, Entity, EntityKind, Relation, SiblingMap,
    SiblingMerge, SCHEMA_LABELS,
};
