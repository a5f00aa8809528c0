//! ontokg Graph — Neo4j query facade for the ontology knowledge graph.
//!
//! Translates lookup intents (entities of a type, an attribute of an entity,
//! the relations of an entity, its siblings) into parameterized Cypher,
//! and normalizes the returned nodes and edges into uniform records.
//! The graph is only ever read.

pub mod client;
pub mod cypher;
pub mod facade;
pub mod normalize;
pub mod queries;
pub mod siblings;

pub use client::{GraphClient, GraphConfig, GraphError};
pub use facade::KnowledgeGraph;
