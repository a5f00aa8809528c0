//! ontokg-cli: Command-line front end for the ontology knowledge graph.
//!
//! Loads layered configuration, wires the graph facade, and renders
//! lookups as JSON or as conversational replies.

pub mod action;
pub mod args;
pub mod config;
pub mod error;
