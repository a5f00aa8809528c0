//! Configuration for the ontokg command-line tool.
//!
//! Loaded from (in priority order):
//! 1. Environment variables (`ONTOKG__` prefix, `__` between levels)
//! 2. Config file (`ontokg.toml`, or the `--config` prefix)
//! 3. Defaults

use serde::Deserialize;

use ontokg_core::{MappingEntry, MappingTables, SiblingMerge};
use ontokg_graph::facade::DEFAULT_NAME_PROPERTY;
use ontokg_graph::GraphConfig;

use crate::error::{CliError, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub neo4j: GraphConfig,

    #[serde(default)]
    pub knowledge: KnowledgeSettings,
}

/// Facade behaviour and extra mapping entries.
#[derive(Debug, Clone, Deserialize)]
pub struct KnowledgeSettings {
    /// Property uniquely naming an entity within its type.
    #[serde(default = "default_name_property")]
    pub name_property: String,

    #[serde(default)]
    pub sibling_merge: SiblingMerge,

    /// `[[knowledge.mappings]]` entries layered over the built-in tables.
    #[serde(default)]
    pub mappings: Vec<MappingEntry>,
}

fn default_name_property() -> String {
    DEFAULT_NAME_PROPERTY.to_string()
}

impl Default for KnowledgeSettings {
    fn default() -> Self {
        Self {
            name_property: default_name_property(),
            sibling_merge: SiblingMerge::default(),
            mappings: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load from `<file_prefix>.toml` (optional) and the environment.
    pub fn load(file_prefix: &str) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix("ONTOKG")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(cfg.try_deserialize()?)
    }

    /// Reject settings that cannot yield a working connection.
    pub fn validate(&self) -> Result<()> {
        if self.neo4j.password.is_empty() {
            return Err(CliError::MissingPassword);
        }
        Ok(())
    }

    /// Built-in mapping tables with configured entries layered on top.
    pub fn mapping_tables(&self) -> MappingTables {
        MappingTables::builtin().with_overrides(&self.knowledge.mappings)
    }
}
