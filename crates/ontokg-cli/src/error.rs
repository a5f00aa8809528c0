//! Error types for the ontokg-cli crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Neo4j password is not configured: set neo4j.password or ONTOKG__NEO4J__PASSWORD")]
    MissingPassword,

    #[error("Invalid attribute filter {0:?}: expected key=value")]
    InvalidAttribute(String),
}

pub type Result<T> = std::result::Result<T, CliError>;
