//! CLI entry point for ontology knowledge-graph lookups.
//!
//! Every subcommand prints its result as JSON on stdout; logs go to stderr.

use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tracing_subscriber::{fmt, EnvFilter};

use ontokg_core::Attributes;
use ontokg_graph::{GraphClient, KnowledgeGraph};

use ontokg_cli::action::describe;
use ontokg_cli::args::parse_attribute;
use ontokg_cli::config::AppConfig;

#[derive(Parser)]
#[command(name = "ontokg")]
#[command(about = "Lookups against an ontology stored in Neo4j")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file prefix (default: ontokg).
    #[arg(short, long, default_value = "ontokg", global = true)]
    config: String,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve a phrase through a mapping table (no database needed).
    Map { table: String, key: String },

    #[command(flatten)]
    Query(QueryCommand),
}

/// Subcommands that need a live graph.
#[derive(Debug, Subcommand)]
enum QueryCommand {
    /// List entities of a type, optionally filtered by attributes.
    Entities {
        /// Schema label, e.g. n4sch__Class.
        entity_type: String,
        /// Attribute filter, repeatable.
        #[arg(long = "attr", value_name = "KEY=VALUE", value_parser = parse_attribute)]
        attrs: Vec<(String, String)>,
    },
    /// Read one attribute of a named entity.
    Attribute { entity: String, attribute: String },
    /// List every relation touching a named entity.
    Relations { entity_type: String, entity: String },
    /// List entities joined to a named entity by one relationship type.
    Direct { entity: String, rel_type: String },
    /// Group entities sharing a relation type with a named entity.
    Siblings { entity_type: String, entity: String },
    /// Answer "what is <phrase>" from the class description.
    Describe { phrase: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let app_config = AppConfig::load(&cli.config)?;
    let mappings = app_config.mapping_tables();

    let query = match cli.command {
        Command::Map { table, key } => {
            let output =
                json!({ "table": table, "key": key, "value": mappings.resolve(&table, &key) });
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }
        Command::Query(query) => query,
    };

    app_config.validate()?;
    let client = GraphClient::connect(&app_config.neo4j).await?;
    let kg = KnowledgeGraph::new(client)
        .with_mappings(mappings)
        .with_name_property(&app_config.knowledge.name_property)
        .with_sibling_merge(app_config.knowledge.sibling_merge);

    let result = run(&kg, query).await;
    kg.close();

    println!("{}", serde_json::to_string_pretty(&result?)?);
    Ok(())
}

async fn run(kg: &KnowledgeGraph, command: QueryCommand) -> anyhow::Result<Value> {
    let output = match command {
        QueryCommand::Entities { entity_type, attrs } => {
            let filter: Attributes = attrs.into_iter().collect();
            serde_json::to_value(kg.get_entities(&entity_type, Some(&filter)).await?)?
        }
        QueryCommand::Attribute { entity, attribute } => {
            serde_json::to_value(kg.get_attribute_of(&entity, &attribute).await?)?
        }
        QueryCommand::Relations {
            entity_type,
            entity,
        } => serde_json::to_value(kg.get_all_relations(&entity_type, &entity).await?)?,
        QueryCommand::Direct { entity, rel_type } => {
            serde_json::to_value(kg.get_direct_relation_of(&entity, &rel_type).await?)?
        }
        QueryCommand::Siblings {
            entity_type,
            entity,
        } => serde_json::to_value(kg.get_sibling_entities(&entity_type, &entity).await?)?,
        QueryCommand::Describe { phrase } => {
            Value::String(describe(kg, &phrase, kg.name_property()).await?)
        }
    };
    Ok(output)
}

fn init_tracing(json_logs: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}
