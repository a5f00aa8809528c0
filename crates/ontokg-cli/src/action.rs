//! Conversational replies built on the knowledge-base contract.

use serde_json::Value;

use ontokg_core::{Attributes, KnowledgeBase, ATTRIBUTE_MAPPING, ENTITY_TYPE_MAPPING};

/// Schema label of ontology classes.
pub const CLASS_LABEL: &str = "n4sch__Class";

/// Property read when `attribute-mapping` has no "what is" entry.
pub const DEFAULT_DESCRIPTION_PROPERTY: &str = "n4sch__comment";

/// Answer "what is <phrase>" with the description of the matching class.
///
/// The phrase is translated through `entity-type-mapping`; an unmapped
/// phrase is looked up verbatim. Zero or several matching classes, or a
/// class without a description, produce the not-found reply.
pub async fn describe<K: KnowledgeBase>(
    kb: &K,
    phrase: &str,
    name_property: &str,
) -> Result<String, K::Error> {
    let name = kb.map(ENTITY_TYPE_MAPPING, phrase).unwrap_or(phrase).to_string();
    let description = kb
        .map(ATTRIBUTE_MAPPING, "what is")
        .unwrap_or(DEFAULT_DESCRIPTION_PROPERTY)
        .to_string();

    let filter = Attributes::from([(name_property.to_string(), name)]);
    let entities = kb.get_entities(CLASS_LABEL, Some(&filter)).await?;

    let reply = match entities.as_slice() {
        [entity] => entity.get(&description).map(render),
        _ => {
            tracing::debug!(phrase, matches = entities.len(), "No unique class for phrase");
            None
        }
    };
    Ok(reply.unwrap_or_else(|| not_found(phrase)))
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{s}'."),
        other => format!("'{other}'."),
    }
}

fn not_found(phrase: &str) -> String {
    format!("Did not find a valid value for attribute for entity '{phrase}'.")
}
