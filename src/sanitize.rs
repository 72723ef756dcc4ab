//! Large integer ids in raw configuration text
//!
//! Exported configurations sometimes carry ids as bare JSON numbers. The typed
//! model reads ids as strings, so those numbers are quoted before parsing.

use crate::model::Configuration;
use anyhow::Result;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static NUMERIC_ID_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"("(?:id|triggerEntityId|parameterId|taskId|stageId|checklistId|actionId|effectId|referencedParameterId)"\s*:\s*)(\d{18,19})\b"#,
    )
    .unwrap()
});

/// Quote every 18-19 digit number stored under an id key
pub fn preprocess(json: &str) -> String {
    let quoted = NUMERIC_ID_FIELD.replace_all(json, r#"$1"$2""#);
    if let std::borrow::Cow::Owned(_) = &quoted {
        debug!("Quoted numeric ids in configuration text");
    }
    quoted.into_owned()
}

/// Parse raw text straight into the typed configuration
pub fn parse_configuration(json: &str) -> Result<Configuration> {
    crate::model::parse_configuration(&preprocess(json))
}

/// Paths of `*id*` keys that still hold a JSON number
pub fn numeric_id_paths(value: &Value) -> Vec<String> {
    let mut issues = Vec::new();
    collect_numeric_ids(value, "root", &mut issues);
    issues
}

fn collect_numeric_ids(value: &Value, path: &str, issues: &mut Vec<String>) {
    match value {
        Value::Object(object) => {
            for (key, child) in object {
                let child_path = format!("{}.{}", path, key);
                if key.to_lowercase().contains("id") && child.is_number() {
                    issues.push(format!("{} = {} (number, should be string)", child_path, child));
                }
                collect_numeric_ids(child, &child_path, issues);
            }
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                collect_numeric_ids(item, &format!("{}[{}]", path, i), issues);
            }
        }
        _ => {}
    }
}
