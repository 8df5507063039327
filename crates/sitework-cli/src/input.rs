//! Loading contract and variation JSON from files or stdin.

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use serde_json::Value;
use sitework_core::{ContractSummary, summarize_value};
use tracing::debug;

/// Read a JSON document from `path`, or stdin when `path` is `-`.
pub fn read_json(path: &Path) -> anyhow::Result<Value> {
    let text = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading stdin")?;
        buf
    } else {
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
    };
    serde_json::from_str(&text).with_context(|| format!("parsing JSON from {}", path.display()))
}

/// Split a contract document into `(contract, variations)`.
///
/// A document may be a bare contract object or a bundle of the form
/// `{ "contract": {...}, "variations": [...] }`. Bundle variations default
/// to an empty list.
pub fn split_bundle(doc: Value) -> (Value, Option<Value>) {
    match doc {
        Value::Object(mut map) if is_bundle(&map) => {
            let contract = map.remove("contract").unwrap_or(Value::Null);
            let variations = map.remove("variations");
            (contract, variations)
        }
        other => (other, None),
    }
}

fn is_bundle(map: &serde_json::Map<String, Value>) -> bool {
    matches!(map.get("contract"), Some(Value::Object(_) | Value::Null))
        && !map.contains_key("total_project_value")
}

/// Load and summarize. `Ok(None)` means the document holds no contract yet.
///
/// Variations from `variations_path` take precedence over bundled ones.
pub fn load_summary(
    contract_path: &Path,
    variations_path: Option<&Path>,
) -> anyhow::Result<Option<ContractSummary>> {
    let (contract, bundled) = split_bundle(read_json(contract_path)?);
    let variations = match variations_path {
        Some(path) => read_json(path)?,
        None => bundled.unwrap_or_else(|| Value::Array(Vec::new())),
    };
    debug!(
        contract = %contract_path.display(),
        variations = variations.as_array().map_or(0, Vec::len),
        "loaded contract input"
    );
    summarize_value(&contract, &variations)
        .with_context(|| format!("summarizing {}", contract_path.display()))
}
