use anyhow::{Context, Result, anyhow};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Normalized API response: `{result, entities: {<type>: {<id>: payload}}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResponse {
    pub result: Value,
    #[serde(default)]
    pub entities: HashMap<String, HashMap<String, Value>>,
}

impl NormalizedResponse {
    /// Wrap a single payload under `entity_type`, keyed by its `id`.
    pub fn single(entity_type: &str, payload: Value) -> Self {
        let result = payload.get("id").cloned().unwrap_or(Value::Null);
        let mut records = HashMap::new();
        records.insert(result_key(&result), payload);

        let mut entities = HashMap::new();
        entities.insert(entity_type.to_string(), records);
        Self { result, entities }
    }

    /// The payload referenced by `result`, decoded as `T`.
    pub fn primary<T: DeserializeOwned>(&self, entity_type: &str) -> Result<T> {
        let key = result_key(&self.result);
        self.entity(entity_type, &key)
    }

    pub fn entity<T: DeserializeOwned>(&self, entity_type: &str, id: &str) -> Result<T> {
        let payload = self
            .entities
            .get(entity_type)
            .and_then(|records| records.get(id))
            .ok_or_else(|| anyhow!("Response has no {} with id {}", entity_type, id))?;

        serde_json::from_value(payload.clone())
            .with_context(|| format!("Failed to decode {} {}", entity_type, id))
    }

    /// All payloads of one type, decoded as `T`. Order is unspecified.
    pub fn all<T: DeserializeOwned>(&self, entity_type: &str) -> Result<Vec<T>> {
        let Some(records) = self.entities.get(entity_type) else {
            return Ok(Vec::new());
        };

        records
            .iter()
            .map(|(id, payload)| {
                serde_json::from_value(payload.clone())
                    .with_context(|| format!("Failed to decode {} {}", entity_type, id))
            })
            .collect()
    }
}

fn result_key(result: &Value) -> String {
    match result {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
