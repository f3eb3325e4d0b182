//! Filters identify which server-side instance a fetch state represents.
//!
//! The default filter is `{project_id, id}`. Ids coming from the API or from
//! route parameters may arrive as numbers, numeric strings or null, so they
//! are coerced the lenient way: numeric strings parse, anything else that is
//! not a number becomes `0`, and fractional values truncate toward zero.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Key of a single project-scoped entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityFilter {
    pub project_id: i64,
    pub id: Option<i64>,
}

impl EntityFilter {
    pub fn new(project_id: i64, id: impl Into<Option<i64>>) -> Self {
        Self {
            project_id,
            id: id.into(),
        }
    }

    /// Default filter provider: derive the key from the entity itself.
    pub fn of<T: Identified + ?Sized>(entity: &T) -> Self {
        Self {
            project_id: entity.project_id(),
            id: entity.id(),
        }
    }

    /// Whether `saved` is this entity, or the id the server assigned to it
    /// when this filter names an unsaved (id-less) entity of the same project.
    pub fn adopts(&self, saved: &EntityFilter) -> bool {
        self == saved || (self.id.is_none() && self.project_id == saved.project_id)
    }

    /// Derive a filter from an untyped payload (`projectId` / `id` keys).
    pub fn from_value(value: &Value) -> Self {
        let id = match value.get("id") {
            None | Some(Value::Null) => None,
            Some(id) => Some(to_integer(id)),
        };
        Self {
            project_id: value.get("projectId").map(to_integer).unwrap_or(0),
            id,
        }
    }
}

/// Entities that carry a project-scoped identifier.
pub trait Identified {
    fn project_id(&self) -> i64;
    fn id(&self) -> Option<i64>;
}

/// Coerce a JSON value into an integer.
pub fn to_integer(value: &Value) -> i64 {
    let number = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(0.0)
            }
        }
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    };

    if !number.is_finite() {
        return if number.is_nan() {
            0
        } else if number > 0.0 {
            i64::MAX
        } else {
            i64::MIN
        };
    }

    number.trunc() as i64
}

/// Serde helper for required ids that may be sent as strings.
pub fn lenient_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(to_integer(&value))
}

/// Serde helper for optional ids; null stays `None`.
pub fn lenient_optional_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(value) => Some(to_integer(&value)),
    })
}
