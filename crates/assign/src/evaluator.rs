use serde::{Deserialize, Deserializer, Serialize};

use crate::normalize::normalize;
use crate::tokenize::tokenize;

/// The logged-in evaluator as reported by the backend.
///
/// Only `id` and `name` take part in assignment matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluator {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub evaluation_deadline: String,
    #[serde(default, rename = "categoria", deserialize_with = "lenient_string")]
    pub category: String,
}

impl Evaluator {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            evaluation_deadline: String::new(),
            category: String::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }
}

/// Sheets export ids as numbers as often as strings; accept both, and null as empty.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => String::new(),
        other => crate::record::coerce_string(&other),
    })
}

/// Evaluator identity pre-normalized for matching.
///
/// Built once per pipeline run and shared across every record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatorKey {
    pub id: String,
    pub id_tokens: Vec<String>,
    pub name: String,
    pub name_tokens: Vec<String>,
}

impl EvaluatorKey {
    pub fn new(evaluator: &Evaluator) -> Self {
        Self {
            id: normalize(&evaluator.id),
            id_tokens: tokenize(&evaluator.id),
            name: normalize(&evaluator.name),
            name_tokens: tokenize(&evaluator.name),
        }
    }
}

impl From<&Evaluator> for EvaluatorKey {
    fn from(evaluator: &Evaluator) -> Self {
        Self::new(evaluator)
    }
}
