//! Spreadsheet backend client.
//!
//! Blocking reqwest client (no Tokio runtime required). The backend exposes a
//! single endpoint; every call is a form-encoded POST carrying an `action`
//! plus its parameters, answered with `{"success": true, ...}` or
//! `{"success": false, "error": "..."}`.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use avalia_assign::{Evaluator, Record, SheetLoader};

use crate::wire::{EventInfo, Rubric};

/// Backend API client (blocking).
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::blocking::Client,
    endpoint: String,
}

/// Error type for backend operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Request never got a response
    Network(String),
    /// Non-2xx status with body
    Http(u16, String),
    /// Response body was not the expected JSON
    Parse(String),
    /// Server answered `success: false`
    Api(String),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Network(msg) => write!(f, "Network error: {}", msg),
            ClientError::Http(code, msg) if msg.is_empty() => write!(f, "HTTP {}", code),
            ClientError::Http(code, msg) => write!(f, "HTTP {}: {}", code, msg),
            ClientError::Parse(msg) => write!(f, "Parse error: {}", msg),
            ClientError::Api(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ClientError {}

impl ApiClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("avalia/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Network(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Authenticate and return the evaluator identity.
    pub fn login(&self, login: &str, password: &str) -> Result<Evaluator, ClientError> {
        let mut payload = self.post_action("login", &[("login", login), ("senha", password)])?;
        take_field(&mut payload, "user")
    }

    pub fn event_info(&self, evaluator_id: &str) -> Result<EventInfo, ClientError> {
        let mut payload = self.post_action("getInformacoes", &[("avaliadorID", evaluator_id)])?;
        take_field(&mut payload, "informacoes")
    }

    /// Rubrics for an event category, in score-column order.
    pub fn rubrics(&self, category: &str) -> Result<Vec<Rubric>, ClientError> {
        let mut payload = self.post_action("getRubricas", &[("tipoHacka", category)])?;
        take_field(&mut payload, "rubricas")
    }

    /// Raw rows of one evaluation sheet. Non-object rows are skipped.
    pub fn load_data(&self, sheet: &str, evaluator_id: &str) -> Result<Vec<Record>, ClientError> {
        let mut payload =
            self.post_action("loadData", &[("sheet", sheet), ("evaluatorId", evaluator_id)])?;
        let rows: Vec<Value> = take_field(&mut payload, "data")?;

        let total = rows.len();
        let records: Vec<Record> = rows.into_iter().filter_map(Record::from_value).collect();
        if records.len() != total {
            warn!(sheet, skipped = total - records.len(), "ignoring non-object rows");
        }
        Ok(records)
    }

    /// Write scores for one group. Returns the number of rows the backend updated.
    pub fn save_scores(
        &self,
        sheet: &str,
        evaluator_id: &str,
        group: &str,
        fields: &[(String, String)],
    ) -> Result<u64, ClientError> {
        let mut params: Vec<(&str, &str)> = vec![
            ("sheet", sheet),
            ("evaluatorId", evaluator_id),
            ("grupo", group),
        ];
        params.extend(fields.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        let payload = self.post_action("saveNotas", &params)?;
        Ok(payload
            .get("updatedRows")
            .and_then(Value::as_u64)
            .unwrap_or(0))
    }

    // ── HTTP helpers ────────────────────────────────────────────────

    fn post_action(&self, action: &str, params: &[(&str, &str)]) -> Result<Map<String, Value>, ClientError> {
        let mut form: Vec<(&str, &str)> = Vec::with_capacity(params.len() + 1);
        form.push(("action", action));
        form.extend_from_slice(params);

        debug!(action, "backend request");

        let response = self.http.post(&self.endpoint)
            .form(&form)
            .send()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ClientError::Http(status, body));
        }

        let body: Value = response.json().map_err(|e| ClientError::Parse(e.to_string()))?;
        into_payload(body)
    }
}

impl SheetLoader for ApiClient {
    type Error = ClientError;

    fn load_sheet(&self, sheet: &str, evaluator_id: &str) -> Result<Vec<Record>, ClientError> {
        self.load_data(sheet, evaluator_id)
    }
}

/// Unwrap the success envelope.
fn into_payload(body: Value) -> Result<Map<String, Value>, ClientError> {
    let Value::Object(map) = body else {
        return Err(ClientError::Parse("expected a JSON object".into()));
    };

    if map.get("success").and_then(Value::as_bool) == Some(true) {
        return Ok(map);
    }

    let message = map
        .get("error")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("request rejected by server");
    Err(ClientError::Api(message.to_string()))
}

fn take_field<T: DeserializeOwned>(payload: &mut Map<String, Value>, key: &str) -> Result<T, ClientError> {
    let value = payload
        .remove(key)
        .ok_or_else(|| ClientError::Parse(format!("Missing {} in response", key)))?;
    serde_json::from_value(value).map_err(|e| ClientError::Parse(format!("{}: {}", key, e)))
}
