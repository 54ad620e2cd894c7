//! Score sheet for one group: one score per rubric plus free-text feedback.
//!
//! Scores live in the group's own row under `NOTA 1`, `NOTA 2`, … in rubric
//! order, feedback under `FEEDBACK`.

use std::fmt;

use serde_json::Value;

use crate::record::{coerce_string, is_present, Record};

pub const FEEDBACK_KEY: &str = "FEEDBACK";
pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 5;

/// Column holding the score for the rubric at `index` (0-based).
pub fn score_key(index: usize) -> String {
    format!("NOTA {}", index + 1)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreViolation {
    pub key: String,
    pub value: u8,
}

impl fmt::Display for ScoreViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: score must be between {MIN_SCORE} and {MAX_SCORE} (got {})",
            self.key, self.value
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreSheet {
    scores: Vec<(String, u8)>,
    feedback: String,
}

impl ScoreSheet {
    /// Sheet for `rubric_count` rubrics, pre-filled from scores already saved in the row.
    pub fn for_record(record: &Record, rubric_count: usize) -> Self {
        let scores = (0..rubric_count)
            .map(|i| {
                let key = score_key(i);
                let value = record.get(&key).map(stored_score).unwrap_or(0);
                (key, value)
            })
            .collect();

        let feedback = record
            .get(FEEDBACK_KEY)
            .filter(|v| is_present(v))
            .map(coerce_string)
            .unwrap_or_default();

        Self { scores, feedback }
    }

    pub fn scores(&self) -> &[(String, u8)] {
        &self.scores
    }

    pub fn get(&self, key: &str) -> Option<u8> {
        self.scores.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }

    /// Set a score from user input; see [`parse_score`]. `None` if `key` is not a rubric column.
    pub fn set(&mut self, key: &str, raw: &str) -> Option<u8> {
        let slot = self.scores.iter_mut().find(|(k, _)| k == key)?;
        slot.1 = parse_score(raw);
        Some(slot.1)
    }

    pub fn feedback(&self) -> &str {
        &self.feedback
    }

    pub fn set_feedback(&mut self, text: impl Into<String>) {
        self.feedback = text.into();
    }

    /// Every score must be in `MIN_SCORE..=MAX_SCORE`.
    pub fn validate(&self) -> Result<(), Vec<ScoreViolation>> {
        let violations: Vec<ScoreViolation> = self
            .scores
            .iter()
            .filter(|(_, v)| !(MIN_SCORE..=MAX_SCORE).contains(v))
            .map(|(k, v)| ScoreViolation {
                key: k.clone(),
                value: *v,
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    /// Fields sent on save. Feedback is trimmed and omitted when blank.
    pub fn to_fields(&self) -> Vec<(String, String)> {
        let mut fields: Vec<(String, String)> = self
            .scores
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect();

        let feedback = self.feedback.trim();
        if !feedback.is_empty() {
            fields.push((FEEDBACK_KEY.to_string(), feedback.to_string()));
        }
        fields
    }
}

/// Lenient score input: leading integer (`"4"`, `" 4 pts"`), anything else is 0,
/// clamped to `0..=MAX_SCORE`.
pub fn parse_score(raw: &str) -> u8 {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits: &str = &rest[..rest.bytes().take_while(u8::is_ascii_digit).count()];
    if digits.is_empty() || negative {
        return 0;
    }
    let n: u64 = digits.parse().unwrap_or(u64::MAX);
    n.min(MAX_SCORE as u64) as u8
}

/// Score already stored in a row. Non-numeric values read as 0; fractions truncate.
fn stored_score(value: &Value) -> u8 {
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    };
    if n.is_finite() {
        n.clamp(0.0, MAX_SCORE as f64) as u8
    } else {
        0
    }
}

/// Identifier the backend uses to find the row on save:
/// `GRUPO`, else `NOME`, else `Grupo_<ID>`.
pub fn save_identifier(record: &Record) -> String {
    record
        .present_str("GRUPO")
        .or_else(|| record.present_str("NOME"))
        .unwrap_or_else(|| format!("Grupo_{}", record.present_str("ID").unwrap_or_default()))
}
