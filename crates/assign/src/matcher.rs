//! Assignment matching between one record and one evaluator.
//!
//! Assignee columns are found by name (any key containing
//! [`ASSIGNEE_MARKER`]) and hold free text typed by organizers: full
//! names, ids, several people separated by commas, accents or not.
//! Each entry is tried against four rules, cheapest first:
//!
//! | Rule | Test |
//! |------|------|
//! | id exact / id token | entry == id, or id is one of the entry's tokens |
//! | id tokens | every id token appears among the entry's tokens |
//! | name exact / contained | entry == name, or entry contains name |
//! | name tokens | every name token appears among the entry's tokens |
//!
//! The substring rule can over-match short names ("ana" inside
//! "mariana"). It is kept: organizers rely on partial names.
//!
//! When nothing matches, the outcome depends on whether the record carried
//! assignee columns at all. No columns: the record is open to every
//! evaluator. Columns present: nobody matched, so it is hidden.

use serde::Serialize;
use serde_json::Value;

use crate::evaluator::{Evaluator, EvaluatorKey};
use crate::normalize::normalize;
use crate::record::{coerce_string, is_present, Record};
use crate::tokenize::tokenize;

/// Substring (lower-case) identifying assignee columns.
pub const ASSIGNEE_MARKER: &str = "avaliador";

/// Separators between several assignees in one cell.
pub const ENTRY_SEPARATORS: [char; 5] = [',', ';', '|', '/', '\n'];

// ---------------------------------------------------------------------------
// Outcome types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    IdExact,
    IdToken,
    IdTokens,
    NameExact,
    NameContained,
    NameTokens,
}

impl std::fmt::Display for MatchRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IdExact => write!(f, "id_exact"),
            Self::IdToken => write!(f, "id_token"),
            Self::IdTokens => write!(f, "id_tokens"),
            Self::NameExact => write!(f, "name_exact"),
            Self::NameContained => write!(f, "name_contained"),
            Self::NameTokens => write!(f, "name_tokens"),
        }
    }
}

/// Whether a record carries any assignee column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssigneeMetadata {
    /// No assignee column: the record cannot be filtered.
    Absent,
    /// At least one assignee column, possibly empty.
    Present,
}

impl AssigneeMetadata {
    /// Outcome when no entry matched.
    pub fn fallback(self) -> Assignment {
        match self {
            Self::Absent => Assignment::Unrestricted,
            Self::Present => Assignment::NotAssigned,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Assignment {
    /// An assignee entry matched the evaluator.
    Matched {
        field: String,
        entry: String,
        rule: MatchRule,
    },
    /// Record has no assignee column; visible to everyone.
    Unrestricted,
    /// Assignee columns exist but none names this evaluator.
    NotAssigned,
}

impl Assignment {
    pub fn is_assigned(&self) -> bool {
        !matches!(self, Self::NotAssigned)
    }
}

impl std::fmt::Display for Assignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Matched { field, entry, rule } => {
                write!(f, "matched {rule} on {field} = '{entry}'")
            }
            Self::Unrestricted => write!(f, "unrestricted (no assignee column)"),
            Self::NotAssigned => write!(f, "not assigned"),
        }
    }
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// True if `evaluator` may see `record`.
pub fn is_assigned(record: &Record, evaluator: &Evaluator) -> bool {
    classify(record, &EvaluatorKey::new(evaluator)).is_assigned()
}

/// Full assignment decision for one record.
pub fn classify(record: &Record, key: &EvaluatorKey) -> Assignment {
    let mut metadata = AssigneeMetadata::Absent;

    for (field, value) in record.iter() {
        if !is_assignee_field(field) {
            continue;
        }
        metadata = AssigneeMetadata::Present;

        if !is_present(value) {
            continue;
        }

        for entry in assignee_entries(value) {
            if let Some(rule) = match_entry(&entry, key) {
                return Assignment::Matched {
                    field: field.clone(),
                    entry,
                    rule,
                };
            }
        }
    }

    metadata.fallback()
}

pub fn is_assignee_field(key: &str) -> bool {
    !key.is_empty() && key.to_lowercase().contains(ASSIGNEE_MARKER)
}

/// Candidate assignee strings held by one cell.
///
/// A sequence contributes its elements as-is; anything else is split on
/// [`ENTRY_SEPARATORS`]. Blank entries are dropped.
pub fn assignee_entries(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter(|item| is_present(item))
            .map(coerce_string)
            .collect(),
        other => coerce_string(other)
            .split(|c| ENTRY_SEPARATORS.contains(&c))
            .filter(|entry| !entry.trim().is_empty())
            .map(String::from)
            .collect(),
    }
}

/// First rule satisfied by a single entry.
pub fn match_entry(entry: &str, key: &EvaluatorKey) -> Option<MatchRule> {
    let candidate = normalize(entry);
    if candidate.is_empty() {
        return None;
    }
    let tokens = tokenize(entry);
    let has_token = |t: &str| tokens.iter().any(|c| c == t);

    if !key.id.is_empty() {
        if candidate == key.id {
            return Some(MatchRule::IdExact);
        }
        if has_token(key.id.as_str()) {
            return Some(MatchRule::IdToken);
        }
    }

    if !key.id_tokens.is_empty() && key.id_tokens.iter().all(|t| has_token(t.as_str())) {
        return Some(MatchRule::IdTokens);
    }

    if !key.name.is_empty() {
        if candidate == key.name {
            return Some(MatchRule::NameExact);
        }
        if candidate.contains(&key.name) {
            return Some(MatchRule::NameContained);
        }
        if !key.name_tokens.is_empty() && key.name_tokens.iter().all(|t| has_token(t.as_str())) {
            return Some(MatchRule::NameTokens);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        Record::from_value(value).unwrap()
    }

    fn key(id: &str, name: &str) -> EvaluatorKey {
        EvaluatorKey::new(&Evaluator::new(id, name))
    }

    #[test]
    fn no_assignee_field_is_open() {
        let r = record(json!({"GRUPO": "Alpha"}));
        assert!(is_assigned(&r, &Evaluator::new("u1", "Ana")));
        assert!(is_assigned(&r, &Evaluator::new("", "")));
        assert_eq!(classify(&r, &key("u1", "Ana")), Assignment::Unrestricted);
    }

    #[test]
    fn assignee_field_without_match_is_closed() {
        let r = record(json!({"AVALIADOR": "Carla Souza"}));
        assert!(!is_assigned(&r, &Evaluator::new("u1", "João Pedro")));
    }

    #[test]
    fn blank_assignee_field_is_closed() {
        let r = record(json!({"GRUPO": "A", "Avaliador 1": "  ", "AVALIADOR 2": null}));
        assert_eq!(classify(&r, &key("u1", "Ana")), Assignment::NotAssigned);
    }

    #[test]
    fn exact_id_among_several() {
        let r = record(json!({"AVALIADOR": "u1, u2"}));
        assert!(is_assigned(&r, &Evaluator::new("u1", "Anyone")));
        assert!(is_assigned(&r, &Evaluator::new("u2", "Anyone")));
        assert!(!is_assigned(&r, &Evaluator::new("u3", "Anyone")));
    }

    #[test]
    fn name_tokens_in_any_order() {
        let r = record(json!({"AVALIADOR": "Pedro Almeida; Souza Maria"}));
        let got = classify(&r, &key("", "Maria Souza"));
        assert_eq!(
            got,
            Assignment::Matched {
                field: "AVALIADOR".into(),
                entry: " Souza Maria".into(),
                rule: MatchRule::NameTokens,
            }
        );
    }

    #[test]
    fn accents_and_case_ignored() {
        let r = record(json!({"avaliadores": "JOAO PEDRO"}));
        assert!(is_assigned(&r, &Evaluator::new("x9", "João Pedro")));
    }

    #[test]
    fn marker_matched_anywhere_in_key() {
        assert!(is_assignee_field("NOME DO AVALIADOR"));
        assert!(is_assignee_field("Avaliador_2"));
        assert!(!is_assignee_field("AVALIAÇÃO"));
        assert!(!is_assignee_field(""));
    }

    #[test]
    fn id_as_token_of_entry() {
        let r = record(json!({"AVALIADOR": "Carla (u7) Souza"}));
        // "(u7)" tokenizes as "(u7)", not "u7"
        assert!(!is_assigned(&r, &Evaluator::new("u7", "")));

        let r = record(json!({"AVALIADOR": "Carla u7 Souza"}));
        assert_eq!(
            match_entry("Carla u7 Souza", &key("u7", "")),
            Some(MatchRule::IdToken)
        );
        assert!(is_assigned(&r, &Evaluator::new("u7", "")));
    }

    #[test]
    fn multi_token_id() {
        assert_eq!(
            match_entry("turma b avaliador-12", &key("Avaliador 12", "")),
            Some(MatchRule::IdTokens)
        );
    }

    #[test]
    fn name_substring_over_matches() {
        // Known trade-off: "ana" is contained in "mariana".
        assert_eq!(
            match_entry("Mariana Lopes", &key("", "Ana")),
            Some(MatchRule::NameContained)
        );
    }

    #[test]
    fn empty_identity_never_matches() {
        assert_eq!(match_entry("Carla Souza", &key("", "")), None);
        assert_eq!(match_entry("   ", &key("u1", "Ana")), None);
        assert_eq!(match_entry("", &key("", "")), None);
    }

    #[test]
    fn stop_word_only_name_does_not_match_everything() {
        // "de" tokenizes to nothing; only the substring rule can apply.
        assert_eq!(match_entry("Carla Souza", &key("", "de")), None);
        assert_eq!(
            match_entry("Ana de Souza", &key("", "de")),
            Some(MatchRule::NameContained)
        );
    }

    #[test]
    fn sequence_values_are_not_split() {
        let value = json!(["Ana Lima, Bia Reis", "", null, 42]);
        assert_eq!(assignee_entries(&value), vec!["Ana Lima, Bia Reis", "42"]);

        let r = record(json!({"AVALIADORES": ["Carla Souza", "u42"]}));
        assert!(is_assigned(&r, &Evaluator::new("u42", "")));
    }

    #[test]
    fn string_values_split_on_all_separators() {
        let value = json!("a,b;c|d/e\nf,,;g");
        assert_eq!(
            assignee_entries(&value),
            vec!["a", "b", "c", "d", "e", "f", "g"]
        );
    }

    #[test]
    fn numeric_assignee_value() {
        let r = record(json!({"ID AVALIADOR": 1042}));
        assert!(is_assigned(&r, &Evaluator::new("1042", "")));
        assert!(!is_assigned(&r, &Evaluator::new("104", "")));
    }

    #[test]
    fn second_assignee_field_can_match() {
        let r = record(json!({"AVALIADOR 1": "Carla", "AVALIADOR 2": "Ana Souza"}));
        match classify(&r, &key("", "Ana Souza")) {
            Assignment::Matched { field, rule, .. } => {
                assert_eq!(field, "AVALIADOR 2");
                assert_eq!(rule, MatchRule::NameExact);
            }
            other => panic!("expected match, got {other:?}"),
        }
    }

    #[test]
    fn display_names_rule() {
        let a = Assignment::Matched {
            field: "AVALIADOR".into(),
            entry: "u1".into(),
            rule: MatchRule::IdExact,
        };
        assert_eq!(a.to_string(), "matched id_exact on AVALIADOR = 'u1'");
        assert!(Assignment::Unrestricted.is_assigned());
        assert!(!Assignment::NotAssigned.is_assigned());
    }
}
