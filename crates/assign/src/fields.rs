//! Logical field lookup over records with unpredictable column naming.
//!
//! Sheets are typed by hand, so the same logical column shows up as `GRUPO`,
//! `Grupo`, `NOME DO GRUPO`, `EQUIPE`… Every lookup goes through
//! [`resolve`] with a prioritized candidate list; nothing downstream reads
//! raw keys.

use crate::record::{coerce_string, is_present, Record};

pub const GROUP_NAME_KEYS: &[&str] = &[
    "GRUPO",
    "NOME DO GRUPO",
    "NOME_DA_EQUIPE",
    "EQUIPE",
    "NOME",
    "NOME DA EQUIPE",
];

/// Project keys used when labelling a group that has no name.
pub const GROUP_LABEL_PROJECT_KEYS: &[&str] = &["PROJETO", "NOME DO PROJETO", "DESAFIO", "TEMA"];

pub const PROJECT_KEYS: &[&str] = &[
    "PROJETO",
    "NOME DO PROJETO",
    "DESAFIO",
    "TEMA",
    "PROJETO_NOME",
    "NOME_PROJETO",
];

pub const CLASS_KEYS: &[&str] = &["TURMA", "TURMAS", "CLASSE", "SALA"];

pub const MEMBER_KEYS: &[&str] = &["INTEGRANTES", "PARTICIPANTES", "MEMBROS", "INTEGRANTES DO GRUPO"];

pub const CATEGORY_KEYS: &[&str] = &["CATEGORIA", "MODALIDADE"];

pub const GROUP_ID_KEYS: &[&str] = &["ID", "ID_GRUPO", "CODIGO"];

pub const ROW_KEY_KEYS: &[&str] = &["ID", "GRUPO", "NOME DO GRUPO", "CODIGO"];

/// First present value among `candidates`, as a string.
///
/// Per candidate: the exact key wins; otherwise the first record key equal
/// to it ignoring case. Empty candidate names are skipped.
pub fn resolve(record: &Record, candidates: &[&str]) -> Option<String> {
    for candidate in candidates {
        if candidate.is_empty() {
            continue;
        }

        if let Some(value) = record.get(candidate).filter(|v| is_present(v)) {
            return Some(coerce_string(value));
        }

        let wanted = candidate.to_lowercase();
        let found = record.iter().find(|(key, _)| key.to_lowercase() == wanted);
        if let Some((_, value)) = found {
            if is_present(value) {
                return Some(coerce_string(value));
            }
        }
    }

    None
}

pub fn group_name(record: &Record) -> Option<String> {
    resolve(record, GROUP_NAME_KEYS)
}

pub fn project_name(record: &Record) -> Option<String> {
    resolve(record, PROJECT_KEYS)
}

pub fn class_name(record: &Record) -> Option<String> {
    resolve(record, CLASS_KEYS)
}

pub fn members(record: &Record) -> Option<String> {
    resolve(record, MEMBER_KEYS)
}

pub fn category(record: &Record) -> Option<String> {
    resolve(record, CATEGORY_KEYS)
}

/// Human label: group name, then project, then `Grupo <id>`.
pub fn group_label(record: &Record) -> String {
    if let Some(name) = group_name(record) {
        return name;
    }
    if let Some(project) = resolve(record, GROUP_LABEL_PROJECT_KEYS) {
        return project;
    }
    if let Some(id) = resolve(record, GROUP_ID_KEYS) {
        return format!("Grupo {id}");
    }
    "Grupo sem nome".to_string()
}

/// Stable per-row key for listings; falls back to `<sheet>-<index>`.
pub fn row_key(record: &Record, sheet_name: &str, index: usize) -> String {
    resolve(record, ROW_KEY_KEYS).unwrap_or_else(|| format!("{sheet_name}-{index}"))
}

/// Resolved display fields for one group.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct GroupSummary {
    pub key: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl GroupSummary {
    pub fn from_record(record: &Record, sheet_name: &str, index: usize) -> Self {
        let label = group_label(record);
        // A project equal to the label adds nothing.
        let project = project_name(record).filter(|p| *p != label);
        Self {
            key: row_key(record, sheet_name, index),
            label,
            project,
            class_name: class_name(record),
            members: members(record),
            category: category(record),
        }
    }
}
