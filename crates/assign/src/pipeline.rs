use serde::Serialize;
use tracing::{debug, warn};

use crate::evaluator::{Evaluator, EvaluatorKey};
use crate::matcher::{classify, Assignment};
use crate::record::{Record, RecordSet};
use crate::sheets::SheetSpec;

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Source of raw sheet rows (the remote backend, a fixture, …).
pub trait SheetLoader {
    type Error: std::fmt::Display;

    fn load_sheet(&self, sheet: &str, evaluator_id: &str) -> Result<Vec<Record>, Self::Error>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetFailure {
    pub sheet: String,
    pub message: String,
}

/// Sheets fetched for one refresh, before filtering.
#[derive(Debug, Clone, Default)]
pub struct SheetLoadReport {
    /// Non-empty sheets, in catalog order.
    pub sheets: Vec<RecordSet>,
    pub failures: Vec<SheetFailure>,
    pub attempted: usize,
}

impl SheetLoadReport {
    /// True when every attempted load failed.
    pub fn all_failed(&self) -> bool {
        self.attempted > 0 && self.failures.len() == self.attempted
    }
}

/// Load every catalog sheet in order.
///
/// A failing sheet is logged and skipped; an empty sheet is skipped
/// silently. Neither aborts the remaining loads.
pub fn load_sheets<L: SheetLoader>(
    loader: &L,
    catalog: &[SheetSpec],
    evaluator_id: &str,
) -> SheetLoadReport {
    let mut report = SheetLoadReport::default();

    for spec in catalog {
        report.attempted += 1;
        match loader.load_sheet(&spec.name, evaluator_id) {
            Ok(groups) if groups.is_empty() => {
                debug!(sheet = %spec.name, "sheet is empty, skipping");
            }
            Ok(groups) => {
                debug!(sheet = %spec.name, rows = groups.len(), "sheet loaded");
                report
                    .sheets
                    .push(RecordSet::new(spec.name.clone(), spec.display_name.clone(), groups));
            }
            Err(e) => {
                warn!(sheet = %spec.name, error = %e, "failed to load sheet");
                report.failures.push(SheetFailure {
                    sheet: spec.name.clone(),
                    message: e.to_string(),
                });
            }
        }
    }

    report
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Keep only the records assigned to `evaluator`, dropping emptied sheets.
pub fn build_evaluator_view(sheets: &[RecordSet], evaluator: &Evaluator) -> Vec<RecordSet> {
    let key = EvaluatorKey::new(evaluator);
    sheets.iter().filter_map(|sheet| filter_sheet(sheet, &key)).collect()
}

/// Filtered copy of one sheet, or `None` if nothing is left.
pub fn filter_sheet(sheet: &RecordSet, key: &EvaluatorKey) -> Option<RecordSet> {
    let groups: Vec<Record> = sheet
        .groups
        .iter()
        .filter(|record| classify(record, key).is_assigned())
        .cloned()
        .collect();

    debug!(
        sheet = %sheet.name,
        total = sheet.groups.len(),
        assigned = groups.len(),
        "sheet filtered"
    );

    if groups.is_empty() {
        return None;
    }

    Some(RecordSet {
        name: sheet.name.clone(),
        display_name: sheet.display_name.clone(),
        groups,
    })
}

/// Per-record decisions for one sheet, in sheet order.
pub fn explain_sheet(sheet: &RecordSet, key: &EvaluatorKey) -> Vec<(usize, Assignment)> {
    sheet
        .groups
        .iter()
        .enumerate()
        .map(|(i, record)| (i, classify(record, key)))
        .collect()
}
