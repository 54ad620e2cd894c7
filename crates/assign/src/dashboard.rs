use tracing::{info, warn};

use crate::error::PipelineError;
use crate::evaluator::Evaluator;
use crate::pipeline::{build_evaluator_view, load_sheets, SheetFailure, SheetLoadReport, SheetLoader};
use crate::record::RecordSet;
use crate::sheets::SheetSpec;

/// Result of a successful refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Assigned {
        sheets: usize,
        groups: usize,
        failures: Vec<SheetFailure>,
    },
    /// Loads went through but nothing is assigned to this evaluator.
    NothingAssigned { failures: Vec<SheetFailure> },
}

impl RefreshOutcome {
    pub fn failures(&self) -> &[SheetFailure] {
        match self {
            Self::Assigned { failures, .. } | Self::NothingAssigned { failures } => failures,
        }
    }
}

/// The evaluator's current view and sheet selection.
///
/// A refresh replaces the view as a whole or, on failure, leaves the
/// previous one in place.
#[derive(Debug, Clone)]
pub struct EvaluatorDashboard {
    evaluator: Evaluator,
    view: Vec<RecordSet>,
    selected: Option<String>,
}

impl EvaluatorDashboard {
    pub fn new(evaluator: Evaluator) -> Self {
        Self {
            evaluator,
            view: Vec::new(),
            selected: None,
        }
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    pub fn view(&self) -> &[RecordSet] {
        &self.view
    }

    pub fn selected_name(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_sheet(&self) -> Option<&RecordSet> {
        let name = self.selected.as_deref()?;
        self.view.iter().find(|s| s.name == name)
    }

    /// Select a sheet by name. Returns false if it is not in the view.
    pub fn select(&mut self, name: &str) -> bool {
        if self.view.iter().any(|s| s.name == name) {
            self.selected = Some(name.to_string());
            true
        } else {
            false
        }
    }

    /// Reload every catalog sheet and rebuild the view.
    pub fn refresh<L: SheetLoader>(
        &mut self,
        loader: &L,
        catalog: &[SheetSpec],
    ) -> Result<RefreshOutcome, PipelineError> {
        if catalog.is_empty() {
            return Err(PipelineError::NoSheetsConfigured);
        }
        let report = load_sheets(loader, catalog, &self.evaluator.id);
        self.apply(report)
    }

    /// Rebuild the view from an already-loaded report.
    pub fn apply(&mut self, report: SheetLoadReport) -> Result<RefreshOutcome, PipelineError> {
        if report.all_failed() {
            warn!(
                failures = report.failures.len(),
                "every sheet failed to load, keeping previous view"
            );
            return Err(PipelineError::AllSheetsFailed {
                failures: report.failures,
            });
        }

        let view = build_evaluator_view(&report.sheets, &self.evaluator);

        let keep_selection = self
            .selected
            .as_deref()
            .is_some_and(|name| view.iter().any(|s| s.name == name));
        if !keep_selection {
            self.selected = view.first().map(|s| s.name.clone());
        }

        let sheets = view.len();
        let groups: usize = view.iter().map(RecordSet::len).sum();
        self.view = view;

        info!(evaluator = %self.evaluator.id, sheets, groups, "view refreshed");

        if sheets == 0 {
            Ok(RefreshOutcome::NothingAssigned {
                failures: report.failures,
            })
        } else {
            Ok(RefreshOutcome::Assigned {
                sheets,
                groups,
                failures: report.failures,
            })
        }
    }
}
