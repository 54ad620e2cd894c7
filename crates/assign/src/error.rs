use std::fmt;

use crate::pipeline::SheetFailure;

/// Failures at the pipeline boundary. Matching itself never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// The sheet catalog is empty; there is nothing to load.
    NoSheetsConfigured,
    /// Every sheet load failed (typically a connectivity loss).
    AllSheetsFailed { failures: Vec<SheetFailure> },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSheetsConfigured => write!(f, "no evaluation sheets configured"),
            Self::AllSheetsFailed { failures } => {
                write!(f, "all {} sheet(s) failed to load", failures.len())?;
                if let Some(first) = failures.first() {
                    write!(f, " (first: {}: {})", first.sheet, first.message)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for PipelineError {}
