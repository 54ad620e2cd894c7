//! Evaluator assignment engine.
//!
//! Pure engine crate: receives pre-loaded sheets of loosely-shaped records,
//! returns the subset an evaluator is allowed to see and score.
//! No HTTP or filesystem dependencies; loading goes through [`SheetLoader`].

pub mod dashboard;
pub mod error;
pub mod evaluator;
pub mod fields;
pub mod matcher;
pub mod normalize;
pub mod pipeline;
pub mod record;
pub mod scores;
pub mod sheets;
pub mod tokenize;

pub use dashboard::{EvaluatorDashboard, RefreshOutcome};
pub use error::PipelineError;
pub use evaluator::{Evaluator, EvaluatorKey};
pub use fields::resolve;
pub use matcher::{is_assigned, Assignment, MatchRule};
pub use normalize::normalize;
pub use pipeline::{build_evaluator_view, load_sheets, SheetFailure, SheetLoadReport, SheetLoader};
pub use record::{Record, RecordSet};
pub use scores::ScoreSheet;
pub use sheets::{default_catalog, SheetSpec};
pub use tokenize::tokenize;
