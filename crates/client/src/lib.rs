//! Backend client for the evaluation spreadsheet.
//!
//! Single source of truth for the wire contract: login, event info,
//! rubrics, sheet rows, score saving. Implements [`avalia_assign::SheetLoader`]
//! so the assignment pipeline can load sheets through it.

mod client;
mod wire;

pub use client::{ApiClient, ClientError};
pub use wire::{EventInfo, Rubric};
