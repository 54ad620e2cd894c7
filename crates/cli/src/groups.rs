//! `avalia groups` and `avalia explain`.

use serde::Serialize;

use avalia_assign::fields::{group_label, GroupSummary};
use avalia_assign::pipeline::explain_sheet;
use avalia_assign::{load_sheets, Assignment, EvaluatorKey, PipelineError, Record, RecordSet, RefreshOutcome};

use crate::context::{find_sheet, sheet_not_in_view, Context};
use crate::exit_codes::*;
use crate::CliError;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SheetOutput<'a> {
    name: &'a str,
    display_name: &'a str,
    groups: Vec<GroupOutput<'a>>,
}

#[derive(Serialize)]
struct GroupOutput<'a> {
    #[serde(flatten)]
    summary: GroupSummary,
    record: &'a Record,
}

fn sheet_output(sheet: &RecordSet) -> SheetOutput<'_> {
    SheetOutput {
        name: &sheet.name,
        display_name: &sheet.display_name,
        groups: sheet
            .groups
            .iter()
            .enumerate()
            .map(|(i, record)| GroupOutput {
                summary: GroupSummary::from_record(record, &sheet.name, i),
                record,
            })
            .collect(),
    }
}

fn print_sheet(sheet: &RecordSet) {
    println!("{} [{}]: {} group(s)", sheet.display_name, sheet.name, sheet.len());
    for (i, record) in sheet.groups.iter().enumerate() {
        let summary = GroupSummary::from_record(record, &sheet.name, i);
        let mut line = format!("  {}", summary.label);
        if let Some(project) = &summary.project {
            line.push_str(&format!("  ({})", project));
        }
        if let Some(class_name) = &summary.class_name {
            line.push_str(&format!("  turma {}", class_name));
        }
        println!("{}", line);
        if let Some(members) = &summary.members {
            println!("      {}", members);
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CliError { code: EXIT_ERROR, message: e.to_string(), hint: None })
}

// ── Groups ──────────────────────────────────────────────────────────

pub fn cmd_groups(sheet: Option<String>, json: bool) -> Result<(), CliError> {
    let ctx = Context::load()?;
    let session = ctx.require_session()?;
    let client = ctx.client()?;
    let (dashboard, outcome) = ctx.dashboard(&client, session.evaluator)?;

    if let RefreshOutcome::NothingAssigned { .. } = outcome {
        return Err(CliError {
            code: EXIT_NOTHING_ASSIGNED,
            message: "No groups are assigned to you".into(),
            hint: Some("ask the organizers to check the evaluator columns of the sheets".into()),
        });
    }

    let selected: Vec<&RecordSet> = match &sheet {
        Some(query) => {
            let found = find_sheet(dashboard.view(), query)
                .ok_or_else(|| sheet_not_in_view(&ctx.catalog(), query))?;
            vec![found]
        }
        None => dashboard.view().iter().collect(),
    };

    if json {
        let out: Vec<SheetOutput> = selected.into_iter().map(sheet_output).collect();
        println!("{}", to_json(&out)?);
        return Ok(());
    }

    for (i, sheet) in selected.into_iter().enumerate() {
        if i > 0 {
            println!();
        }
        print_sheet(sheet);
    }
    Ok(())
}

// ── Explain ─────────────────────────────────────────────────────────

#[derive(Serialize)]
struct Decision<'a> {
    sheet: &'a str,
    index: usize,
    label: String,
    #[serde(flatten)]
    assignment: Assignment,
}

/// Every record of every loaded sheet with the decision taken for it.
pub fn cmd_explain(sheet: Option<String>, json: bool) -> Result<(), CliError> {
    let ctx = Context::load()?;
    let session = ctx.require_session()?;
    let client = ctx.client()?;

    let catalog = ctx.catalog();
    if catalog.is_empty() {
        return Err(PipelineError::NoSheetsConfigured.into());
    }
    let report = load_sheets(&client, &catalog, &session.evaluator.id);
    for failure in &report.failures {
        eprintln!("warning: sheet {} not loaded: {}", failure.sheet, failure.message);
    }
    if report.all_failed() {
        return Err(PipelineError::AllSheetsFailed { failures: report.failures }.into());
    }

    let sheets: Vec<&RecordSet> = match &sheet {
        Some(query) => {
            let found = find_sheet(&report.sheets, query).ok_or_else(|| CliError {
                code: EXIT_USAGE,
                message: format!("Sheet '{}' was not loaded or is empty", query),
                hint: None,
            })?;
            vec![found]
        }
        None => report.sheets.iter().collect(),
    };

    let key = EvaluatorKey::new(&session.evaluator);

    if json {
        let mut decisions: Vec<Decision> = Vec::new();
        for sheet in &sheets {
            for (index, assignment) in explain_sheet(sheet, &key) {
                decisions.push(Decision {
                    sheet: &sheet.name,
                    index,
                    label: group_label(&sheet.groups[index]),
                    assignment,
                });
            }
        }
        println!("{}", to_json(&decisions)?);
        return Ok(());
    }

    for (i, sheet) in sheets.iter().enumerate() {
        if i > 0 {
            println!();
        }
        let decisions = explain_sheet(sheet, &key);
        let assigned = decisions.iter().filter(|(_, a)| a.is_assigned()).count();
        println!("{} [{}]: {} of {} visible", sheet.display_name, sheet.name, assigned, decisions.len());
        for (index, assignment) in decisions {
            let mark = if assignment.is_assigned() { '+' } else { '-' };
            println!("  {} {:>3} {}: {}", mark, index, group_label(&sheet.groups[index]), assignment);
        }
    }
    Ok(())
}
