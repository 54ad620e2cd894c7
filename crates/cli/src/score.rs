//! `avalia score`: fill a group's score sheet, validate, save.

use avalia_assign::fields::{group_label, row_key};
use avalia_assign::scores::{save_identifier, score_key};
use avalia_assign::{normalize, Record, RecordSet, ScoreSheet};

use crate::context::{find_sheet, sheet_not_in_view, Context};
use crate::exit_codes::*;
use crate::CliError;

/// Parse `N=V` / `NOTA N=V` into a 1-based rubric number and the raw value.
pub fn parse_nota(arg: &str) -> Result<(usize, String), CliError> {
    let usage = || CliError {
        code: EXIT_USAGE,
        message: format!("Invalid --nota '{}'", arg),
        hint: Some("use N=VALUE with N the rubric number, e.g. --nota 1=5".into()),
    };

    let (key, value) = arg.split_once('=').ok_or_else(usage)?;
    let key = key.trim();
    let number = match key.get(..4) {
        Some(prefix) if prefix.eq_ignore_ascii_case("nota") => key[4..].trim(),
        _ => key,
    };
    let number: usize = number.parse().map_err(|_| usage())?;
    if number == 0 {
        return Err(usage());
    }
    Ok((number, value.trim().to_string()))
}

/// Group in `sheet` whose save identifier, label, or row key equals `query`
/// (ignoring case and accents).
pub fn find_group<'a>(sheet: &'a RecordSet, query: &str) -> Option<&'a Record> {
    let wanted = normalize(query);
    sheet.groups.iter().enumerate().find_map(|(i, record)| {
        let hit = normalize(&save_identifier(record)) == wanted
            || normalize(&group_label(record)) == wanted
            || normalize(&row_key(record, &sheet.name, i)) == wanted;
        hit.then_some(record)
    })
}

pub fn cmd_score(
    sheet: String,
    group: String,
    notas: Vec<String>,
    feedback: Option<String>,
    dry_run: bool,
) -> Result<(), CliError> {
    let parsed: Vec<(usize, String)> = notas.iter().map(|n| parse_nota(n)).collect::<Result<_, _>>()?;

    let ctx = Context::load()?;
    let session = ctx.require_session()?;
    let client = ctx.client()?;
    let evaluator_id = session.evaluator.id.clone();
    let category = session.evaluator.category.clone();
    let (dashboard, _) = ctx.dashboard(&client, session.evaluator)?;

    let target = find_sheet(dashboard.view(), &sheet)
        .ok_or_else(|| sheet_not_in_view(&ctx.catalog(), &sheet))?;
    let record = find_group(target, &group).ok_or_else(|| CliError {
        code: EXIT_NOTHING_ASSIGNED,
        message: format!("Group '{}' is not assigned to you in {}", group, target.display_name),
        hint: Some(format!("run `avalia groups --sheet {}` to list your groups", target.name)),
    })?;

    let rubrics = client.rubrics(&category)?;
    if rubrics.is_empty() {
        return Err(CliError {
            code: EXIT_SCORE_INVALID,
            message: format!("No rubrics defined for category '{}'", category),
            hint: None,
        });
    }

    let mut scores = ScoreSheet::for_record(record, rubrics.len());
    for (number, value) in &parsed {
        let key = score_key(number - 1);
        if scores.set(&key, value).is_none() {
            return Err(CliError {
                code: EXIT_USAGE,
                message: format!("{} does not exist: this category has {} rubric(s)", key, rubrics.len()),
                hint: Some("run `avalia rubrics` to list them".into()),
            });
        }
    }
    if let Some(text) = feedback {
        scores.set_feedback(text);
    }

    if let Err(violations) = scores.validate() {
        let lines: Vec<String> = violations.iter().map(|v| v.to_string()).collect();
        return Err(CliError {
            code: EXIT_SCORE_INVALID,
            message: format!("Scores incomplete:\n  {}", lines.join("\n  ")),
            hint: Some("every rubric needs a score from 1 to 5, e.g. --nota 1=4".into()),
        });
    }

    let identifier = save_identifier(record);
    let fields = scores.to_fields();

    if dry_run {
        println!("{} / {}", target.display_name, identifier);
        for (key, value) in &fields {
            println!("  {} = {}", key, value);
        }
        eprintln!("Dry run: nothing saved");
        return Ok(());
    }

    let updated = client.save_scores(&target.name, &evaluator_id, &identifier, &fields)?;
    if updated == 0 {
        return Err(CliError {
            code: EXIT_SAVE_NO_ROWS,
            message: format!("Backend accepted the scores for '{}' but updated no rows", identifier),
            hint: Some("the group name may have changed in the sheet; run `avalia groups` and retry".into()),
        });
    }

    eprintln!(
        "Saved {} score(s) for {} in {} ({} row(s) updated)",
        rubrics.len(),
        identifier,
        target.display_name,
        updated
    );
    Ok(())
}
