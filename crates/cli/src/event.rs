//! `avalia info` and `avalia rubrics`.

use serde::Serialize;

use crate::context::Context;
use crate::exit_codes::*;
use crate::CliError;

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| CliError { code: EXIT_ERROR, message: e.to_string(), hint: None })?;
    println!("{}", out);
    Ok(())
}

pub fn cmd_info(json: bool) -> Result<(), CliError> {
    let ctx = Context::load()?;
    let session = ctx.require_session()?;
    let info = ctx.client()?.event_info(&session.evaluator.id)?;

    if json {
        return print_json(&info);
    }

    let rows = [
        ("evaluator", &info.nome_do_avaliador),
        ("category", &info.categoria),
        ("client", &info.cliente),
        ("address", &info.endereco_cliente),
        ("classes", &info.turmas),
        ("deadline", &info.data_limite_avaliacao),
        ("pitch date", &info.data_pitch),
        ("starts", &info.horario_inicio),
        ("ends", &info.horario_fim),
    ];
    for (label, value) in rows {
        if !value.is_empty() {
            println!("{:<11} {}", format!("{}:", label), value);
        }
    }
    if !info.informacoes_adicionais.is_empty() {
        println!();
        println!("{}", info.informacoes_adicionais);
    }
    if !info.tema_pergunta_regras.is_empty() {
        println!();
        println!("Rules (HTML):");
        println!("{}", info.tema_pergunta_regras);
    }
    Ok(())
}

pub fn cmd_rubrics(json: bool) -> Result<(), CliError> {
    let ctx = Context::load()?;
    let session = ctx.require_session()?;
    let rubrics = ctx.client()?.rubrics(&session.evaluator.category)?;

    if json {
        return print_json(&rubrics);
    }

    if rubrics.is_empty() {
        eprintln!("No rubrics defined for category '{}'", session.evaluator.category);
        return Ok(());
    }

    for (i, rubric) in rubrics.iter().enumerate() {
        let title = if rubric.criterio.is_empty() { &rubric.avaliacao } else { &rubric.criterio };
        println!("NOTA {}  {}", i + 1, title);
        for (points, text) in rubric.levels() {
            if !text.is_empty() {
                println!("  {}: {}", points, text);
            }
        }
    }
    Ok(())
}
