//! `avalia login`, `avalia logout`, `avalia whoami`.

use std::io::{self, Write};

use avalia_client::ClientError;

use crate::context::Context;
use crate::exit_codes::*;
use crate::CliError;

// ── Login ───────────────────────────────────────────────────────────

pub fn cmd_login(login: String, password: Option<String>) -> Result<(), CliError> {
    let ctx = Context::load()?;

    // Resolve password: --password flag / AVALIA_PASSWORD env > interactive prompt
    let password = match password {
        Some(p) => p,
        None if atty::is(atty::Stream::Stdin) => {
            eprint!("Password for {}: ", login);
            io::stderr().flush().ok();
            let mut buf = String::new();
            io::stdin()
                .read_line(&mut buf)
                .map_err(|e| CliError { code: EXIT_ERROR, message: e.to_string(), hint: None })?;
            buf.trim_end_matches(['\r', '\n']).to_string()
        }
        None => {
            return Err(CliError {
                code: EXIT_USAGE,
                message: "No password provided and stdin is not a TTY".into(),
                hint: Some("pass --password or set AVALIA_PASSWORD".into()),
            });
        }
    };

    if password.is_empty() {
        return Err(CliError {
            code: EXIT_USAGE,
            message: "No password provided".into(),
            hint: Some("pass --password or set AVALIA_PASSWORD".into()),
        });
    }

    let client = ctx.client()?;
    let evaluator = client.login(&login, &password).map_err(|e| match e {
        ClientError::Api(msg) => CliError {
            code: EXIT_API_REJECTED,
            message: format!("Login rejected: {}", msg),
            hint: Some("check your login and password".into()),
        },
        other => other.into(),
    })?;

    ctx.sessions.save(&evaluator)?;

    if evaluator.name.is_empty() {
        eprintln!("Logged in as {}", evaluator.id);
    } else {
        eprintln!("Logged in as {} ({})", evaluator.name, evaluator.id);
    }
    Ok(())
}

// ── Logout ──────────────────────────────────────────────────────────

pub fn cmd_logout() -> Result<(), CliError> {
    let ctx = Context::load()?;
    if ctx.sessions.clear()? {
        eprintln!("Logged out");
    } else {
        eprintln!("Not logged in");
    }
    Ok(())
}

// ── Whoami ──────────────────────────────────────────────────────────

pub fn cmd_whoami(json: bool) -> Result<(), CliError> {
    let ctx = Context::load()?;
    let session = ctx.require_session()?;

    if json {
        let out = serde_json::to_string_pretty(&session)
            .map_err(|e| CliError { code: EXIT_ERROR, message: e.to_string(), hint: None })?;
        println!("{}", out);
        return Ok(());
    }

    let evaluator = &session.evaluator;
    println!("id:        {}", evaluator.id);
    println!("name:      {}", evaluator.name);
    if !evaluator.category.is_empty() {
        println!("category:  {}", evaluator.category);
    }
    if !evaluator.evaluation_deadline.is_empty() {
        println!("deadline:  {}", evaluator.evaluation_deadline);
    }
    println!("logged in: {}", session.saved_at.format("%Y-%m-%d %H:%M UTC"));
    Ok(())
}
