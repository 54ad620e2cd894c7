// Avalia CLI - evaluator view of hackathon score sheets

mod auth;
mod context;
mod event;
mod exit_codes;
mod groups;
mod score;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use exit_codes::EXIT_SUCCESS;

const LOG_ENV: &str = "AVALIA_LOG";

#[derive(Parser)]
#[command(name = "avalia")]
#[command(about = "Score the hackathon groups assigned to you")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the evaluator session
    #[command(after_help = "\
Examples:
  avalia login ana.lima
  AVALIA_PASSWORD=... avalia login ana.lima")]
    Login {
        /// Evaluator login
        login: String,

        /// Password (prompted when omitted and stdin is a TTY)
        #[arg(long, env = "AVALIA_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in evaluator
    Whoami {
        #[arg(long)]
        json: bool,
    },

    /// Show event information (client, dates, rules)
    Info {
        #[arg(long)]
        json: bool,
    },

    /// List the scoring rubrics for your category
    Rubrics {
        #[arg(long)]
        json: bool,
    },

    /// List the groups assigned to you, per sheet
    #[command(after_help = "\
Examples:
  avalia groups
  avalia groups --sheet pitch
  avalia groups --json | jq '.[].groups[].label'")]
    Groups {
        /// Only this sheet (name or label, case and accents ignored)
        #[arg(long)]
        sheet: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Show why each group is or is not visible to you
    Explain {
        #[arg(long)]
        sheet: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Score a group and save to the sheet
    #[command(after_help = "\
Examples:
  avalia score --sheet DT --group Alpha --nota 1=5 --nota 2=4 --nota 3=4
  avalia score --sheet pitch --group Alpha --nota 1=3 --nota 2=5 --feedback 'Great demo'
  avalia score --sheet DT --group Alpha --nota 1=5 --dry-run")]
    Score {
        /// Sheet name or label
        #[arg(long)]
        sheet: String,

        /// Group name, label or id
        #[arg(long)]
        group: String,

        /// Score for rubric N, as N=VALUE. Repeatable. Unset rubrics keep their saved score.
        #[arg(long = "nota", value_name = "N=VALUE")]
        notas: Vec<String>,

        /// Free-text feedback (sent only when not blank)
        #[arg(long)]
        feedback: Option<String>,

        /// Validate and print what would be saved
        #[arg(long)]
        dry_run: bool,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        Commands::Login { login, password } => auth::cmd_login(login, password),
        Commands::Logout => auth::cmd_logout(),
        Commands::Whoami { json } => auth::cmd_whoami(json),
        Commands::Info { json } => event::cmd_info(json),
        Commands::Rubrics { json } => event::cmd_rubrics(json),
        Commands::Groups { sheet, json } => groups::cmd_groups(sheet, json),
        Commands::Explain { sheet, json } => groups::cmd_explain(sheet, json),
        Commands::Score { sheet, group, notas, feedback, dry_run } => {
            score::cmd_score(sheet, group, notas, feedback, dry_run)
        }
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}
