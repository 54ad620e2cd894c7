// Integration tests for the `avalia` binary against a mock backend.
// Run with: cargo test -p avalia-cli --test cli_tests -- --nocapture

use std::path::Path;
use std::process::{Command, Output};

use httpmock::prelude::*;
use serde_json::json;

use avalia_assign::Evaluator;
use avalia_config::SessionStore;

const CONFIG: &str = r#"
timeout_secs = 5

[[sheets]]
name = "DT"
display_name = "Design Thinking"

[[sheets]]
name = "PITCH"
display_name = "Pitch"
"#;

struct Env {
    dir: tempfile::TempDir,
    server: MockServer,
}

impl Env {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), CONFIG).unwrap();
        Self { dir, server: MockServer::start() }
    }

    fn logged_in(evaluator: Evaluator) -> Self {
        let env = Self::new();
        SessionStore::in_dir(env.dir.path()).save(&evaluator).unwrap();
        env
    }

    fn config_dir(&self) -> &Path {
        self.dir.path()
    }

    fn avalia(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_avalia"))
            .args(args)
            .env("AVALIA_CONFIG_DIR", self.config_dir())
            .env("AVALIA_API_BASE_URL", self.server.url("/exec"))
            .env_remove("AVALIA_PASSWORD")
            .env_remove("AVALIA_LOG")
            .output()
            .expect("run avalia")
    }

    fn sheet(&self, sheet: &str, rows: serde_json::Value) {
        self.server.mock(|when, then| {
            when.method(POST)
                .path("/exec")
                .form_urlencoded_tuple("action", "loadData")
                .form_urlencoded_tuple("sheet", sheet);
            then.status(200).json_body(json!({"success": true, "data": rows}));
        });
    }

    fn rubrics(&self, count: usize) {
        let rubrics: Vec<serde_json::Value> = (1..=count)
            .map(|i| json!({"criterio": format!("Critério {i}"), "cincoPontos": "Excelente"}))
            .collect();
        self.server.mock(|when, then| {
            when.method(POST)
                .path("/exec")
                .form_urlencoded_tuple("action", "getRubricas");
            then.status(200).json_body(json!({"success": true, "rubricas": rubrics}));
        });
    }
}

fn code(output: &Output) -> i32 {
    output.status.code().expect("exit code")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn joao() -> Evaluator {
    Evaluator::new("u1", "João Pedro").with_category("HACKATHON")
}

fn standard_sheets(env: &Env) {
    env.sheet("DT", json!([
        {"GRUPO": "Alpha", "AVALIADOR": "Carla Souza"},
        {"GRUPO": "Beta", "AVALIADOR": "joao pedro", "NOTA 1": 3},
        {"GRUPO": "Gama", "AVALIADOR": "Bia"},
    ]));
    env.sheet("PITCH", json!([
        {"GRUPO": "Alpha", "AVALIADOR": "Carla"},
        {"GRUPO": "Beta", "AVALIADOR": "u7"},
    ]));
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[test]
fn whoami_requires_login() {
    let env = Env::new();
    let out = env.avalia(&["whoami"]);
    assert_eq!(code(&out), 3);
    assert!(stderr(&out).contains("Not logged in"));
}

#[test]
fn login_stores_session() {
    let env = Env::new();
    let mock = env.server.mock(|when, then| {
        when.method(POST)
            .path("/exec")
            .form_urlencoded_tuple("action", "login")
            .form_urlencoded_tuple("login", "joao")
            .form_urlencoded_tuple("senha", "pw");
        then.status(200).json_body(json!({
            "success": true,
            "user": {"id": "u1", "name": "João Pedro", "evaluationDeadline": "", "categoria": "HACKATHON"}
        }));
    });

    let out = env.avalia(&["login", "joao", "--password", "pw"]);
    assert_eq!(code(&out), 0, "stderr: {}", stderr(&out));
    mock.assert();

    let out = env.avalia(&["whoami", "--json"]);
    assert_eq!(code(&out), 0);
    let session: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(session["evaluator"]["id"], "u1");
    assert_eq!(session["evaluator"]["categoria"], "HACKATHON");

    let out = env.avalia(&["logout"]);
    assert_eq!(code(&out), 0);
    assert_eq!(code(&env.avalia(&["whoami"])), 3);
}

#[test]
fn login_rejected() {
    let env = Env::new();
    env.server.mock(|when, then| {
        when.method(POST).path("/exec");
        then.status(200).json_body(json!({"success": false, "error": "Senha incorreta"}));
    });

    let out = env.avalia(&["login", "joao", "--password", "nope"]);
    assert_eq!(code(&out), 22);
    assert!(stderr(&out).contains("Senha incorreta"));
    assert!(!env.config_dir().join("session.json").exists());
}

#[test]
fn missing_backend_url_is_config_error() {
    let env = Env::logged_in(joao());
    let out = Command::new(env!("CARGO_BIN_EXE_avalia"))
        .args(["groups"])
        .env("AVALIA_CONFIG_DIR", env.config_dir())
        .env_remove("AVALIA_API_BASE_URL")
        .output()
        .unwrap();
    assert_eq!(code(&out), 10);
    assert!(stderr(&out).contains("AVALIA_API_BASE_URL"));
}

// ---------------------------------------------------------------------------
// Groups / explain
// ---------------------------------------------------------------------------

#[test]
fn groups_json_lists_only_assigned() {
    let env = Env::logged_in(joao());
    standard_sheets(&env);

    let out = env.avalia(&["groups", "--json"]);
    assert_eq!(code(&out), 0, "stderr: {}", stderr(&out));

    let view: Vec<serde_json::Value> = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(view.len(), 1);
    assert_eq!(view[0]["name"], "DT");
    assert_eq!(view[0]["displayName"], "Design Thinking");
    let groups = view[0]["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["label"], "Beta");
    assert_eq!(groups[0]["record"]["AVALIADOR"], "joao pedro");
}

#[test]
fn groups_nothing_assigned() {
    let env = Env::logged_in(Evaluator::new("u9", "Zé Ninguém"));
    standard_sheets(&env);

    let out = env.avalia(&["groups"]);
    assert_eq!(code(&out), 4);
}

#[test]
fn groups_for_sheet_without_assignments() {
    let env = Env::logged_in(joao());
    standard_sheets(&env);

    assert_eq!(code(&env.avalia(&["groups", "--sheet", "pitch"])), 4);
    assert_eq!(code(&env.avalia(&["groups", "--sheet", "BANCA"])), 2);
}

#[test]
fn backend_down() {
    let env = Env::logged_in(joao());
    env.server.mock(|when, then| {
        when.method(POST).path("/exec");
        then.status(503);
    });

    let out = env.avalia(&["groups"]);
    assert_eq!(code(&out), 20);
    assert!(stderr(&out).contains("failed to load"));
}

#[test]
fn explain_reports_rules() {
    let env = Env::logged_in(joao());
    standard_sheets(&env);

    let out = env.avalia(&["explain", "--sheet", "DT", "--json"]);
    assert_eq!(code(&out), 0, "stderr: {}", stderr(&out));

    let decisions: Vec<serde_json::Value> = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(decisions.len(), 3);
    assert_eq!(decisions[0]["outcome"], "not_assigned");
    assert_eq!(decisions[1]["outcome"], "matched");
    assert_eq!(decisions[1]["rule"], "name_exact");
    assert_eq!(decisions[1]["label"], "Beta");
}

// ---------------------------------------------------------------------------
// Score
// ---------------------------------------------------------------------------

#[test]
fn score_saves_all_rubrics() {
    let env = Env::logged_in(joao());
    standard_sheets(&env);
    env.rubrics(2);
    let save = env.server.mock(|when, then| {
        when.method(POST)
            .path("/exec")
            .form_urlencoded_tuple("action", "saveNotas")
            .form_urlencoded_tuple("sheet", "DT")
            .form_urlencoded_tuple("evaluatorId", "u1")
            .form_urlencoded_tuple("grupo", "Beta")
            .form_urlencoded_tuple("NOTA 1", "3")
            .form_urlencoded_tuple("NOTA 2", "5")
            .form_urlencoded_tuple("FEEDBACK", "Boa ideia");
        then.status(200).json_body(json!({"success": true, "updatedRows": 1}));
    });

    // NOTA 1 keeps the score already saved in the row.
    let out = env.avalia(&[
        "score", "--sheet", "design thinking", "--group", "beta", "--nota", "2=5", "--feedback", " Boa ideia ",
    ]);
    assert_eq!(code(&out), 0, "stderr: {}", stderr(&out));
    save.assert();
}

#[test]
fn score_incomplete_is_rejected() {
    let env = Env::logged_in(joao());
    env.sheet("DT", json!([{"GRUPO": "Beta", "AVALIADOR": "u1"}]));
    env.sheet("PITCH", json!([]));
    env.rubrics(3);

    let out = env.avalia(&["score", "--sheet", "DT", "--group", "Beta", "--nota", "1=5", "--nota", "3=9"]);
    assert_eq!(code(&out), 30);
    assert!(stderr(&out).contains("NOTA 2"));
}

#[test]
fn score_unknown_rubric_number() {
    let env = Env::logged_in(joao());
    env.sheet("DT", json!([{"GRUPO": "Beta", "AVALIADOR": "u1"}]));
    env.sheet("PITCH", json!([]));
    env.rubrics(1);

    let out = env.avalia(&["score", "--sheet", "DT", "--group", "Beta", "--nota", "4=5"]);
    assert_eq!(code(&out), 2);
}

#[test]
fn score_for_unassigned_group() {
    let env = Env::logged_in(joao());
    standard_sheets(&env);

    let out = env.avalia(&["score", "--sheet", "DT", "--group", "Alpha", "--nota", "1=5"]);
    assert_eq!(code(&out), 4);
}

#[test]
fn score_no_rows_updated() {
    let env = Env::logged_in(joao());
    env.sheet("DT", json!([{"GRUPO": "Beta", "AVALIADOR": "u1"}]));
    env.sheet("PITCH", json!([]));
    env.rubrics(1);
    env.server.mock(|when, then| {
        when.method(POST)
            .path("/exec")
            .form_urlencoded_tuple("action", "saveNotas");
        then.status(200).json_body(json!({"success": true, "updatedRows": 0}));
    });

    let out = env.avalia(&["score", "--sheet", "DT", "--group", "Beta", "--nota", "1=4"]);
    assert_eq!(code(&out), 31);
}

#[test]
fn score_dry_run_does_not_save() {
    let env = Env::logged_in(joao());
    env.sheet("DT", json!([{"GRUPO": "Beta", "AVALIADOR": "u1"}]));
    env.sheet("PITCH", json!([]));
    env.rubrics(1);
    let save = env.server.mock(|when, then| {
        when.method(POST)
            .path("/exec")
            .form_urlencoded_tuple("action", "saveNotas");
        then.status(200).json_body(json!({"success": true, "updatedRows": 1}));
    });

    let out = env.avalia(&["score", "--sheet", "DT", "--group", "Beta", "--nota", "1=4", "--dry-run"]);
    assert_eq!(code(&out), 0);
    assert!(String::from_utf8_lossy(&out.stdout).contains("NOTA 1 = 4"));
    save.assert_calls(0);
}
