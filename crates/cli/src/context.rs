//! Shared command setup: settings, stored session, backend client, dashboard.

use avalia_assign::{normalize, Evaluator, EvaluatorDashboard, RecordSet, RefreshOutcome, SheetSpec};
use avalia_client::ApiClient;
use avalia_config::{config_dir, SessionStore, Settings, StoredSession};

use crate::exit_codes::*;
use crate::CliError;

pub struct Context {
    pub settings: Settings,
    pub sessions: SessionStore,
}

impl Context {
    pub fn load() -> Result<Self, CliError> {
        let dir = config_dir()?;
        Ok(Self {
            settings: Settings::load_from(&dir)?,
            sessions: SessionStore::in_dir(&dir),
        })
    }

    pub fn client(&self) -> Result<ApiClient, CliError> {
        let url = self.settings.api_base_url()?;
        Ok(ApiClient::new(url, self.settings.timeout())?)
    }

    pub fn require_session(&self) -> Result<StoredSession, CliError> {
        self.sessions.load()?.ok_or_else(|| CliError {
            code: EXIT_NOT_LOGGED_IN,
            message: "Not logged in".into(),
            hint: Some("run `avalia login <login>` first".into()),
        })
    }

    pub fn catalog(&self) -> Vec<SheetSpec> {
        self.settings.sheet_catalog()
    }

    /// Load every sheet and build the evaluator's view. Partial failures become warnings.
    pub fn dashboard(
        &self,
        client: &ApiClient,
        evaluator: Evaluator,
    ) -> Result<(EvaluatorDashboard, RefreshOutcome), CliError> {
        let mut dashboard = EvaluatorDashboard::new(evaluator);
        let outcome = dashboard.refresh(client, &self.catalog())?;
        warn_failures(&outcome);
        Ok((dashboard, outcome))
    }
}

pub fn warn_failures(outcome: &RefreshOutcome) {
    for failure in outcome.failures() {
        eprintln!("warning: sheet {} not loaded: {}", failure.sheet, failure.message);
    }
}

/// Sheet by backend name or display label, ignoring case and accents.
pub fn find_sheet<'a>(sheets: &'a [RecordSet], query: &str) -> Option<&'a RecordSet> {
    let wanted = normalize(query);
    sheets
        .iter()
        .find(|s| normalize(&s.name) == wanted || normalize(&s.display_name) == wanted)
}

/// Error for a `--sheet` that is not in the view: unknown name vs nothing assigned there.
pub fn sheet_not_in_view(catalog: &[SheetSpec], query: &str) -> CliError {
    let wanted = normalize(query);
    let known = catalog
        .iter()
        .any(|s| normalize(&s.name) == wanted || normalize(&s.display_name) == wanted);

    if known {
        CliError {
            code: EXIT_NOTHING_ASSIGNED,
            message: format!("No groups assigned to you in sheet '{}'", query),
            hint: None,
        }
    } else {
        let names: Vec<&str> = catalog.iter().map(|s| s.name.as_str()).collect();
        CliError {
            code: EXIT_USAGE,
            message: format!("Unknown sheet '{}'", query),
            hint: Some(format!("known sheets: {}", names.join(", "))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use avalia_assign::default_catalog;

    #[test]
    fn sheet_lookup_ignores_case_and_accents() {
        let sheets = vec![
            RecordSet::new("PROTÓTIPO", "Protótipo", vec![]),
            RecordSet::new("DT", "Design Thinking", vec![]),
        ];
        assert_eq!(find_sheet(&sheets, "prototipo").map(|s| s.name.as_str()), Some("PROTÓTIPO"));
        assert_eq!(find_sheet(&sheets, "design thinking").map(|s| s.name.as_str()), Some("DT"));
        assert!(find_sheet(&sheets, "PITCH").is_none());
    }

    #[test]
    fn missing_sheet_errors() {
        let catalog = default_catalog();
        assert_eq!(sheet_not_in_view(&catalog, "pitch").code, EXIT_NOTHING_ASSIGNED);
        assert_eq!(sheet_not_in_view(&catalog, "BANCA").code, EXIT_USAGE);
    }
}
