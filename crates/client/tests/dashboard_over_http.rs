//! Assignment pipeline driven through the HTTP client against a mock backend.

use std::time::Duration;

use httpmock::prelude::*;
use serde_json::json;

use avalia_assign::{
    default_catalog, Evaluator, EvaluatorDashboard, PipelineError, RefreshOutcome, SheetSpec,
};
use avalia_client::ApiClient;

fn mock_sheet(server: &MockServer, sheet: &str, body: serde_json::Value) {
    server.mock(|when, then| {
        when.method(POST)
            .path("/exec")
            .form_urlencoded_tuple("action", "loadData")
            .form_urlencoded_tuple("sheet", sheet);
        then.status(200).json_body(body);
    });
}

#[test]
fn refresh_builds_filtered_view() {
    let server = MockServer::start();
    mock_sheet(&server, "DT", json!({"success": true, "data": [
        {"GRUPO": "Alpha", "AVALIADOR": "Carla Souza"},
        {"GRUPO": "Beta", "AVALIADOR": "u1"},
        {"GRUPO": "Gama", "AVALIADOR": "Bia"},
    ]}));
    mock_sheet(&server, "PITCH", json!({"success": true, "data": [
        {"GRUPO": "Alpha", "AVALIADOR": "Carla"},
        {"GRUPO": "Beta", "AVALIADOR": "u7"},
    ]}));
    mock_sheet(&server, "PROTÓTIPO", json!({"success": true, "data": []}));
    mock_sheet(&server, "PROTÓTIPO_FISICO", json!({"success": false, "error": "Aba não encontrada"}));
    server.mock(|when, then| {
        when.method(POST)
            .path("/exec")
            .form_urlencoded_tuple("sheet", "MARATONA");
        then.status(502);
    });

    let api = ApiClient::new(server.url("/exec"), Duration::from_secs(5)).unwrap();
    let mut dash = EvaluatorDashboard::new(Evaluator::new("u1", "João Pedro"));
    let outcome = dash.refresh(&api, &default_catalog()).unwrap();

    match outcome {
        RefreshOutcome::Assigned { sheets, groups, failures } => {
            assert_eq!(sheets, 1);
            assert_eq!(groups, 1);
            let failed: Vec<&str> = failures.iter().map(|f| f.sheet.as_str()).collect();
            assert_eq!(failed, vec!["PROTÓTIPO_FISICO", "MARATONA"]);
            assert_eq!(failures[0].message, "Aba não encontrada");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    let dt = dash.selected_sheet().unwrap();
    assert_eq!(dt.name, "DT");
    assert_eq!(dt.groups[0].present_str("GRUPO").as_deref(), Some("Beta"));
}

#[test]
fn backend_down_keeps_previous_view() {
    let server = MockServer::start();
    let mut ok = server.mock(|when, then| {
        when.method(POST).path("/exec");
        then.status(200).json_body(json!({"success": true, "data": [{"GRUPO": "Alpha"}]}));
    });

    let catalog = vec![SheetSpec::new("DT", "Design Thinking")];
    let api = ApiClient::new(server.url("/exec"), Duration::from_secs(5)).unwrap();
    let mut dash = EvaluatorDashboard::new(Evaluator::new("u1", ""));
    dash.refresh(&api, &catalog).unwrap();
    assert_eq!(dash.view().len(), 1);

    ok.delete();
    server.mock(|when, then| {
        when.method(POST).path("/exec");
        then.status(503);
    });

    let err = dash.refresh(&api, &catalog).unwrap_err();
    assert!(matches!(err, PipelineError::AllSheetsFailed { .. }));
    assert_eq!(dash.view().len(), 1);
}
