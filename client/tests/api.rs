use importdash_client::ClientError;
use importdash_client::DashboardClient;
use importdash_client::RunListQuery;
use importdash_client::RunOrder;
use importdash_protocol::LogLevel;
use importdash_protocol::RunStatus;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::method;
use wiremock::matchers::path;
use wiremock::matchers::query_param;

fn client_for(server: &MockServer) -> DashboardClient {
    DashboardClient::new(&server.uri()).expect("mock server uri is a valid base url")
}

fn run_json(run_id: &str) -> serde_json::Value {
    json!({
        "run_id": run_id,
        "repo_name": "data",
        "branch_name": "main",
        "pr_number": 17,
        "commit_sha": "0c4f1a2",
        "time_created": "2020-06-01T12:00:00Z",
        "time_completed": "2020-06-01T12:30:00Z",
        "status": "succeeded",
        "import_attempts": ["a1", "a2"],
        "logs": ["l1", "l2"],
    })
}

#[tokio::test]
async fn list_system_runs_passes_limit_and_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/system_runs"))
        .and(query_param("limit", "5"))
        .and(query_param("order", "desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([run_json("r1")])))
        .expect(1)
        .mount(&server)
        .await;

    let runs = client_for(&server)
        .list_system_runs(RunListQuery {
            limit: Some(5),
            order: Some(RunOrder::Descending),
        })
        .await
        .expect("listing succeeds");

    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].run_id, "r1");
    assert_eq!(runs[0].status, RunStatus::Succeeded);
    assert_eq!(runs[0].import_attempts, vec!["a1", "a2"]);
}

#[tokio::test]
async fn list_system_runs_without_query_sends_no_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/system_runs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let runs = client_for(&server)
        .list_system_runs(RunListQuery::default())
        .await
        .expect("listing succeeds");

    assert!(runs.is_empty());
}

#[tokio::test]
async fn system_run_logs_decodes_levels() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/system_runs/r1/logs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "log_id": "l1",
                "time_logged": "2020-06-01T12:01:00Z",
                "level": "warning",
                "message": "slow download",
            },
        ])))
        .mount(&server)
        .await;

    let logs = client_for(&server)
        .system_run_logs("r1")
        .await
        .expect("logs fetch succeeds");

    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].level, LogLevel::Warning);
    assert_eq!(logs[0].message, "slow download");
}

#[tokio::test]
async fn import_attempt_accepts_camel_case_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/import_attempts/a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "attemptId": "a1",
            "absoluteImportName": "scripts/us_bls:cpi",
            "status": "running",
            "timeCreated": "2020-06-01T12:05:00Z",
            "provenanceUrl": "https://example.org/cpi.csv",
            "provenanceDescription": "CPI release",
        })))
        .mount(&server)
        .await;

    let attempt = client_for(&server)
        .import_attempt("a1")
        .await
        .expect("attempt fetch succeeds");

    assert_eq!(attempt.attempt_id, "a1");
    assert_eq!(attempt.absolute_import_name, "scripts/us_bls:cpi");
    assert_eq!(attempt.status, RunStatus::Running);
}

#[tokio::test]
async fn import_attempt_logs_hits_attempt_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/import_attempts/a1/logs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let logs = client_for(&server)
        .import_attempt_logs("a1")
        .await
        .expect("logs fetch succeeds");

    assert!(logs.is_empty());
}

#[tokio::test]
async fn non_success_status_maps_to_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/system_runs"))
        .respond_with(ResponseTemplate::new(502).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .list_system_runs(RunListQuery::default())
        .await
        .expect_err("502 must surface as an error");

    match err {
        ClientError::Status { status, body, .. } => {
            assert_eq!(status, 502);
            assert_eq!(body, "upstream unavailable");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_maps_to_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/system_runs/r1/logs"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .system_run_logs("r1")
        .await
        .expect_err("html body must surface as an error");

    assert!(matches!(err, ClientError::Decode { .. }));
}
