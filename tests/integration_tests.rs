//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: token exchange → admin requests → aggregated output

use clap::Parser;
use pbi_admin::cli::{Cli, Runner};
use pbi_admin::{
    AdminClient, ApiResponse, ClientConfig, Credential, LimitWarning, ListGroupsOptions, Listing,
    RefreshablesOptions, ScanOptions,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::io::Write;
use std::time::Duration;
use wiremock::matchers::{
    body_json, header, method, path, query_param, query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TENANT: &str = "tenant-1";
const API_PREFIX: &str = "/v1.0/myorg";

// ============================================================================
// Helpers
// ============================================================================

fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::builder()
        .api_base_url(format!("{}{API_PREFIX}/", server.uri()))
        .authority_url(format!("{}/", server.uri()))
        .build()
}

fn credential() -> Credential {
    Credential::new("app-id", "s3cr3t", TENANT)
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(format!("/{TENANT}/oauth2/v2.0/token")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "expires_in": 3599,
            "access_token": "tok-123"
        })))
        .mount(server)
        .await;
}

async fn mount_token_rejected(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(format!("/{TENANT}/oauth2/v2.0/token")))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_client",
            "error_description": "AADSTS7000215: Invalid client secret provided."
        })))
        .mount(server)
        .await;
}

fn groups(range: std::ops::Range<u32>) -> Vec<Value> {
    range.map(|i| json!({ "id": format!("g-{i}") })).collect()
}

async fn mount_groups_page(server: &MockServer, skip: u32, items: Vec<Value>, total: u32) {
    let mock = Mock::given(method("GET"))
        .and(path(format!("{API_PREFIX}/admin/groups")))
        .and(header("Authorization", "Bearer tok-123"));
    // The first page carries no offset
    let mock = if skip == 0 {
        mock.and(query_param_is_missing("$skip"))
    } else {
        mock.and(query_param("$skip", skip.to_string()))
    };
    mock
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "@odata.count": total,
            "value": items
        })))
        .expect(1)
        .mount(server)
        .await;
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn test_connect_acquires_token() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    let client = AdminClient::connect_with(&config_for(&server), credential())
        .await
        .unwrap();

    assert!(client.token_state().is_acquired());
    let headers = client.auth_headers();
    assert_eq!(headers["authorization"], "Bearer tok-123");
}

#[tokio::test]
async fn test_rejected_credentials_still_construct() {
    let server = MockServer::start().await;
    mount_token_rejected(&server).await;

    Mock::given(method("GET"))
        .and(path(format!("{API_PREFIX}/admin/groups")))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": { "code": "PowerBINotAuthorizedException" }
        })))
        .mount(&server)
        .await;

    let client = AdminClient::connect_with(&config_for(&server), credential())
        .await
        .unwrap();

    assert!(!client.token_state().is_acquired());
    assert!(client.auth_headers().is_empty());
    let err = client.require_token().unwrap_err().to_string();
    assert!(err.contains("401"));
    assert!(!err.contains("s3cr3t"));

    let listing = client
        .list_groups_as_admin(&ListGroupsOptions::new())
        .await
        .unwrap();
    match listing.value {
        Listing::Response(ApiResponse::Error { status, .. }) => assert_eq!(status, 403),
        other => panic!("Expected error response, got {other:?}"),
    }

    let requests = server.received_requests().await.unwrap();
    let api_request = requests
        .iter()
        .find(|r| r.url.path().ends_with("/admin/groups"))
        .unwrap();
    assert!(api_request.headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_secret_not_in_debug_output() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    let client = AdminClient::connect_with(&config_for(&server), credential())
        .await
        .unwrap();

    let debug = format!("{client:?} {:?}", credential());
    assert!(!debug.contains("s3cr3t"));
    assert!(!debug.contains("tok-123"));
}

// ============================================================================
// Pagination over HTTP
// ============================================================================

#[tokio::test]
async fn test_list_groups_aggregates_pages() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_groups_page(&server, 0, groups(0..2), 5).await;
    mount_groups_page(&server, 2, groups(2..4), 5).await;
    mount_groups_page(&server, 4, groups(4..5), 5).await;

    let client = AdminClient::connect_with(&config_for(&server), credential())
        .await
        .unwrap();
    let listing = client
        .list_groups_as_admin(&ListGroupsOptions::new().top(2))
        .await
        .unwrap();

    assert!(!listing.has_warnings());
    let items = listing.value.into_items().unwrap();
    assert_eq!(items, groups(0..5));
}

#[tokio::test]
async fn test_list_groups_clamps_top() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    Mock::given(method("GET"))
        .and(path(format!("{API_PREFIX}/admin/groups")))
        .and(query_param("$top", "5000"))
        .and(query_param_is_missing("$skip"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "@odata.count": 1,
            "value": [{ "id": "g-0" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = AdminClient::connect_with(&config_for(&server), credential())
        .await
        .unwrap();
    let listing = client
        .list_groups_as_admin(&ListGroupsOptions::new().top(9000))
        .await
        .unwrap();

    assert_eq!(
        listing.warnings,
        vec![LimitWarning::PageSizeClamped {
            requested: 9000,
            applied: 5000
        }]
    );
    assert_eq!(listing.value.items().map(<[Value]>::len), Some(1));
}

#[tokio::test]
async fn test_rate_limited_first_page_passes_through() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    Mock::given(method("GET"))
        .and(path(format!("{API_PREFIX}/admin/groups")))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "30")
                .set_body_json(json!({ "message": "Rate limit exceeded" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = AdminClient::connect_with(&config_for(&server), credential())
        .await
        .unwrap();
    let listing = client
        .list_groups_as_admin(&ListGroupsOptions::new())
        .await
        .unwrap();

    match listing.value {
        Listing::Response(ApiResponse::RateLimited { retry_after, .. }) => {
            assert_eq!(retry_after, Some(Duration::from_secs(30)));
        }
        other => panic!("Expected rate-limited response, got {other:?}"),
    }
}

#[tokio::test]
async fn test_refreshables_filter_and_expand() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    Mock::given(method("GET"))
        .and(path(format!("{API_PREFIX}/admin/capacities/refreshables")))
        .and(query_param("$expand", "group"))
        .and(query_param("$filter", "group/id eq 'g-7'"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "@odata.count": 1,
            "value": [{ "id": "r-1", "group": { "id": "g-7" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = AdminClient::connect_with(&config_for(&server), credential())
        .await
        .unwrap();
    let listing = client
        .list_refreshables_for_group_as_admin(&RefreshablesOptions::for_group("g-7"))
        .await
        .unwrap();

    assert_eq!(listing.value.items().unwrap()[0]["id"], "r-1");
}

// ============================================================================
// Workspace scans
// ============================================================================

#[tokio::test]
async fn test_start_scan_over_limit_still_sends_all() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    let ids: Vec<String> = (0..101).map(|i| format!("w-{i}")).collect();

    Mock::given(method("POST"))
        .and(path(format!("{API_PREFIX}/admin/workspaces/getInfo")))
        .and(query_param("lineage", "true"))
        .and(query_param("getArtifactUsers", "false"))
        .and(body_json(json!({ "workspaces": ids })))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({
            "id": "scan-1",
            "createdDateTime": "2024-01-01T00:00:00Z",
            "status": "NotStarted"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = AdminClient::connect_with(&config_for(&server), credential())
        .await
        .unwrap();
    let response = client
        .start_workspace_scan(&ids, &ScanOptions::default())
        .await
        .unwrap();

    assert_eq!(
        response.warnings,
        vec![LimitWarning::TooManyWorkspaces {
            requested: 101,
            limit: 100
        }]
    );
    assert!(response.value.is_success());
    assert_eq!(response.value.body()["id"], "scan-1");
}

#[tokio::test]
async fn test_scan_status_and_result() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    Mock::given(method("GET"))
        .and(path(format!("{API_PREFIX}/admin/workspaces/scanStatus/scan-1")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "scan-1", "status": "Succeeded" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{API_PREFIX}/admin/workspaces/scanResult/scan-1")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "workspaces": [{ "id": "w-0" }] })),
        )
        .mount(&server)
        .await;

    let client = AdminClient::connect_with(&config_for(&server), credential())
        .await
        .unwrap();

    let status = client.get_scan_status("scan-1").await.unwrap();
    assert_eq!(status.body()["status"], "Succeeded");

    let result = client.get_scan_result("scan-1").await.unwrap();
    assert_eq!(result.body()["workspaces"][0]["id"], "w-0");
}

// ============================================================================
// CLI runner
// ============================================================================

fn write_config(server: &MockServer) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
api_base_url: "{uri}{API_PREFIX}/"
authority_url: "{uri}/"
credentials:
  client_id: app-id
  client_secret: s3cr3t
  tenant_id: {TENANT}
"#,
        uri = server.uri()
    )
    .unwrap();
    file
}

#[tokio::test]
async fn test_runner_groups() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_groups_page(&server, 0, groups(0..3), 3).await;

    let config = write_config(&server);
    let cli = Cli::try_parse_from([
        "pbi-admin",
        "-C",
        config.path().to_str().unwrap(),
        "groups",
    ])
    .unwrap();

    let output = Runner::new(cli).execute().await.unwrap();
    assert_eq!(output.failure, None);
    assert_eq!(output.value, Value::Array(groups(0..3)));
}

#[tokio::test]
async fn test_runner_token_rejected() {
    let server = MockServer::start().await;
    mount_token_rejected(&server).await;

    let config = write_config(&server);
    let cli =
        Cli::try_parse_from(["pbi-admin", "-C", config.path().to_str().unwrap(), "token"]).unwrap();

    let output = Runner::new(cli).execute().await.unwrap();
    assert_eq!(output.value["acquired"], false);
    assert!(output.failure.is_some());
    assert!(!output.value.to_string().contains("s3cr3t"));
}
