use drive_risk_server::analytics::compute_report;
use drive_risk_server::google::{DriveClient, PeopleClient, ProviderError};
use std::time::{Duration, Instant};
use wiremock::matchers::{bearer_token, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn drive_for(mock_server: &MockServer, token: &str) -> DriveClient {
    DriveClient::new_with_base_url(
        reqwest::Client::new(),
        format!("{}/drive/v3", mock_server.uri()),
        token,
    )
}

fn people_for(mock_server: &MockServer, token: &str) -> PeopleClient {
    PeopleClient::new_with_base_url(reqwest::Client::new(), mock_server.uri(), token)
}

fn files_body(count: usize) -> serde_json::Value {
    let files: Vec<_> = (0..count)
        .map(|i| serde_json::json!({"id": format!("f{}", i), "name": format!("file-{}", i)}))
        .collect();
    serde_json::json!({"kind": "drive#fileList", "files": files})
}

async fn mount_happy_path(mock_server: &MockServer, delay: Option<Duration>) {
    let with_delay = |template: ResponseTemplate| match delay {
        Some(d) => template.set_delay(d),
        None => template,
    };

    // Full file listing (no search query)
    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .and(query_param("pageSize", "1000"))
        .and(query_param_is_missing("q"))
        .respond_with(with_delay(
            ResponseTemplate::new(200).set_body_json(files_body(5)),
        ))
        .mount(mock_server)
        .await;

    // Limited-visibility listing
    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .and(query_param("pageSize", "1000"))
        .and(query_param("q", "visibility = 'limited'"))
        .respond_with(with_delay(
            ResponseTemplate::new(200).set_body_json(files_body(2)),
        ))
        .mount(mock_server)
        .await;

    // Permissions on the Drive root
    Mock::given(method("GET"))
        .and(path("/drive/v3/files/root/permissions"))
        .respond_with(with_delay(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({
                "kind": "drive#permissionList",
                "permissions": [
                    {"role": "writer", "type": "user"},
                    {"role": "owner", "type": "user"}
                ]
            }),
        )))
        .mount(mock_server)
        .await;

    // Profile
    Mock::given(method("GET"))
        .and(path("/v1/people/me"))
        .and(query_param("personFields", "names,photos"))
        .respond_with(with_delay(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({
                "resourceName": "people/me",
                "names": [{"displayName": "Alice"}],
                "photos": [{"url": "http://x/p.png"}]
            }),
        )))
        .mount(mock_server)
        .await;
}

/// All four provider responses merge into a single report
#[tokio::test]
async fn test_compute_report_merges_counts_and_profile() {
    let mock_server = MockServer::start().await;
    mount_happy_path(&mock_server, None).await;

    let drive = drive_for(&mock_server, "tok");
    let people = people_for(&mock_server, "tok");

    let report = compute_report(&drive, &people).await.unwrap();

    assert_eq!(report.public_files_count, 5);
    assert_eq!(report.access_count, 1); // owner entry excluded
    assert_eq!(report.external_files_count, 2);
    assert_eq!(report.name, "Alice");
    assert_eq!(report.profile_pic_url, "http://x/p.png");
}

/// Non-user principals never count toward access exposure
#[tokio::test]
async fn test_access_count_filters_principal_type() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files/root/permissions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "permissions": [
                {"role": "reader", "type": "anyone"},
                {"role": "writer", "type": "group"},
                {"role": "reader", "type": "user"},
                {"role": "owner", "type": "user"}
            ]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(files_body(0)))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/people/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "names": [{"displayName": "Bob"}],
            "photos": [{"url": "http://x/b.png"}]
        })))
        .mount(&mock_server)
        .await;

    let drive = drive_for(&mock_server, "tok");
    let people = people_for(&mock_server, "tok");

    let report = compute_report(&drive, &people).await.unwrap();

    // Only the non-owner "user" entry counts
    assert_eq!(report.access_count, 1);
}

/// One failing sub-query fails the whole report, even if others succeed
#[tokio::test]
async fn test_compute_report_fails_fast_on_permissions_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(files_body(5)))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files/root/permissions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend exploded"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/people/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "names": [{"displayName": "Alice"}],
            "photos": [{"url": "http://x/p.png"}]
        })))
        .mount(&mock_server)
        .await;

    let drive = drive_for(&mock_server, "tok");
    let people = people_for(&mock_server, "tok");

    let result = compute_report(&drive, &people).await;

    match result {
        Err(ProviderError::Api { status, message }) => {
            assert_eq!(status, 500);
            assert!(message.contains("backend exploded"));
        }
        other => panic!("Expected Api error, got {:?}", other.map(|_| ())),
    }
}

/// The four sub-queries run concurrently, not sequentially
#[tokio::test]
async fn test_sub_queries_run_concurrently() {
    let mock_server = MockServer::start().await;
    mount_happy_path(&mock_server, Some(Duration::from_millis(200))).await;

    let drive = drive_for(&mock_server, "tok");
    let people = people_for(&mock_server, "tok");

    let started = Instant::now();
    let report = compute_report(&drive, &people).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(report.public_files_count, 5);
    // Four serial 200ms calls would take at least 800ms
    assert!(
        elapsed < Duration::from_millis(650),
        "expected concurrent sub-queries, took {:?}",
        elapsed
    );
}

/// Drive calls carry the caller's bearer token
#[tokio::test]
async fn test_requests_use_caller_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .and(bearer_token("caller_token_77"))
        .respond_with(ResponseTemplate::new(200).set_body_json(files_body(3)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let drive = drive_for(&mock_server, "caller_token_77");
    let files = drive.list_files(1000, None).await.unwrap();

    assert_eq!(files.len(), 3);
}

/// An expired token is reported as Unauthorized
#[tokio::test]
async fn test_unauthorized_drive_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let drive = drive_for(&mock_server, "stale");
    let result = drive.list_files(1000, None).await;

    assert!(matches!(result, Err(ProviderError::Unauthorized)));
}

/// A profile without photos is malformed, not silently defaulted
#[tokio::test]
async fn test_profile_without_photos_is_malformed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/people/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "names": [{"displayName": "Alice"}],
            "photos": []
        })))
        .mount(&mock_server)
        .await;

    let people = people_for(&mock_server, "tok");
    let result = people.get_profile().await;

    match result {
        Err(ProviderError::MalformedResponse(msg)) => assert!(msg.contains("photos")),
        other => panic!("Expected MalformedResponse, got {:?}", other.map(|_| ())),
    }
}
