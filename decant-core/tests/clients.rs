//! Client request-construction tests
//!
//! Auth headers, endpoint shapes, and per-host parameter naming.

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use decant_core::clients::{ForgejoClient, GitHubClient, GitLabClient, ReleaseClient};

#[tokio::test]
async fn forgejo_sends_token_header_when_configured() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/releases"))
        .and(header("Authorization", "token test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = ForgejoClient::new(&server.uri(), Some("test-token".to_string()), None).unwrap();
    client.list_releases("owner", "repo").await.unwrap();
    assert!(client.has_token());
}

#[tokio::test]
async fn forgejo_sends_no_auth_header_without_a_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/releases"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = ForgejoClient::new(&server.uri(), None, None).unwrap();
    client.list_releases("owner", "repo").await.unwrap();
    assert!(!client.has_token());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn every_request_carries_the_user_agent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = ForgejoClient::new(&server.uri(), None, None).unwrap();
    client.list_releases("owner", "repo").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let ua = requests[0].headers.get("user-agent").unwrap();
    assert!(ua.to_str().unwrap().starts_with("decant/"));
}

#[tokio::test]
async fn forgejo_uses_limit_github_uses_per_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/releases"))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let forgejo = ForgejoClient::new(&server.uri(), None, None).unwrap();
    forgejo.list_releases("owner", "repo").await.unwrap();

    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/releases"))
        .and(query_param("per_page", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let github = GitHubClient::with_base_url(&server.uri(), None, None).unwrap();
    github.list_releases("owner", "repo").await.unwrap();
}

#[tokio::test]
async fn release_by_tag_hits_the_tags_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/releases/tags/v1.0.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "tag_name": "v1.0.0",
            "prerelease": false,
            "assets": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ForgejoClient::new(&server.uri(), None, None).unwrap();
    let release = client.release_by_tag("owner", "repo", "v1.0.0").await.unwrap();
    assert_eq!(release.tag_name, "v1.0.0");
}

#[tokio::test]
async fn gitlab_encodes_the_project_path_and_uses_private_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/group%2Fsubgroup%2Fproject/releases"))
        .and(header("PRIVATE-TOKEN", "glpat-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "name": "Release 1.0",
            "tag_name": "v1.0.0",
            "upcoming_release": false,
            "assets": {"links": [
                {"id": 1, "name": "tool-linux-amd64", "url": "https://gitlab.example.com/dl"}
            ]}
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let client =
        GitLabClient::with_base_url(&server.uri(), Some("glpat-test".to_string()), None).unwrap();
    let releases = client.list_releases("group/subgroup", "project").await.unwrap();

    assert_eq!(releases.len(), 1);
    assert_eq!(releases[0].assets[0].name, "tool-linux-amd64");
}

#[tokio::test]
async fn malformed_json_is_a_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = ForgejoClient::new(&server.uri(), None, None).unwrap();
    let err = client.list_releases("owner", "repo").await.unwrap_err();
    assert!(err.to_string().contains("malformed response body"));
}

#[tokio::test]
async fn non_200_status_is_carried_in_the_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = ForgejoClient::new(&server.uri(), None, None).unwrap();
    let err = client.latest_release("owner", "repo").await.unwrap_err();

    assert!(err.to_string().contains("500"));
    assert!(!err.is_not_found());
}
