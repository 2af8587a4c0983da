//! GitHub release API calls against a mock server.

use flutter_release::events::Emitter;
use flutter_release::github::{GitHubReleaseConfig, GitHubReleaseManager, GitHubReleaseResult};
use httpmock::prelude::*;
use serde_json::json;

fn manager(server: &MockServer, prerelease: bool) -> GitHubReleaseManager {
    GitHubReleaseManager::new(GitHubReleaseConfig {
        owner: "acme".to_string(),
        repo: "app".to_string(),
        draft: true,
        prerelease,
        notes: "Bug fixes".to_string(),
        token: "ghp_test".to_string(),
        api_url: server.base_url(),
    })
    .unwrap()
}

#[tokio::test]
async fn test_create_release() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/repos/acme/app/releases")
            .header("authorization", "token ghp_test")
            .header("accept", "application/vnd.github.v3+json")
            .json_body(json!({
                "tag_name": "v1.0.0",
                "name": "Release v1.0.0",
                "body": "Bug fixes",
                "draft": true,
                "prerelease": true
            }));
        then.status(201).json_body(json!({
            "id": 7,
            "html_url": "https://github.com/acme/app/releases/tag/v1.0.0",
            "upload_url": "https://uploads.github.com/repos/acme/app/releases/7/assets{?name,label}",
            "draft": true,
            "prerelease": true
        }));
    });

    let release = manager(&server, true).create_release("v1.0.0").await.unwrap();

    mock.assert();
    assert_eq!(release.release_id, 7);
    assert!(release.draft);
    assert_eq!(
        release.upload_endpoint(),
        "https://uploads.github.com/repos/acme/app/releases/7/assets"
    );
}

#[tokio::test]
async fn test_create_release_rejected() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/repos/acme/app/releases");
        then.status(422).body("{\"message\":\"Validation Failed\"}");
    });

    let err = manager(&server, false).create_release("v1.0.0").await.unwrap_err();

    let message = err.to_string();
    assert!(message.contains("422"), "{message}");
    assert!(message.contains("Validation Failed"), "{message}");
    assert!(err
        .recovery_suggestions()
        .iter()
        .any(|s| s.contains("already exist")));
}

#[tokio::test]
async fn test_upload_streams_file() {
    let server = MockServer::start();
    let dir = tempfile::tempdir().unwrap();
    let apk = dir.path().join("app-release.apk");
    std::fs::write(&apk, b"0123456789").unwrap();

    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/releases/7/assets")
            .query_param("name", "app-release.apk")
            .header("content-length", "10")
            .body("0123456789");
        then.status(201).json_body(json!({
            "name": "app-release.apk",
            "size": 10,
            "browser_download_url": "https://example.invalid/app-release.apk"
        }));
    });

    let release = GitHubReleaseResult {
        release_id: 7,
        html_url: String::new(),
        upload_url: server.url("/releases/7/assets{?name,label}"),
        draft: false,
        prerelease: false,
    };

    let uploaded = manager(&server, false)
        .upload_artifacts(&release, &[apk], &Emitter::silent())
        .await
        .unwrap();

    mock.assert();
    assert_eq!(uploaded.len(), 1);
    assert_eq!(uploaded[0].size, 10);
}

#[tokio::test]
async fn test_upload_failure_stops() {
    let server = MockServer::start();
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("app-arm64-v8a-release.apk");
    let second = dir.path().join("app-x86_64-release.apk");
    std::fs::write(&first, b"a").unwrap();
    std::fs::write(&second, b"b").unwrap();

    let failing = server.mock(|when, then| {
        when.method(POST).path("/assets");
        then.status(500);
    });

    let release = GitHubReleaseResult {
        release_id: 1,
        html_url: String::new(),
        upload_url: server.url("/assets{?name,label}"),
        draft: false,
        prerelease: false,
    };

    let result = manager(&server, false)
        .upload_artifacts(&release, &[first, second], &Emitter::silent())
        .await;

    assert!(result.is_err());
    failing.assert_hits(1);
}
