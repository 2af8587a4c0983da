//! Git publishing against a scripted `git`.

mod common;

use common::ScriptedRunner;
use flutter_release::events::Emitter;
use flutter_release::git::{GitConfig, GitPublisher, RepoSlug};
use std::path::Path;

#[tokio::test]
async fn test_push_falls_back_to_master() {
    let runner = ScriptedRunner::new().failing("git push origin main");
    let emitter = Emitter::silent();
    let publisher = GitPublisher::new(&runner, &emitter, Path::new("."), GitConfig::default());

    let result = publisher.publish("pubspec.yaml", "v2.0.0").await.unwrap();

    assert_eq!(result.pushed_branch, "master");
    assert_eq!(result.tag, "v2.0.0");
    assert_eq!(result.commit_message, "chore: bump version to v2.0.0");

    let commands = runner.commands();
    assert_eq!(
        &commands[commands.len() - 3..],
        ["git push origin main", "git push origin master", "git push origin v2.0.0"]
    );
}

#[tokio::test]
async fn test_push_fails_on_both_branches() {
    let runner = ScriptedRunner::new().failing("git push origin ma");
    let emitter = Emitter::silent();
    let publisher = GitPublisher::new(&runner, &emitter, Path::new("."), GitConfig::default());

    let err = publisher.publish("pubspec.yaml", "v2.0.0").await.unwrap_err();

    assert!(err.to_string().contains("main"));
    assert!(err.to_string().contains("master"));
    // The tag is never pushed after a failed branch push.
    assert!(runner.commands().iter().all(|c| c != "git push origin v2.0.0"));
}

#[tokio::test]
async fn test_optional_path_failure_is_not_fatal() {
    let runner = ScriptedRunner::new().failing("git add android/");
    let emitter = Emitter::silent();
    let publisher = GitPublisher::new(&runner, &emitter, Path::new("."), GitConfig::default());

    let result = publisher.publish("pubspec.yaml", "v2.0.1").await.unwrap();
    assert_eq!(result.pushed_branch, "main");
}

#[tokio::test]
async fn test_commit_failure_stops_before_tag() {
    let runner = ScriptedRunner::new().failing("git commit");
    let emitter = Emitter::silent();
    let publisher = GitPublisher::new(&runner, &emitter, Path::new("."), GitConfig::default());

    assert!(publisher.publish("pubspec.yaml", "v2.0.2").await.is_err());
    assert!(runner.commands().iter().all(|c| !c.starts_with("git tag")));
}

#[tokio::test]
async fn test_remote_slug() {
    let runner = ScriptedRunner::new().with_remote("https://github.com/acme/invest_ledger.git");
    let emitter = Emitter::silent();
    let publisher = GitPublisher::new(&runner, &emitter, Path::new("."), GitConfig::default());

    let slug = publisher.remote_slug().await.unwrap();
    assert_eq!(
        slug,
        RepoSlug {
            owner: "acme".to_string(),
            repo: "invest_ledger".to_string(),
        }
    );

    let without_remote = ScriptedRunner::new();
    let publisher = GitPublisher::new(&without_remote, &emitter, Path::new("."), GitConfig::default());
    assert!(publisher.remote_slug().await.is_err());
}
