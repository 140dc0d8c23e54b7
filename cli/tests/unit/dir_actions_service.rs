//! Unit tests for remote directory actions.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use remotekit::application::services::{Remote, dir_actions};
use remotekit::domain::{EntryKind, RemoteError};

use crate::mocks::{Reply, ScriptedExecutor, StaticTargets};

#[tokio::test]
async fn test_list_missing_directory_is_not_found() {
    let targets = StaticTargets::host1();
    let executor = ScriptedExecutor::new([Reply::fail(1, "")]);
    let remote = Remote::new(&targets, &executor, "host1");

    let err = dir_actions::list(&remote, "/missing/path").await.unwrap_err();

    assert!(matches!(err, RemoteError::NotFound { ref path, .. } if path == "/missing/path"));
    assert_eq!(executor.commands(), ["test -d '/missing/path'"]);
}

#[tokio::test]
async fn test_list_regular_file_is_not_found() {
    let targets = StaticTargets::host1();
    let executor = ScriptedExecutor::new([Reply::fail(1, "")]);
    let remote = Remote::new(&targets, &executor, "host1");

    let err = dir_actions::list(&remote, "/srv/app/app.yaml").await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(executor.calls().len(), 1, "nothing is listed");
}

#[tokio::test]
async fn test_list_directory_removed_between_check_and_listing() {
    let targets = StaticTargets::host1();
    let executor = ScriptedExecutor::new([
        Reply::ok(""),
        Reply::fail(2, "ls: cannot access '/srv/tmp/': No such file or directory\n"),
    ]);
    let remote = Remote::new(&targets, &executor, "host1");

    let err = dir_actions::list(&remote, "/srv/tmp").await.unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_list_parses_entries() {
    let targets = StaticTargets::host1();
    let executor = ScriptedExecutor::new([
        Reply::ok(""),
        Reply::ok(
            "total 8\n\
             drwxr-xr-x 2 deploy deploy 4096 Jan  3 10:00 logs\n\
             -rw-r--r-- 1 deploy deploy   42 Jan  3 10:01 app.yaml\n",
        ),
    ]);
    let remote = Remote::new(&targets, &executor, "host1");

    let entries = dir_actions::list(&remote, "/srv/app").await.expect("list");

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].name, "app.yaml");
    assert_eq!(entries[0].kind, EntryKind::File);
    assert_eq!(entries[0].size, 42);
    assert_eq!(entries[1].path, "/srv/app/logs");
    assert!(entries[1].is_dir());
}

#[tokio::test]
async fn test_list_symlinked_directory_lists_its_target() {
    let targets = StaticTargets::host1();
    let executor = ScriptedExecutor::new([
        Reply::ok(""),
        Reply::ok("total 4\n-rw-r--r-- 1 deploy deploy 42 Jan  3 10:01 app.yaml\n"),
    ]);
    let remote = Remote::new(&targets, &executor, "host1");

    let entries = dir_actions::list(&remote, "/srv/current").await.expect("list");

    assert_eq!(
        executor.commands(),
        ["test -d '/srv/current'", "LC_ALL=C ls -lA -- '/srv/current/'"]
    );
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "app.yaml");
    assert_eq!(entries[0].path, "/srv/current/app.yaml");
}

#[tokio::test]
async fn test_exists_and_create() {
    let targets = StaticTargets::host1();
    let executor = ScriptedExecutor::new([Reply::fail(1, ""), Reply::ok("")]);
    let remote = Remote::new(&targets, &executor, "host1");

    assert!(!dir_actions::exists(&remote, "/srv/app/logs").await.expect("exists"));
    dir_actions::create(&remote, "/srv/app/logs").await.expect("create");

    assert_eq!(
        executor.commands(),
        ["test -d '/srv/app/logs'", "mkdir -p -- '/srv/app/logs'"]
    );
}

#[tokio::test]
async fn test_remove_refuses_root_without_connecting() {
    let targets = StaticTargets::host1();
    let executor = ScriptedExecutor::default();
    let remote = Remote::new(&targets, &executor, "host1");

    for path in ["/", "//", ""] {
        let err = dir_actions::remove(&remote, path).await.unwrap_err();
        assert!(matches!(err, RemoteError::InvalidPath { .. }), "{path:?}");
    }
    assert!(executor.calls().is_empty());
}

#[tokio::test]
async fn test_remove_is_recursive() {
    let targets = StaticTargets::host1();
    let executor = ScriptedExecutor::new([Reply::ok("")]);
    let remote = Remote::new(&targets, &executor, "host1");

    dir_actions::remove(&remote, "/srv/app/cache").await.expect("remove");

    assert_eq!(executor.commands(), ["rm -rf -- '/srv/app/cache'"]);
}

#[tokio::test]
async fn test_copy_creates_destination_first() {
    let targets = StaticTargets::host1();
    let executor = ScriptedExecutor::new([Reply::ok(""), Reply::ok("")]);
    let remote = Remote::new(&targets, &executor, "host1");

    dir_actions::copy(&remote, "/srv/app/", "/srv/backup")
        .await
        .expect("copy");

    assert_eq!(
        executor.commands(),
        ["mkdir -p -- '/srv/backup'", "cp -Rp -- '/srv/app'/. '/srv/backup'"]
    );
}

#[tokio::test]
async fn test_copy_missing_source_is_not_found() {
    let targets = StaticTargets::host1();
    let executor = ScriptedExecutor::new([
        Reply::ok(""),
        Reply::fail(1, "cp: cannot stat '/srv/nope/.': No such file or directory\n"),
    ]);
    let remote = Remote::new(&targets, &executor, "host1");

    let err = dir_actions::copy(&remote, "/srv/nope", "/srv/backup")
        .await
        .unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_clear_keeps_named_entries() {
    let targets = StaticTargets::host1();
    let executor = ScriptedExecutor::new([Reply::ok("")]);
    let remote = Remote::new(&targets, &executor, "host1");

    dir_actions::clear(&remote, "/srv/app", &["config.yaml"])
        .await
        .expect("clear");

    assert_eq!(
        executor.commands(),
        ["find '/srv/app' -mindepth 1 -maxdepth 1 ! -name 'config.yaml' -exec rm -rf -- {} +"]
    );
}

#[tokio::test]
async fn test_clear_rejects_nested_keep_entries() {
    let targets = StaticTargets::host1();
    let executor = ScriptedExecutor::default();
    let remote = Remote::new(&targets, &executor, "host1");

    let err = dir_actions::clear(&remote, "/srv/app", &["conf/app.yaml"])
        .await
        .unwrap_err();

    assert!(matches!(err, RemoteError::InvalidPath { .. }));
    assert!(executor.calls().is_empty());
}
