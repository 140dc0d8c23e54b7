//! Unit tests for target listing and display.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use remotekit::application::services::target_catalog;
use remotekit::domain::{ConfigError, TargetRow};

use crate::mocks::{NoEnv, StaticTargets};

const TARGETS: &str = "\
defaults:
  user: deploy
  key: ~/.ssh/deploy_ed25519
targets:
  web:
    host: 10.0.0.5
    remote_dir: /srv/app
  db:
    host: 10.0.0.6
    port: 2222
    agent: true
  legacy:
    host: 10.0.0.7
    password_env: LEGACY_PASSWORD
";

#[test]
fn test_list_resolves_each_target_independently() {
    let targets = StaticTargets::from_yaml(TARGETS);

    let rows = target_catalog::list(&targets, &NoEnv).expect("list");

    assert_eq!(rows.len(), 3);
    let TargetRow::Valid(db) = &rows[0] else {
        panic!("db should resolve: {:?}", rows[0]);
    };
    assert_eq!(db.name, "db");
    assert_eq!(db.port, 2222);
    assert_eq!(db.auth, "ssh-agent");

    let TargetRow::Invalid { name, error } = &rows[1] else {
        panic!("legacy should not resolve without its password variable");
    };
    assert_eq!(name, "legacy");
    assert!(error.contains("LEGACY_PASSWORD"), "{error}");

    let TargetRow::Valid(web) = &rows[2] else {
        panic!("web should resolve");
    };
    assert_eq!(web.user, "deploy");
    assert_eq!(web.auth, "key /home/test/.ssh/deploy_ed25519");
    assert_eq!(web.remote_dir.as_deref(), Some("/srv/app"));
}

#[test]
fn test_list_json_never_contains_secrets() {
    let targets = StaticTargets::from_yaml(TARGETS);
    let rows = target_catalog::list(&targets, &NoEnv).expect("list");

    let json = serde_json::to_value(&rows).expect("serialize");

    assert_eq!(json[2]["name"], "web");
    assert_eq!(json[2]["connect_timeout_secs"], 10);
    assert!(json[0].get("remote_dir").is_none());
    assert!(json[1]["error"].is_string());
}

#[test]
fn test_show_unknown_target() {
    let targets = StaticTargets::from_yaml(TARGETS);

    let err = target_catalog::show(&targets, "cache").unwrap_err();

    assert!(matches!(err, ConfigError::NotFound { .. }));
}

#[test]
fn test_show_known_target() {
    let targets = StaticTargets::from_yaml(TARGETS);

    let summary = target_catalog::show(&targets, "web").expect("show");

    assert_eq!(summary.host, "10.0.0.5");
    assert_eq!(summary.port, 22);
}
