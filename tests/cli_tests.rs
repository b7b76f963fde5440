use assert_cmd::prelude::*;
use httpmock::{
    Method::{PATCH, POST},
    MockServer,
};
use predicates::prelude::*;
use serde_json::json;
use std::process::Command;

fn mcupload() -> Command {
    let mut cmd = Command::cargo_bin("mcupload").unwrap();
    cmd.env_remove("MOBILE_CENTER_API_TOKEN").env_remove("RUST_LOG");
    cmd
}

#[test]
fn prints_help() {
    let mut cmd = mcupload();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("distribution group"));
}

#[test]
fn missing_group_exits_before_any_request() {
    let mut cmd = mcupload();
    cmd.args(["-A", "App", "-T", "tok", "-L", "file.ipa", "-U", "Owner"])
        .args(["--api-url", "http://127.0.0.1:9"]);
    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("-D"));
}

#[test]
fn publishes_against_mock_server() {
    let server = MockServer::start();
    let slot = server.mock(|when, then| {
        when.method(POST)
            .path("/v0.1/apps/Owner/App/release_uploads")
            .header("x-api-token", "tok");
        then.status(201).json_body(json!({
            "upload_id": "up-9",
            "upload_url": server.url("/upload/up-9")
        }));
    });
    let upload = server.mock(|when, then| {
        when.method(POST).path("/upload/up-9");
        then.status(200);
    });
    let commit = server.mock(|when, then| {
        when.method(PATCH)
            .path("/v0.1/apps/Owner/App/release_uploads/up-9")
            .json_body(json!({"status": "committed"}));
        then.status(200)
            .json_body(json!({"release_id": 12, "release_url": "v0.1/apps/Owner/App/releases/12"}));
    });
    let distribute = server.mock(|when, then| {
        when.method(PATCH)
            .path("/v0.1/apps/Owner/App/releases/12")
            .json_body(json!({"destination_name": "Group", "release_notes": "Nightly build"}));
        then.status(200).json_body(json!({}));
    });

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("build.ipa");
    std::fs::write(&file, b"0123456789").unwrap();

    let mut cmd = mcupload();
    cmd.args(["-A", "App", "-T", "tok", "-U", "Owner", "-D", "Group"])
        .arg("-L")
        .arg(&file)
        .args(["-RN", "Nightly build", "--api-url"])
        .arg(server.base_url());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("All Done"));

    slot.assert();
    upload.assert();
    commit.assert();
    distribute.assert();
}

#[test]
fn commit_failure_exits_with_commit_code() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v0.1/apps/Owner/App/release_uploads");
        then.status(201).json_body(json!({
            "upload_id": "up-9",
            "upload_url": server.url("/upload/up-9")
        }));
    });
    server.mock(|when, then| {
        when.method(POST).path("/upload/up-9");
        then.status(200);
    });
    server.mock(|when, then| {
        when.method(PATCH).path("/v0.1/apps/Owner/App/release_uploads/up-9");
        then.status(409).body("already committed");
    });
    let distribute = server.mock(|when, then| {
        when.method(PATCH).path_contains("/releases/");
        then.status(200);
    });

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("build.ipa");
    std::fs::write(&file, b"0123456789").unwrap();

    let mut cmd = mcupload();
    cmd.args(["-A", "App", "-T", "tok", "-U", "Owner", "-D", "Group"])
        .arg("-L")
        .arg(&file)
        .arg("--api-url")
        .arg(server.base_url());
    cmd.assert()
        .code(5)
        .stdout(predicate::str::contains("All Done").not())
        .stderr(predicate::str::contains("already committed"));

    assert_eq!(distribute.hits(), 0);
}
