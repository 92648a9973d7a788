//! Tests for `deaddrop share`.

use crate::support::*;

use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_share_requires_a_target() {
    let t = Test::with_warm_cache();
    t.write_payload("secret.txt", "hunter2");

    let output = t.share("secret.txt", "api-key", &[], &[]);

    assert_exit_code(&output, 2);
    assert_stderr_contains(&output, "required");
}

#[test]
fn test_share_rejects_unknown_member() {
    let t = Test::with_warm_cache();
    t.write_payload("secret.txt", "hunter2");

    let output = t.share("secret.txt", "api-key", &["ghost"], &[]);

    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "unknown member or team: ghost");
}

#[test]
fn test_share_rejects_unknown_team() {
    let t = Test::with_warm_cache();
    t.write_payload("secret.txt", "hunter2");

    let output = t.share("secret.txt", "api-key", &[], &["ghosts"]);

    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "unknown member or team: ghosts");
}

#[test]
fn test_share_missing_payload_file() {
    let t = Test::with_warm_cache();

    let output = t.share("missing.txt", "api-key", &["test1"], &[]);

    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "failed to read secret file");
}

#[test]
fn test_share_without_storage_settings_is_a_usage_error() {
    let t = Test::with_warm_cache();
    t.write_payload("secret.txt", "hunter2");

    let output = t.share("secret.txt", "api-key", &["test1"], &[]);

    assert_exit_code(&output, 2);
    assert_stderr_contains(&output, "vault_addr");
    assert_stdout_contains(&output, "VAULT_ADDR");
}

#[test]
fn test_share_drops_for_member_and_team() {
    let t = Test::with_warm_cache();
    t.write_payload("secret.txt", "hunter2");

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap();
    let vault = rt.block_on(async {
        let vault = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/v1/secret/deaddrop/test1/api-key"))
            .and(header("X-Vault-Token", "vault-token"))
            .and(body_json(serde_json::json!({ "secret": "hunter2" })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&vault)
            .await;
        Mock::given(method("PUT"))
            .and(path("/v1/secret/deaddrop/team1/api-key"))
            .and(body_json(serde_json::json!({ "secret": "hunter2" })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&vault)
            .await;
        vault
    });

    // Targets are given in mixed case; the drop paths must use the
    // canonical directory names.
    let mut cmd = t.org_cmd();
    cmd.env("VAULT_ADDR", vault.uri());
    cmd.env("VAULT_TOKEN", "vault-token");
    let output = cmd
        .args([
            "share", "-f", "secret.txt", "-n", "api-key", "-m", "TEST1", "-t", "TEAM1",
        ])
        .output()
        .unwrap();

    assert_success(&output);
    assert_stdout_contains(&output, "dropped api-key for test1, team1");

    rt.block_on(async { drop(vault) });
}

#[test]
fn test_share_deduplicates_targets() {
    let t = Test::with_warm_cache();
    t.write_payload("secret.txt", "hunter2");

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap();
    let vault = rt.block_on(async {
        let vault = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/v1/secret/deaddrop/test1/api-key"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&vault)
            .await;
        vault
    });

    let mut cmd = t.org_cmd();
    cmd.env("VAULT_ADDR", vault.uri());
    cmd.env("VAULT_TOKEN", "vault-token");
    let output = cmd
        .args([
            "share", "-f", "secret.txt", "-n", "api-key", "-m", "test1", "-m", "TEST1",
        ])
        .output()
        .unwrap();

    assert_success(&output);
    assert_stdout_contains(&output, "dropped api-key for test1");

    rt.block_on(async { drop(vault) });
}
