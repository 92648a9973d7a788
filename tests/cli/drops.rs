//! Tests for `deaddrop delete` and `deaddrop generate`.

use crate::support::*;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_delete_rejects_unknown_team() {
    let t = Test::with_warm_cache();

    let output = t.delete("api-key", Some("ghosts"));

    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "unknown member or team: ghosts");
}

#[test]
fn test_delete_without_storage_settings_is_a_usage_error() {
    let t = Test::with_warm_cache();

    let output = t.delete("api-key", Some("team1"));

    assert_exit_code(&output, 2);
    assert_stderr_contains(&output, "vault_addr");
}

#[test]
fn test_delete_from_a_team_drop() {
    let t = Test::with_warm_cache();
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap();
    let vault = rt.block_on(async {
        let vault = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/v1/secret/deaddrop/team1/api-key"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&vault)
            .await;
        vault
    });

    // The flag uses the team's display case; the storage path must use
    // the canonical name.
    let mut cmd = t.org_cmd();
    cmd.env("VAULT_ADDR", vault.uri());
    cmd.env("VAULT_TOKEN", "vault-token");
    let output = cmd
        .args(["delete", "api-key", "--team", "TEAM1"])
        .output()
        .unwrap();

    assert_success(&output);
    assert_stdout_contains(&output, "deleted api-key from team1");

    rt.block_on(async { drop(vault) });
}

#[test]
fn test_rejected_storage_token_exits_with_the_auth_code() {
    let t = Test::with_warm_cache();
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap();
    let vault = rt.block_on(async {
        let vault = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/v1/secret/deaddrop/team1/api-key"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&vault)
            .await;
        vault
    });

    let mut cmd = t.org_cmd();
    cmd.env("VAULT_ADDR", vault.uri());
    cmd.env("VAULT_TOKEN", "expired-token");
    let output = cmd
        .args(["delete", "api-key", "--team", "team1"])
        .output()
        .unwrap();

    assert_exit_code(&output, 3);
    assert_stderr_contains(&output, "rejected credentials");
    assert_stdout_contains(&output, "VAULT_TOKEN");
}

#[test]
fn test_generate_writes_policies_and_roles() {
    let t = Test::with_warm_cache();
    let policy_dir = t.dir.path().join("policies");
    let role_dir = t.dir.path().join("roles");

    let output = t.generate(policy_dir.to_str().unwrap(), role_dir.to_str().unwrap());

    assert_success(&output);
    assert_stdout_contains(&output, "generated policies for 2 members and 2 teams");
    assert!(policy_dir.join("deaddrop.hcl").exists());
    assert!(policy_dir.join("deaddrop-test1.hcl").exists());
    assert!(policy_dir.join("deaddrop-team2.hcl").exists());
    assert!(role_dir.join("users/test2.json").exists());
    assert!(role_dir.join("teams/team1.json").exists());
    assert!(role_dir.join("teams/all.json").exists());
}

#[test]
fn test_generate_needs_no_storage_settings() {
    // Policy generation is local file output; it must not demand the
    // storage service configuration that secret operations need.
    let t = Test::with_warm_cache();
    let policy_dir = t.dir.path().join("policies");
    let role_dir = t.dir.path().join("roles");

    let output = t.generate(policy_dir.to_str().unwrap(), role_dir.to_str().unwrap());

    assert_success(&output);
}
