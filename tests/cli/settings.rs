//! Tests for settings resolution, exit codes, and cache control flags.

use crate::support::*;

use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_missing_org_is_a_usage_error() {
    let t = Test::with_warm_cache();

    let output = t
        .cmd()
        .env("GITHUB_TOKEN", "placeholder-token")
        .arg("search")
        .output()
        .unwrap();

    assert_exit_code(&output, 2);
    assert_stderr_contains(&output, "missing required setting: org");
    assert_stdout_contains(&output, "DEADDROP_ORG");
}

#[test]
fn test_missing_github_token_is_a_usage_error() {
    let t = Test::with_warm_cache();

    let output = t
        .cmd()
        .args(["--org", "test-org", "search"])
        .output()
        .unwrap();

    assert_exit_code(&output, 2);
    assert_stderr_contains(&output, "missing required setting: github_token");
    assert_stdout_contains(&output, "GITHUB_TOKEN");
}

#[test]
fn test_empty_org_is_rejected() {
    let t = Test::with_warm_cache();

    let output = t
        .cmd()
        .env("GITHUB_TOKEN", "placeholder-token")
        .args(["--org", "  ", "search"])
        .output()
        .unwrap();

    assert_exit_code(&output, 2);
    assert_stderr_contains(&output, "invalid value for org");
}

#[test]
fn test_org_from_config_file() {
    let t = Test::with_warm_cache();
    t.write_config("org = \"test-org\"\n");

    let output = t
        .cmd()
        .env("GITHUB_TOKEN", "placeholder-token")
        .args(["search", "test1"])
        .output()
        .unwrap();

    assert_success(&output);
    assert_stdout_contains(&output, "test1");
}

#[test]
fn test_malformed_config_file_is_a_usage_error() {
    let t = Test::with_warm_cache();
    t.write_config("org = [broken\n");

    let output = t
        .cmd()
        .env("GITHUB_TOKEN", "placeholder-token")
        .args(["--org", "test-org", "search"])
        .output()
        .unwrap();

    assert_exit_code(&output, 2);
    assert_stderr_contains(&output, "failed to parse config file");
}

#[test]
fn test_cache_dir_flag_moves_the_cache() {
    let t = Test::new();
    let cache = t.dir.path().join("elsewhere");
    std::fs::create_dir_all(&cache).unwrap();
    std::fs::write(cache.join("members.json"), MEMBERS_JSON).unwrap();
    std::fs::write(cache.join("teams.json"), TEAMS_JSON).unwrap();
    std::fs::write(cache.join("memberships.json"), MEMBERSHIPS_JSON).unwrap();

    let output = t
        .org_cmd()
        .args(["--cache-dir", cache.to_str().unwrap(), "search", "team"])
        .output()
        .unwrap();

    assert_success(&output);
    assert_stdout_contains(&output, "team1");
}

#[test]
fn test_cold_cache_requires_the_directory_service() {
    let t = Test::new();

    let output = t
        .org_cmd()
        .args(["--api-url", "http://127.0.0.1:1", "search"])
        .output()
        .unwrap();

    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "directory request failed");
}

#[test]
fn test_rejected_directory_credentials_exit_with_the_auth_code() {
    let t = Test::new();
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap();
    let github = rt.block_on(async {
        let github = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&github)
            .await;
        github
    });

    let output = t
        .org_cmd()
        .args(["--api-url", &github.uri(), "search"])
        .output()
        .unwrap();

    assert_exit_code(&output, 3);
    assert_stderr_contains(&output, "rejected credentials");
    assert_stdout_contains(&output, "GITHUB_TOKEN");
}

#[test]
fn test_refresh_bypasses_a_fresh_cache() {
    let t = Test::with_warm_cache();

    // Without --refresh this search succeeds offline; with it, the forced
    // refetch hits the unreachable service and fails.
    let output = t
        .org_cmd()
        .args(["--refresh", "--api-url", "http://127.0.0.1:1", "search"])
        .output()
        .unwrap();

    assert_exit_code(&output, 1);
}

#[test]
fn test_partial_cache_triggers_refetch() {
    let t = Test::with_warm_cache();
    std::fs::remove_file(t.cache_dir().join("memberships.json")).unwrap();

    let output = t
        .org_cmd()
        .args(["--api-url", "http://127.0.0.1:1", "search"])
        .output()
        .unwrap();

    assert_exit_code(&output, 1);
}

#[test]
fn test_corrupt_cache_record_triggers_refetch() {
    let t = Test::with_warm_cache();
    std::fs::write(t.cache_dir().join("members.json"), "not json").unwrap();

    let output = t
        .org_cmd()
        .args(["--api-url", "http://127.0.0.1:1", "search"])
        .output()
        .unwrap();

    assert_exit_code(&output, 1);
}

#[test]
fn test_help_lists_commands() {
    let t = Test::new();

    let output = t.cmd().arg("--help").output().unwrap();

    assert_success(&output);
    for name in ["share", "get", "list", "delete", "search", "generate", "whoami"] {
        assert_stdout_contains(&output, name);
    }
}
