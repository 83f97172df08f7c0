//! Integration tests for sessioncache

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use sessioncache::config::{Config, ConfigManager};
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// A config file and sessions directory private to one test
    struct Sandbox {
        _temp: TempDir,
        config_path: PathBuf,
    }

    impl Sandbox {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            let config_path = temp.path().join("config.toml");

            let mut config = Config::default();
            config.storage.dir = Some(temp.path().join("sessions"));
            ConfigManager::with_path(config_path.clone())
                .save(&config)
                .unwrap();

            Self {
                _temp: temp,
                config_path,
            }
        }

        fn cmd(&self) -> Command {
            let mut cmd = cargo_bin_cmd!("sessioncache");
            cmd.env("SESSIONCACHE_CONFIG", &self.config_path)
                .env_remove("SESSIONCACHE_SESSION")
                .env("CI", "1");
            cmd
        }
    }

    #[test]
    fn help_displays() {
        cargo_bin_cmd!("sessioncache")
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("session store"));
    }

    #[test]
    fn version_displays() {
        cargo_bin_cmd!("sessioncache")
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("sessioncache"));
    }

    #[test]
    fn set_then_get() {
        let sb = Sandbox::new();

        sb.cmd()
            .args(["set", "user", r#"{"name":"ada"}"#])
            .assert()
            .success()
            .stdout(predicate::str::contains("Cached user"));

        sb.cmd()
            .args(["get", "user", "--max-age", "5"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""name": "ada""#))
            .stdout(predicate::str::contains("created_at"))
            .stdout(predicate::str::contains("updated_at"));
    }

    #[test]
    fn get_data_only() {
        let sb = Sandbox::new();
        sb.cmd().args(["set", "greeting", "hello"]).assert().success();

        sb.cmd()
            .args(["get", "greeting", "--data-only"])
            .assert()
            .success()
            .stdout("\"hello\"\n");
    }

    #[test]
    fn get_missing_key_fails() {
        let sb = Sandbox::new();
        sb.cmd()
            .args(["get", "absent"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Cache miss: absent"));
    }

    #[test]
    fn invalid_ttl_evicts_entry() {
        let sb = Sandbox::new();
        sb.cmd().args(["set", "k", "v"]).assert().success();

        sb.cmd()
            .args(["get", "k", "--max-age", "0"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid minutes"));

        sb.cmd()
            .args(["get", "k", "--max-age", "5"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Cache miss"));
    }

    #[test]
    fn falsy_value_refused() {
        let sb = Sandbox::new();
        sb.cmd().args(["set", "k", "keep"]).assert().success();

        for falsy in ["0", "false", "null", r#""""#] {
            sb.cmd()
                .args(["set", "k", falsy])
                .assert()
                .failure()
                .stderr(predicate::str::contains("falsy"));
        }

        sb.cmd()
            .args(["get", "k", "--data-only"])
            .assert()
            .success()
            .stdout("\"keep\"\n");
    }

    #[test]
    fn invalidate_missing_key_succeeds() {
        let sb = Sandbox::new();
        sb.cmd()
            .args(["invalidate", "never-written"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Invalidated never-written"));
    }

    #[test]
    fn invalidate_removes_value() {
        let sb = Sandbox::new();
        sb.cmd().args(["set", "k", "v"]).assert().success();
        sb.cmd().args(["invalidate", "k"]).assert().success();
        sb.cmd().args(["get", "k"]).assert().failure();
    }

    #[test]
    fn namespaces_partition_keys() {
        let sb = Sandbox::new();
        sb.cmd()
            .args(["-n", "app", "set", "k", "1"])
            .assert()
            .success();

        sb.cmd()
            .args(["keys", "--format", "plain"])
            .assert()
            .success()
            .stdout("app:k\n");

        sb.cmd()
            .args(["-n", "app", "keys", "--format", "plain"])
            .assert()
            .success()
            .stdout("k\n");

        sb.cmd().args(["get", "k"]).assert().failure();
    }

    #[test]
    fn keys_json_includes_timestamps() {
        let sb = Sandbox::new();
        sb.cmd().args(["set", "k", "[1]"]).assert().success();

        sb.cmd()
            .args(["keys", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""key": "k""#))
            .stdout(predicate::str::contains("created_at"));
    }

    #[test]
    fn sessions_are_isolated() {
        let sb = Sandbox::new();
        sb.cmd()
            .args(["--session", "tab-a", "set", "k", "v"])
            .assert()
            .success();

        sb.cmd()
            .args(["--session", "tab-b", "get", "k"])
            .assert()
            .failure();

        sb.cmd()
            .env("SESSIONCACHE_SESSION", "tab-a")
            .args(["get", "k"])
            .assert()
            .success();
    }

    #[test]
    fn session_lifecycle() {
        let sb = Sandbox::new();
        let output = sb.cmd().args(["session", "new"]).output().unwrap();
        assert!(output.status.success());
        let id = String::from_utf8(output.stdout).unwrap().trim().to_string();
        assert_eq!(id.len(), 36);

        sb.cmd()
            .args(["session", "list", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains(id.as_str()));

        sb.cmd()
            .args(["session", "end", id.as_str()])
            .assert()
            .success();

        sb.cmd()
            .args(["session", "end", id.as_str()])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Session not found"));
    }

    #[test]
    fn invalid_session_id_rejected() {
        let sb = Sandbox::new();
        sb.cmd()
            .args(["--session", "../etc", "get", "k"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid session id"));
    }

    #[test]
    fn config_path() {
        let sb = Sandbox::new();
        sb.cmd()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let sb = Sandbox::new();
        sb.cmd()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[storage]"));
    }

    #[test]
    fn config_set_unknown_key_fails() {
        let sb = Sandbox::new();
        sb.cmd()
            .args(["config", "set", "cache.nope", "1"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown config key"));
    }
}
