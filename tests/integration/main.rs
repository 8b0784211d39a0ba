//! Integration tests for atlas-session
//!
//! Drive real git repositories through the capability inventory cache and
//! the CLI.

mod support {
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::process::Command;
    use tempfile::TempDir;

    pub fn git(dir: &Path, args: &[&str]) {
        let output = Command::new("git")
            .arg("-C")
            .arg(dir)
            .args(["-c", "commit.gpgsign=false"])
            .args(args)
            .output()
            .expect("git should be installed");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }

    pub fn git_init(dir: &Path) {
        git(dir, &["init", "-q"]);
        git(dir, &["config", "user.email", "test@test.com"]);
        git(dir, &["config", "user.name", "Test"]);
    }

    pub fn commit_file(dir: &Path, name: &str, content: &str, message: &str) {
        fs::write(dir.join(name), content).unwrap();
        git(dir, &["add", "."]);
        git(dir, &["commit", "-q", "-m", message]);
    }

    /// A project with a session-context directory but no repository
    pub fn project_with_session() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("session-context")).unwrap();
        fs::write(
            temp.path().join("session-context").join("CLAUDE-soul-purpose.md"),
            "# Soul Purpose\n\nBuild the thing\n",
        )
        .unwrap();
        temp
    }

    /// A session project that is also a git repository with one commit
    pub fn project_with_git() -> TempDir {
        let temp = project_with_session();
        git_init(temp.path());
        commit_file(temp.path(), "README.md", "# Test\n", "init");
        temp
    }

    pub fn cache_file(root: &Path) -> PathBuf {
        root.join("session-context").join(".capability-cache.json")
    }

    pub fn read_cache(root: &Path) -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(cache_file(root)).unwrap()).unwrap()
    }
}

mod inventory_flow {
    use super::support::*;
    use atlas_session::config::Config;
    use atlas_session::tools::{cache_governance, capability_inventory, preflight};
    use serde_json::Value;
    use std::collections::HashSet;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn check(root: &Path, force_refresh: bool) -> Value {
        let value = capability_inventory(root, force_refresh, &Config::default()).to_value();
        assert_eq!(value["status"], "ok", "unexpected result: {value}");
        value
    }

    #[test]
    fn full_flow_miss_hit_force() {
        let project = project_with_git();
        let root = project.path();

        let pf = preflight(root, &Config::default()).to_value();
        assert_eq!(pf["mode"], "reconcile");
        assert_eq!(pf["is_git"], true);

        let first = check(root, false);
        assert_eq!(first["is_git"], true);
        assert!(first["git_head"].is_string());
        assert_eq!(first["cache_hit"], false);
        assert_eq!(first["needs_generation"], true);
        assert_eq!(first["git_changed"], false);
        assert_eq!(
            first["inventory_file"],
            "session-context/CLAUDE-capability-inventory.md"
        );

        let cache = read_cache(root);
        assert_eq!(cache["git_head"], first["git_head"]);
        assert!(cache["cached_at"].is_string());

        let second = check(root, false);
        assert_eq!(second["git_head"], first["git_head"]);
        assert_eq!(second["cache_hit"], true);
        assert_eq!(second["needs_generation"], false);
        assert_eq!(second["git_changed"], false);
        assert_eq!(read_cache(root)["cached_at"], cache["cached_at"]);

        // Backdate the record so the refreshed timestamp differs on any clock
        let backdated = serde_json::json!({
            "git_head": cache["git_head"],
            "cached_at": "2020-01-01T00:00:00Z",
        });
        fs::write(cache_file(root), backdated.to_string()).unwrap();

        let forced = check(root, true);
        assert_eq!(forced["cache_hit"], false);
        assert_eq!(forced["needs_generation"], true);
        assert_eq!(forced["git_changed"], false);

        let after_force = read_cache(root);
        assert_eq!(after_force["git_head"], first["git_head"]);
        assert_ne!(after_force["cached_at"], "2020-01-01T00:00:00Z");
    }

    #[test]
    fn commit_invalidates_cache() {
        let project = project_with_git();
        let root = project.path();

        let first = check(root, false);
        assert_eq!(check(root, false)["cache_hit"], true);

        commit_file(root, "new_feature.txt", "Feature implementation", "Add new feature");

        let changed = check(root, false);
        assert_ne!(changed["git_head"], first["git_head"]);
        assert_eq!(changed["cache_hit"], false);
        assert_eq!(changed["git_changed"], true);
        assert_eq!(changed["needs_generation"], true);
        assert_eq!(read_cache(root)["git_head"], changed["git_head"]);

        let again = check(root, false);
        assert_eq!(again["cache_hit"], true);
        assert_eq!(again["needs_generation"], false);
        assert_eq!(again["git_head"], changed["git_head"]);
    }

    #[test]
    fn non_git_never_caches() {
        let project = project_with_session();
        let root = project.path();

        assert_eq!(preflight(root, &Config::default()).to_value()["is_git"], false);

        for force in [false, false, true] {
            let result = check(root, force);
            assert_eq!(result["is_git"], false);
            assert!(result["git_head"].is_null());
            assert_eq!(result["cache_hit"], false);
            assert_eq!(result["git_changed"], false);
            assert_eq!(result["needs_generation"], true);
            assert!(!cache_file(root).exists());
        }
    }

    #[test]
    fn governance_and_capability_caches_coexist() {
        let project = project_with_git();
        let root = project.path();
        let governance = TempDir::new().unwrap();
        let mut config = Config::default();
        config.governance.cache_path = Some(governance.path().join("governance-cache.json"));

        fs::write(
            root.join("CLAUDE.md"),
            "# CLAUDE.md\n\n\
             ## Structure Maintenance Rules\n\nKeep files organized.\n\n\
             ## Session Context Files\n\nMaintain session-context/ files.\n\n\
             ## IMMUTABLE TEMPLATE RULES\n\nNever edit templates.\n\n\
             ## Ralph Loop\n\n**Mode**: Manual\n",
        )
        .unwrap();

        let cached = cache_governance(root, &config).to_value();
        assert_eq!(cached["status"], "ok");

        let inventory = capability_inventory(root, false, &config).to_value();
        assert_eq!(inventory["status"], "ok");

        let governance_path = config.governance_cache_path();
        assert!(governance_path.is_file());
        assert!(cache_file(root).is_file());

        let governance_data: Value =
            serde_json::from_str(&fs::read_to_string(&governance_path).unwrap()).unwrap();
        assert!(read_cache(root).get("git_head").is_some());
        assert!(governance_data.get("git_head").is_none());
        assert!(governance_data.get("Ralph Loop").is_some());
    }

    #[test]
    fn corrupt_cache_recovers() {
        let project = project_with_git();
        let root = project.path();

        let first = check(root, false);
        fs::write(cache_file(root), "{ invalid json content [[[ ").unwrap();

        let recovered = check(root, false);
        assert_eq!(recovered["cache_hit"], false);
        assert_eq!(recovered["needs_generation"], true);
        assert_eq!(read_cache(root)["git_head"], first["git_head"]);
    }

    #[test]
    fn repo_init_switches_to_cache_tracking() {
        let project = project_with_session();
        let root = project.path();

        let before = check(root, false);
        assert_eq!(before["is_git"], false);
        assert!(!cache_file(root).exists());

        git_init(root);
        commit_file(root, "README.md", "# Test\n", "init");

        let first = check(root, false);
        assert_eq!(first["is_git"], true);
        assert!(first["git_head"].is_string());
        assert_eq!(first["cache_hit"], false);
        assert_eq!(first["needs_generation"], true);
        assert!(cache_file(root).is_file());

        let second = check(root, false);
        assert_eq!(second["cache_hit"], true);
        assert_eq!(second["needs_generation"], false);
    }

    #[test]
    fn unborn_repository_never_caches() {
        let project = project_with_session();
        let root = project.path();
        git_init(root);

        let result = check(root, false);
        assert_eq!(result["is_git"], true);
        assert!(result["git_head"].is_null());
        assert_eq!(result["needs_generation"], true);
        assert!(!cache_file(root).exists());
    }

    #[test]
    fn multiple_commits_each_miss_once() {
        let project = project_with_git();
        let root = project.path();
        let mut heads = Vec::new();

        for i in 0..3 {
            commit_file(
                root,
                &format!("commit_{i}.txt"),
                &format!("Content {i}"),
                &format!("Commit {i}"),
            );

            let result = check(root, false);
            assert!(!heads.contains(&result["git_head"]));
            assert_eq!(result["cache_hit"], false);
            assert_eq!(result["needs_generation"], true);
            if i > 0 {
                assert_eq!(result["git_changed"], true);
            }

            let repeat = check(root, false);
            assert_eq!(repeat["cache_hit"], true);
            assert_eq!(repeat["git_head"], result["git_head"]);
            assert_eq!(repeat["git_changed"], false);

            heads.push(result["git_head"].clone());
        }

        let unique: HashSet<String> = heads.iter().map(|h| h.to_string()).collect();
        assert_eq!(unique.len(), 3);
        assert_eq!(read_cache(root)["git_head"], heads[2]);
    }

    #[test]
    fn amend_changes_head() {
        let project = project_with_git();
        let root = project.path();

        let first = check(root, false);

        fs::write(root.join("amended.txt"), "Amended content").unwrap();
        git(root, &["add", "."]);
        git(root, &["commit", "-q", "--amend", "--no-edit"]);

        let amended = check(root, false);
        assert_ne!(amended["git_head"], first["git_head"]);
        assert_eq!(amended["cache_hit"], false);
        assert_eq!(amended["git_changed"], true);
        assert_eq!(amended["needs_generation"], true);
    }

    #[test]
    fn preflight_agrees_with_inventory() {
        let git_project = project_with_git();
        let pf = preflight(git_project.path(), &Config::default()).to_value();
        let inv = check(git_project.path(), false);
        assert_eq!(pf["is_git"], inv["is_git"]);
        assert_eq!(pf["git_head"], inv["git_head"]);

        let plain = TempDir::new().unwrap();
        let pf = preflight(plain.path(), &Config::default()).to_value();
        let inv = check(plain.path(), false);
        assert_eq!(pf["is_git"], false);
        assert_eq!(pf["mode"], "init");
        assert_eq!(inv["is_git"], false);
        assert!(inv["git_head"].is_null());
    }
}

mod session_tools {
    use super::support::*;
    use atlas_session::config::Config;
    use atlas_session::tools::{git_summary, preflight, read_context};
    use serde_json::Value;
    use std::fs;
    use std::process::Command;
    use tempfile::TempDir;

    fn ok(value: Value) -> Value {
        assert_eq!(value["status"], "ok", "unexpected result: {value}");
        value
    }

    #[test]
    fn git_summary_lists_commits_and_changes() {
        let project = project_with_git();
        let root = project.path();
        commit_file(root, "lib.rs", "fn a() {}\n", "Add lib");
        fs::write(root.join("scratch.txt"), "wip\n").unwrap();

        let summary = ok(git_summary(root, &Config::default()).to_value());
        assert_eq!(summary["is_git"], true);
        assert!(summary["branch"].is_string());

        let commits = summary["recent_commits"].as_array().unwrap();
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0]["subject"], "Add lib");
        assert_eq!(commits[0]["hash"], summary["git_head"]);
        assert_eq!(commits[1]["author"], "Test");

        let changed = summary["changed_files"].as_array().unwrap();
        assert!(changed
            .iter()
            .any(|f| f["status"] == "??" && f["path"] == "scratch.txt"));
        assert!(summary["tracking"].is_null());
    }

    #[test]
    fn git_summary_respects_commit_limit() {
        let project = project_with_git();
        let root = project.path();
        for i in 0..3 {
            commit_file(root, "n.txt", &i.to_string(), &format!("commit {i}"));
        }

        let mut config = Config::default();
        config.git.recent_commits = 2;
        let summary = ok(git_summary(root, &config).to_value());
        assert_eq!(summary["recent_commits"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn git_summary_reports_upstream_divergence() {
        let upstream = project_with_git();
        let clone_parent = TempDir::new().unwrap();
        let clone = clone_parent.path().join("clone");
        let output = Command::new("git")
            .args(["clone", "-q"])
            .arg(upstream.path())
            .arg(&clone)
            .output()
            .unwrap();
        assert!(output.status.success());
        git(&clone, &["config", "user.email", "test@test.com"]);
        git(&clone, &["config", "user.name", "Test"]);

        commit_file(&clone, "local.txt", "mine\n", "local work");
        commit_file(upstream.path(), "remote.txt", "theirs\n", "remote work");
        git(&clone, &["fetch", "-q"]);

        let summary = ok(git_summary(&clone, &Config::default()).to_value());
        assert_eq!(summary["tracking"]["ahead"], 1);
        assert_eq!(summary["tracking"]["behind"], 1);
        assert!(summary["tracking"]["upstream"]
            .as_str()
            .unwrap()
            .starts_with("origin/"));
    }

    #[test]
    fn git_summary_on_unborn_repository() {
        let project = TempDir::new().unwrap();
        git_init(project.path());

        let summary = ok(git_summary(project.path(), &Config::default()).to_value());
        assert_eq!(summary["is_git"], true);
        assert!(summary["git_head"].is_null());
        assert!(summary["recent_commits"].as_array().unwrap().is_empty());
    }

    #[test]
    fn git_summary_outside_repository() {
        let project = project_with_session();
        let summary = ok(git_summary(project.path(), &Config::default()).to_value());
        assert_eq!(summary["is_git"], false);
        assert!(summary["branch"].is_null());
    }

    #[test]
    fn read_context_from_session_files() {
        let project = project_with_session();
        let session = project.path().join("session-context");
        fs::write(
            session.join("CLAUDE-activeContext.md"),
            "# Active\n\n- [ ] Next step\n- [x] First step\n",
        )
        .unwrap();

        let context = ok(read_context(project.path(), &Config::default()).to_value());
        assert_eq!(context["soul_purpose"], "Build the thing");
        assert_eq!(context["open_tasks"][0], "[ ] Next step");
        assert_eq!(context["recent_progress"][0], "[x] First step");
    }

    #[test]
    fn preflight_reports_project_signals() {
        let project = project_with_git();
        fs::write(project.path().join("Cargo.toml"), "[package]\n").unwrap();

        let report = ok(preflight(project.path(), &Config::default()).to_value());
        let signals = &report["project_signals"];
        assert_eq!(signals["has_readme"], true);
        assert_eq!(signals["has_cargo_toml"], true);
        assert_eq!(signals["detected_stack"][0], "rust");
        assert_eq!(signals["is_empty_project"], false);
    }
}

mod cli_tests {
    use super::support::*;
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// Binary isolated from any user or project config
    fn atlas(config_dir: &Path) -> Command {
        let mut cmd = cargo_bin_cmd!("atlas-session");
        cmd.arg("--no-local")
            .arg("--config")
            .arg(config_dir.join("config.toml"));
        cmd
    }

    #[test]
    fn help_displays() {
        let config = TempDir::new().unwrap();
        atlas(config.path())
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("capability inventory"));
    }

    #[test]
    fn version_displays() {
        let config = TempDir::new().unwrap();
        atlas(config.path())
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("atlas-session"));
    }

    #[test]
    fn inventory_reports_miss_then_hit() {
        let config = TempDir::new().unwrap();
        let project = project_with_git();
        let dir = project.path().to_str().unwrap();

        atlas(config.path())
            .args(["inventory", "--project", dir])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""status": "ok""#))
            .stdout(predicate::str::contains(r#""cache_hit": false"#));

        atlas(config.path())
            .args(["inventory", "--project", dir])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""cache_hit": true"#));

        atlas(config.path())
            .args(["inventory", "--project", dir, "--force-refresh"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""needs_generation": true"#));
    }

    #[test]
    fn inventory_text_format() {
        let config = TempDir::new().unwrap();
        let project = project_with_session();

        atlas(config.path())
            .args(["inventory", "--format", "text", "--project"])
            .arg(project.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("needs_generation"));
    }

    #[test]
    fn inventory_missing_project_is_structured_error() {
        let config = TempDir::new().unwrap();
        atlas(config.path())
            .args(["inventory", "--project", "/definitely/not/a/project"])
            .assert()
            .failure()
            .stdout(predicate::str::contains(r#""status": "error""#))
            .stdout(predicate::str::contains("Path not found"));
    }

    #[test]
    fn config_from_env_redirects_session_dir() {
        let config = TempDir::new().unwrap();
        let config_path = config.path().join("custom.toml");
        fs::write(&config_path, "[session]\ndir = \"state\"\n").unwrap();
        let project = project_with_git();

        let mut cmd = cargo_bin_cmd!("atlas-session");
        cmd.env("ATLAS_SESSION_CONFIG", &config_path)
            .args(["--no-local", "inventory", "--project"])
            .arg(project.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("state/CLAUDE-capability-inventory.md"));

        assert!(project.path().join("state").join(".capability-cache.json").is_file());
    }

    #[test]
    fn project_local_config_applies_from_any_directory() {
        let config = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        let project = project_with_git();
        fs::write(
            project.path().join(".atlas-session.toml"),
            "[session]\ndir = \"state\"\n",
        )
        .unwrap();

        let mut cmd = cargo_bin_cmd!("atlas-session");
        cmd.current_dir(elsewhere.path())
            .arg("--config")
            .arg(config.path().join("config.toml"))
            .args(["inventory", "--project"])
            .arg(project.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("state/CLAUDE-capability-inventory.md"));

        assert!(project.path().join("state").join(".capability-cache.json").is_file());
        assert!(!cache_file(project.path()).exists());
    }

    #[test]
    fn absolute_session_dir_is_rejected() {
        let config = TempDir::new().unwrap();
        let shared = TempDir::new().unwrap();
        fs::write(
            config.path().join("config.toml"),
            format!("[session]\ndir = {:?}\n", shared.path().to_str().unwrap()),
        )
        .unwrap();
        let project = project_with_git();

        atlas(config.path())
            .args(["inventory", "--project"])
            .arg(project.path())
            .assert()
            .failure()
            .stdout(predicate::str::contains("Invalid configuration"))
            .stdout(predicate::str::contains("session.dir"));

        assert!(!shared.path().join(".capability-cache.json").exists());
    }

    #[test]
    fn governance_cache_and_restore() {
        let config = TempDir::new().unwrap();
        let governance = config.path().join("governance.json");
        fs::write(
            config.path().join("config.toml"),
            format!("[governance]\ncache_path = {:?}\n", governance.to_str().unwrap()),
        )
        .unwrap();

        let project = project_with_session();
        let claude_md = project.path().join("CLAUDE.md");
        fs::write(&claude_md, "# CLAUDE.md\n\n## Ralph Loop\n\n**Mode**: Manual\n").unwrap();

        atlas(config.path())
            .args(["governance", "cache", "--project"])
            .arg(project.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("Ralph Loop"));
        assert!(governance.is_file());

        fs::write(&claude_md, "# CLAUDE.md\n").unwrap();

        atlas(config.path())
            .args(["governance", "restore", "--project"])
            .arg(project.path())
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""restored""#));

        assert!(fs::read_to_string(&claude_md).unwrap().contains("## Ralph Loop"));
        assert!(!governance.exists());
    }

    #[test]
    fn governance_restore_without_cache_fails() {
        let config = TempDir::new().unwrap();
        let governance = config.path().join("governance.json");
        fs::write(
            config.path().join("config.toml"),
            format!("[governance]\ncache_path = {:?}\n", governance.to_str().unwrap()),
        )
        .unwrap();

        let project = project_with_session();
        fs::write(project.path().join("CLAUDE.md"), "# CLAUDE.md\n").unwrap();

        atlas(config.path())
            .args(["governance", "restore", "--project"])
            .arg(project.path())
            .assert()
            .failure()
            .stdout(predicate::str::contains("No governance cache found"));
    }

    #[test]
    fn hook_activate_then_deactivate() {
        let config = TempDir::new().unwrap();
        let project = project_with_session();
        let marker = project
            .path()
            .join("session-context")
            .join(".lifecycle-active.json");

        atlas(config.path())
            .args(["hook", "activate", "--soul-purpose", "Ship it", "--project"])
            .arg(project.path())
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""soul_purpose": "Ship it""#));
        assert!(marker.is_file());

        atlas(config.path())
            .args(["hook", "deactivate", "--project"])
            .arg(project.path())
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""removed": true"#));
        assert!(!marker.exists());

        atlas(config.path())
            .args(["hook", "deactivate", "--project"])
            .arg(project.path())
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""removed": false"#));
    }

    #[test]
    fn context_command_prints_soul_purpose() {
        let config = TempDir::new().unwrap();
        let project = project_with_session();

        atlas(config.path())
            .args(["context", "--project"])
            .arg(project.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("Build the thing"));
    }

    #[test]
    fn git_summary_command_outside_repository() {
        let config = TempDir::new().unwrap();
        let project = project_with_session();

        atlas(config.path())
            .args(["git-summary", "--project"])
            .arg(project.path())
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""is_git": false"#));
    }

    #[test]
    fn config_path_prints_override() {
        let config = TempDir::new().unwrap();
        atlas(config.path())
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show_prints_defaults() {
        let config = TempDir::new().unwrap();
        atlas(config.path())
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[session]"))
            .stdout(predicate::str::contains(".capability-cache.json"));
    }

    #[test]
    fn invalid_config_is_structured_error() {
        let config = TempDir::new().unwrap();
        fs::write(config.path().join("config.toml"), "[session\n").unwrap();

        atlas(config.path())
            .arg("preflight")
            .assert()
            .failure()
            .stdout(predicate::str::contains("Invalid configuration"));
    }
}
