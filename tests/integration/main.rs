//! Integration tests for the campusfix CLI
//!
//! Each test gets its own config file and data directory, then drives the
//! binary through report, work, resolution and verification.

// Include lifecycle tests from the same directory
mod lifecycle_test;

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo;
use predicates::prelude::*;
use tempfile::TempDir;

/// Isolated config + data directory
struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("data");
        let config = format!(
            "[access]\nadmins = [\"admin@campus.edu\"]\n\n[storage]\ndata_dir = {:?}\n",
            data.display().to_string()
        );
        fs::write(dir.path().join("config.toml"), config).unwrap();
        Self { dir }
    }

    fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    /// A campusfix command bound to this sandbox, acting as nobody
    fn cmd(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::new(cargo::cargo_bin!("campusfix"));
        cmd.env_remove("CAMPUSFIX_USER")
            .env("CAMPUSFIX_CONFIG", self.config_path())
            .env("NO_COLOR", "1");
        cmd
    }

    /// A campusfix command acting as `user`
    fn as_user(&self, user: &str) -> assert_cmd::Command {
        let mut cmd = self.cmd();
        cmd.args(["--as", user]);
        cmd
    }

    /// Report an issue as the student reporter and return its id
    fn report(&self, category: &str, description: &str) -> String {
        let output = self
            .as_user(STUDENT)
            .args(["--json", "report", "-t", "Test issue", "-c", category, "-d", description])
            .output()
            .unwrap();
        assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        json["issue"]["id"].as_str().unwrap().to_string()
    }

    fn json(&self, user: &str, args: &[&str]) -> serde_json::Value {
        let output = self.as_user(user).arg("--json").args(args).output().unwrap();
        assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
        serde_json::from_slice(&output.stdout).unwrap()
    }
}

const STUDENT: &str = "ana@campus.edu";
const ADMIN: &str = "admin@campus.edu";

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

// =============================================================================
// BASICS
// =============================================================================

#[test]
fn test_no_command_prints_version() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("campusfix v"));
}

#[test]
fn test_report_derives_priority_and_persists() {
    let sandbox = Sandbox::new();
    let output = sandbox
        .as_user(STUDENT)
        .args(["--json", "report", "-t", "Dark corridor", "-c", "Electrical"])
        .args(["-d", "flickering light in hostel", "-l", "Hostel B"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["action"], "Reported");
    assert_eq!(json["issue"]["priority"], "High");
    assert_eq!(json["issue"]["sla_hours"], 6);
    assert_eq!(json["issue"]["affected_count"], 1);
    assert_eq!(json["issue"]["display_id"], "SR-ISS-1");

    let issues = read_json(&sandbox.data_dir().join("issues.json"));
    assert_eq!(issues.as_array().unwrap().len(), 1);
    let timeline = read_json(&sandbox.data_dir().join("timeline.json"));
    assert_eq!(timeline[0]["type"], "reported");
}

#[test]
fn test_report_without_user_fails() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["report", "-t", "Leak", "-c", "Plumbing", "-d", "Tap"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--as"));
}

#[test]
fn test_blank_title_is_rejected() {
    let sandbox = Sandbox::new();
    sandbox
        .as_user(STUDENT)
        .args(["report", "-t", "   ", "-c", "Plumbing", "-d", "Tap"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("title is required"));
}

#[test]
fn test_unknown_issue_fails() {
    let sandbox = Sandbox::new();
    sandbox
        .as_user(STUDENT)
        .args(["show", "ISS-42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("issue not found: ISS-42"));
}

// =============================================================================
// AUTHORIZATION
// =============================================================================

#[test]
fn test_member_cannot_resolve() {
    let sandbox = Sandbox::new();
    let id = sandbox.report("Plumbing", "Leaking tap");
    sandbox
        .as_user(STUDENT)
        .args(["resolve", &id, "-n", "Fixed it myself"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not allowed to resolve issues"));
}

#[test]
fn test_member_cannot_view_admin_queue() {
    let sandbox = Sandbox::new();
    sandbox
        .as_user(STUDENT)
        .arg("queue")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not allowed to view the admin queue"));
}

#[test]
fn test_admin_match_is_case_insensitive() {
    let sandbox = Sandbox::new();
    let id = sandbox.report("Plumbing", "Leaking tap");
    sandbox
        .as_user("Admin@Campus.EDU")
        .args(["status", &id, "in-progress"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Status set to In Progress"));
}

// =============================================================================
// CONFIG
// =============================================================================

#[test]
fn test_config_init_refuses_to_overwrite() {
    let sandbox = Sandbox::new();
    let fresh = sandbox.dir.path().join("fresh.toml");

    sandbox
        .cmd()
        .arg("--config")
        .arg(&fresh)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote default config"));
    assert!(fs::read_to_string(&fresh).unwrap().contains("verification_window_hours = 48"));

    sandbox
        .cmd()
        .arg("--config")
        .arg(&fresh)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    sandbox
        .cmd()
        .arg("--config")
        .arg(&fresh)
        .args(["config", "init", "--force"])
        .assert()
        .success();
}

#[test]
fn test_config_show_json() {
    let sandbox = Sandbox::new();
    let output = sandbox.cmd().args(["--json", "config", "show"]).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["lifecycle"]["verification_window_hours"], 48);
    assert_eq!(json["scheduler"]["interval_secs"], 60);
    assert_eq!(json["access"]["admins"][0], ADMIN);
}

#[test]
fn test_invalid_config_is_reported() {
    let sandbox = Sandbox::new();
    fs::write(sandbox.config_path(), "[lifecycle]\nverification_window_hours = 0\n").unwrap();
    sandbox
        .as_user(STUDENT)
        .arg("feed")
        .assert()
        .failure()
        .stderr(predicate::str::contains("verification_window_hours"));
}
