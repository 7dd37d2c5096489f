//! Integration tests for the full issue lifecycle
//!
//! Tests the complete flow:
//! 1. A student reports an issue and others say "me too"
//! 2. An administrator starts work and resolves it
//! 3. The reporter verifies or disputes the fix
//! 4. A sweep auto-verifies fixes nobody answered

use predicates::prelude::*;

use super::{ADMIN, STUDENT, Sandbox, read_json};

#[test]
fn test_report_work_resolve_verify() {
    let sandbox = Sandbox::new();
    let id = sandbox.report("Plumbing", "Water leaking under the sink");

    let started = sandbox.json(ADMIN, &["status", &id, "in-progress"]);
    assert_eq!(started["issue"]["state"]["status"], "in_progress");

    let resolved = sandbox.json(ADMIN, &["resolve", &id, "-n", "Washer replaced"]);
    assert_eq!(resolved["issue"]["state"]["status"], "resolved");
    assert_eq!(resolved["issue"]["state"]["note"], "Washer replaced");
    let hours_left = resolved["issue"]["verification_hours_left"].as_i64().unwrap();
    assert!((47..=48).contains(&hours_left));

    let verified = sandbox.json(STUDENT, &["verify", &id]);
    assert_eq!(verified["changed"], true);
    assert_eq!(verified["issue"]["state"]["verified"], true);

    let again = sandbox.json(STUDENT, &["verify", &id]);
    assert_eq!(again["changed"], false);

    let timeline = sandbox.json(STUDENT, &["timeline", &id]);
    let kinds: Vec<_> =
        timeline["events"].as_array().unwrap().iter().map(|e| e["type"].clone()).collect();
    assert_eq!(kinds, ["reported", "status_changed", "resolved", "verified"]);
}

#[test]
fn test_reopen_escalates_and_leaves_the_resolved_list() {
    let sandbox = Sandbox::new();
    let id = sandbox.report("Furniture", "Broken chair in room 101");
    sandbox.json(ADMIN, &["resolve", &id, "-n", "Glued"]);

    let resolved = sandbox.json(STUDENT, &["resolved"]);
    assert_eq!(resolved["issues"].as_array().unwrap().len(), 1);

    sandbox
        .as_user("ben@campus.edu")
        .args(["reopen", &id, "-c", "Issue Not Fixed", "-r", "Still broken"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not allowed to reopen"));

    let reopened = sandbox.json(
        STUDENT,
        &["reopen", &id, "-c", "Issue Not Fixed", "-r", "Leg fell off again"],
    );
    assert_eq!(reopened["issue"]["state"]["status"], "in_progress");
    assert_eq!(reopened["issue"]["priority"], "High");
    assert_eq!(reopened["issue"]["reopen_reason"]["category"], "Issue Not Fixed");

    let resolved = sandbox.json(STUDENT, &["resolved"]);
    assert!(resolved["issues"].as_array().unwrap().is_empty());
}

#[test]
fn test_me_too_counts_each_user_once() {
    let sandbox = Sandbox::new();
    let id = sandbox.report("Network", "WiFi down in the library");

    let first = sandbox.json("ben@campus.edu", &["me-too", &id]);
    assert_eq!(first["changed"], true);
    assert_eq!(first["issue"]["affected_count"], 2);

    let repeat = sandbox.json("ben@campus.edu", &["me-too", &id]);
    assert_eq!(repeat["changed"], false);
    assert_eq!(repeat["issue"]["affected_count"], 2);

    let feed = sandbox.json("cara@campus.edu", &["feed"]);
    assert_eq!(feed["issues"][0]["id"], id.as_str());
    assert_eq!(feed["issues"][0]["affected_count"], 2);
}

#[test]
fn test_private_issue_stays_out_of_the_feed() {
    let sandbox = Sandbox::new();
    sandbox
        .as_user(STUDENT)
        .args(["report", "-t", "Harassment", "-c", "Security", "-d", "Report", "--private"])
        .assert()
        .success();

    let feed = sandbox.json(STUDENT, &["feed"]);
    assert!(feed["issues"].as_array().unwrap().is_empty());

    let queue = sandbox.json(ADMIN, &["queue"]);
    assert_eq!(queue["issues"].as_array().unwrap().len(), 1);
}

#[test]
fn test_feed_category_filter() {
    let sandbox = Sandbox::new();
    let tap = sandbox.report("Plumbing", "Leaking tap");
    sandbox.report("Furniture", "Wobbly desk");

    let feed = sandbox.json(STUDENT, &["feed", "--category", "plumbing"]);
    let issues = feed["issues"].as_array().unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["id"], tap.as_str());
}

#[test]
fn test_mine_splits_active_and_resolved() {
    let sandbox = Sandbox::new();
    let open = sandbox.report("Furniture", "Wobbly desk");
    let fixed = sandbox.report("Plumbing", "Leaking tap");
    sandbox.json(ADMIN, &["resolve", &fixed, "-n", "Washer replaced"]);

    let mine = sandbox.json(STUDENT, &["mine"]);
    assert_eq!(mine["active"]["issues"][0]["id"], open.as_str());
    assert_eq!(mine["resolved"]["issues"][0]["id"], fixed.as_str());

    let theirs = sandbox.json("ben@campus.edu", &["mine"]);
    assert!(theirs["active"]["issues"].as_array().unwrap().is_empty());

    sandbox
        .cmd()
        .arg("mine")
        .assert()
        .failure()
        .stderr(predicate::str::contains("needs a user"));
}

#[test]
fn test_sweep_leaves_fresh_resolutions_alone() {
    let sandbox = Sandbox::new();
    let id = sandbox.report("Plumbing", "Leaking tap");
    sandbox.json(ADMIN, &["resolve", &id, "-n", "Washer replaced"]);

    let sweep = sandbox.json(ADMIN, &["sweep"]);
    assert_eq!(sweep["scanned"], 1);
    assert_eq!(sweep["due"], 0);
    assert!(sweep["verified"].as_array().unwrap().is_empty());

    let stats = sandbox.json(ADMIN, &["stats"]);
    assert_eq!(stats["resolved"], 1);
    assert_eq!(stats["verified"], 0);
}

#[test]
fn test_sweep_verifies_expired_window() {
    let sandbox = Sandbox::new();
    let id = sandbox.report("Plumbing", "Leaking tap");
    sandbox.json(ADMIN, &["resolve", &id, "-n", "Washer replaced"]);

    // Push the stored deadline into the past.
    let issues_path = sandbox.data_dir().join("issues.json");
    let mut issues = read_json(&issues_path);
    issues[0]["state"]["verification_deadline"] = "2000-01-01T00:00:00Z".into();
    std::fs::write(&issues_path, serde_json::to_string_pretty(&issues).unwrap()).unwrap();

    let sweep = sandbox.json(ADMIN, &["sweep"]);
    assert_eq!(sweep["verified"][0], id.as_str());

    let timeline = sandbox.json(STUDENT, &["timeline", &id]);
    let last = timeline["events"].as_array().unwrap().last().cloned().unwrap();
    assert_eq!(last["type"], "verified");
    assert_eq!(last["actor"], "System");
}
