//! Integration tests for the sanctuary binary.
//!
//! These tests verify end-to-end behavior including:
//! - Pet status rendering and cooldown display
//! - Performing activities and persisting the pet
//! - Cooldown rejection and recovery
//! - Activity history and reset

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const T0: &str = "2024-05-01T09:00:00Z";

/// Helper to create a test data directory with an empty config file
fn setup_test_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(dir.path().join("config.toml"), "").expect("Failed to write config");
    dir
}

/// Helper to get the CLI binary pointed at an isolated data dir and config
fn cli(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("sanctuary"));
    cmd.arg("--data-dir")
        .arg(dir)
        .arg("--config")
        .arg(dir.join("config.toml"))
        .arg("--user")
        .arg("tester");
    cmd
}

fn pet_path(dir: &Path) -> PathBuf {
    dir.join("pet.json")
}

fn read_pet(dir: &Path) -> Value {
    let content = fs::read_to_string(pet_path(dir)).expect("Failed to read pet file");
    serde_json::from_str(&content).expect("Pet file is not valid JSON")
}

fn perform(dir: &Path, activity: &str, at: &str) -> assert_cmd::assert::Assert {
    cli(dir)
        .arg("perform")
        .arg(activity)
        .arg("--at")
        .arg(at)
        .assert()
}

#[test]
fn test_cli_help() {
    Command::new(assert_cmd::cargo::cargo_bin!("sanctuary"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Virtual pet sanctuary"));
}

#[test]
fn test_default_command_shows_sample_pet() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Fluffy the Cat"))
        .stdout(predicate::str::contains("Caretaker: tester"))
        .stdout(predicate::str::contains("Ready"));

    // Viewing never writes the pet
    assert!(!pet_path(temp_dir.path()).exists());
}

#[test]
fn test_perform_updates_and_persists_pet() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();

    perform(dir, "feed", T0)
        .success()
        .stdout(predicate::str::contains("Feed successful!"))
        .stdout(predicate::str::contains("Hunger: 40% → 10%"));

    let pet = read_pet(dir);
    assert_eq!(pet["hunger"], 10);
    assert_eq!(pet["happiness"], 90);
    assert_eq!(pet["health"], 95);
    assert_eq!(pet["experience"], 245);

    let feed = pet["activities"]
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["id"] == "feed")
        .unwrap();
    assert!(feed["last_used"].as_str().unwrap().starts_with("2024-05-01T09:00:00"));

    let journal = fs::read_to_string(dir.join("journal/activities.jsonl")).unwrap();
    assert_eq!(journal.lines().count(), 1);
    assert!(journal.contains("\"activity_id\":\"feed\""));
}

#[test]
fn test_cooldown_rejects_and_leaves_pet_unchanged() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();

    perform(dir, "feed", T0).success();
    let before = read_pet(dir);

    perform(dir, "feed", T0)
        .failure()
        .stderr(predicate::str::contains("You can feed again in 240 minutes"))
        .stderr(predicate::str::contains("CooldownActive").not())
        .stderr(predicate::str::contains("TimeDelta").not());

    assert_eq!(read_pet(dir), before);

    let journal = fs::read_to_string(dir.join("journal/activities.jsonl")).unwrap();
    assert_eq!(journal.lines().count(), 1);
}

#[test]
fn test_activity_ready_again_after_cooldown() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();

    perform(dir, "play", T0).success();
    perform(dir, "play", "2024-05-01T10:59:00Z").failure();
    perform(dir, "play", "2024-05-01T11:00:00Z").success();

    assert_eq!(read_pet(dir)["happiness"], 100);
}

#[test]
fn test_status_shows_remaining_cooldown() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();

    perform(dir, "feed", T0).success();

    cli(dir)
        .arg("status")
        .arg("--at")
        .arg("2024-05-01T10:00:00Z")
        .assert()
        .success()
        .stdout(predicate::str::contains("Available in 180 min"));
}

#[test]
fn test_dry_run_does_not_save() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();

    cli(dir)
        .arg("perform")
        .arg("groom")
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"));

    assert!(!pet_path(dir).exists());
    assert!(!dir.join("journal/activities.jsonl").exists());
}

#[test]
fn test_unknown_activity_fails() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();

    perform(dir, "juggle", T0)
        .failure()
        .stderr(predicate::str::contains("Unknown activity: juggle"))
        .stderr(predicate::str::contains("feed, play, train, groom"));

    assert!(!pet_path(dir).exists());
}

#[test]
fn test_invalid_timestamp_fails() {
    let temp_dir = setup_test_dir();

    perform(temp_dir.path(), "feed", "yesterday")
        .failure()
        .stderr(predicate::str::contains("Invalid timestamp: yesterday"))
        .stderr(predicate::str::contains("InvalidTimestamp").not());
}

#[test]
fn test_clock_skew_reports_wait_beyond_cooldown() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();

    perform(dir, "play", T0).success();

    // Ten minutes before the last play: the two-hour wait plus the skew
    perform(dir, "play", "2024-05-01T08:50:00Z")
        .failure()
        .stderr(predicate::str::contains("You can play again in 130 minutes"));
}

#[test]
fn test_invalid_pet_file_falls_back_to_sample() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();

    perform(dir, "feed", T0).success();
    let mut pet = read_pet(dir);
    pet["name"] = Value::from("Hacked");
    pet["health"] = Value::from(250);
    fs::write(pet_path(dir), serde_json::to_string(&pet).unwrap()).unwrap();

    cli(dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Fluffy the Cat"))
        .stdout(predicate::str::contains("Hacked").not());
}

#[test]
fn test_level_up_from_custom_activity() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();

    fs::write(
        dir.join("config.toml"),
        r#"
[[activities]]
id = "study"
name = "Study"
cooldown_minutes = 60

[activities.effect]
experience = 300
"#,
    )
    .unwrap();

    perform(dir, "study", T0)
        .success()
        .stdout(predicate::str::contains("Level Up! Fluffy is now level 4!"));

    let pet = read_pet(dir);
    assert_eq!(pet["level"], 4);
    assert_eq!(pet["experience"], 40);
    assert_eq!(pet["next_level_experience"], 750);
}

#[test]
fn test_invalid_config_is_rejected() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();

    fs::write(dir.join("config.toml"), "[leveling]\ngrowth_factor = 0.5\n").unwrap();

    cli(dir)
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("growth_factor"));
}

#[test]
fn test_history_lists_newest_first() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();

    perform(dir, "feed", T0).success();
    perform(dir, "play", "2024-05-01T09:30:00Z").success();

    let output = cli(dir)
        .arg("history")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8_lossy(&output);

    let play_at = stdout.find("Play Fluffy").expect("play missing from history");
    let feed_at = stdout.find("Feed Fluffy").expect("feed missing from history");
    assert!(play_at < feed_at, "expected newest first:\n{}", stdout);
}

#[test]
fn test_empty_history() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No activity yet for Fluffy"));
}

#[test]
fn test_reset_restores_sample_pet() {
    let temp_dir = setup_test_dir();
    let dir = temp_dir.path();

    perform(dir, "feed", T0).success();

    cli(dir)
        .arg("reset")
        .assert()
        .success()
        .stdout(predicate::str::contains("fresh start"));

    let pet = read_pet(dir);
    assert_eq!(pet["hunger"], 40);
    assert!(pet["activities"]
        .as_array()
        .unwrap()
        .iter()
        .all(|a| a["last_used"].is_null()));

    // Feed is usable again straight away
    perform(dir, "feed", T0).success();
}
