//! End-to-end tests for the `profile` command.

mod common;
use common::prelude::*;

#[test]
fn test_profile_list_empty() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .args(["profile", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No profiles saved."))
        .stdout(predicate::str::contains("profile add"));
}

#[test]
fn test_profile_list_sorted() {
    let fixture = TestFixture::new().with_project_config(configs::TWO_PROFILES);

    let output = fixture
        .command()
        .args(["profile", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("  audio:"))
        .stdout(predicate::str::contains("    - masonlet/starlet-graphics"))
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).unwrap();
    let audio = stdout.find("audio:").unwrap();
    let graphics = stdout.find("graphics:").unwrap();
    assert!(audio < graphics);
}

#[test]
fn test_profile_add_writes_home_config_when_no_project_config() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .args(["profile", "add", "gfx", "masonlet/starlet-graphics", "starlet-math"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved profile 'gfx' with 2 repositories"));

    assert!(!fixture.project_config_path().exists());
    let saved: serde_json::Value =
        serde_json::from_str(&common::read(&fixture.home_config_path())).unwrap();
    assert_eq!(
        saved["profiles"]["gfx"],
        serde_json::json!(["masonlet/starlet-graphics", "starlet-math"])
    );
}

#[test]
fn test_profile_add_prefers_existing_project_config() {
    let fixture = TestFixture::new().with_project_config(configs::TWO_PROFILES);

    fixture
        .command()
        .args(["profile", "add", "net", "masonlet/starlet-net"])
        .assert()
        .success();

    let text = common::read(&fixture.project_config_path());
    assert!(text.contains("\"net\""));
    assert!(text.contains("\"audio\""));
    assert!(text.ends_with("}\n"));
    assert!(!fixture.home_config_path().exists());
}

#[test]
fn test_profile_add_existing_requires_force() {
    let fixture = TestFixture::new().with_project_config(configs::TWO_PROFILES);

    fixture
        .command()
        .args(["profile", "add", "audio", "someone/else"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Profile 'audio' already exists"))
        .stderr(predicate::str::contains("--force"));

    assert!(common::read(&fixture.project_config_path()).contains("masonlet/starlet-audio"));

    fixture
        .command()
        .args(["profile", "add", "audio", "someone/else", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated profile 'audio'"));

    let text = common::read(&fixture.project_config_path());
    assert!(text.contains("someone/else"));
    assert!(!text.contains("masonlet/starlet-audio"));
}

#[test]
fn test_profile_add_without_repos_is_usage_error() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .args(["profile", "add", "gfx"])
        .assert()
        .code(2);
}

#[test]
fn test_profile_remove() {
    let fixture = TestFixture::new().with_project_config(configs::TWO_PROFILES);

    fixture
        .command()
        .args(["profile", "remove", "audio"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed profile 'audio'"));

    let text = common::read(&fixture.project_config_path());
    assert!(!text.contains("\"audio\""));
    assert!(text.contains("\"graphics\""));
}

#[test]
fn test_profile_remove_absent_is_not_an_error() {
    let fixture = TestFixture::new().with_project_config(configs::TWO_PROFILES);
    let before = common::read(&fixture.project_config_path());

    fixture
        .command()
        .args(["profile", "remove", "video"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Profile 'video' not found"))
        .stdout(predicate::str::contains("Available profiles: audio, graphics"));

    assert_eq!(common::read(&fixture.project_config_path()), before);
}

#[test]
fn test_profile_list_with_corrupt_config_warns() {
    let fixture = TestFixture::new().with_project_config(configs::INVALID_JSON);

    fixture
        .command()
        .args(["profile", "list"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Invalid JSON in"))
        .stdout(predicate::str::contains("No profiles saved."));
}

#[test]
fn test_profile_falls_back_to_home_when_project_config_corrupt() {
    let fixture = TestFixture::new()
        .with_project_config(configs::INVALID_JSON)
        .with_home_config(configs::TWO_PROFILES);

    fixture
        .command()
        .args(["profile", "list"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Invalid JSON in"))
        .stdout(predicate::str::contains("graphics:"));
}
