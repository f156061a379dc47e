//! CLI integration tests for pinplan.
//!
//! These tests run the binary against project trees written to temporary
//! directories and check the emitted descriptors.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

const COMMIT: &str = "8d5ae1f4a94c24a5eb8e6d5f0b3fa6e0b0fbd8a2";

/// Get the pinplan binary command, isolated from the caller's environment.
fn pinplan(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pinplan").unwrap();
    cmd.env("HOME", home).env_remove("PINPLAN_SYSTEM");
    cmd
}

/// Create a temporary directory for test projects.
fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

/// Write a complete project: declaration, package manifest and lock file.
fn write_project(dir: &Path) {
    fs::write(
        dir.join("Pinplan.toml"),
        r#"
[package]
main-program = "player_cli"

[lock]
allow-git-fetch = true

[toolchain]
provider = "rust-overlay"
version = "2024-06-01"

[inputs.native]
base = ["pkg-config"]

[inputs.libs]
base = ["openssl"]
linux = ["alsa-lib"]
macos = ["CoreAudio"]

[features.pulseaudio.libs]
linux = ["libpulseaudio"]

[dev]
tools = ["cargo-watch"]
"#,
    )
    .unwrap();

    fs::write(
        dir.join("Cargo.toml"),
        "[package]\nname = \"player\"\nversion = \"1.2.3\"\nedition = \"2021\"\n",
    )
    .unwrap();

    fs::write(
        dir.join("Cargo.lock"),
        format!(
            r#"version = 3

[[package]]
name = "player"
version = "1.2.3"
dependencies = [
 "librespot",
]

[[package]]
name = "librespot"
version = "0.4.2"
source = "git+https://github.com/librespot-org/librespot?branch=dev#{COMMIT}"
"#
        ),
    )
    .unwrap();
}

fn stdout_json(output: std::process::Output) -> serde_json::Value {
    assert!(output.status.success(), "command failed: {:?}", output);
    serde_json::from_slice(&output.stdout).unwrap()
}

// ============================================================================
// pinplan build
// ============================================================================

#[test]
fn test_build_linux_descriptor() {
    let tmp = temp_dir();
    write_project(tmp.path());

    let output = pinplan(tmp.path())
        .args(["build", "--system", "x86_64-linux"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    let json = stdout_json(output);

    assert_eq!(json["identity"]["name"], "player");
    assert_eq!(json["identity"]["version"], "1.2.3");
    assert_eq!(json["system"]["platform"], "linux");
    assert_eq!(json["main_program"], "player_cli");
    assert_eq!(json["toolchain"]["profile"], "minimal");
    assert_eq!(json["toolchain"]["components"], serde_json::json!([]));

    let libs = json["inputs"]["libs"].as_array().unwrap();
    assert!(libs.contains(&serde_json::json!("alsa-lib")));
    assert!(!libs.contains(&serde_json::json!("CoreAudio")));
    assert!(!libs.contains(&serde_json::json!("pkg-config")));
}

#[test]
fn test_build_several_systems_emits_array() {
    let tmp = temp_dir();
    write_project(tmp.path());

    let output = pinplan(tmp.path())
        .args(["build", "--system", "x86_64-linux,aarch64-darwin", "--compact"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    let json = stdout_json(output);

    let descriptors = json.as_array().unwrap();
    assert_eq!(descriptors.len(), 2);
    assert_eq!(descriptors[0]["system"]["platform"], "linux");
    assert_eq!(descriptors[1]["system"]["platform"], "macos");
}

#[test]
fn test_build_system_from_env() {
    let tmp = temp_dir();
    write_project(tmp.path());

    let output = pinplan(tmp.path())
        .env("PINPLAN_SYSTEM", "aarch64-darwin")
        .arg("build")
        .current_dir(tmp.path())
        .output()
        .unwrap();
    let json = stdout_json(output);
    assert_eq!(json["system"]["token"], "aarch64-darwin");
}

#[test]
fn test_build_system_from_project_config() {
    let tmp = temp_dir();
    write_project(tmp.path());
    fs::create_dir_all(tmp.path().join(".pinplan")).unwrap();
    fs::write(
        tmp.path().join(".pinplan/config.toml"),
        "[resolve]\nsystems = [\"aarch64-darwin\"]\n",
    )
    .unwrap();

    let output = pinplan(tmp.path())
        .arg("build")
        .current_dir(tmp.path())
        .output()
        .unwrap();
    let json = stdout_json(output);
    assert_eq!(json["system"]["platform"], "macos");
}

#[test]
fn test_build_unknown_system_uses_base_inputs() {
    let tmp = temp_dir();
    write_project(tmp.path());

    let output = pinplan(tmp.path())
        .args(["build", "--system", "riscv64-freebsd"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    assert!(String::from_utf8_lossy(&output.stderr).contains("not a known platform"));

    let json = stdout_json(output);
    assert_eq!(json["system"]["platform"], "other");
    assert_eq!(json["inputs"]["libs"], serde_json::json!(["openssl"]));
}

#[test]
fn test_build_with_feature() {
    let tmp = temp_dir();
    write_project(tmp.path());

    let output = pinplan(tmp.path())
        .args(["build", "--system", "x86_64-linux", "--features", "pulseaudio"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    let json = stdout_json(output);
    assert!(json["inputs"]["libs"]
        .as_array()
        .unwrap()
        .contains(&serde_json::json!("libpulseaudio")));
}

#[test]
fn test_build_unknown_feature_fails() {
    let tmp = temp_dir();
    write_project(tmp.path());

    pinplan(tmp.path())
        .args(["build", "--system", "x86_64-linux", "--features", "sixel"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("feature `sixel`"));
}

#[test]
fn test_build_writes_output_file() {
    let tmp = temp_dir();
    write_project(tmp.path());
    let out = tmp.path().join("descriptor.json");

    pinplan(tmp.path())
        .args(["build", "--system", "x86_64-linux", "--output"])
        .arg(&out)
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["identity"]["name"], "player");
}

#[test]
fn test_build_is_deterministic() {
    let tmp = temp_dir();
    write_project(tmp.path());

    let run = || {
        pinplan(tmp.path())
            .args(["build", "--system", "x86_64-linux"])
            .current_dir(tmp.path())
            .output()
            .unwrap()
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn test_build_missing_version_fails() {
    let tmp = temp_dir();
    write_project(tmp.path());
    fs::write(tmp.path().join("Cargo.toml"), "[package]\nname = \"player\"\n").unwrap();

    pinplan(tmp.path())
        .args(["build", "--system", "x86_64-linux"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("missing `package.version`"))
        .stderr(predicate::str::contains("help: consider:"));
}

#[test]
fn test_build_missing_lock_fails() {
    let tmp = temp_dir();
    write_project(tmp.path());
    fs::remove_file(tmp.path().join("Cargo.lock")).unwrap();

    pinplan(tmp.path())
        .args(["build", "--system", "x86_64-linux"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("lock file not found"));
}

#[test]
fn test_build_without_project_fails() {
    let tmp = temp_dir();

    pinplan(tmp.path())
        .arg("build")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not find `Pinplan.toml`"))
        .stderr(predicate::str::contains("pinplan init"));
}

#[test]
fn test_build_from_subdirectory() {
    let tmp = temp_dir();
    write_project(tmp.path());
    let nested = tmp.path().join("src").join("bin");
    fs::create_dir_all(&nested).unwrap();

    pinplan(tmp.path())
        .args(["build", "--system", "x86_64-linux"])
        .current_dir(&nested)
        .assert()
        .success()
        .stdout(predicate::str::contains("player_cli"));
}

// ============================================================================
// pinplan develop
// ============================================================================

#[test]
fn test_develop_emits_dev_environment() {
    let tmp = temp_dir();
    write_project(tmp.path());

    let output = pinplan(tmp.path())
        .args(["develop", "--system", "x86_64-linux"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    let json = stdout_json(output);

    assert_eq!(json["toolchains"]["stable"]["channel"], "stable");
    assert_eq!(json["toolchains"]["nightly"]["channel"], "nightly");
    assert_eq!(
        json["toolchains"]["stable"]["components"],
        serde_json::json!(["lint", "source-index"])
    );
    assert_eq!(json["tools"], serde_json::json!(["cargo-watch"]));
    assert!(json["inputs"]["libs"]
        .as_array()
        .unwrap()
        .contains(&serde_json::json!("alsa-lib")));
}

#[test]
fn test_develop_and_build_agree_on_inputs() {
    let tmp = temp_dir();
    write_project(tmp.path());

    let build = stdout_json(
        pinplan(tmp.path())
            .args(["build", "--system", "aarch64-darwin"])
            .current_dir(tmp.path())
            .output()
            .unwrap(),
    );
    let dev = stdout_json(
        pinplan(tmp.path())
            .args(["develop", "--system", "aarch64-darwin"])
            .current_dir(tmp.path())
            .output()
            .unwrap(),
    );
    assert_eq!(build["inputs"], dev["inputs"]);
}

// ============================================================================
// pinplan platform
// ============================================================================

#[test]
fn test_platform_classification() {
    let tmp = temp_dir();

    pinplan(tmp.path())
        .args(["platform", "x86_64-unknown-linux-gnu"])
        .assert()
        .success()
        .stdout(predicate::str::contains("x86_64-unknown-linux-gnu: linux"));

    pinplan(tmp.path())
        .args(["platform", "aarch64-apple-darwin"])
        .assert()
        .success()
        .stdout(predicate::str::contains("macos"));
}

#[test]
fn test_platform_unknown_warns() {
    let tmp = temp_dir();

    pinplan(tmp.path())
        .args(["platform", "wasm32-wasi", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("wasm32-wasi: other"))
        .stderr(predicate::str::contains("warning: host `wasm32-wasi`"));
}

// ============================================================================
// pinplan toolchain
// ============================================================================

#[test]
fn test_toolchain_lists_pinned_specs() {
    let tmp = temp_dir();
    write_project(tmp.path());

    pinplan(tmp.path())
        .arg("toolchain")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "production: rust-overlay@2024-06-01 stable (minimal) [",
        ))
        .stdout(predicate::str::contains("lint-extended, format, source-index"));
}

#[test]
fn test_toolchain_missing_channel_fails() {
    let tmp = temp_dir();
    write_project(tmp.path());
    fs::write(
        tmp.path().join("Pinplan.toml"),
        "[toolchain]\nprovider = \"stable-only\"\nversion = \"1\"\nchannels = [\"stable\"]\n",
    )
    .unwrap();

    pinplan(tmp.path())
        .arg("toolchain")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not supply the nightly channel"));
}

// ============================================================================
// pinplan lock
// ============================================================================

#[test]
fn test_lock_summary() {
    let tmp = temp_dir();
    write_project(tmp.path());

    pinplan(tmp.path())
        .arg("lock")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("entries: 2"))
        .stdout(predicate::str::contains("git fetch: allowed"))
        .stdout(predicate::str::contains("librespot 0.4.2"))
        .stdout(predicate::str::contains("closure of `player`: 2 packages"));
}

#[test]
fn test_lock_fetch_override() {
    let tmp = temp_dir();
    write_project(tmp.path());

    pinplan(tmp.path())
        .args(["lock", "--no-git-fetch"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("git fetch: disallowed"));
}

#[test]
fn test_lock_broken_manifest_fails() {
    let tmp = temp_dir();
    write_project(tmp.path());
    fs::write(tmp.path().join("Cargo.toml"), "[package]\nname = \"player\"\n").unwrap();

    pinplan(tmp.path())
        .arg("lock")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("package.version"));
}

#[test]
fn test_lock_explicit_root_skips_manifest() {
    let tmp = temp_dir();
    write_project(tmp.path());
    fs::write(tmp.path().join("Cargo.toml"), "[package]\nname = \"player\"\n").unwrap();

    pinplan(tmp.path())
        .args(["lock", "--root", "librespot"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("closure of `librespot`: 1 packages"));
}

// ============================================================================
// pinplan init
// ============================================================================

#[test]
fn test_init_creates_declaration() {
    let tmp = temp_dir();
    fs::write(
        tmp.path().join("Cargo.toml"),
        "[package]\nname = \"spot\"\nversion = \"0.1.0\"\n",
    )
    .unwrap();

    pinplan(tmp.path())
        .arg("init")
        .current_dir(tmp.path())
        .assert()
        .success();

    let content = fs::read_to_string(tmp.path().join("Pinplan.toml")).unwrap();
    assert!(content.contains("main-program = \"spot\""));
}

#[test]
fn test_init_fails_if_declaration_exists() {
    let tmp = temp_dir();
    write_project(tmp.path());

    pinplan(tmp.path())
        .arg("init")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

// ============================================================================
// pinplan completions
// ============================================================================

#[test]
fn test_completions_bash() {
    let tmp = temp_dir();

    pinplan(tmp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pinplan"));
}
