//! Binary-level checks; every case here fails or exits before ffmpeg is needed

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn splicer(working_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("splicer").unwrap();
    cmd.current_dir(working_dir);
    for var in [
        "SPLICER_CONFIG",
        "SPLICER_FFMPEG",
        "SPLICER_FFPROBE",
        "SPLICER_LOG_LEVEL",
        "SPLICER_LOG_FORMAT",
        "SPLICER_CRF",
        "SPLICER_PRESET",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    let temp_dir = TempDir::new().unwrap();
    splicer(temp_dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("split"))
        .stdout(predicate::str::contains("merge"));
}

#[test]
fn test_split_help_lists_options() {
    let temp_dir = TempDir::new().unwrap();
    splicer(temp_dir.path())
        .args(["split", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--manifest"))
        .stdout(predicate::str::contains("--split-size"))
        .stdout(predicate::str::contains("--vcodec"))
        .stdout(predicate::str::contains("--output-dir"));
}

#[test]
fn test_manifest_and_interval_are_exclusive() {
    let temp_dir = TempDir::new().unwrap();
    splicer(temp_dir.path())
        .args(["split", "-m", "clips.json", "-f", "movie.mp4", "-s", "60"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_zero_interval_is_a_parameter_error() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("movie.mp4"), b"fake video data").unwrap();

    splicer(temp_dir.path())
        .args(["split", "-f", "movie.mp4", "-s", "0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("split-size"));

    assert!(!temp_dir.path().join("Clip-movie").exists());
}

#[test]
fn test_manifest_without_clips_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("clips.json"),
        r#"{"input_file": "movie.mp4"}"#,
    )
    .unwrap();

    splicer(temp_dir.path())
        .args(["split", "--manifest", "clips.json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid manifest"));
}

#[test]
fn test_merge_empty_directory_fails() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir(temp_dir.path().join("clips")).unwrap();
    fs::write(temp_dir.path().join("clips").join("notes.txt"), b"not a video").unwrap();

    splicer(temp_dir.path())
        .args(["merge", "clips"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("No video files found"));
}

#[test]
fn test_crf_out_of_range() {
    let temp_dir = TempDir::new().unwrap();
    splicer(temp_dir.path())
        .args(["merge", "clips", "--crf", "60"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--crf"));
}

#[test]
fn test_missing_config_file() {
    let temp_dir = TempDir::new().unwrap();
    splicer(temp_dir.path())
        .args(["--config", "absent.toml", "merge", "clips"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("absent.toml"));
}

#[test]
fn test_config_file_unknown_key() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("splicer.toml"), "[encode]\nbitrate = 5\n").unwrap();

    splicer(temp_dir.path())
        .args(["merge", "clips"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Configuration error"));
}
