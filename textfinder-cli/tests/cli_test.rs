use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

fn create_corpus(dir: &TempDir, lines: &[&str]) -> Result<PathBuf> {
    let path = dir.path().join("corpus.txt");
    fs::write(&path, lines.join("\n"))?;
    Ok(path)
}

fn cli(cwd: &Path) -> Result<Command> {
    let mut cmd = Command::cargo_bin("textfinder-cli")?;
    // Keep the user's global config out of the run
    cmd.current_dir(cwd)
        .env("NO_COLOR", "1")
        .env("HOME", cwd)
        .env("XDG_CONFIG_HOME", cwd);
    Ok(cmd)
}

#[test]
fn test_search_summary() -> Result<()> {
    let dir = tempdir()?;
    let corpus = create_corpus(&dir, &["abcabc", "xyz", "abc", "", "abcabcabc"])?;

    cli(dir.path())?
        .args(["search", "abc", "2"])
        .arg(&corpus)
        .arg("--per-worker")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total instances found: 6"))
        .stdout(predicate::str::contains("Worker 0 found 6 instances"))
        .stdout(predicate::str::contains("Worker 1 found 0 instances"))
        .stdout(predicate::str::contains("Total time taken:"));
    Ok(())
}

#[test]
fn test_search_json() -> Result<()> {
    let dir = tempdir()?;
    let corpus = create_corpus(&dir, &["aaaa", "aaa"])?;

    let output = cli(dir.path())?
        .args(["search", "aa", "3"])
        .arg(&corpus)
        .arg("--json")
        .output()?;
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value["total_matches"], 3);
    assert_eq!(value["per_worker_counts"], serde_json::json!([2, 1, 0]));
    assert_eq!(value["worker_count"], 3);
    Ok(())
}

#[test]
fn test_log_matches_goes_to_stderr() -> Result<()> {
    let dir = tempdir()?;
    let corpus = create_corpus(&dir, &["xx abc"])?;

    cli(dir.path())?
        .args(["search", "abc", "1"])
        .arg(&corpus)
        .arg("--log-matches")
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Worker 0 has found 'abc' at line 1 position 4",
        ));
    Ok(())
}

#[test]
fn test_empty_target_is_bad_input() -> Result<()> {
    let dir = tempdir()?;
    let corpus = create_corpus(&dir, &["abc"])?;

    cli(dir.path())?
        .args(["search", "", "2"])
        .arg(&corpus)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("bad input"));
    Ok(())
}

#[test]
fn test_zero_workers_is_bad_input() -> Result<()> {
    let dir = tempdir()?;
    let corpus = create_corpus(&dir, &["abc"])?;

    cli(dir.path())?
        .args(["search", "abc", "0"])
        .arg(&corpus)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("worker count must be at least 1"));
    Ok(())
}

#[test]
fn test_missing_corpus_is_unavailable() -> Result<()> {
    let dir = tempdir()?;

    cli(dir.path())?
        .args(["search", "abc", "2"])
        .arg(dir.path().join("missing.txt"))
        .assert()
        .code(3)
        .stderr(predicate::str::contains("corpus unavailable"));
    Ok(())
}

#[test]
fn test_config_file_enables_per_worker() -> Result<()> {
    let dir = tempdir()?;
    let corpus = create_corpus(&dir, &["abc", "abc abc"])?;
    let config = dir.path().join("textfinder.yaml");
    fs::write(&config, "per_worker: true\n")?;

    cli(dir.path())?
        .args(["search", "abc", "2"])
        .arg(&corpus)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Worker 1 found 2 instances"));
    Ok(())
}

#[test]
fn test_empty_target_ignores_config_target() -> Result<()> {
    let dir = tempdir()?;
    let corpus = create_corpus(&dir, &["abc"])?;
    fs::write(dir.path().join(".textfinder.yaml"), "target: \"abc\"\n")?;

    cli(dir.path())?
        .args(["search", "", "2"])
        .arg(&corpus)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("bad input"));
    Ok(())
}

#[test]
fn test_encoding_flag_overrides_config() -> Result<()> {
    let dir = tempdir()?;
    let corpus = dir.path().join("corpus.txt");
    fs::write(&corpus, b"abc \xff\xfe\n")?;
    fs::write(
        dir.path().join(".textfinder.yaml"),
        "encoding_mode: \"lossy\"\n",
    )?;

    // The file alone decodes lossily
    cli(dir.path())?
        .args(["search", "abc", "1"])
        .arg(&corpus)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total instances found: 1"));

    cli(dir.path())?
        .args(["search", "abc", "1"])
        .arg(&corpus)
        .args(["--encoding", "failfast"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("corpus unavailable"));
    Ok(())
}

#[test]
fn test_log_level_flag_overrides_config() -> Result<()> {
    let dir = tempdir()?;
    let corpus = create_corpus(&dir, &["abc"])?;
    fs::write(dir.path().join(".textfinder.yaml"), "log_level: \"info\"\n")?;

    cli(dir.path())?
        .args(["search", "abc", "1"])
        .arg(&corpus)
        .assert()
        .success()
        .stderr(predicate::str::contains("Searching for"));

    cli(dir.path())?
        .args(["search", "abc", "1"])
        .arg(&corpus)
        .args(["--log-level", "warn"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Searching for").not());
    Ok(())
}
