use assert_cmd::Command;
use predicates::prelude::*;

fn vidsum() -> Command {
    let mut cmd = Command::cargo_bin("vidsum").unwrap();
    cmd.env_remove("GEMINI_PRO_API_KEY");
    cmd
}

#[test]
fn test_help_lists_commands() {
    vidsum()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("summarize"))
        .stdout(predicate::str::contains("platforms"));
}

#[test]
fn test_platforms() {
    vidsum()
        .arg("platforms")
        .assert()
        .success()
        .stdout(predicate::str::contains("YouTube"))
        .stdout(predicate::str::contains("Direct audio/video URLs"));
}

#[test]
fn test_malformed_url_is_rejected() {
    vidsum()
        .args(["summarize", "not-a-url", "--api-key", "unused"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid source_url"));
}

#[test]
fn test_zero_paragraphs_rejected() {
    vidsum()
        .args([
            "summarize",
            "https://www.youtube.com/watch?v=abc123",
            "--paragraphs",
            "0",
            "--api-key",
            "unused",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid paragraph_count"));
}

#[test]
fn test_small_character_cap_rejected() {
    vidsum()
        .args([
            "summarize",
            "https://www.youtube.com/watch?v=abc123",
            "--max-chars",
            "50",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid max_characters"));
}

#[test]
fn test_unknown_format_rejected() {
    vidsum()
        .args([
            "summarize",
            "https://www.youtube.com/watch?v=abc123",
            "--format",
            "srt",
        ])
        .assert()
        .failure();
}
