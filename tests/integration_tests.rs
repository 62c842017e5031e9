//! Integration tests for mailsift.
//!
//! These tests verify end-to-end functionality by driving the compiled
//! binary against temporary CSV fixtures. Everything runs offline; the
//! scrape subcommand's network path is exercised at the unit level
//! against embedded HTML instead.

use std::io::Write;
use std::path::PathBuf;
use std::process::Command;
use std::str;
use tempfile::{NamedTempFile, TempDir};

/// Helper to get the path to the compiled binary
fn get_binary_path() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // Remove test binary name
    if path.ends_with("deps") {
        path.pop(); // Remove "deps" directory
    }
    path.push("mailsift");
    path
}

/// Helper to create a temporary CSV file with test content
fn create_test_csv(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Five rows, two duplicate bodies, unsorted send-times.
const FIVE_ROWS: &str = "a@mail.example.com,2020-05-01,p@x.example.org,offer\n\
                         b@mail.example.com,2020-01-01,q@x.example.org,hello\n\
                         c@news.example.net,2020-04-01,r@y.example.org,offer\n\
                         d@mail.example.com,2020-02-01,s@y.example.org,bye\n\
                         e@spam.example.biz,2020-03-01,t@z.example.org,news\n";

#[test]
fn test_clean_end_to_end() {
    let input = create_test_csv(FIVE_ROWS);
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");

    let result = Command::new(get_binary_path())
        .arg("clean")
        .arg(input.path())
        .arg("-o")
        .arg(&output)
        .output()
        .expect("Failed to execute binary");

    assert!(result.status.success());

    let stdout = str::from_utf8(&result.stdout).unwrap();
    assert!(
        stdout.contains("5 rows in, 4 rows out"),
        "Summary should report the dedup: {stdout}"
    );

    let text = std::fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 5, "header + 4 data rows: {text}");
    assert_eq!(
        lines[0],
        "index,sender,sent_at,recipient,body,from_domain,to_domain"
    );

    // Sorted ascending by send-time; the 2020-04 "offer" is first-seen
    // after the sort, so the 2020-05 copy is dropped.
    assert!(lines[1].starts_with("0,b@mail.example.com,2020-01-01"));
    assert!(lines[2].starts_with("1,d@mail.example.com,2020-02-01"));
    assert!(lines[3].starts_with("2,e@spam.example.biz,2020-03-01"));
    assert!(lines[4].starts_with("3,c@news.example.net,2020-04-01"));
    assert!(lines[4].ends_with("news.example.net,y.example.org"));
}

#[test]
fn test_clean_without_index_and_domains() {
    let input = create_test_csv(FIVE_ROWS);
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");

    let result = Command::new(get_binary_path())
        .arg("clean")
        .arg(input.path())
        .arg("-o")
        .arg(&output)
        .arg("--no-index")
        .arg("--no-domains")
        .output()
        .expect("Failed to execute binary");

    assert!(result.status.success());
    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("sender,sent_at,recipient,body\n"));
}

#[test]
fn test_clean_bom_output() {
    let input = create_test_csv(FIVE_ROWS);
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");

    let result = Command::new(get_binary_path())
        .arg("clean")
        .arg(input.path())
        .arg("-o")
        .arg(&output)
        .arg("--bom")
        .output()
        .expect("Failed to execute binary");

    assert!(result.status.success());
    let bytes = std::fs::read(&output).unwrap();
    assert_eq!(&bytes[..3], b"\xef\xbb\xbf");
}

#[test]
fn test_clean_raw_copy_precedes_cleaning() {
    let input = create_test_csv(FIVE_ROWS);
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");
    let raw = dir.path().join("raw.csv");

    let result = Command::new(get_binary_path())
        .arg("clean")
        .arg(input.path())
        .arg("-o")
        .arg(&output)
        .arg("--raw-out")
        .arg(&raw)
        .output()
        .expect("Failed to execute binary");

    assert!(result.status.success());
    let text = std::fs::read_to_string(&raw).unwrap();
    // All five rows survive in load order in the raw copy.
    assert_eq!(text.lines().count(), 6);
    assert!(text.lines().nth(1).unwrap().contains("2020-05-01"));
}

#[test]
fn test_fill_stage_changes_outcome() {
    // Two missing bodies plus a literal "0" body collide only when
    // filling happens before deduplication.
    let content = "a,1,x,\nb,2,x,0\nc,3,x,\n";

    for (stage, expected_rows) in [("before-dedup", 1), ("after-dedup", 2)] {
        let input = create_test_csv(content);
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out.csv");

        let result = Command::new(get_binary_path())
            .arg("clean")
            .arg(input.path())
            .arg("-o")
            .arg(&output)
            .arg("--fill-stage")
            .arg(stage)
            .output()
            .expect("Failed to execute binary");

        assert!(result.status.success());
        let text = std::fs::read_to_string(&output).unwrap();
        assert_eq!(
            text.lines().count(),
            1 + expected_rows,
            "fill stage {stage} should keep {expected_rows} rows: {text}"
        );
    }
}

#[test]
fn test_stats_json_report() {
    let input = create_test_csv(FIVE_ROWS);

    let result = Command::new(get_binary_path())
        .arg("stats")
        .arg(input.path())
        .arg("--format")
        .arg("json")
        .output()
        .expect("Failed to execute binary");

    assert!(result.status.success());

    let stdout = str::from_utf8(&result.stdout).unwrap();
    let report: serde_json::Value = serde_json::from_str(stdout).expect("valid JSON report");

    assert_eq!(report["input"]["rows_loaded"], 5);
    assert_eq!(report["cleaning"]["rows_out"], 4);
    assert_eq!(report["cleaning"]["duplicates_removed"], 1);
    assert_eq!(report["metadata"]["tool_name"], "mailsift");
    assert_eq!(report["distinct"]["senders"], 4);
    assert_eq!(report["distinct"]["bodies"], 4);

    // Senders after dedup: mail.example.com x2, spam.example.biz,
    // news.example.net. All rare at the default threshold of 10.
    assert_eq!(report["sender_domains"]["unique"], 3);
    assert_eq!(report["sender_domains"]["rare"]["threshold"], 10);
    assert_eq!(report["sender_domains"]["rare"]["count"], 3);
    assert_eq!(
        report["sender_domains"]["counts"][0]["domain"],
        "mail.example.com"
    );
    assert_eq!(report["sender_domains"]["counts"][0]["count"], 2);
}

#[test]
fn test_stats_threshold_override() {
    let input = create_test_csv(FIVE_ROWS);

    let result = Command::new(get_binary_path())
        .arg("stats")
        .arg(input.path())
        .arg("--threshold")
        .arg("1")
        .arg("--format")
        .arg("json")
        .output()
        .expect("Failed to execute binary");

    assert!(result.status.success());
    let stdout = str::from_utf8(&result.stdout).unwrap();
    let report: serde_json::Value = serde_json::from_str(stdout).unwrap();

    // Only the count-1 domains qualify at threshold 1.
    assert_eq!(report["sender_domains"]["rare"]["threshold"], 1);
    assert_eq!(report["sender_domains"]["rare"]["count"], 2);
}

#[test]
fn test_stats_text_report() {
    let input = create_test_csv(FIVE_ROWS);

    let result = Command::new(get_binary_path())
        .arg("stats")
        .arg(input.path())
        .arg("--no-color")
        .output()
        .expect("Failed to execute binary");

    assert!(result.status.success());
    let stdout = str::from_utf8(&result.stdout).unwrap();
    assert!(stdout.contains("Mail-server statistics"));
    assert!(stdout.contains("Sender domains"));
    assert!(stdout.contains("Recipient domains"));
    assert!(stdout.contains("mail.example.com"));
}

#[test]
fn test_malformed_rows_warn_at_verbosity_two() {
    let input = create_test_csv("a@x.example.com,2020-01-01\nb,2,c,d\n");
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");

    let result = Command::new(get_binary_path())
        .arg("clean")
        .arg(input.path())
        .arg("-o")
        .arg(&output)
        .arg("--verbose")
        .arg("2")
        .output()
        .expect("Failed to execute binary");

    assert!(result.status.success());
    let stderr = str::from_utf8(&result.stderr).unwrap();
    assert!(
        stderr.contains("expected 4 fields"),
        "Should warn about the short row: {stderr}"
    );
}

#[test]
fn test_missing_input_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");

    let result = Command::new(get_binary_path())
        .arg("clean")
        .arg("/nonexistent/mail-log.csv")
        .arg("-o")
        .arg(&output)
        .output()
        .expect("Failed to execute binary");

    assert!(
        !result.status.success(),
        "Process should fail for a missing input file"
    );
    let stderr = str::from_utf8(&result.stderr).unwrap();
    assert!(
        stderr.contains("nonexistent"),
        "Should report the offending path; stderr was: {stderr}"
    );
}

#[test]
fn test_missing_subcommand() {
    let result = Command::new(get_binary_path())
        .output()
        .expect("Failed to execute binary");

    assert!(!result.status.success());
    let stderr = str::from_utf8(&result.stderr).unwrap();
    assert!(
        stderr.contains("subcommand"),
        "Should mention the missing subcommand: {stderr}"
    );
}

#[test]
fn test_generate_schema() {
    let result = Command::new(get_binary_path())
        .arg("--generate-schema")
        .output()
        .expect("Failed to execute binary");

    assert!(result.status.success());
    let stdout = str::from_utf8(&result.stdout).unwrap();
    let schema: serde_json::Value = serde_json::from_str(stdout).expect("valid JSON schema");
    let schema_text = schema.to_string();
    assert!(schema_text.contains("sender_domains"));
    assert!(schema_text.contains("cleaning"));
}

#[test]
fn test_help_output() {
    let result = Command::new(get_binary_path())
        .arg("--help")
        .output()
        .expect("Failed to execute binary");

    assert!(result.status.success());
    let stdout = str::from_utf8(&result.stdout).unwrap();
    assert!(
        stdout.contains("Usage:"),
        "Help should show usage information"
    );
    assert!(stdout.contains("clean"), "Help should mention clean");
    assert!(stdout.contains("stats"), "Help should mention stats");
    assert!(stdout.contains("scrape"), "Help should mention scrape");
}

#[test]
fn test_version_output() {
    let result = Command::new(get_binary_path())
        .arg("--version")
        .output()
        .expect("Failed to execute binary");

    assert!(result.status.success());
    let stdout = str::from_utf8(&result.stdout).unwrap();
    assert!(
        stdout.contains("mailsift"),
        "Version should mention the program name"
    );
}
