//! Robot-mode end-to-end tests.

use serde_json::Value;

use crate::common::cli::CliRunner;
use crate::common::fixtures::{self, FixtureDir};
use crate::common::init_test_logging;

fn parse_json(text: &str) -> Value {
    serde_json::from_str(text)
        .unwrap_or_else(|_| panic!("Failed to parse JSON:\n{text}"))
}

#[test]
fn robot_quick_start_outputs_json() {
    init_test_logging();
    let cli = CliRunner::new();
    let result = cli.run(&["--robot"]);
    result.assert_success();

    let json = parse_json(result.stdout.trim());
    assert_eq!(json.get("tool").and_then(|v| v.as_str()), Some("mdl"));
    assert!(json.get("validation").is_some());
    assert!(json.get("output_modes").is_some());
}

#[test]
fn robot_check_valid_document() {
    init_test_logging();
    let fixtures = FixtureDir::new();
    let path = fixtures.write_doc("valid.mdl", fixtures::BASIC_DOC);

    let cli = CliRunner::new();
    let result = cli.run_robot(&["check", path.to_str().expect("utf8 path")]);
    result
        .assert_success()
        .assert_json_field("/valid", &Value::Bool(true))
        .assert_json_field("/lines", &Value::from(5))
        .assert_json_field_missing("/error");
}

#[test]
fn robot_check_invalid_document_reports_line() {
    init_test_logging();
    let fixtures = FixtureDir::new();
    let path = fixtures.write_doc("bad.mdl", fixtures::MALFORMED_DOC);

    let cli = CliRunner::new();
    let result = cli.run_robot(&["check", path.to_str().expect("utf8 path")]);
    result
        .assert_failure()
        .assert_exit_code(1)
        .assert_json_field("/valid", &Value::Bool(false))
        .assert_json_field("/error/line", &Value::from(1))
        .assert_json_field_exists("/error/suggestion");
}

#[test]
fn robot_check_unterminated_annotations() {
    init_test_logging();
    let cli = CliRunner::new().with_stdin(fixtures::UNTERMINATED_DOC);
    let result = cli.run_robot(&["check", "-"]);
    result.assert_failure();

    let json = parse_json(result.stdout.trim());
    let message = json
        .pointer("/error/message")
        .and_then(Value::as_str)
        .expect("error message");
    assert!(message.contains("never closed"), "unexpected: {message}");
}

#[test]
fn robot_check_reads_stdin() {
    init_test_logging();
    let cli = CliRunner::new().with_stdin(fixtures::BASIC_DOC);
    let result = cli.run_robot(&["check", "-"]);
    result
        .assert_success()
        .assert_json_field("/valid", &Value::Bool(true))
        .assert_json_field("/path", &Value::String("-".to_string()));
}

#[test]
fn robot_check_record_requires_all_headers() {
    init_test_logging();
    // Parses fine as a document but has no headers to assemble a record from.
    let cli = CliRunner::new().with_stdin("free text only\n");

    cli.run_robot(&["check", "-"]).assert_success();
    let result = cli.run_robot(&["check", "-", "--record"]);
    result
        .assert_failure()
        .assert_json_field("/valid", &Value::Bool(false));
}

#[test]
fn robot_check_committed_fixture_as_record() {
    init_test_logging();
    let path = fixtures::fixtures_path("transcript.mdl");

    let cli = CliRunner::new();
    let result = cli.run_robot(&["check", path.to_str().expect("utf8 path"), "--record"]);
    result
        .assert_success()
        .assert_json_field("/valid", &Value::Bool(true))
        .assert_json_field("/lines", &Value::from(8));
}

#[test]
fn robot_show_summary_fields() {
    init_test_logging();
    let fixtures = FixtureDir::new();
    let path = fixtures.write_doc("valid.mdl", fixtures::BASIC_DOC);

    let cli = CliRunner::new();
    let result = cli.run_robot(&["show", path.to_str().expect("utf8 path")]);
    result
        .assert_success()
        .assert_json_field(
            "/moment_id",
            &Value::String("77e39706-d044-4345-afdf-61f7c729f1e3".to_string()),
        )
        .assert_json_field(
            "/timestamp",
            &Value::String("2023-02-05T14:23:50.983374+00:00".to_string()),
        )
        .assert_json_field("/moment_lines", &Value::from(1))
        .assert_json_field("/has_annotations", &Value::Bool(true))
        .assert_json_field_missing("/previous_snapshot_id");
}

#[test]
fn robot_show_annotations_as_json() {
    init_test_logging();
    let cli = CliRunner::new().with_stdin(fixtures::BASIC_DOC);
    let result = cli.run_robot(&["show", "-", "--annotations"]);
    result.assert_success();

    let json = parse_json(result.stdout.trim());
    assert_eq!(
        json.pointer("/toxicity").and_then(Value::as_f64),
        Some(0.0004)
    );
}

#[test]
fn robot_error_includes_suggestion() {
    init_test_logging();
    let cli = CliRunner::new().with_env("RUST_LOG", "off");
    let result = cli.run_robot(&["show", "/nonexistent/doc.mdl"]);
    result.assert_failure();

    // Robot errors are emitted to stderr, keeping stdout parseable.
    let stderr = result.stderr.trim();
    assert!(!stderr.is_empty(), "Expected robot error JSON in stderr");
    let json = parse_json(stderr);
    assert_eq!(json.get("error").and_then(Value::as_bool), Some(true));
    assert!(json.get("message").is_some());
    assert!(json.get("recoverable").is_some());
}

#[test]
fn robot_format_flag_outputs_json() {
    init_test_logging();
    let cli = CliRunner::new();
    let result = cli.run(&["version", "--format=json"]);
    result.assert_success();

    let json = parse_json(result.stdout.trim());
    assert!(json.get("version").is_some());
}

#[test]
fn robot_compact_format_is_single_line() {
    init_test_logging();
    let cli = CliRunner::new().with_stdin(fixtures::BASIC_DOC);
    let result = cli.run(&["check", "-", "--format=json-compact"]);
    result.assert_success();
    assert_eq!(result.stdout.trim().lines().count(), 1);
}

#[test]
fn robot_mode_via_env_format() {
    init_test_logging();
    let cli = CliRunner::new().with_env("MDL_FORMAT", "json");
    let result = cli.run(&["version"]);
    result.assert_success().assert_json_field_exists("/version");
}
