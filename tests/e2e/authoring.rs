//! End-to-end tests for the authoring commands (new, next).

use assert_cmd::Command;
use predicates::prelude::*;

use mdl::snapshot::SnapshotRecord;

use crate::common::fixtures::BASIC_DOC;

fn mdl() -> Command {
    Command::cargo_bin("mdl").expect("mdl binary not built")
}

#[test]
fn new_emits_a_parseable_document() {
    let output = mdl()
        .args(["new", "--moment", "-"])
        .write_stdin("hello world\n")
        .output()
        .expect("run mdl new");
    assert!(output.status.success());

    let text = String::from_utf8(output.stdout).expect("utf8 output");
    let record = SnapshotRecord::parse(&text).expect("authored document parses back");
    assert_eq!(record.moment, vec!["hello world".to_string()]);
    assert!(record.previous_snapshot_id.is_none());
    assert!(record.annotations.is_none());
}

#[test]
fn new_without_moment_produces_headers_only() {
    let output = mdl().arg("new").output().expect("run mdl new");
    assert!(output.status.success());

    let text = String::from_utf8(output.stdout).expect("utf8 output");
    let record = SnapshotRecord::parse(&text).expect("authored document parses back");
    assert!(record.moment.is_empty());
}

#[test]
fn new_with_annotations_embeds_a_yaml_block() {
    mdl()
        .args(["new", "--annotations", "toxicity: 0.0004"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "# Annotations: ```\ntoxicity: 0.0004\n```\n",
        ));
}

#[test]
fn new_rejects_invalid_annotations_yaml() {
    mdl()
        .args(["new", "--annotations", "key: [unclosed"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("annotations are not valid YAML"));
}

#[test]
fn new_rejects_annotations_containing_a_fence() {
    mdl()
        .args(["new", "--annotations", "note: ``` inside"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("fence"));
}

#[test]
fn new_rejects_moment_lines_that_read_back_as_headers() {
    mdl()
        .args(["new", "--moment", "-"])
        .write_stdin("safe line\n# Timestamp: tomorrow\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("moment line 2"))
        .stderr(predicate::str::contains("Timestamp header"));
}

#[test]
fn next_chains_ids_and_keeps_the_moment() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("doc.mdl");
    std::fs::write(&path, BASIC_DOC).expect("write fixture");

    let output = mdl()
        .args(["next", path.to_str().expect("utf8 path")])
        .output()
        .expect("run mdl next");
    assert!(output.status.success());

    let text = String::from_utf8(output.stdout).expect("utf8 output");
    let next = SnapshotRecord::parse(&text).expect("successor parses back");
    let original = SnapshotRecord::parse(BASIC_DOC).expect("fixture parses");

    assert_eq!(next.moment_id, original.moment_id);
    assert_eq!(next.previous_snapshot_id, Some(original.snapshot_id));
    assert_ne!(next.snapshot_id, original.snapshot_id);
    assert_eq!(next.moment, original.moment);
    assert_eq!(next.annotations, original.annotations);
}

#[test]
fn next_robot_reports_document_and_record() {
    let output = mdl()
        .args(["--robot", "next", "-"])
        .write_stdin(BASIC_DOC)
        .output()
        .expect("run mdl next");
    assert!(output.status.success());

    let text = String::from_utf8(output.stdout).expect("utf8 output");
    let json: serde_json::Value = serde_json::from_str(&text).expect("robot JSON");
    assert!(json.pointer("/record/snapshot_id").is_some());
    let document = json
        .pointer("/document")
        .and_then(serde_json::Value::as_str)
        .expect("document field");
    assert!(document.starts_with("# Moment ID: "));
    SnapshotRecord::parse(document).expect("embedded document parses back");
}

#[test]
fn next_requires_a_complete_document() {
    mdl()
        .args(["next", "-"])
        .write_stdin("just a moment line\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no Moment ID header"));
}
