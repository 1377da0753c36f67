//! Integration tests for record assembly and authoring flows.

use mdl::error::MdlError;
use mdl::snapshot::{HeaderKind, Snapshot, SnapshotRecord};

const BASIC: &str = include_str!("../fixtures/basic.mdl");
const TRANSCRIPT: &str = include_str!("../fixtures/transcript.mdl");

// ===== Assembly From Fixtures =====

#[test]
fn test_record_from_basic_fixture() {
    let record = SnapshotRecord::parse(BASIC).unwrap();
    assert_eq!(
        record.moment_id.to_string(),
        "77e39706-d044-4345-afdf-61f7c729f1e3"
    );
    assert_eq!(
        record.snapshot_id.to_string(),
        "84bcdd64-fb5f-48b6-a44a-cd3e13a65a88"
    );
    assert!(record.previous_snapshot_id.is_none());
    assert_eq!(record.timestamp.as_str(), "2023-02-05T14:23:50.983374+00:00");
    assert_eq!(record.annotations.as_deref(), Some("\ntoxicity: 0.0004\n"));
    assert_eq!(record.moment, vec!["hello world".to_string()]);
}

#[test]
fn test_record_rendering_matches_fixtures() {
    for text in [BASIC, TRANSCRIPT] {
        let record = SnapshotRecord::parse(text).unwrap();
        assert_eq!(record.to_string(), text);
    }
}

#[test]
fn test_assembly_requires_each_header() {
    let cases = [
        ("free text\n", HeaderKind::MomentId),
        (
            "# Moment ID: 77e39706-d044-4345-afdf-61f7c729f1e3\n",
            HeaderKind::SnapshotId,
        ),
        (
            "# Moment ID: 77e39706-d044-4345-afdf-61f7c729f1e3\n\
             # Snapshot ID: 84bcdd64-fb5f-48b6-a44a-cd3e13a65a88\n",
            HeaderKind::Timestamp,
        ),
    ];

    for (doc, missing) in cases {
        match Snapshot::parse(doc).unwrap().to_record() {
            Err(MdlError::MissingHeader { header }) => assert_eq!(header, missing),
            other => panic!("expected MissingHeader for {doc:?}, got {other:?}"),
        }
    }
}

// ===== Annotations =====

#[test]
fn test_annotations_yaml_values() {
    let record = SnapshotRecord::parse(TRANSCRIPT).unwrap();
    let value = record.annotations_yaml().unwrap().unwrap();
    assert_eq!(value["toxicity"].as_f64(), Some(0.0103));
    assert_eq!(value["sentiment"].as_f64(), Some(-0.24));
}

#[test]
fn test_annotations_yaml_absent() {
    let record = SnapshotRecord::new(vec!["hi".to_string()]);
    assert!(record.annotations_yaml().unwrap().is_none());
}

// ===== Authoring Flows =====

#[test]
fn test_fresh_records_render_and_parse_back() {
    let record = SnapshotRecord::new(vec![
        "User: hi".to_string(),
        "Assistant: hello".to_string(),
    ])
    .with_annotations("\nreviewed: false\n".to_string());

    let reparsed = SnapshotRecord::parse(&record.to_string()).unwrap();
    assert_eq!(reparsed, record);
}

#[test]
fn test_successor_chain_round_trips_through_text() {
    let first = SnapshotRecord::parse(BASIC).unwrap();
    let second_text = first.successor().to_string();
    let second = SnapshotRecord::parse(&second_text).unwrap();
    let third = second.successor();

    assert_eq!(second.previous_snapshot_id, Some(first.snapshot_id));
    assert_eq!(third.previous_snapshot_id, Some(second.snapshot_id));
    assert_eq!(third.moment_id, first.moment_id);
    assert_eq!(third.moment, first.moment);
    assert_eq!(third.annotations, first.annotations);
}

#[test]
fn test_successor_of_transcript_keeps_annotations_verbatim() {
    let record = SnapshotRecord::parse(TRANSCRIPT).unwrap();
    let next = record.successor();
    assert_eq!(
        next.annotations.as_deref(),
        Some("\ntoxicity: 0.0103\nsentiment: -0.24\n")
    );
}

// ===== JSON Shape =====

#[test]
fn test_record_serializes_for_robot_output() {
    let record = SnapshotRecord::parse(TRANSCRIPT).unwrap();
    let json = serde_json::to_value(&record).unwrap();

    assert_eq!(
        json["moment_id"],
        "1463a177-a72d-4dbe-a791-6b8bbbf9dcd9"
    );
    assert_eq!(
        json["previous_snapshot_id"],
        "84bcdd64-fb5f-48b6-a44a-cd3e13a65a88"
    );
    assert_eq!(json["timestamp"], "2023-02-05T14:25:11.002931+00:00");
    assert_eq!(json["moment"].as_array().map(Vec::len), Some(3));
}

#[test]
fn test_record_json_round_trips() {
    let record = SnapshotRecord::parse(BASIC).unwrap();
    let json = serde_json::to_string(&record).unwrap();
    let back: SnapshotRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(back, record);
}
