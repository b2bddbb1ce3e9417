use sprint_sheets::io::memory::MemorySheets;
use sprint_sheets::io::sheet::{CellRef, SheetWriter, SkipReason};
use sprint_sheets::model::{AssigneePoints, ProjectStats, SprintStats};
use sprint_sheets::sync::sync_projects;
use std::fs;
use tempfile::tempdir;

fn alpha_sheet() -> MemorySheets {
    let mut sheets = MemorySheets::default();
    sheets.add_sheet(
        "Alpha",
        vec![
            vec!["", "Alice", "Bob", "Carol", "Done"],
            vec!["Sprint 1", "", "", "", ""],
        ],
    );
    sheets
}

fn alpha_stats(total_points: Option<f64>) -> ProjectStats {
    ProjectStats {
        name: "Alpha".into(),
        sprints: vec![SprintStats {
            name: "Sprint 1".into(),
            users: vec![
                AssigneePoints {
                    name: "Alice".into(),
                    points: 3.0,
                },
                AssigneePoints {
                    name: "Bob".into(),
                    points: 2.5,
                },
            ],
            total_points,
        }],
    }
}

#[test]
fn writes_assignee_points_and_totals() {
    let mut writer = SheetWriter::new(alpha_sheet());
    let report = sync_projects(&[alpha_stats(Some(10.0))], &mut writer, "Done");

    let sheets = writer.backend();
    assert_eq!(sheets.value("Alpha", CellRef::new(2, 2)), Some("3"));
    assert_eq!(sheets.value("Alpha", CellRef::new(2, 3)), Some("2,5"));
    assert_eq!(sheets.value("Alpha", CellRef::new(2, 4)), Some(""));
    assert_eq!(sheets.value("Alpha", CellRef::new(2, 5)), Some("10"));
    assert_eq!(sheets.writes().len(), 3);
    assert_eq!(report.written.len(), 3);
    assert!(report.is_complete());
}

#[test]
fn missing_worksheet_skips_project_and_continues() {
    let mut writer = SheetWriter::new(alpha_sheet());
    let beta = ProjectStats {
        name: "Beta".into(),
        ..alpha_stats(Some(5.0))
    };

    let report = sync_projects(&[beta, alpha_stats(Some(10.0))], &mut writer, "Done");

    assert_eq!(report.skipped_projects, ["Beta"]);
    assert!(writer.backend().writes().iter().all(|w| w.sheet == "Alpha"));
    assert_eq!(report.written.len(), 3);
}

#[test]
fn missing_header_skips_only_that_cell() {
    let mut sheets = MemorySheets::default();
    sheets.add_sheet(
        "Alpha",
        vec![vec!["", "Bob", "Done"], vec!["Sprint 1", "", ""]],
    );
    let mut writer = SheetWriter::new(sheets);

    let report = sync_projects(&[alpha_stats(Some(10.0))], &mut writer, "Done");

    assert_eq!(report.written.len(), 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].col_header, "Alice");
    assert_eq!(
        report.skipped[0].reason,
        SkipReason::CellNotFound("Alice".into())
    );
}

#[test]
fn sprint_without_total_records_skip() {
    let mut writer = SheetWriter::new(alpha_sheet());
    let report = sync_projects(&[alpha_stats(None)], &mut writer, "Done");

    assert_eq!(
        writer.backend().value("Alpha", CellRef::new(2, 5)),
        Some("")
    );
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].reason, SkipReason::NoValue);
}

#[test]
fn fractional_total_uses_comma() {
    let mut writer = SheetWriter::new(alpha_sheet());
    let report = sync_projects(&[alpha_stats(Some(12.5))], &mut writer, "Done");

    assert_eq!(
        writer.backend().value("Alpha", CellRef::new(2, 5)),
        Some("12,5")
    );
    assert!(report.is_complete());
}

#[test]
fn report_is_saved_as_json() {
    let mut sheets = MemorySheets::default();
    sheets.add_sheet(
        "Alpha",
        vec![vec!["", "Bob", "Done"], vec!["Sprint 1", "", ""]],
    );
    let mut writer = SheetWriter::new(sheets);
    let beta = ProjectStats {
        name: "Beta".into(),
        ..alpha_stats(Some(5.0))
    };
    let report = sync_projects(&[alpha_stats(None), beta], &mut writer, "Done");

    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("report.json");
    report.write_json(&path).expect("report written");

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).expect("report read"))
            .expect("report parsed");
    assert_eq!(json["written"][0]["col_header"], "Bob");
    assert_eq!(json["written"][0]["cell"], serde_json::json!({"row": 2, "col": 2}));
    assert_eq!(json["written"][0]["value"], "2,5");
    assert_eq!(json["skipped"][0]["reason"]["kind"], "CellNotFound");
    assert_eq!(json["skipped"][0]["reason"]["detail"], "Alice");
    assert_eq!(json["skipped"][1]["reason"], serde_json::json!({"kind": "NoValue"}));
    assert_eq!(json["skipped_projects"], serde_json::json!(["Beta"]));
}
