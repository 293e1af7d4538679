mod common;

use aquamap_core::{logger, session::SessionState, WorkspaceBuilder};
use aquamap_schemas::{category::WaterBody, parameter::Parameter};
use common::{north, valid_draft, RecordingSurface};

#[test]
fn export_then_import_into_another_category_assigns_fresh_ids() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lake.csv");
    let mut surface = RecordingSurface::default();
    let mut ws = WorkspaceBuilder::new()
        .with_active_category(WaterBody::Lake)
        .build()
        .unwrap();

    *ws.form_mut() = valid_draft(28.6139, 77.209);
    ws.toggle_optional(Parameter::Aod);
    ws.form_mut().aod = "0.31".into();
    let first = ws.submit(&mut surface).unwrap();
    *ws.form_mut() = valid_draft(28.6139 + north(100.0), 77.209);
    ws.submit(&mut surface).unwrap();

    assert_eq!(ws.export_csv(&path).unwrap(), 2);

    ws.switch_category(WaterBody::Ponds, &mut surface);
    let report = ws.import_csv(&path, &mut surface).unwrap();
    assert_eq!(report.accepted.len(), 2);
    assert!(report.rejected.is_empty());

    let imported = ws.store().markers();
    assert_eq!(imported[0].fields, first.fields);
    assert_eq!(imported[0].fields.aod, Some(0.31));
    assert_eq!(surface.renders.last(), Some(&2));
}

#[test]
fn import_rejects_rows_that_break_spacing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ponds.csv");
    let mut surface = RecordingSurface::default();
    let mut ws = WorkspaceBuilder::new().build().unwrap();

    *ws.form_mut() = valid_draft(28.6139, 77.209);
    ws.submit(&mut surface).unwrap();
    ws.export_csv(&path).unwrap();

    let report = ws.import_csv(&path, &mut surface).unwrap();
    assert!(report.accepted.is_empty());
    assert_eq!(report.rejected.len(), 1);
    assert!(report.rejected[0].1.contains("20 meters"));
    assert_eq!(ws.store().len(), 1);
}

#[test]
fn mutation_log_follows_the_workspace() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("mutations.csv");
    let mut surface = RecordingSurface::default();
    let mut ws = WorkspaceBuilder::new()
        .with_mutation_log(log.to_str().unwrap())
        .build()
        .unwrap();

    *ws.form_mut() = valid_draft(28.6139, 77.209);
    let marker = ws.submit(&mut surface).unwrap();
    ws.generate_samples(Some(3), &mut surface).unwrap();
    ws.delete_samples(&mut surface);
    ws.remove(&marker.id, &mut surface);
    drop(ws);

    let content = std::fs::read_to_string(&log).unwrap();
    let kinds: Vec<&str> = content
        .lines()
        .skip(1)
        .map(|line| line.split(',').nth(1).unwrap())
        .collect();
    assert_eq!(
        kinds,
        vec!["add", "bulk_add", "bulk_add", "bulk_add", "bulk_remove", "bulk_remove", "bulk_remove", "remove"]
    );
}

#[test]
fn reading_a_missing_export_fails_with_the_path() {
    let err = logger::read_markers(std::path::Path::new("no-such-export.csv")).unwrap_err();
    assert!(err.to_string().contains("no-such-export.csv"));
}

#[cfg(target_os = "linux")]
#[test]
fn failed_log_writes_do_not_undo_committed_changes() {
    let mut surface = RecordingSurface::default();
    let mut ws = WorkspaceBuilder::new()
        .with_mutation_log("/dev/full")
        .build()
        .unwrap();

    *ws.form_mut() = valid_draft(28.6139, 77.209);
    let marker = ws.submit(&mut surface).unwrap();
    assert_eq!(ws.store().len(), 1);
    assert_eq!(ws.session().state(), &SessionState::Idle);
    assert_eq!(surface.renders.last(), Some(&1));

    let samples = ws.generate_samples(Some(2), &mut surface).unwrap();
    assert_eq!(samples.len(), 2);
    assert_eq!(surface.renders.last(), Some(&3));
    assert_eq!(ws.delete_samples(&mut surface), 2);
    assert_eq!(surface.renders.last(), Some(&1));

    assert!(ws.remove(&marker.id, &mut surface).is_some());
    assert!(ws.store().is_empty());
    assert_eq!(surface.renders.last(), Some(&0));
}
