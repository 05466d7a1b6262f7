//! End-to-end runs of the standard check suite

mod common;

use common::Fixture;
use std::fs;
use volume_fsck::volume::layout;
use volume_fsck::{CheckSuite, Console, FsckConfig, SuiteReport, Verbosity, Volume};

fn check(fixture: &Fixture, should_fix: bool) -> (SuiteReport, String) {
    check_with(fixture, FsckConfig::default(), should_fix)
}

fn check_with(fixture: &Fixture, config: FsckConfig, should_fix: bool) -> (SuiteReport, String) {
    let volume = Volume::open(fixture.root(), config).unwrap();
    let store = volume.open_metadata().unwrap();
    let mut buf = Vec::new();
    let report = {
        let mut console = Console::new(Verbosity::Normal, &mut buf);
        CheckSuite::standard(&volume, &store)
            .run(&mut console, should_fix)
            .unwrap()
    };
    (report, String::from_utf8(buf).unwrap())
}

#[test]
fn test_consistent_volume() {
    let fixture = Fixture::new();
    for _ in 0..3 {
        let uuid = Fixture::new_uuid();
        fixture.add_version(&uuid, 1, b"first");
        fixture.add_version(&uuid, 2, b"second version");
    }
    let uuid = Fixture::new_uuid();
    fixture.add_part(&uuid, "upload-a", 10, b"part one");
    fixture.add_part(&uuid, "upload-a", 11, b"part two");

    let (report, out) = check(&fixture, false);
    assert!(report.all_passed, "{}", out);
    assert_eq!(report.checks_run, 5);
    assert_eq!(report.fixes_found, 0);
}

#[test]
fn test_orphaned_object_on_disk() {
    let fixture = Fixture::new();
    let uuid = Fixture::new_uuid();
    fixture.add_version(&uuid, 1, b"kept");
    let orphan = fixture.write(&layout::version_path(&uuid, 2), b"orphan");

    let (report, out) = check(&fixture, false);
    assert!(!report.all_passed);
    assert_eq!(report.checks_failed, vec!["orphaned objects"]);
    assert_eq!(report.fixes_found, 1);
    assert!(out.contains(&orphan.display().to_string()));
    // report only: nothing moved
    assert!(fixture.root().join(&orphan).is_file());
}

#[test]
fn test_orphaned_metadata_does_not_trip_integrity() {
    let fixture = Fixture::new();
    let uuid = Fixture::new_uuid();
    fixture.add_version_row(&uuid, 3, 100);

    let (report, out) = check(&fixture, false);
    assert_eq!(report.checks_failed, vec!["orphaned metadata"]);
    assert_eq!(report.fixes_found, 1);
    assert!(out.contains(&format!("orphaned metadata: object {} version 3", uuid)));
}

#[test]
fn test_size_mismatch_is_left_untouched() {
    let fixture = Fixture::new();
    let uuid = Fixture::new_uuid();
    fixture.add_version_row(&uuid, 1, 100);
    let path = fixture.write(&layout::version_path(&uuid, 1), &[0u8; 90]);

    let (report, out) = check(&fixture, true);
    assert_eq!(report.checks_failed, vec!["object integrity"]);
    assert!(out.contains("size mismatch (got 90, expected 100)"));
    assert_eq!(fs::metadata(fixture.root().join(path)).unwrap().len(), 90);
}

#[test]
fn test_schema_mismatch_aborts() {
    let fixture = Fixture::new();
    fixture.set_schema_version(2);
    fixture.write(&layout::version_path(&Fixture::new_uuid(), 1), b"orphan");

    let (report, out) = check(&fixture, false);
    assert_eq!(report.checks_run, 1);
    assert_eq!(report.aborted_by, Some("metadata schema version"));
    assert!(out.contains("wrong metadata schema version: 2; expected: 4"));
    assert!(!out.contains("orphaned"));
}

#[test]
fn test_expected_version_from_config() {
    let fixture = Fixture::new();
    fixture.set_schema_version(5);
    let config = FsckConfig {
        expected_schema_version: 5,
        ..FsckConfig::default()
    };

    let (report, _) = check_with(&fixture, config, false);
    assert!(report.all_passed);
}

#[test]
fn test_repair_quarantines_and_cleans_up() {
    let fixture = Fixture::new();
    let uuid = Fixture::new_uuid();
    let orphan = fixture.write(&layout::version_path(&uuid, 3), b"orphan");
    let stray_part = fixture.write(&layout::part_path(&uuid, 4), b"part");

    let (report, out) = check(&fixture, true);
    assert!(!report.all_passed);
    assert_eq!(report.fixes_found, 2);
    assert!(out.contains("moved"));

    let quarantine = fixture.root().join("lost+found");
    assert!(quarantine.join(&orphan).is_file());
    assert!(quarantine.join(&stray_part).is_file());
    // the whole shard chain was emptied and removed
    let (first, _, _) = layout::shard_segments(&uuid);
    assert!(!fixture.root().join(first).exists());
    assert!(fixture.root().is_dir());

    // second run: quarantine is skipped, nothing left to find
    let (again, _) = check(&fixture, true);
    assert!(again.all_passed);
}

#[test]
fn test_cleanup_stops_at_shared_shard_dir() {
    let fixture = Fixture::new();
    let kept = "abcd0000-0000-4000-8000-000000000001";
    let orphaned = "abcd1111-1111-4111-8111-111111111111";
    fixture.add_version(kept, 1, b"kept");
    fixture.write(&layout::version_path(orphaned, 1), b"orphan");

    let (report, _) = check(&fixture, true);
    assert_eq!(report.fixes_found, 1);
    assert!(!fixture.root().join(layout::object_dir(orphaned)).exists());
    assert!(fixture.root().join("ab/cd").is_dir());
    assert!(fixture.root().join(layout::version_path(kept, 1)).is_file());
}

#[test]
fn test_unexpected_file_is_reported_not_moved() {
    let fixture = Fixture::new();
    let stray = fixture.write(std::path::Path::new("ab/cd/readme"), b"?");

    let (report, _) = check(&fixture, true);
    assert_eq!(report.fixes_found, 1);
    assert!(fixture.root().join(stray).is_file());
}

#[test]
fn test_corrupt_store_is_fatal() {
    let fixture = Fixture::new();
    fs::write(fixture.root().join("s3gw.db"), vec![0x42u8; 4096]).unwrap();

    let (report, out) = check(&fixture, false);
    assert!(!report.all_passed);
    assert_eq!(report.checks_run, 1);
    assert!(out.contains("cannot read metadata schema version"));
}
