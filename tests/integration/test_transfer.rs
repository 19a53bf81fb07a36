//! Integration tests for single-directory transfers
//!
//! Tests that invoke the real rsync binary bail out early when it is not
//! installed, so the rest of the suite stays runnable anywhere.

use crate::fixtures::write_file_sync;
use freight::io::store;
use freight::models::{MigrateRecord, RecordStatus};
use freight::services::transfer::{self, TransferOptions};
use std::fs;
use tempfile::TempDir;

/// Extended attributes and ACLs are not reliable on every test
/// filesystem, so the rsync-backed tests run with plain archive flags.
fn plain_flags() -> TransferOptions {
    TransferOptions {
        flags: "-a".to_string(),
    }
}

fn probed_source(root: &std::path::Path, name: &str) -> std::path::PathBuf {
    let source = root.join(name);
    fs::create_dir_all(store::meta_dir(&source)).unwrap();
    source
}

#[test]
fn test_transfer_refuses_unprobed_source() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("alpha");
    write_file_sync(source.join("data.bin"), vec![0u8; 64]).unwrap();
    let dest = temp_dir.path().join("dest");

    let err = transfer::transfer(&source, &dest, &plain_flags()).unwrap_err();

    assert!(
        err.to_string().contains("not been scanned"),
        "unexpected error: {err}"
    );
    assert!(!dest.exists(), "no copy may happen before the precondition");
}

#[test]
fn test_transfer_missing_source() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("absent");
    let dest = temp_dir.path().join("dest");

    let err = transfer::transfer(&source, &dest, &plain_flags()).unwrap_err();
    assert!(
        err.to_string().contains("does not exist"),
        "unexpected error: {err}"
    );
}

#[test]
fn test_transfer_missing_destination_parent() {
    let temp_dir = TempDir::new().unwrap();
    let source = probed_source(temp_dir.path(), "alpha");
    write_file_sync(source.join("data.bin"), vec![0u8; 64]).unwrap();
    let dest = temp_dir.path().join("no_such_parent/dest");

    let err = transfer::transfer(&source, &dest, &plain_flags()).unwrap_err();
    assert!(
        err.to_string().contains("destination parent does not exist"),
        "unexpected error: {err}"
    );
}

#[test]
fn test_transfer_copies_and_records() {
    if !transfer::rsync_available() {
        eprintln!("skipping: rsync not installed");
        return;
    }

    let temp_dir = TempDir::new().unwrap();
    let source = probed_source(temp_dir.path(), "alpha");
    write_file_sync(source.join("data1.bin"), vec![1u8; 1024]).unwrap();
    write_file_sync(source.join("data2.bin"), vec![2u8; 1024]).unwrap();
    write_file_sync(source.join("nested/data3.bin"), vec![3u8; 1024]).unwrap();

    let dest_root = temp_dir.path().join("archive");
    fs::create_dir_all(&dest_root).unwrap();
    let dest = dest_root.join("alpha");

    let record = transfer::transfer(&source, &dest, &plain_flags()).unwrap();

    assert_eq!(record.status, RecordStatus::Completed);
    assert_eq!(record.bytes_transferred, 3072);
    assert_eq!(record.files_transferred, 3);
    assert!(record.error_message.is_empty());
    assert_eq!(record.start_time.len(), 20);
    assert_eq!(record.end_time.len(), 20);

    // Contents landed inside the destination, not beside it
    assert_eq!(fs::metadata(dest.join("data1.bin")).unwrap().len(), 1024);
    assert_eq!(
        fs::metadata(dest.join("nested/data3.bin")).unwrap().len(),
        1024
    );

    // The outcome is recorded in the source's metadata store
    let stored: MigrateRecord = store::read_record(&store::migrate_path(&source))
        .unwrap()
        .unwrap();
    assert_eq!(stored.bytes_transferred, 3072);
    assert_eq!(stored.status, RecordStatus::Completed);
}

#[test]
fn test_transfer_second_run_moves_almost_nothing() {
    if !transfer::rsync_available() {
        eprintln!("skipping: rsync not installed");
        return;
    }

    let temp_dir = TempDir::new().unwrap();
    let source = probed_source(temp_dir.path(), "alpha");
    write_file_sync(source.join("data.bin"), vec![1u8; 4096]).unwrap();
    let dest_root = temp_dir.path().join("archive");
    fs::create_dir_all(&dest_root).unwrap();
    let dest = dest_root.join("alpha");

    transfer::transfer(&source, &dest, &plain_flags()).unwrap();
    let second = transfer::transfer(&source, &dest, &plain_flags()).unwrap();

    assert_eq!(second.status, RecordStatus::Completed);
    // The record written after the first pass is the only delta
    assert_eq!(second.files_transferred, 1);
    assert!(second.bytes_transferred < 1024);
    assert_eq!(fs::metadata(dest.join("data.bin")).unwrap().len(), 4096);
}

#[test]
fn test_transfer_counts_many_files() {
    if !transfer::rsync_available() {
        eprintln!("skipping: rsync not installed");
        return;
    }

    let temp_dir = TempDir::new().unwrap();
    let source = probed_source(temp_dir.path(), "bulk");
    for i in 0..120 {
        write_file_sync(
            source.join(format!("batch{}/f{i:03}.bin", i % 4)),
            vec![0u8; 1024],
        )
        .unwrap();
    }
    let dest_root = temp_dir.path().join("archive");
    fs::create_dir_all(&dest_root).unwrap();

    let record = transfer::transfer(&source, &dest_root.join("bulk"), &plain_flags()).unwrap();

    assert_eq!(record.files_transferred, 120);
    assert_eq!(record.bytes_transferred, 120 * 1024);
    assert_eq!(record.status, RecordStatus::Completed);
}

#[test]
fn test_transfer_nonzero_exit_is_recorded_not_raised() {
    if !transfer::rsync_available() {
        eprintln!("skipping: rsync not installed");
        return;
    }

    let temp_dir = TempDir::new().unwrap();
    let source = probed_source(temp_dir.path(), "alpha");
    write_file_sync(source.join("data1.bin"), vec![1u8; 512]).unwrap();
    write_file_sync(source.join("data2.bin"), vec![2u8; 512]).unwrap();

    // A regular file where the destination directory should be
    let dest = temp_dir.path().join("blocked");
    write_file_sync(&dest, b"in the way").unwrap();

    let record = transfer::transfer(&source, &dest, &plain_flags()).unwrap();

    assert_eq!(record.status, RecordStatus::Failed);
    assert!(
        record.error_message.contains("rsync exited"),
        "unexpected message: {}",
        record.error_message
    );

    // Failures are recorded too
    let stored: MigrateRecord = store::read_record(&store::migrate_path(&source))
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, RecordStatus::Failed);
}
