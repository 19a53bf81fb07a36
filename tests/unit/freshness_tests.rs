//! Unit tests for the rescan decision

#[cfg(test)]
mod tests {
    use freight::models::ScanRecord;
    use freight::services::freshness::needs_scan;
    use freight::services::probe;
    use std::path::Path;
    use tempfile::TempDir;

    fn record_with_mtime(directory: &Path, mtime: i64) -> ScanRecord {
        ScanRecord::new(directory, 1024, 1, mtime)
    }

    #[test]
    fn test_no_prior_record_rescans() {
        let temp_dir = TempDir::new().unwrap();
        let decision = needs_scan(temp_dir.path(), None);
        assert!(decision.needed);
        assert_eq!(decision.reason, "no prior scan");
    }

    #[test]
    fn test_zero_stored_mtime_rescans() {
        let temp_dir = TempDir::new().unwrap();
        let record = record_with_mtime(temp_dir.path(), 0);
        let decision = needs_scan(temp_dir.path(), Some(&record));
        assert!(decision.needed);
        assert_eq!(decision.reason, "no recorded mtime");
    }

    #[test]
    fn test_unreadable_directory_rescans() {
        let record = record_with_mtime(Path::new("/nonexistent"), 1_700_000_000);
        let decision = needs_scan(Path::new("/nonexistent"), Some(&record));
        assert!(decision.needed);
        assert_eq!(decision.reason, "mtime unreadable");
    }

    #[test]
    fn test_unchanged_directory_is_fresh() {
        let temp_dir = TempDir::new().unwrap();
        let current = probe::dir_mtime(temp_dir.path());
        assert!(current > 0);

        let record = record_with_mtime(temp_dir.path(), current);
        let decision = needs_scan(temp_dir.path(), Some(&record));
        assert!(!decision.needed);
        assert_eq!(decision.reason, "no changes");
    }

    #[test]
    fn test_modified_directory_rescans() {
        let temp_dir = TempDir::new().unwrap();
        let current = probe::dir_mtime(temp_dir.path());
        assert!(current > 0);

        // A record older than the directory means something changed since
        let record = record_with_mtime(temp_dir.path(), current - 5);
        let decision = needs_scan(temp_dir.path(), Some(&record));
        assert!(decision.needed);
        assert_eq!(decision.reason, "directory modified");
    }
}
