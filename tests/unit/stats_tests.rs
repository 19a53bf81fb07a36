//! Unit tests for overview aggregation

#[cfg(test)]
mod tests {
    use freight::models::{
        CleanRecord, DirectoryStatus, PatternSavings, RootStats, ScanRecord,
    };
    use std::path::Path;

    fn scanned_row(name: &str, size_bytes: u64, file_count: u64) -> DirectoryStatus {
        let directory = format!("/mnt/projects/{name}");
        DirectoryStatus {
            name: name.to_string(),
            scan: Some(ScanRecord::new(
                Path::new(&directory),
                size_bytes,
                file_count,
                1_700_000_000,
            )),
            clean: None,
            directory,
        }
    }

    fn unscanned_row(name: &str) -> DirectoryStatus {
        DirectoryStatus {
            name: name.to_string(),
            directory: format!("/mnt/projects/{name}"),
            scan: None,
            clean: None,
        }
    }

    #[test]
    fn test_from_rows_aggregates() {
        let mut cleaned = scanned_row("beta", 2000, 20);
        let mut record = CleanRecord::begin(
            Path::new("/mnt/projects/beta"),
            &["node_modules".to_string()],
            true,
        );
        record.bytes_cleaned = 500;
        cleaned.clean = Some(record);

        let rows = vec![scanned_row("alpha", 1000, 10), cleaned, unscanned_row("gamma")];
        let stats = RootStats::from_rows(&rows);

        assert_eq!(stats.total_directories, 3);
        assert_eq!(stats.scanned_directories, 2);
        assert_eq!(stats.unscanned_directories, 1);
        assert!((stats.completion_rate - 200.0 / 3.0).abs() < 0.001);
        assert_eq!(stats.total_size_bytes, 3000);
        assert_eq!(stats.total_files, 30);
        assert_eq!(stats.total_cleanable_bytes, 500);
    }

    #[test]
    fn test_from_rows_empty() {
        let stats = RootStats::from_rows(&[]);
        assert_eq!(stats.total_directories, 0);
        assert_eq!(stats.scanned_directories, 0);
        assert!((stats.completion_rate - 0.0).abs() < f64::EPSILON);
        assert_eq!(stats.total_size_bytes, 0);
        assert_eq!(stats.total_cleanable_bytes, 0);
    }

    #[test]
    fn test_row_accessors_without_records() {
        let row = unscanned_row("alpha");
        assert!(!row.has_scan());
        assert_eq!(row.size_bytes(), 0);
        assert_eq!(row.file_count(), 0);
        assert_eq!(row.scan_time(), None);
        assert_eq!(row.bytes_cleaned(), 0);
        assert!(row.problem_directories().is_empty());
    }

    #[test]
    fn test_problem_directories_need_savings() {
        let mut row = scanned_row("alpha", 1000, 10);
        let mut record = CleanRecord::begin(
            Path::new("/mnt/projects/alpha"),
            &["node_modules".to_string(), "tmp".to_string()],
            true,
        );
        record.patterns = vec![
            PatternSavings {
                pattern: "node_modules".to_string(),
                bytes_saved: 500,
            },
            PatternSavings {
                pattern: "tmp".to_string(),
                bytes_saved: 0,
            },
        ];
        row.clean = Some(record);

        let problems = row.problem_directories();
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].pattern, "node_modules");
        assert_eq!(problems[0].bytes_saved, 500);
    }
}
