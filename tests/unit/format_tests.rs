//! Unit tests for human-readable size and count formatting

#[cfg(test)]
mod tests {
    use freight::services::format::{format_count, format_size};

    #[test]
    fn test_format_size_bytes() {
        assert_eq!(format_size(0), "0.0B");
        assert_eq!(format_size(512), "512.0B");
        assert_eq!(format_size(1023), "1023.0B");
    }

    #[test]
    fn test_format_size_scales_up() {
        assert_eq!(format_size(1024), "1.0KB");
        assert_eq!(format_size(1536), "1.5KB");
        assert_eq!(format_size(1024 * 1024), "1.0MB");
        assert_eq!(format_size(50 * 1024 * 1024), "50.0MB");
        assert_eq!(format_size(60 * 1024 * 1024), "60.0MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.0GB");
        assert_eq!(format_size(2 * 1024 * 1024 * 1024 * 1024), "2.0TB");
    }

    #[test]
    fn test_format_size_caps_at_petabytes() {
        assert_eq!(format_size(u64::MAX), "16384.0PB");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }
}
