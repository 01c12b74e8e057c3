//! Unit tests for log.rs
//!
//! Tests LogSeverity, LogEntry and DefaultLogger formatting.

use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
use std::time::{Duration, SystemTime};

// ============================================================================
// LOG SEVERITY TESTS
// ============================================================================

#[test]
fn test_log_severity_ordering() {
    assert!(LogSeverity::Trace < LogSeverity::Debug);
    assert!(LogSeverity::Debug < LogSeverity::Info);
    assert!(LogSeverity::Info < LogSeverity::Warn);
    assert!(LogSeverity::Warn < LogSeverity::Error);
}

#[test]
fn test_log_severity_debug() {
    assert_eq!(format!("{:?}", LogSeverity::Trace), "Trace");
    assert_eq!(format!("{:?}", LogSeverity::Error), "Error");
}

// ============================================================================
// LOG ENTRY TESTS
// ============================================================================

#[test]
fn test_log_entry_clone() {
    let entry = LogEntry {
        severity: LogSeverity::Warn,
        timestamp: SystemTime::now(),
        source: "vklearn::Config".to_string(),
        message: "File engine.toml not found".to_string(),
        file: None,
        line: None,
    };
    let copy = entry.clone();
    assert_eq!(copy.severity, LogSeverity::Warn);
    assert_eq!(copy.source, "vklearn::Config");
    assert_eq!(copy.message, entry.message);
}

// ============================================================================
// DEFAULT LOGGER TESTS
// ============================================================================

#[test]
fn test_timestamp_format_shape() {
    let ts = SystemTime::UNIX_EPOCH + Duration::from_millis(1_700_000_000_123);
    let formatted = DefaultLogger::format_timestamp(ts);

    // YYYY-MM-DD HH:MM:SS.mmm, local time so only the shape is fixed
    assert_eq!(formatted.len(), 23);
    assert_eq!(&formatted[4..5], "-");
    assert_eq!(&formatted[10..11], " ");
    assert_eq!(&formatted[19..20], ".");
    assert!(formatted.ends_with("123"));
}

#[test]
fn test_default_logger_does_not_panic() {
    let logger = DefaultLogger;
    logger.log(&LogEntry {
        severity: LogSeverity::Error,
        timestamp: SystemTime::now(),
        source: "vklearn::test".to_string(),
        message: "with location".to_string(),
        file: Some("log_tests.rs"),
        line: Some(1),
    });
    logger.log(&LogEntry {
        severity: LogSeverity::Trace,
        timestamp: SystemTime::now(),
        source: "vklearn::test".to_string(),
        message: "without location".to_string(),
        file: None,
        line: None,
    });
}
