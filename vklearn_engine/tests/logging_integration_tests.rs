//! Integration tests for the logging host as seen from the public API
//!
//! No GPU required.
//!
//! Run with: cargo test --test logging_integration_tests

use std::sync::{Arc, Mutex};
use serial_test::serial;
use vklearn_engine::vklearn::{Engine, EngineConfig, Error, Result};
use vklearn_engine::vklearn::log::{LogEntry, LogSeverity, Logger};
use vklearn_engine::{engine_bail, engine_info};

// ============================================================================
// TEST LOGGER IMPLEMENTATION
// ============================================================================

/// Captures every entry it receives
struct CaptureLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

fn install_capture_logger() -> Arc<Mutex<Vec<LogEntry>>> {
    let entries = Arc::new(Mutex::new(Vec::new()));
    Engine::set_logger(CaptureLogger { entries: Arc::clone(&entries) });
    entries
}

impl Logger for CaptureLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

// ============================================================================
// LOGGING TESTS
// ============================================================================

#[test]
#[serial]
fn test_integration_missing_config_file_logs_warning() {
    let entries = install_capture_logger();

    let path = std::env::temp_dir().join(format!("vklearn_missing_{}.toml", std::process::id()));
    let config = EngineConfig::load(&path).unwrap();
    assert_eq!(config, EngineConfig::default());

    {
        let captured = entries.lock().unwrap();
        let warning = captured
            .iter()
            .find(|entry| entry.severity == LogSeverity::Warn)
            .expect("missing file should be reported");
        assert_eq!(warning.source, "vklearn::Config");
        assert!(warning.message.contains("not found"));
    }

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_integration_bail_carries_location() {
    fn failing_step() -> Result<()> {
        engine_bail!("test::step", "step {} failed", 3);
    }

    let entries = install_capture_logger();

    let err = failing_step().unwrap_err();
    assert_eq!(err, Error::BackendError("step 3 failed".to_string()));

    {
        let captured = entries.lock().unwrap();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].severity, LogSeverity::Error);
        assert_eq!(captured[0].source, "test::step");
        assert!(captured[0].file.is_some_and(|file| file.ends_with("logging_integration_tests.rs")));
        assert!(captured[0].line.is_some());
    }

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_integration_min_severity_is_global() {
    let entries = install_capture_logger();
    Engine::set_min_severity(LogSeverity::Warn);

    engine_info!("test::filter", "dropped");
    Engine::log(LogSeverity::Error, "test::filter", "kept".to_string());

    Engine::set_min_severity(LogSeverity::Debug);
    engine_info!("test::filter", "kept again");

    {
        let captured = entries.lock().unwrap();
        let messages: Vec<&str> = captured.iter().map(|entry| entry.message.as_str()).collect();
        assert_eq!(messages, vec!["kept", "kept again"]);
    }

    Engine::reset_logger();
}
