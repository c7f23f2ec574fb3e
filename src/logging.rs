/// Structured logging for the geospatial core.
///
/// Provides context-rich logging with subsystem tags, entity identifiers,
/// timestamps, and severity levels. Supports both console output and
/// file-based logging for long-running dashboard hosts.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Subsystems
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subsystem {
    /// Aggregation API ingest.
    Api,
    /// Query cache layer.
    Cache,
    /// Cluster renderer and viewport bridge.
    Map,
    /// Coordinate resolution.
    Geo,
    /// Everything else.
    System,
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subsystem::Api => write!(f, "API"),
            Subsystem::Cache => write!(f, "CACHE"),
            Subsystem::Map => write!(f, "MAP"),
            Subsystem::Geo => write!(f, "GEO"),
            Subsystem::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - endpoint may legitimately have no data yet
    /// (e.g. a station with no readings for the selected year).
    Expected,
    /// Unexpected failure - indicates service degradation or a contract
    /// change in the aggregation API.
    Unexpected,
    /// Unknown - cannot determine if this is expected or not.
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
}

impl Logger {
    /// Initialize the global logger
    pub fn init(min_level: LogLevel, log_file: Option<String>, console_timestamps: bool) {
        let logger = Logger {
            min_level,
            log_file,
            console_timestamps,
        };

        *LOGGER.lock().unwrap() = Some(logger);
    }

    fn log(&self, level: LogLevel, subsystem: &Subsystem, entity_id: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");

        let entity_part = entity_id.map(|s| format!(" [{}]", s)).unwrap_or_default();
        let log_entry = format!(
            "{} {} {}{}: {}",
            timestamp, level, subsystem, entity_part, message
        );

        // Console output
        if self.console_timestamps {
            match level {
                LogLevel::Error | LogLevel::Warning => eprintln!("{}", log_entry),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => println!("   [DEBUG] {}", message),
            }
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}{}: {}", subsystem, entity_part, message),
                LogLevel::Warning => eprintln!("   ⚠ {}{}: {}", subsystem, entity_part, message),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => {} // Skip debug in non-timestamp mode
            }
        }

        // File output
        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    Logger::init(min_level, log_file.map(String::from), console_timestamps);
}

/// Log a general informational message
pub fn info(subsystem: Subsystem, entity_id: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Info, &subsystem, entity_id, message);
    }
}

/// Log a warning message
pub fn warn(subsystem: Subsystem, entity_id: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Warning, &subsystem, entity_id, message);
    }
}

/// Log an error message
pub fn error(subsystem: Subsystem, entity_id: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Error, &subsystem, entity_id, message);
    }
}

/// Log a debug message
pub fn debug(subsystem: Subsystem, entity_id: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Debug, &subsystem, entity_id, message);
    }
}

// ---------------------------------------------------------------------------
// Failure Classification Helpers
// ---------------------------------------------------------------------------

/// Classify an aggregation API failure based on the error message.
pub fn classify_api_failure(error_message: &str) -> FailureType {
    // 404s are common for stations with no data in the selected window.
    if error_message.contains("HTTP error: 404") {
        FailureType::Expected
    }
    // Other HTTP errors and parse errors suggest service issues or an API
    // contract change.
    else if error_message.contains("HTTP error") || error_message.contains("Parse error") {
        FailureType::Unexpected
    } else if error_message.contains("Request error") {
        // Could be a transient network blip or a down service.
        FailureType::Unknown
    } else {
        FailureType::Unknown
    }
}

/// Log an aggregation API failure with automatic classification.
pub fn log_api_failure(query_key: &str, operation: &str, err: &dyn std::error::Error) {
    let error_msg = err.to_string();
    let failure_type = classify_api_failure(&error_msg);

    let message = format!("{} failed [{}]: {}", operation, failure_type, error_msg);

    match failure_type {
        FailureType::Expected => debug(Subsystem::Api, Some(query_key), &message),
        FailureType::Unexpected => error(Subsystem::Api, Some(query_key), &message),
        FailureType::Unknown => warn(Subsystem::Api, Some(query_key), &message),
    }
}

// ---------------------------------------------------------------------------
// Render Summary Logging
// ---------------------------------------------------------------------------

/// Log a summary of a marker synchronization pass.
pub fn log_sync_summary(total_entities: usize, placed_exact: usize, placed_fallback: usize) {
    let message = format!(
        "Marker sync complete: {} entities, {} exact placements, {} fallback placements",
        total_entities, placed_exact, placed_fallback
    );

    if placed_fallback == 0 {
        info(Subsystem::Map, None, &message);
    } else {
        debug(Subsystem::Map, None, &message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
    }

    #[test]
    fn test_failure_classification() {
        assert_eq!(classify_api_failure("HTTP error: 404"), FailureType::Expected);
        assert_eq!(classify_api_failure("HTTP error: 500"), FailureType::Unexpected);
        assert_eq!(
            classify_api_failure("Parse error: missing field `state`"),
            FailureType::Unexpected
        );
        assert_eq!(
            classify_api_failure("Request error: connection refused"),
            FailureType::Unknown
        );
    }
}
