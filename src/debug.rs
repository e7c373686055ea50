//! Debug logging utilities
//!
//! Writes to `xlaunch-debug.log` in the system temp directory, only in
//! debug builds. In release builds every call is a no-op.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

static DEBUG_FILE: Mutex<Option<std::fs::File>> = Mutex::new(None);

/// Log file name inside the temp directory
pub const LOG_FILE_NAME: &str = "xlaunch-debug.log";

/// Location of the debug log
pub fn log_path() -> PathBuf {
    std::env::temp_dir().join(LOG_FILE_NAME)
}

/// Initialize debug logging (only in debug builds)
#[cfg(debug_assertions)]
pub fn init() {
    let Ok(mut file_guard) = DEBUG_FILE.lock() else {
        return;
    };
    if file_guard.is_none() {
        if let Ok(file) = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path())
        {
            *file_guard = Some(file);
            drop(file_guard);
            log("=== xlaunch session started ===");
        }
    }
}

#[cfg(not(debug_assertions))]
pub fn init() {}

/// Append a timestamped line to the log (only in debug builds)
#[cfg(debug_assertions)]
pub fn log(message: &str) {
    let timestamp = chrono::Local::now().format("%H:%M:%S%.3f");
    let line = format!("[{}] {}\n", timestamp, message);

    if let Ok(mut file_guard) = DEBUG_FILE.lock() {
        if let Some(ref mut file) = *file_guard {
            let _ = file.write_all(line.as_bytes());
            let _ = file.flush();
        }
    }
}

#[cfg(not(debug_assertions))]
pub fn log(_message: &str) {}

/// Log a message with a category prefix
#[cfg(debug_assertions)]
pub fn log_category(category: &str, message: &str) {
    log(&format!("[{}] {}", category, message));
}

#[cfg(not(debug_assertions))]
pub fn log_category(_category: &str, _message: &str) {}

/// Log an external command invocation and how it ended
#[cfg(debug_assertions)]
pub fn log_command(program: &Path, args: &[String], cwd: Option<&Path>, success: bool) {
    let cwd = cwd
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| ".".to_string());
    let status = if success { "ok" } else { "failed" };
    log(&format!(
        "[COMMAND] {} {} (cwd: {}) -> {}",
        program.display(),
        args.join(" "),
        cwd,
        status
    ));
}

#[cfg(not(debug_assertions))]
pub fn log_command(_program: &Path, _args: &[String], _cwd: Option<&Path>, _success: bool) {}

/// Log a terminal automation step
#[cfg(debug_assertions)]
pub fn log_terminal(operation: &str, detail: &str) {
    let truncated = if detail.len() > 200 {
        format!("{}...", detail.chars().take(200).collect::<String>())
    } else {
        detail.to_string()
    };
    log(&format!("[TERMINAL] {} | {}", operation, truncated));
}

#[cfg(not(debug_assertions))]
pub fn log_terminal(_operation: &str, _detail: &str) {}

/// Macro for convenient debug logging
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        $crate::debug::log(&format!($($arg)*))
    };
}
