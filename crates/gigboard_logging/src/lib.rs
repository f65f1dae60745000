#![deny(missing_docs)]
//! Shared logging utilities for the gigboard workspace.
//!
//! This crate provides the `board_*` logging macros used across the codebase,
//! a process-wide session epoch that is stamped onto log lines, and a minimal
//! test initializer for the global logger.

use std::sync::atomic::{AtomicU64, Ordering};

/// Epoch of the signed-in session, shared by every thread.
static SESSION_EPOCH: AtomicU64 = AtomicU64::new(0);

/// Sets the session epoch seen by all threads.
/// The app loop calls this whenever the signed-in identity changes.
pub fn set_session_epoch(epoch: u64) {
    SESSION_EPOCH.store(epoch, Ordering::Relaxed);
}

/// Retrieves the current session epoch.
/// Returns 0 if no session has been recorded.
pub fn session_epoch() -> u64 {
    SESSION_EPOCH.load(Ordering::Relaxed)
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! board_trace {
    ($($arg:tt)*) => {{
        log::trace!("[epoch {}] {}", $crate::session_epoch(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! board_info {
    ($($arg:tt)*) => {{
        log::info!("[epoch {}] {}", $crate::session_epoch(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! board_debug {
    ($($arg:tt)*) => {{
        log::debug!("[epoch {}] {}", $crate::session_epoch(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! board_warn {
    ($($arg:tt)*) => {{
        log::warn!("[epoch {}] {}", $crate::session_epoch(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! board_error {
    ($($arg:tt)*) => {{
        log::error!("[epoch {}] {}", $crate::session_epoch(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::{session_epoch, set_session_epoch};

    #[test]
    fn epoch_is_visible_from_other_threads() {
        set_session_epoch(3);
        let seen = thread::spawn(session_epoch).join().unwrap();
        assert_eq!(seen, 3);

        thread::spawn(|| set_session_epoch(4)).join().unwrap();
        assert_eq!(session_epoch(), 4);
    }
}
