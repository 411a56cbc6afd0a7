//! Tracing subscriber setup.
//!
//! Two layers share one filter: human-readable events on stderr, and the same events
//! without colour appended to an audit log file. The filter is resolved in this order:
//!
//! 1. `DOCGEN_LOG` environment variable (any `EnvFilter` directive)
//! 2. `debug` when verbose output or the debug-mode setting is on
//! 3. The `log_level` from the site configuration
//!
//! Only the binary calls [`init_logging`]; the library just emits events.

use directories::ProjectDirs;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_ENV: &str = "DOCGEN_LOG";
const LOG_FILENAME: &str = "docgen.log";

/// Default audit log location: `docgen.log` in the platform data directory.
pub fn default_log_file() -> Option<PathBuf> {
    ProjectDirs::from("com", "docgen", "docgen").map(|dirs| dirs.data_local_dir().join(LOG_FILENAME))
}

pub fn resolve_filter(configured: &str, verbose: bool) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return filter;
    }
    let level = if verbose { "debug" } else { configured };
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}

fn open_log_file(path: &Path) -> Option<File> {
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return None;
        }
    }
    OpenOptions::new().create(true).append(true).open(path).ok()
}

/// Installs the global subscriber. Calling it twice is a no-op.
///
/// The audit layer is skipped when the log file cannot be opened; logging never stops
/// a command from running.
pub fn init_logging(configured: &str, verbose: bool, log_file: Option<&Path>) {
    let filter = resolve_filter(configured, verbose);

    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let audit_layer = log_file.and_then(open_log_file).map(|file| {
        fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(audit_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_forces_debug() {
        if std::env::var(LOG_ENV).is_ok() {
            return;
        }
        assert_eq!(resolve_filter("warn", true).to_string(), "debug");
        assert_eq!(resolve_filter("warn", false).to_string(), "warn");
    }

    #[test]
    fn test_log_file_parent_is_created() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("logs").join(LOG_FILENAME);
        assert!(open_log_file(&path).is_some());
        assert!(path.exists());
    }
}
