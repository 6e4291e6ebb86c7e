//! Logging setup.
//!
//! The interactive dashboard owns the terminal, so its logs go to a file that
//! is truncated on every start. Headless runs log to stderr, keeping stdout
//! for the report. `RUST_LOG` filters both and defaults to `info`.

use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Where log lines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    File,
    Stderr,
}

impl LogTarget {
    pub fn for_mode(headless: bool) -> Self {
        if headless {
            Self::Stderr
        } else {
            Self::File
        }
    }
}

/// Installs the global subscriber. A log file that cannot be created leaves
/// logging off and prints a warning, since the dashboard still works without it.
pub fn init(target: LogTarget) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match target {
        LogTarget::Stderr => builder.with_writer(std::io::stderr).init(),
        LogTarget::File => match open_log_file() {
            Ok(file) => builder.with_writer(file).with_ansi(false).init(),
            Err(e) => eprintln!("Warning: logging disabled: {e}"),
        },
    }
}

fn open_log_file() -> std::io::Result<File> {
    let path = log_path();
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    File::create(path)
}

/// `<state dir>/tour-dash/tour-dash.log`, falling back to the config dir and
/// then the temp dir on platforms without one.
pub fn log_path() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::config_dir)
        .map(|dir| dir.join("tour-dash"))
        .unwrap_or_else(std::env::temp_dir)
        .join("tour-dash.log")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_path() {
        let path = log_path();
        assert!(path.is_absolute());
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("tour-dash.log"));
    }

    #[test]
    fn test_target_for_mode() {
        assert_eq!(LogTarget::for_mode(true), LogTarget::Stderr);
        assert_eq!(LogTarget::for_mode(false), LogTarget::File);
    }
}
