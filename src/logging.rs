use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Where diagnostic logs go
#[derive(Debug, Clone, PartialEq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
    /// Drop all log output; used while the dashboard owns the terminal
    Discard,
}

/// Default filter directive for a `-v` count. `RUST_LOG` takes precedence.
pub fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "ev_analytics=warn,eva=warn",
        1 => "ev_analytics=info,eva=info",
        _ => "ev_analytics=debug,eva=debug",
    }
}

pub fn init_logging(
    verbose: u8,
    target: LogTarget,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match target {
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| format!("Failed to open log file {}: {e}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        LogTarget::Discard => builder.with_writer(std::io::sink).try_init(),
    }
}
