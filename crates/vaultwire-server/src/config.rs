//! CLI arguments and port-file parsing (`§6.2`, `§10.3`).

use std::path::{Path, PathBuf};

use clap::Parser;

/// Vaultwire protocol server
#[derive(Parser, Debug)]
#[command(name = "vaultwire-server")]
#[command(about = "Vaultwire file-transfer protocol server")]
#[command(version)]
pub struct Args {
    /// Working directory for per-client upload directories, the database
    /// file, and the default port file.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Port file, resolved relative to `--root` unless absolute.
    #[arg(long, default_value = "port.info")]
    pub port_file: PathBuf,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Default port used when the port file is missing, unreadable, or does not
/// contain a plain decimal integer (`§6.2`).
pub const FALLBACK_PORT: u16 = 1234;

/// Read a single ASCII decimal port number from `path`.
///
/// Any failure — a missing file, a read error, or contents that don't parse
/// as a `u16` — falls back to [`FALLBACK_PORT`] rather than failing startup
/// (`§6.2`).
#[must_use]
pub fn read_port(path: &Path) -> u16 {
    match std::fs::read_to_string(path) {
        Ok(contents) => match contents.trim().parse::<u16>() {
            Ok(port) => port,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "port file unparsable, falling back to {FALLBACK_PORT}");
                FALLBACK_PORT
            },
        },
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "port file unreadable, falling back to {FALLBACK_PORT}");
            FALLBACK_PORT
        },
    }
}
