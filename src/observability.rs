//! This module provides observability and diagnostics for the codec.
//!
//! Library code only ever logs through the `log` facade. The `log_metric!`
//! macro emits one structured line per decision point (packing width, mask
//! form) so encoder choices can be inspected after the fact, and
//! `enable_verbose_logging` is a convenience for binaries and tests that want
//! to see those lines without configuring a logger themselves.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::Once;

use crate::error::CifError;

static INIT_LOGGER: Once = Once::new();

/// Logs a structured key-value metric line at debug level.
///
/// # Example
/// ```
/// use bincif::log_metric;
/// let width = 2;
/// log_metric!("event" = "integer_packing", "bytes_per_element" = width);
/// ```
#[macro_export]
macro_rules! log_metric {
    ($($key:literal = $value:expr),+ $(,)?) => {
        if $crate::__log::log_enabled!($crate::__log::Level::Debug) {
            let mut parts = Vec::new();
            $(
                parts.push(format!("\"{}\": \"{}\"", $key, $value));
            )+
            $crate::__log::debug!("BINCIF_METRIC: {{ {} }}", parts.join(", "));
        }
    };
}

/// Installs an `Info`-level `env_logger`, optionally appending to `log_file`.
///
/// Only the first call installs a logger; later calls are no-ops.
///
/// # Errors
/// Returns `CifError::Io` if `log_file` cannot be opened.
pub fn enable_verbose_logging(log_file: Option<&Path>) -> Result<(), CifError> {
    let target = match log_file {
        Some(path) => Some(OpenOptions::new().create(true).append(true).open(path)?),
        None => None,
    };

    INIT_LOGGER.call_once(|| {
        let mut builder = env_logger::Builder::new();
        builder
            .filter_level(log::LevelFilter::Info)
            .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()));
        if let Some(file) = target {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        // A logger installed elsewhere wins; ours is then simply unused.
        let _ = builder.try_init();
    });
    Ok(())
}
