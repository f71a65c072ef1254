//! Stderr logging for the audit binaries.
//!
//! Library crates only speak through the `log` macros and never install a
//! sink themselves. Binaries call [`init_with_level`] once at startup; with
//! the `tracing` feature, [`init_tracing`] wires up a `tracing-subscriber`
//! pipeline instead.

use std::io::Write;
use std::sync::OnceLock;

use log::{LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

/// Writes `LEVEL module.path: message` lines, one per record.
struct StderrSink {
    level: LevelFilter,
}

impl Log for StderrSink {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let _ = writeln!(
            std::io::stderr(),
            "{:<5} {}: {}",
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {}
}

static SINK: OnceLock<StderrSink> = OnceLock::new();

/// Install the stderr sink at the given level filter.
///
/// Later calls are no-ops, so binaries and tests may call this
/// unconditionally.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if SINK.get().is_some() {
        return Ok(());
    }
    let sink = SINK.get_or_init(|| StderrSink { level });
    log::set_logger(sink)?;
    log::set_max_level(level);
    Ok(())
}

#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        let _ = fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .json()
            .flatten_event(true)
            .finish()
            .try_init();
    } else {
        let _ = fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .finish()
            .try_init();
    }
}
