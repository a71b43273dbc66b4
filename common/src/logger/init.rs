use once_cell::sync::OnceCell;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Installs the global subscriber once per process. Later calls are no-ops,
/// so tests and the binary can both call it freely.
///
/// `json` switches to machine-readable output (production).
pub fn init_logger(service_name: &'static str, json: bool) {
    LOGGER_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let base = fmt::layer()
            .with_target(true) // <-- shows crate/module path
            .with_thread_ids(true)
            .with_line_number(true)
            .with_span_events(fmt::format::FmtSpan::CLOSE);

        let installed = if json {
            tracing_subscriber::registry()
                .with(filter)
                .with(base.json())
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(base.pretty())
                .try_init()
        };

        match installed {
            Ok(()) => tracing::info!(service = service_name, json, "logger initialized"),
            // Someone else (e.g. a test harness) already owns the global subscriber.
            Err(e) => tracing::debug!(error = %e, "global subscriber already set"),
        }
    });
}
