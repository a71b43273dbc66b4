use tracing::Span;

use super::TraceId;

/// Root span for one process run / job. Everything logged inside carries the trace id.
pub fn run_span(name: &'static str, trace_id: &TraceId) -> Span {
    tracing::info_span!(
        "run",
        name = %name,
        trace_id = %trace_id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_can_be_built_without_a_subscriber() {
        let trace_id = TraceId::default();
        let root = run_span("bootstrap", &trace_id);
        let _guard = root.enter();
        tracing::info!("inside run span");
    }
}
