//! JSONL formatting layer shared by the console and file sinks

use tracing::Subscriber;
use tracing_subscriber::{fmt::MakeWriter, layer::Layer, registry::LookupSpan};

/// Create a JSONL formatting layer
///
/// Event fields are flattened to the top level. The current span and the
/// full span list are included, so fields recorded on [`crate::session_span`]
/// (`user`, `role`, `instance_id`) appear on every line beneath it.
pub fn jsonl_layer<S, W>(writer: W) -> Box<dyn Layer<S> + Send + Sync + 'static>
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup> + 'static,
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .flatten_event(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(writer)
        .boxed()
}
