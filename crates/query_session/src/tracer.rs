use std::fmt::Debug;

/// Handle to a per-query tracer owned by the request layer.
pub trait QueryTracer: Debug + Sync + Send {
    /// Id correlating trace points of a query.
    fn tracer_id(&self) -> &str;

    /// Record a point in the trace.
    fn add_point(&self, annotation: &str);

    /// Finish the trace.
    fn end_trace(&self, annotation: &str);
}

/// Tracer that records nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracer;

impl QueryTracer for NoopTracer {
    fn tracer_id(&self) -> &str {
        ""
    }

    fn add_point(&self, _annotation: &str) {}

    fn end_trace(&self, _annotation: &str) {}
}
