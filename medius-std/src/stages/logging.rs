//! Logging Stage - Observability for dispatched requests.

use medius_core::{BoxError, Envelope, Next, PipelineStage, Reply};
use tracing::Instrument;

/// A stage that logs every request before it is handled and every response
/// after, inside a `dispatch` span named after the request.
///
/// # Example
///
/// ```rust,ignore
/// use medius::{Mediator, stages::LoggingStage};
///
/// let mediator = Mediator::new();
/// mediator.register_pipeline(LoggingStage::named("users"));
/// ```
pub struct LoggingStage {
    name: &'static str,
}

impl LoggingStage {
    /// Create a new `LoggingStage` with a default name.
    pub fn new() -> Self {
        Self { name: "mediator" }
    }

    /// Create a new `LoggingStage` with a custom name.
    ///
    /// The name is recorded on the span to identify the pipeline.
    pub fn named(name: &'static str) -> Self {
        Self { name }
    }
}

impl Default for LoggingStage {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStage for LoggingStage {
    async fn process(&self, request: Envelope, next: Next<'_>) -> Result<Reply, BoxError> {
        let span = tracing::info_span!("dispatch", pipeline = %self.name, request = %request.name());

        async move {
            tracing::debug!(?request, "before handling request");
            match next.run(request).await {
                Ok(reply) => {
                    tracing::debug!(response = ?reply, "after handling request");
                    Ok(reply)
                }
                Err(err) => {
                    tracing::warn!(error = %err, "request failed");
                    Err(err)
                }
            }
        }
        .instrument(span)
        .await
    }
}
