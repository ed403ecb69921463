//! Timeout Stage - Time-limited dispatch.
//!
//! **Note**: This module requires the `tokio` runtime.

use medius_core::{BoxError, Envelope, MediatorError, Next, PipelineStage, Reply};
use std::time::Duration;

/// A stage that bounds the remainder of the chain with a deadline.
///
/// Stages registered after this one and the handler are covered. When the
/// deadline passes the in-flight work is dropped and the dispatch fails with
/// [`MediatorError::Timeout`].
///
/// # Example
///
/// ```rust,ignore
/// use medius::stages::TimeoutStage;
///
/// mediator.register_pipeline(TimeoutStage::secs(5));
/// ```
pub struct TimeoutStage {
    duration: Duration,
}

impl TimeoutStage {
    /// Create a new `TimeoutStage`.
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    /// Create a `TimeoutStage` with the timeout specified in seconds.
    pub fn secs(seconds: u64) -> Self {
        Self::new(Duration::from_secs(seconds))
    }

    /// Create a `TimeoutStage` with the timeout specified in milliseconds.
    pub fn millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    /// Get the configured timeout duration.
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl PipelineStage for TimeoutStage {
    async fn process(&self, request: Envelope, next: Next<'_>) -> Result<Reply, BoxError> {
        let name = request.name();
        match tokio::time::timeout(self.duration, next.run(request)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(request = %name, after = ?self.duration, "request timed out");
                Err(Box::new(MediatorError::Timeout {
                    request: name.to_string(),
                    after: self.duration,
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::PipelineChain;
    use medius_core::{HandlerAdapter, Request, RequestHandler};

    #[derive(Debug)]
    struct Sleep(u64);

    impl Request for Sleep {
        type Response = ();
        const NAME: &'static str = "Sleep";
    }

    struct Sleeper;

    impl RequestHandler<Sleep> for Sleeper {
        async fn handle(&self, request: Sleep) -> Result<(), BoxError> {
            tokio::time::sleep(Duration::from_millis(request.0)).await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_fast_request_completes() {
        let mut chain = PipelineChain::new();
        chain.append(TimeoutStage::millis(500));
        let handler = HandlerAdapter::<Sleep, _>::new(Sleeper);

        assert!(chain.build(&handler).run(Envelope::new(Sleep(1))).await.is_ok());
    }

    #[tokio::test]
    async fn test_slow_request_times_out() {
        let mut chain = PipelineChain::new();
        chain.append(TimeoutStage::millis(10));
        let handler = HandlerAdapter::<Sleep, _>::new(Sleeper);

        let err = chain
            .build(&handler)
            .run(Envelope::new(Sleep(1_000)))
            .await
            .unwrap_err();
        let err = MediatorError::from_pipeline(err);
        assert!(matches!(
            err,
            MediatorError::Timeout { ref request, after } if request == "Sleep" && after == Duration::from_millis(10)
        ));
    }
}
