use std::fmt;
use std::future::Future;
use std::sync::Arc;

use fleet_core::FleetError;
use futures::future::{BoxFuture, FutureExt};

/// Re-runs the operation that failed, typically a cumulative refresh.
#[derive(Clone)]
pub struct RetryHandle {
    run: Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>,
}

impl RetryHandle {
    pub fn new<F, Fut>(run: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            run: Arc::new(move || run().boxed()),
        }
    }

    pub fn retry(&self) -> BoxFuture<'static, ()> {
        (self.run)()
    }
}

impl fmt::Debug for RetryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryHandle").finish_non_exhaustive()
    }
}

/// User-facing surface for errors the sync layer does not recover from.
pub trait ErrorReporter: Send + Sync {
    fn handle_unexpected_error(
        &self,
        error: &FleetError,
        message_key: &str,
        retry: Option<RetryHandle>,
    );
}

/// Reporter that only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn handle_unexpected_error(
        &self,
        error: &FleetError,
        message_key: &str,
        retry: Option<RetryHandle>,
    ) {
        tracing::warn!(
            message_key,
            retryable = retry.is_some(),
            "Unexpected error: {}",
            error
        );
    }
}
