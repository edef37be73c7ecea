use std::sync::Arc;

use fleet_core::{ErrorDisposition, FleetError, FleetResult};
use tokio_util::sync::CancellationToken;

use crate::page::{PageRequest, PageResult, TotalCount};
use crate::provider::{EntityPage, ListProvider, ProviderSlot};
use crate::report::{ErrorReporter, RetryHandle};

/// Result of one page fetch. Never an error: failures have already been
/// classified and reported by the time the caller sees them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome<T> {
    Fetched(PageResult<T>),
    /// The request was abandoned; the caller must not apply anything.
    Cancelled,
    /// The request failed and was reported; there is no result.
    Failed,
}

impl<T> FetchOutcome<T> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Fetches pages of `T` from a [`ListProvider`], resolving unknown totals
/// and classifying errors.
pub struct RemoteListFetcher<T: Send + 'static> {
    provider: Arc<ProviderSlot<dyn ListProvider<T>>>,
    reporter: Arc<dyn ErrorReporter>,
    message_key: String,
}

impl<T: Send + Sync + 'static> RemoteListFetcher<T> {
    pub fn new(
        provider: Arc<ProviderSlot<dyn ListProvider<T>>>,
        reporter: Arc<dyn ErrorReporter>,
        message_key: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            reporter,
            message_key: message_key.into(),
        }
    }

    pub fn message_key(&self) -> &str {
        &self.message_key
    }

    /// Fetch one page. When the server answers with an unknown total, the
    /// same request is issued once more to obtain a concrete count.
    ///
    /// `retry` is handed to the reporter for retryable failures.
    pub async fn fetch_page(
        &self,
        request: &PageRequest,
        token: &CancellationToken,
        retry: Option<RetryHandle>,
    ) -> FetchOutcome<T> {
        let provider = match self.provider.get() {
            Ok(provider) => provider,
            Err(e) => return self.fail(e, retry),
        };

        let page = match Self::request(provider.as_ref(), request, token).await {
            Ok(page) => page,
            Err(e) => return self.fail(e, retry),
        };

        let mut total_count = TotalCount::from_wire(page.count);
        if total_count.is_unknown() {
            tracing::debug!(
                filter = %request.filter_text,
                skip = request.skip,
                limit = request.limit,
                "Total count unknown, requesting count"
            );
            match Self::request(provider.as_ref(), request, token).await {
                Ok(count_page) => total_count = TotalCount::from_wire(count_page.count),
                Err(e) => return self.fail(e, retry),
            }
            if total_count.is_unknown() {
                tracing::warn!(
                    filter = %request.filter_text,
                    "Server could not report a total count, keeping it unknown"
                );
            }
        }

        FetchOutcome::Fetched(PageResult {
            items: page.result,
            total_count,
        })
    }

    async fn request(
        provider: &dyn ListProvider<T>,
        request: &PageRequest,
        token: &CancellationToken,
    ) -> FleetResult<EntityPage<T>> {
        if token.is_cancelled() {
            return Err(FleetError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = token.cancelled() => Err(FleetError::Cancelled),
            result = provider.fetch_entities(&request.filter_text, request.paging()) => result,
        }
    }

    fn fail(&self, error: FleetError, retry: Option<RetryHandle>) -> FetchOutcome<T> {
        if error.is_cancelled() {
            tracing::debug!(message_key = %self.message_key, "Fetch cancelled");
            return FetchOutcome::Cancelled;
        }
        match error.disposition() {
            ErrorDisposition::EmptyResult => {
                tracing::debug!(
                    message_key = %self.message_key,
                    "No data under current permissions: {}",
                    error
                );
                FetchOutcome::Fetched(PageResult::empty())
            }
            ErrorDisposition::Retry => {
                self.reporter
                    .handle_unexpected_error(&error, &self.message_key, retry);
                FetchOutcome::Failed
            }
            ErrorDisposition::Report => {
                self.reporter
                    .handle_unexpected_error(&error, &self.message_key, None);
                FetchOutcome::Failed
            }
        }
    }
}
