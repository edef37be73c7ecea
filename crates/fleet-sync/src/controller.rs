//! Drives a [`CollectionState`] against a remote source.
//!
//! At most one network-affecting operation runs per controller. While one is
//! in flight, a page load is dropped, a refresh is queued to run once the
//! current operation finishes, and a full reload supersedes it: the pending
//! request is cancelled and its late response is discarded.

use std::sync::{Arc, Weak};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::fetcher::{FetchOutcome, RemoteListFetcher};
use crate::page::PageRequest;
use crate::report::RetryHandle;
use crate::scheduler::RefreshTarget;
use crate::session::SyncSession;
use crate::state::{CollectionState, ListSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    LoadInitial,
    Refresh,
    NextPage,
}

struct InFlight {
    generation: u64,
    operation: Operation,
    token: CancellationToken,
}

struct Shared<T> {
    collection: CollectionState<T>,
    in_flight: Option<InFlight>,
    generation: u64,
    refresh_queued: bool,
}

struct Inner<T: Send + 'static> {
    shared: Mutex<Shared<T>>,
    fetcher: RemoteListFetcher<T>,
    session: SyncSession,
}

/// Permission to run one request. Releases the in-flight slot on drop, so an
/// operation whose future is dropped mid-fetch never wedges the controller.
struct Ticket<'a, T: Send + 'static> {
    inner: &'a Inner<T>,
    generation: u64,
    operation: Operation,
    token: CancellationToken,
    request: PageRequest,
}

impl<T: Send + 'static> Drop for Ticket<'_, T> {
    fn drop(&mut self) {
        let mut shared = self.inner.shared.lock();
        let state = &mut *shared;
        if matches!(&state.in_flight, Some(f) if f.generation == self.generation) {
            tracing::debug!(
                session = %self.inner.session.id(),
                generation = self.generation,
                operation = ?self.operation,
                "Request abandoned"
            );
            state.in_flight = None;
            if self.operation == Operation::Refresh {
                state.collection.abandon_refresh();
            }
        }
    }
}

impl<T: Send + 'static> Inner<T> {
    fn begin<F>(&self, operation: Operation, prepare: F) -> Option<Ticket<'_, T>>
    where
        F: FnOnce(&mut CollectionState<T>) -> Option<PageRequest>,
    {
        let mut shared = self.shared.lock();
        let state = &mut *shared;

        if self.session.is_cancelled() {
            tracing::debug!(session = %self.session.id(), ?operation, "Session torn down, ignoring");
            return None;
        }

        if let Some(current) = &state.in_flight {
            match operation {
                Operation::NextPage => {
                    tracing::trace!(busy = ?current.operation, "Page load coalesced");
                    return None;
                }
                Operation::Refresh => {
                    tracing::debug!(busy = ?current.operation, "Refresh queued");
                    state.refresh_queued = true;
                    return None;
                }
                Operation::LoadInitial => {
                    tracing::debug!(
                        superseded = ?current.operation,
                        generation = current.generation,
                        "Cancelling request superseded by reload"
                    );
                    current.token.cancel();
                    state.in_flight = None;
                }
            }
        }

        let request = prepare(&mut state.collection)?;
        state.generation += 1;
        let token = self.session.request_token();
        state.in_flight = Some(InFlight {
            generation: state.generation,
            operation,
            token: token.clone(),
        });

        Some(Ticket {
            inner: self,
            generation: state.generation,
            operation,
            token,
            request,
        })
    }

    /// Applies a response if its request is still the current one.
    fn complete<F>(&self, ticket: &Ticket<'_, T>, apply: F) -> bool
    where
        F: FnOnce(&mut CollectionState<T>),
    {
        let mut shared = self.shared.lock();
        let state = &mut *shared;
        let current = matches!(&state.in_flight, Some(f) if f.generation == ticket.generation);
        if !current || ticket.token.is_cancelled() {
            tracing::debug!(
                session = %self.session.id(),
                generation = ticket.generation,
                operation = ?ticket.operation,
                "Discarding stale response"
            );
            return false;
        }
        state.in_flight = None;
        apply(&mut state.collection);
        true
    }
}

/// Owns the list of one screen mount. Cheap to clone; clones share state.
pub struct ListController<T: Send + 'static> {
    inner: Arc<Inner<T>>,
}

impl<T: Send + 'static> Clone for ListController<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Send + 'static> ListController<T> {
    pub fn session(&self) -> &SyncSession {
        &self.inner.session
    }

    /// Abandons every outstanding request. Nothing is applied afterwards.
    pub fn teardown(&self) {
        self.inner.session.cancel();
    }

    pub fn is_torn_down(&self) -> bool {
        self.inner.session.is_cancelled()
    }
}

impl<T> ListController<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(fetcher: RemoteListFetcher<T>, page_size: usize) -> Self {
        Self::with_session(fetcher, page_size, SyncSession::new())
    }

    pub fn with_session(fetcher: RemoteListFetcher<T>, page_size: usize, session: SyncSession) -> Self {
        Self {
            inner: Arc::new(Inner {
                shared: Mutex::new(Shared {
                    collection: CollectionState::new(page_size),
                    in_flight: None,
                    generation: 0,
                    refresh_queued: false,
                }),
                fetcher,
                session,
            }),
        }
    }

    /// Full reload of the first page for `filter_text`.
    pub async fn load_initial(&self, filter_text: impl Into<String>) {
        self.run_initial(filter_text.into()).await;
        self.drain_queued_refresh().await;
    }

    /// Reloads from offset zero if `filter_text` differs from the current
    /// filter. Returns whether a reload happened.
    pub async fn set_filter(&self, filter_text: impl Into<String>) -> bool {
        let filter_text = filter_text.into();
        if self.inner.shared.lock().collection.filter_text() == filter_text {
            tracing::trace!(filter = %filter_text, "Filter unchanged");
            return false;
        }
        self.load_initial(filter_text).await;
        true
    }

    /// Refetches everything loaded so far in a single request.
    pub async fn refresh_all(&self) {
        self.run_refresh().await;
        self.drain_queued_refresh().await;
    }

    /// Pull-to-refresh from the user.
    pub async fn manual_refresh(&self) {
        tracing::debug!(session = %self.inner.session.id(), "Manual refresh");
        self.refresh_all().await;
    }

    /// Appends the next page when more data may exist. Returns whether a
    /// request was issued.
    pub async fn load_next_page(&self) -> bool {
        let inner = &*self.inner;
        let Some(ticket) = inner.begin(Operation::NextPage, |state| state.next_page_request())
        else {
            return false;
        };
        let offset = ticket.request.skip;
        tracing::debug!(
            session = %inner.session.id(),
            generation = ticket.generation,
            skip = offset,
            limit = ticket.request.limit,
            "Loading next page"
        );

        let outcome = inner
            .fetcher
            .fetch_page(&ticket.request, &ticket.token, Some(self.retry_handle()))
            .await;
        match outcome {
            FetchOutcome::Fetched(result) => {
                inner.complete(&ticket, |state| state.apply_next_page(offset, result));
            }
            FetchOutcome::Failed => {
                inner.complete(&ticket, |_| {});
            }
            FetchOutcome::Cancelled => {}
        }
        drop(ticket);

        self.drain_queued_refresh().await;
        true
    }

    pub fn snapshot(&self) -> ListSnapshot<T> {
        self.inner.shared.lock().collection.snapshot()
    }

    pub fn len(&self) -> usize {
        self.inner.shared.lock().collection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn filter_text(&self) -> String {
        self.inner.shared.lock().collection.filter_text().to_string()
    }

    /// Whether the end-of-list signal should fetch another page right now.
    pub fn can_load_next_page(&self) -> bool {
        self.inner.shared.lock().collection.can_load_next_page()
    }

    pub fn is_busy(&self) -> bool {
        self.inner.shared.lock().in_flight.is_some()
    }

    async fn run_initial(&self, filter_text: String) {
        let inner = &*self.inner;
        let Some(ticket) = inner.begin(Operation::LoadInitial, |state| {
            Some(state.begin_initial(filter_text))
        }) else {
            return;
        };
        tracing::debug!(
            session = %inner.session.id(),
            generation = ticket.generation,
            filter = %ticket.request.filter_text,
            "Loading first page"
        );

        let outcome = inner
            .fetcher
            .fetch_page(&ticket.request, &ticket.token, Some(self.retry_handle()))
            .await;
        match outcome {
            FetchOutcome::Fetched(result) => {
                inner.complete(&ticket, |state| state.apply_initial(result));
            }
            FetchOutcome::Failed => {
                inner.complete(&ticket, CollectionState::fail_initial);
            }
            FetchOutcome::Cancelled => {}
        }
    }

    async fn run_refresh(&self) {
        let inner = &*self.inner;
        let Some(ticket) = inner.begin(Operation::Refresh, |state| Some(state.begin_refresh()))
        else {
            return;
        };
        tracing::debug!(
            session = %inner.session.id(),
            generation = ticket.generation,
            limit = ticket.request.limit,
            "Refreshing loaded window"
        );

        let outcome = inner
            .fetcher
            .fetch_page(&ticket.request, &ticket.token, Some(self.retry_handle()))
            .await;
        match outcome {
            FetchOutcome::Fetched(result) => {
                inner.complete(&ticket, |state| state.apply_refresh(result));
            }
            FetchOutcome::Failed => {
                inner.complete(&ticket, CollectionState::fail_refresh);
            }
            FetchOutcome::Cancelled => {}
        }
    }

    async fn drain_queued_refresh(&self) {
        loop {
            let queued = {
                let mut shared = self.inner.shared.lock();
                if shared.in_flight.is_none() && !self.inner.session.is_cancelled() {
                    std::mem::take(&mut shared.refresh_queued)
                } else {
                    false
                }
            };
            if !queued {
                return;
            }
            tracing::debug!(session = %self.inner.session.id(), "Running queued refresh");
            self.run_refresh().await;
        }
    }

    fn retry_handle(&self) -> RetryHandle {
        let weak: Weak<Inner<T>> = Arc::downgrade(&self.inner);
        RetryHandle::new(move || {
            let weak = weak.clone();
            async move {
                if let Some(inner) = weak.upgrade() {
                    ListController { inner }.refresh_all().await;
                }
            }
        })
    }
}

#[async_trait]
impl<T> RefreshTarget for ListController<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn refresh(&self) {
        self.refresh_all().await;
    }
}
