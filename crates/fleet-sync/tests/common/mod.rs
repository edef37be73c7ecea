#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use fleet_core::{FleetError, FleetResult};
use fleet_domain::Vehicle;
use fleet_sync::{
    EntityPage, ErrorReporter, InMemoryProvider, ListController, ListProvider, Paging,
    ProviderSlot, RemoteListFetcher, RetryHandle,
};
use parking_lot::Mutex;
use tokio::sync::Notify;

pub const MESSAGE_KEY: &str = "cars.carUnexpectedError";

/// `n` vehicles, alternating Renault and Tesla.
pub fn vehicles(n: usize) -> Vec<Vehicle> {
    (0..n)
        .map(|i| {
            let (make, model) = if i % 2 == 0 {
                ("Renault", "Zoe")
            } else {
                ("Tesla", "Model 3")
            };
            Vehicle::new(format!("v{i}"), make, model, format!("AA-{i:03}-AA"))
        })
        .collect()
}

pub fn ids(items: &[Vehicle]) -> Vec<&str> {
    items.iter().map(|v| v.id.as_str()).collect()
}

/// In-memory provider that can hold requests at a gate and fail on demand.
pub struct ScriptedProvider {
    inner: InMemoryProvider<Vehicle>,
    gated: AtomicBool,
    pub entered: Notify,
    pub release: Notify,
    fail_status: Mutex<Option<u16>>,
    short_page: Mutex<Option<(usize, usize)>>,
}

impl ScriptedProvider {
    pub fn new(inner: InMemoryProvider<Vehicle>) -> Arc<Self> {
        Arc::new(Self {
            inner,
            gated: AtomicBool::new(false),
            entered: Notify::new(),
            release: Notify::new(),
            fail_status: Mutex::new(None),
            short_page: Mutex::new(None),
        })
    }

    pub fn set_gated(&self, gated: bool) {
        self.gated.store(gated, Ordering::SeqCst);
    }

    pub fn fail_with(&self, status: Option<u16>) {
        *self.fail_status.lock() = status;
    }

    /// Answer the page starting at `skip` with at most `len` items, like a
    /// server whose data shrank between requests.
    pub fn short_page_at(&self, skip: usize, len: usize) {
        *self.short_page.lock() = Some((skip, len));
    }

    pub fn requests(&self) -> Vec<(String, Paging)> {
        self.inner.requests()
    }

    pub fn request_count(&self) -> usize {
        self.inner.request_count()
    }
}

#[async_trait]
impl ListProvider<Vehicle> for ScriptedProvider {
    async fn fetch_entities(&self, filter: &str, paging: Paging) -> FleetResult<EntityPage<Vehicle>> {
        if self.gated.load(Ordering::SeqCst) {
            self.entered.notify_one();
            self.release.notified().await;
        }
        let failure = *self.fail_status.lock();
        if let Some(status) = failure {
            return Err(FleetError::http(status, "scripted failure"));
        }
        let mut page = self.inner.fetch_entities(filter, paging).await?;
        let short_page = *self.short_page.lock();
        if let Some((skip, len)) = short_page {
            if paging.skip == skip {
                page.result.truncate(len);
            }
        }
        Ok(page)
    }
}

#[derive(Default)]
pub struct RecordingReporter {
    pub reports: Mutex<Vec<(String, String, Option<RetryHandle>)>>,
}

impl RecordingReporter {
    pub fn count(&self) -> usize {
        self.reports.lock().len()
    }

    pub fn last_retry(&self) -> Option<RetryHandle> {
        self.reports.lock().last().and_then(|(_, _, retry)| retry.clone())
    }
}

impl ErrorReporter for RecordingReporter {
    fn handle_unexpected_error(
        &self,
        error: &FleetError,
        message_key: &str,
        retry: Option<RetryHandle>,
    ) {
        self.reports
            .lock()
            .push((message_key.to_string(), error.to_string(), retry));
    }
}

pub fn fetcher_for(
    provider: Arc<dyn ListProvider<Vehicle>>,
    reporter: Arc<RecordingReporter>,
) -> RemoteListFetcher<Vehicle> {
    RemoteListFetcher::new(Arc::new(ProviderSlot::ready(provider)), reporter, MESSAGE_KEY)
}

pub struct Harness {
    pub provider: Arc<ScriptedProvider>,
    pub reporter: Arc<RecordingReporter>,
    pub controller: ListController<Vehicle>,
}

pub fn harness(items: InMemoryProvider<Vehicle>, page_size: usize) -> Harness {
    let provider = ScriptedProvider::new(items);
    let reporter = Arc::new(RecordingReporter::default());
    let controller = ListController::new(fetcher_for(provider.clone(), reporter.clone()), page_size);
    Harness {
        provider,
        reporter,
        controller,
    }
}
