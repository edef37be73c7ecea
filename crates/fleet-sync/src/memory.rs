//! Fixture-backed providers for demos and tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use fleet_core::{FleetError, FleetResult};
use fleet_domain::{Searchable, UserId};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::page::UNKNOWN_COUNT;
use crate::provider::{EntityPage, ImageProvider, ListProvider, Paging};

/// Serves pages out of a fixed list, filtering with [`Searchable`].
pub struct InMemoryProvider<T> {
    items: Vec<T>,
    unknown_count_once: AtomicBool,
    fail_status: Option<u16>,
    requests: Mutex<Vec<(String, Paging)>>,
}

impl<T> InMemoryProvider<T>
where
    T: Searchable + Clone + Send + Sync + 'static,
{
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            unknown_count_once: AtomicBool::new(false),
            fail_status: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answer the first request with the unknown-count sentinel, like a
    /// server that skips counting on the first pass.
    pub fn with_unknown_count_once(self) -> Self {
        self.unknown_count_once.store(true, Ordering::SeqCst);
        self
    }

    /// Fail every request with an HTTP `status`.
    pub fn with_failure(mut self, status: u16) -> Self {
        self.fail_status = Some(status);
        self
    }

    /// Every `(filter, paging)` received, in order.
    pub fn requests(&self) -> Vec<(String, Paging)> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl<T> ListProvider<T> for InMemoryProvider<T>
where
    T: Searchable + Clone + Send + Sync + 'static,
{
    async fn fetch_entities(&self, filter: &str, paging: Paging) -> FleetResult<EntityPage<T>> {
        self.requests.lock().push((filter.to_string(), paging));
        if let Some(status) = self.fail_status {
            return Err(FleetError::http(status, "fixture failure"));
        }

        let matching: Vec<&T> = self.items.iter().filter(|item| item.matches(filter)).collect();
        let result = matching
            .iter()
            .skip(paging.skip)
            .take(paging.limit)
            .map(|item| (*item).clone())
            .collect();
        let count = if self.unknown_count_once.swap(false, Ordering::SeqCst) {
            UNKNOWN_COUNT
        } else {
            i64::try_from(matching.len()).unwrap_or(i64::MAX)
        };

        Ok(EntityPage { result, count })
    }
}

/// Serves user pictures out of a map.
#[derive(Debug, Default)]
pub struct InMemoryImageProvider {
    images: HashMap<UserId, String>,
    fail_status: Option<u16>,
}

impl InMemoryImageProvider {
    pub fn new(images: HashMap<UserId, String>) -> Self {
        Self {
            images,
            fail_status: None,
        }
    }

    pub fn with_failure(mut self, status: u16) -> Self {
        self.fail_status = Some(status);
        self
    }
}

#[async_trait]
impl ImageProvider for InMemoryImageProvider {
    async fn fetch_user_image(
        &self,
        id: &str,
        token: &CancellationToken,
    ) -> FleetResult<Option<String>> {
        if token.is_cancelled() {
            return Err(FleetError::Cancelled);
        }
        if let Some(status) = self.fail_status {
            return Err(FleetError::http(status, "fixture failure"));
        }
        Ok(self.images.get(id).cloned())
    }
}
