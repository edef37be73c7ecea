use std::sync::Arc;

use async_trait::async_trait;
use fleet_core::{FleetError, FleetResult};
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tokio_util::sync::CancellationToken;

/// Page boundary sent to the remote source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    pub skip: usize,
    pub limit: usize,
}

/// Raw answer of the remote list endpoint.
///
/// `count` is `-1` when the server did not compute the total on this pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityPage<T> {
    pub result: Vec<T>,
    pub count: i64,
}

/// Remote source of paginated, filterable entity lists.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListProvider<T: Send + Sync + 'static>: Send + Sync {
    async fn fetch_entities(&self, filter: &str, paging: Paging) -> FleetResult<EntityPage<T>>;
}

/// Remote source of user pictures.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// `Ok(None)` means the user has no picture. Implementations must return
    /// [`FleetError::Cancelled`] once `token` fires.
    async fn fetch_user_image(
        &self,
        id: &str,
        token: &CancellationToken,
    ) -> FleetResult<Option<String>>;
}

/// A provider dependency that may not be resolved yet.
///
/// Screens get the slot at construction time. Until someone calls
/// [`ProviderSlot::resolve`], every lookup reports
/// [`FleetError::ProviderNotReady`] instead of panicking.
pub struct ProviderSlot<P: ?Sized> {
    cell: OnceCell<Arc<P>>,
}

impl<P: ?Sized + Send + Sync> ProviderSlot<P> {
    pub fn pending() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    pub fn ready(provider: Arc<P>) -> Self {
        Self {
            cell: OnceCell::new_with(Some(provider)),
        }
    }

    /// Resolve the slot. A slot resolves at most once.
    pub fn resolve(&self, provider: Arc<P>) -> FleetResult<()> {
        self.cell
            .set(provider)
            .map_err(|_| FleetError::Internal("provider already resolved".into()))
    }

    pub fn get(&self) -> FleetResult<Arc<P>> {
        self.cell.get().cloned().ok_or(FleetError::ProviderNotReady)
    }

    pub fn is_ready(&self) -> bool {
        self.cell.initialized()
    }
}

impl<P: ?Sized + Send + Sync> Default for ProviderSlot<P> {
    fn default() -> Self {
        Self::pending()
    }
}
