use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use fleet_core::AppConfig;

use crate::controller::ListController;
use crate::fetcher::RemoteListFetcher;
use crate::scheduler::{AutoRefresh, SchedulerState};
use crate::scroll::ScrollLoader;
use crate::search::SearchController;
use crate::state::ListSnapshot;

/// One mount of a searchable, auto-refreshing list screen.
///
/// Translates lifecycle and UI signals into controller operations. Dropping
/// the screen or calling [`ListScreen::unmount`] abandons everything in
/// flight.
pub struct ListScreen<T: Send + 'static> {
    controller: ListController<T>,
    search: SearchController<T>,
    scroll: ScrollLoader<T>,
    auto_refresh: AutoRefresh,
    mounted: AtomicBool,
}

impl<T> ListScreen<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(fetcher: RemoteListFetcher<T>, config: &AppConfig) -> Self {
        let controller = ListController::new(fetcher, config.page_size);
        let auto_refresh = AutoRefresh::new(config.auto_refresh_period(), controller.session());
        Self {
            search: SearchController::new(controller.clone()),
            scroll: ScrollLoader::new(controller.clone(), config.end_reached_threshold),
            controller,
            auto_refresh,
            mounted: AtomicBool::new(false),
        }
    }

    pub fn controller(&self) -> &ListController<T> {
        &self.controller
    }

    /// Loads the first page and arms auto-refresh. Only the first call does
    /// anything.
    pub async fn mount(&self) {
        if self.mounted.swap(true, Ordering::SeqCst) {
            return;
        }
        tracing::debug!(session = %self.controller.session().id(), "Mounting list screen");
        self.auto_refresh.set_visible(true);
        self.auto_refresh.start(Arc::new(self.controller.clone()));
        self.controller
            .load_initial(self.search.current_filter())
            .await;
    }

    pub fn on_focus(&self) {
        self.auto_refresh.set_visible(true);
    }

    pub fn on_blur(&self) {
        self.auto_refresh.set_visible(false);
    }

    pub async fn search(&self, text: &str) -> bool {
        self.search.search(text).await
    }

    pub async fn on_end_reached(&self) -> bool {
        self.scroll.on_end_reached().await
    }

    pub async fn on_viewport_changed(&self, first_visible: usize, height: usize) -> bool {
        self.scroll.on_viewport_changed(first_visible, height).await
    }

    pub async fn manual_refresh(&self) {
        self.controller.manual_refresh().await;
    }

    pub fn snapshot(&self) -> ListSnapshot<T> {
        self.controller.snapshot()
    }

    pub fn scheduler_state(&self) -> SchedulerState {
        self.auto_refresh.state()
    }

    pub fn unmount(&self) {
        tracing::debug!(session = %self.controller.session().id(), "Unmounting list screen");
        self.auto_refresh.stop();
        self.controller.teardown();
    }
}

impl<T: Send + 'static> Drop for ListScreen<T> {
    fn drop(&mut self) {
        self.auto_refresh.stop();
        self.controller.teardown();
    }
}
