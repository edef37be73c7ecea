use fleet_core::Viewport;
use parking_lot::Mutex;

use crate::controller::ListController;
use crate::page::TotalCount;

/// Whether the end-of-list signal should fetch another page.
pub fn should_load_next_page(
    skip: usize,
    limit: usize,
    total_count: TotalCount,
    is_loading_initial: bool,
    is_refreshing: bool,
) -> bool {
    !is_loading_initial && !is_refreshing && total_count.has_more_after(skip + limit)
}

/// Turns "near the end of the visible list" signals into page loads.
pub struct ScrollLoader<T: Send + 'static> {
    controller: ListController<T>,
    viewport: Mutex<Viewport>,
    threshold: usize,
}

impl<T> ScrollLoader<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(controller: ListController<T>, threshold: usize) -> Self {
        Self {
            controller,
            viewport: Mutex::new(Viewport::default()),
            threshold,
        }
    }

    /// The rendering layer reached the end of the list. Returns whether a
    /// page was requested.
    pub async fn on_end_reached(&self) -> bool {
        if !self.controller.can_load_next_page() {
            tracing::trace!(loaded = self.controller.len(), "End reached, nothing to load");
            return false;
        }
        self.controller.load_next_page().await
    }

    /// The visible region moved. Loads the next page when it comes within
    /// the threshold of the last loaded item.
    pub async fn on_viewport_changed(&self, first_visible: usize, height: usize) -> bool {
        let near_end = {
            let mut viewport = self.viewport.lock();
            viewport.set_loaded_items(self.controller.len());
            viewport.scroll_to(first_visible, height);
            viewport.is_near_end(self.threshold)
        };
        if !near_end {
            return false;
        }
        self.on_end_reached().await
    }
}
