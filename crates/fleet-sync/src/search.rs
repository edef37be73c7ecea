use crate::controller::ListController;

/// Turns text typed by the user into list reloads. The filter itself lives
/// in the controller.
pub struct SearchController<T: Send + 'static> {
    controller: ListController<T>,
}

impl<T> SearchController<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(controller: ListController<T>) -> Self {
        Self { controller }
    }

    pub fn current_filter(&self) -> String {
        self.controller.filter_text()
    }

    /// Returns whether the list was reloaded. Surrounding whitespace is not
    /// part of the filter.
    pub async fn search(&self, text: &str) -> bool {
        let text = text.trim();
        if self.controller.filter_text() == text {
            return false;
        }
        tracing::debug!(filter = %text, "Search filter changed");
        self.controller.set_filter(text).await
    }
}
