//! In-memory state of a paginated, filterable list.
//!
//! Holds no I/O. [`crate::ListController`] decides when a fetch starts and
//! whether its result is still wanted; this module only knows how to build
//! the next request and how to fold a result into the list.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::page::{PageRequest, PageResult, TotalCount};

#[derive(Debug, Clone)]
pub struct CollectionState<T> {
    items: Vec<T>,
    skip: usize,
    limit: usize,
    total_count: TotalCount,
    is_loading_initial: bool,
    is_refreshing: bool,
    filter_text: String,
    last_synced_at: Option<DateTime<Utc>>,
}

impl<T> CollectionState<T> {
    pub fn new(page_size: usize) -> Self {
        debug_assert!(page_size > 0, "page size must be positive");
        Self {
            items: Vec::new(),
            skip: 0,
            limit: page_size,
            total_count: TotalCount::Known(0),
            is_loading_initial: true,
            is_refreshing: false,
            filter_text: String::new(),
            last_synced_at: None,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn skip(&self) -> usize {
        self.skip
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn total_count(&self) -> TotalCount {
        self.total_count
    }

    pub fn is_loading_initial(&self) -> bool {
        self.is_loading_initial
    }

    pub fn is_refreshing(&self) -> bool {
        self.is_refreshing
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    pub fn last_synced_at(&self) -> Option<DateTime<Utc>> {
        self.last_synced_at
    }

    /// A short page leaves the loaded items ending before `skip + limit`, so
    /// the items actually held are checked as well.
    pub fn has_more(&self) -> bool {
        self.total_count.has_more_after(self.skip + self.limit)
            || self.total_count.has_more_after(self.items.len())
    }

    /// Start a full reload: drops everything loaded for the previous filter.
    pub fn begin_initial(&mut self, filter_text: String) -> PageRequest {
        self.filter_text = filter_text;
        self.items.clear();
        self.skip = 0;
        self.total_count = TotalCount::Known(0);
        self.is_loading_initial = true;
        self.is_refreshing = false;
        PageRequest::new(self.filter_text.clone(), 0, self.limit)
    }

    pub fn apply_initial(&mut self, result: PageResult<T>) {
        self.items = result.items;
        self.total_count = result.total_count;
        self.is_loading_initial = false;
        self.clamp_total();
        self.touch();
    }

    pub fn fail_initial(&mut self) {
        self.items.clear();
        self.total_count = TotalCount::Known(0);
        self.is_loading_initial = false;
    }

    /// Start a cumulative refresh of everything loaded so far, `[0, skip + limit)`.
    pub fn begin_refresh(&mut self) -> PageRequest {
        self.is_refreshing = true;
        PageRequest::new(self.filter_text.clone(), 0, self.skip + self.limit)
    }

    pub fn apply_refresh(&mut self, result: PageResult<T>) {
        self.items = result.items;
        self.total_count = result.total_count;
        self.is_refreshing = false;
        self.is_loading_initial = false;
        self.clamp_total();
        self.touch();
    }

    /// A failed refresh keeps the stale items on screen.
    pub fn fail_refresh(&mut self) {
        self.is_refreshing = false;
        self.is_loading_initial = false;
    }

    /// An abandoned refresh leaves the data as it was.
    pub fn abandon_refresh(&mut self) {
        self.is_refreshing = false;
    }

    /// Request for the page after the loaded items, or `None` when the
    /// policy says there is nothing to load.
    ///
    /// The offset is the number of items actually received, so a short page
    /// never opens a gap.
    pub fn next_page_request(&self) -> Option<PageRequest> {
        if !self.can_load_next_page() {
            return None;
        }
        Some(PageRequest::new(
            self.filter_text.clone(),
            self.items.len(),
            self.limit,
        ))
    }

    pub fn can_load_next_page(&self) -> bool {
        let idle = !self.is_loading_initial && !self.is_refreshing;
        crate::scroll::should_load_next_page(
            self.skip,
            self.limit,
            self.total_count,
            self.is_loading_initial,
            self.is_refreshing,
        ) || (idle && self.total_count.has_more_after(self.items.len()))
    }

    pub fn apply_next_page(&mut self, offset: usize, result: PageResult<T>) {
        self.skip = offset;
        if result.items.is_empty() {
            // Nothing past this offset: pin the total so the offset is not fetched again.
            self.total_count = TotalCount::Known(self.items.len());
        } else {
            self.items.extend(result.items);
            self.total_count = result.total_count;
            self.clamp_total();
        }
        self.touch();
    }

    pub fn snapshot(&self) -> ListSnapshot<T>
    where
        T: Clone,
    {
        ListSnapshot {
            items: self.items.clone(),
            skip: self.skip,
            limit: self.limit,
            total_count: self.total_count.known().unwrap_or(self.items.len()),
            has_more: self.has_more(),
            is_loading_initial: self.is_loading_initial,
            is_refreshing: self.is_refreshing,
            filter_text: self.filter_text.clone(),
            last_synced_at: self.last_synced_at,
        }
    }

    fn clamp_total(&mut self) {
        if let TotalCount::Known(count) = self.total_count {
            if self.items.len() > count {
                tracing::warn!(
                    items = self.items.len(),
                    total = count,
                    "Server total is lower than items received, raising it"
                );
                self.total_count = TotalCount::Known(self.items.len());
            }
        }
    }

    fn touch(&mut self) {
        self.last_synced_at = Some(Utc::now());
    }
}

/// Read-only view of a list handed to the presentation layer.
///
/// `total_count` is always concrete: an unknown server total is shown as
/// the number of items loaded so far.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSnapshot<T> {
    pub items: Vec<T>,
    pub skip: usize,
    pub limit: usize,
    pub total_count: usize,
    pub has_more: bool,
    pub is_loading_initial: bool,
    pub is_refreshing: bool,
    pub filter_text: String,
    pub last_synced_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(items: &[&'static str], total: i64) -> PageResult<&'static str> {
        PageResult {
            items: items.to_vec(),
            total_count: TotalCount::from_wire(total),
        }
    }

    #[test]
    fn test_new_state_is_loading() {
        let state: CollectionState<u8> = CollectionState::new(10);
        assert!(state.is_loading_initial());
        assert!(!state.is_refreshing());
        assert_eq!(state.limit(), 10);
        assert!(state.next_page_request().is_none());
    }

    #[test]
    fn test_initial_then_next_pages() {
        let mut state = CollectionState::new(2);
        let request = state.begin_initial("".into());
        assert_eq!((request.skip, request.limit), (0, 2));

        state.apply_initial(page(&["a", "b"], 5));
        assert_eq!(state.items(), &["a", "b"]);
        assert_eq!(state.skip(), 0);

        let request = state.next_page_request().unwrap();
        assert_eq!((request.skip, request.limit), (2, 2));
        state.apply_next_page(request.skip, page(&["c", "d"], 5));

        let request = state.next_page_request().unwrap();
        assert_eq!(request.skip, 4);
        state.apply_next_page(request.skip, page(&["e"], 5));

        assert_eq!(state.items(), &["a", "b", "c", "d", "e"]);
        assert_eq!(state.skip(), 4);
        assert!(state.next_page_request().is_none());
    }

    #[test]
    fn test_short_page_does_not_open_gap() {
        let mut state = CollectionState::new(3);
        state.begin_initial("".into());
        state.apply_initial(page(&["a", "b"], 10));

        let request = state.next_page_request().unwrap();
        assert_eq!(request.skip, 2);
    }

    #[test]
    fn test_short_page_mid_list_keeps_paging() {
        let mut state = CollectionState::new(3);
        state.begin_initial("".into());
        state.apply_initial(page(&["a", "b", "c"], 6));

        let request = state.next_page_request().unwrap();
        state.apply_next_page(request.skip, page(&["d"], 6));
        assert_eq!(state.skip(), 3);
        assert!(state.has_more());

        let request = state.next_page_request().unwrap();
        assert_eq!((request.skip, request.limit), (4, 3));
        state.apply_next_page(request.skip, page(&["e", "f"], 6));

        assert_eq!(state.items(), &["a", "b", "c", "d", "e", "f"]);
        assert!(!state.has_more());
        assert!(state.next_page_request().is_none());
    }

    #[test]
    fn test_empty_page_marks_exhausted() {
        let mut state = CollectionState::new(2);
        state.begin_initial("".into());
        state.apply_initial(page(&["a", "b"], -1));
        assert!(state.has_more());

        let request = state.next_page_request().unwrap();
        state.apply_next_page(request.skip, page(&[], -1));

        assert_eq!(state.total_count(), TotalCount::Known(2));
        assert!(state.next_page_request().is_none());
    }

    #[test]
    fn test_refresh_window_covers_loaded_pages() {
        let mut state = CollectionState::new(2);
        state.begin_initial("zoe".into());
        state.apply_initial(page(&["a", "b"], 6));
        let next = state.next_page_request().unwrap();
        state.apply_next_page(next.skip, page(&["c", "d"], 6));
        let next = state.next_page_request().unwrap();
        state.apply_next_page(next.skip, page(&["e", "f"], 6));

        let request = state.begin_refresh();
        assert_eq!(request, PageRequest::new("zoe", 0, 6));
        assert!(state.is_refreshing());
        assert!(state.next_page_request().is_none());
    }

    #[test]
    fn test_failed_refresh_keeps_items() {
        let mut state = CollectionState::new(2);
        state.begin_initial("".into());
        state.apply_initial(page(&["a", "b"], 2));

        state.begin_refresh();
        state.fail_refresh();

        assert_eq!(state.items(), &["a", "b"]);
        assert_eq!(state.total_count(), TotalCount::Known(2));
        assert!(!state.is_refreshing());
    }

    #[test]
    fn test_failed_initial_is_empty() {
        let mut state: CollectionState<&str> = CollectionState::new(2);
        state.begin_initial("x".into());
        state.fail_initial();

        assert!(state.is_empty());
        assert_eq!(state.total_count(), TotalCount::Known(0));
        assert!(!state.is_loading_initial());
    }

    #[test]
    fn test_total_never_below_items() {
        let mut state = CollectionState::new(3);
        state.begin_initial("".into());
        state.apply_initial(page(&["a", "b", "c"], 1));
        assert_eq!(state.total_count(), TotalCount::Known(3));
    }

    #[test]
    fn test_snapshot_surfaces_concrete_total() {
        let mut state = CollectionState::new(2);
        state.begin_initial("".into());
        state.apply_initial(page(&["a", "b"], -1));

        let snapshot = state.snapshot();
        assert_eq!(snapshot.total_count, 2);
        assert!(snapshot.has_more);
        assert!(snapshot.last_synced_at.is_some());
    }
}
