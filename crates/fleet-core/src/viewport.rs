//! Viewport tracking for incrementally loaded lists.
//!
//! Knows nothing about rendering. The presentation layer reports which item
//! is at the top of the visible region and how many items fit; the viewport
//! answers whether the user has scrolled close enough to the end of the
//! loaded items that the next page should be requested.

/// Information about the visible portion of a loaded list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewportInfo {
    /// Index of the first visible item.
    pub first_visible: usize,
    /// Index of the last visible item.
    pub last_visible: usize,
    /// Count of loaded items above the viewport.
    pub items_above: usize,
    /// Count of loaded items below the viewport.
    pub items_below: usize,
}

impl ViewportInfo {
    pub fn empty() -> Self {
        Self {
            first_visible: 0,
            last_visible: 0,
            items_above: 0,
            items_below: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Viewport {
    /// Number of items currently loaded in the list.
    pub loaded_items: usize,
    /// Index of the first visible item.
    pub scroll_offset: usize,
    /// Number of items that fit in the visible region.
    pub height: usize,
}

impl Viewport {
    pub fn new(loaded_items: usize) -> Self {
        Self {
            loaded_items,
            scroll_offset: 0,
            height: 0,
        }
    }

    /// Update the loaded item count, clamping scroll offset if necessary.
    pub fn set_loaded_items(&mut self, loaded_items: usize) {
        self.loaded_items = loaded_items;
        if self.scroll_offset >= loaded_items && loaded_items > 0 {
            self.scroll_offset = loaded_items.saturating_sub(1);
        }
    }

    /// Record a scroll position reported by the presentation layer.
    pub fn scroll_to(&mut self, first_visible: usize, height: usize) {
        self.height = height;
        self.scroll_offset = first_visible.min(self.loaded_items.saturating_sub(1));
    }

    pub fn info(&self) -> ViewportInfo {
        if self.loaded_items == 0 || self.height == 0 {
            return ViewportInfo::empty();
        }

        let first_visible = self.scroll_offset;
        let last_visible = (self.scroll_offset + self.height - 1).min(self.loaded_items - 1);

        ViewportInfo {
            first_visible,
            last_visible,
            items_above: first_visible,
            items_below: self.loaded_items - (last_visible + 1),
        }
    }

    /// Whether the visible region is within `threshold` items of the end.
    ///
    /// An empty list is always "at the end" so that a list whose first page
    /// came back short can still ask for more.
    pub fn is_near_end(&self, threshold: usize) -> bool {
        if self.loaded_items == 0 {
            return true;
        }
        if self.height == 0 {
            return false;
        }
        self.info().items_below <= threshold
    }

    pub fn is_empty(&self) -> bool {
        self.loaded_items == 0
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0)
    }
}
