//! Cursor + scroll window over a list of fixed-height rows.
//!
//! The rows themselves live elsewhere (the surface owns the cards); this
//! only tracks which one the cursor is on and which slice is visible.

#[derive(Debug, Default, Clone)]
pub struct ScrollableList {
    pub selected: usize,
    pub scroll_offset: usize,
    len: usize,
}

impl ScrollableList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the row count, clamping the cursor into range.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
        if self.scroll_offset > self.selected {
            self.scroll_offset = self.selected;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn select_up(&mut self, n: usize) {
        self.selected = self.selected.saturating_sub(n);
    }

    pub fn select_down(&mut self, n: usize) {
        if self.len == 0 {
            return;
        }
        self.selected = (self.selected + n).min(self.len - 1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
        self.scroll_offset = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.len.saturating_sub(1);
    }

    pub fn set_selected(&mut self, idx: usize) {
        if idx < self.len {
            self.selected = idx;
        }
    }

    /// Move the window so the cursor is inside `capacity` rows.
    pub fn ensure_visible(&mut self, capacity: usize) {
        if capacity == 0 {
            return;
        }
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + capacity {
            self.scroll_offset = self.selected + 1 - capacity;
        }
    }

    /// Row indices visible in a window of `capacity` rows.
    pub fn visible_range(&self, capacity: usize) -> std::ops::Range<usize> {
        let start = self.scroll_offset.min(self.len);
        let end = (start + capacity).min(self.len);
        start..end
    }

    /// Map a click on visible slot `slot` to a row index, moving the cursor.
    pub fn handle_click(&mut self, slot: usize) -> Option<usize> {
        let target = self.scroll_offset + slot;
        if target < self.len {
            self.selected = target;
            Some(target)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_clamps() {
        let mut list = ScrollableList::new();
        list.set_len(3);
        list.select_down(10);
        assert_eq!(list.selected, 2);
        list.select_up(10);
        assert_eq!(list.selected, 0);
        list.select_last();
        list.set_len(1);
        assert_eq!(list.selected, 0);
    }

    #[test]
    fn test_window_follows_cursor() {
        let mut list = ScrollableList::new();
        list.set_len(10);
        list.set_selected(7);
        list.ensure_visible(3);
        assert_eq!(list.visible_range(3), 5..8);
        list.select_first();
        list.ensure_visible(3);
        assert_eq!(list.visible_range(3), 0..3);
    }

    #[test]
    fn test_click_maps_through_offset() {
        let mut list = ScrollableList::new();
        list.set_len(5);
        list.scroll_offset = 2;
        assert_eq!(list.handle_click(1), Some(3));
        assert_eq!(list.selected, 3);
        assert_eq!(list.handle_click(4), None);
        assert_eq!(list.selected, 3);
    }

    #[test]
    fn test_empty_list() {
        let mut list = ScrollableList::new();
        list.select_down(1);
        assert_eq!(list.selected, 0);
        assert!(list.visible_range(4).is_empty());
        assert_eq!(list.handle_click(0), None);
    }
}
