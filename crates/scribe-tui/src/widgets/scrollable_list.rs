//! Scroll/selection bookkeeping shared by the intake and record panes.
//!
//! Filtering lives server-side in this client, so this is selection and
//! viewport math only.

pub struct ScrollableList<T> {
    pub items: Vec<T>,
    pub selected: usize,
    pub scroll_offset: usize,
}

impl<T> ScrollableList<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            selected: 0,
            scroll_offset: 0,
        }
    }

    /// Replace the items, clamping the selection into range.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        if self.selected >= self.items.len() {
            self.selected = self.items.len().saturating_sub(1);
        }
        if self.scroll_offset > self.selected {
            self.scroll_offset = self.selected;
        }
    }

    pub fn select_up(&mut self, n: usize) {
        self.selected = self.selected.saturating_sub(n);
    }

    pub fn select_down(&mut self, n: usize) {
        if self.items.is_empty() {
            return;
        }
        self.selected = (self.selected + n).min(self.items.len() - 1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
        self.scroll_offset = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.items.len().saturating_sub(1);
    }

    pub fn selected_item(&self) -> Option<&T> {
        self.items.get(self.selected)
    }

    /// Keep the selection inside a viewport of `height` rows.
    pub fn ensure_visible(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + height {
            self.scroll_offset = self.selected.saturating_sub(height - 1);
        }
    }

    /// Returns (index, &item) pairs visible in `height` rows.
    /// Call `ensure_visible` first to update the scroll offset.
    pub fn visible_items(&self, height: usize) -> Vec<(usize, &T)> {
        if height == 0 || self.items.is_empty() {
            return Vec::new();
        }
        let end = (self.scroll_offset + height).min(self.items.len());
        self.items[self.scroll_offset..end]
            .iter()
            .enumerate()
            .map(|(i, item)| (self.scroll_offset + i, item))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for ScrollableList<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_clamps_on_shrink() {
        let mut list = ScrollableList::new();
        list.set_items(vec![1, 2, 3, 4, 5]);
        list.select_last();
        assert_eq!(list.selected, 4);
        list.set_items(vec![1, 2]);
        assert_eq!(list.selected, 1);
    }

    #[test]
    fn navigation_stays_in_range() {
        let mut list = ScrollableList::new();
        list.set_items(vec!["a", "b", "c"]);
        list.select_down(10);
        assert_eq!(list.selected, 2);
        list.select_up(10);
        assert_eq!(list.selected, 0);
    }

    #[test]
    fn ensure_visible_scrolls_both_directions() {
        let mut list = ScrollableList::new();
        list.set_items((0..20).collect());
        list.selected = 15;
        list.ensure_visible(5);
        assert_eq!(list.scroll_offset, 11);
        assert_eq!(list.visible_items(5).first().map(|(i, _)| *i), Some(11));

        list.selected = 3;
        list.ensure_visible(5);
        assert_eq!(list.scroll_offset, 3);
    }

    #[test]
    fn empty_list_is_harmless() {
        let mut list: ScrollableList<i32> = ScrollableList::new();
        list.select_down(1);
        list.ensure_visible(5);
        assert!(list.visible_items(5).is_empty());
        assert!(list.selected_item().is_none());
    }
}
