use std::ops::Range;

/// Page sizes offered by the entries-per-page selector.
pub const PAGE_SIZE_CHOICES: [usize; 4] = [10, 25, 50, 100];
pub const DEFAULT_ENTRIES_PER_PAGE: usize = 10;

/// Paging over the visible rows. Pages are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    current_page: usize,
    entries_per_page: usize,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            current_page: 1,
            entries_per_page: DEFAULT_ENTRIES_PER_PAGE,
        }
    }
}

impl PageState {
    /// Creates a page state; a zero page size falls back to the default.
    pub fn new(entries_per_page: usize) -> Self {
        let mut state = Self::default();
        state.set_entries_per_page(entries_per_page);
        state
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn entries_per_page(&self) -> usize {
        self.entries_per_page
    }

    /// Parses a selector value. Only positive integers are accepted.
    pub fn parse_entries_per_page(raw: &str) -> Option<usize> {
        raw.trim().parse::<usize>().ok().filter(|n| *n > 0)
    }

    /// Stores a new page size and returns to the first page.
    /// Returns `false` (and changes nothing) for zero.
    pub fn set_entries_per_page(&mut self, entries_per_page: usize) -> bool {
        if entries_per_page == 0 {
            return false;
        }
        self.entries_per_page = entries_per_page;
        self.current_page = 1;
        true
    }

    /// Next selector choice after the current size, wrapping around.
    pub fn next_choice(&self) -> usize {
        PAGE_SIZE_CHOICES
            .iter()
            .copied()
            .find(|choice| *choice > self.entries_per_page)
            .unwrap_or(PAGE_SIZE_CHOICES[0])
    }

    /// Previous selector choice before the current size, wrapping around.
    pub fn prev_choice(&self) -> usize {
        PAGE_SIZE_CHOICES
            .iter()
            .rev()
            .copied()
            .find(|choice| *choice < self.entries_per_page)
            .unwrap_or(PAGE_SIZE_CHOICES[PAGE_SIZE_CHOICES.len() - 1])
    }

    /// Number of pages for `total` rows; never less than one.
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.entries_per_page).max(1)
    }

    pub fn next_page(&mut self, total: usize) {
        if self.current_page < self.page_count(total) {
            self.current_page += 1;
        }
    }

    pub fn prev_page(&mut self) {
        if self.current_page > 1 {
            self.current_page -= 1;
        }
    }

    pub fn first_page(&mut self) {
        self.current_page = 1;
    }

    pub fn last_page(&mut self, total: usize) {
        self.current_page = self.page_count(total);
    }

    /// Pulls the current page back into range after the row count shrank.
    pub fn clamp(&mut self, total: usize) {
        self.current_page = self.current_page.clamp(1, self.page_count(total));
    }

    /// Index range of the current page within `total` rows.
    pub fn window(&self, total: usize) -> Range<usize> {
        let page = self.current_page.min(self.page_count(total));
        let start = ((page - 1) * self.entries_per_page).min(total);
        let end = (start + self.entries_per_page).min(total);
        start..end
    }

    pub fn page_info(&self, total: usize) -> String {
        if total == 0 {
            return "No entries".to_string();
        }
        let range = self.window(total);
        format!(
            "Showing {} to {} of {} entries (page {} of {})",
            range.start + 1,
            range.end,
            total,
            self.current_page.min(self.page_count(total)),
            self.page_count(total)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_only_positive_integers() {
        assert_eq!(PageState::parse_entries_per_page("25"), Some(25));
        assert_eq!(PageState::parse_entries_per_page(" 50 "), Some(50));
        assert_eq!(PageState::parse_entries_per_page("0"), None);
        assert_eq!(PageState::parse_entries_per_page("-10"), None);
        assert_eq!(PageState::parse_entries_per_page("all"), None);
    }

    #[test]
    fn window_and_navigation_stay_in_bounds() {
        let mut page = PageState::new(10);
        assert_eq!(page.window(23), 0..10);
        page.next_page(23);
        page.next_page(23);
        page.next_page(23);
        assert_eq!(page.current_page(), 3);
        assert_eq!(page.window(23), 20..23);
        page.clamp(5);
        assert_eq!(page.current_page(), 1);
        page.prev_page();
        assert_eq!(page.current_page(), 1);
        page.last_page(0);
        assert_eq!(page.window(0), 0..0);
    }

    #[test]
    fn changing_size_resets_to_first_page() {
        let mut page = PageState::default();
        page.last_page(95);
        assert_eq!(page.current_page(), 10);
        assert!(page.set_entries_per_page(25));
        assert_eq!(page.current_page(), 1);
        assert!(!page.set_entries_per_page(0));
        assert_eq!(page.entries_per_page(), 25);
    }

    #[test]
    fn selector_choices_cycle() {
        let page = PageState::new(100);
        assert_eq!(page.next_choice(), 10);
        assert_eq!(PageState::new(10).prev_choice(), 100);
        assert_eq!(PageState::new(25).next_choice(), 50);
        assert_eq!(PageState::new(30).prev_choice(), 25);
    }

    #[test]
    fn page_info_describes_window() {
        let page = PageState::new(10);
        assert_eq!(page.page_info(0), "No entries");
        assert_eq!(page.page_info(12), "Showing 1 to 10 of 12 entries (page 1 of 2)");
    }
}
