/// Generic page windowing over an in-memory list. Purely synchronous; pages
/// are 1-based and navigation clamps rather than erroring.
#[derive(Debug)]
pub struct Pager<T> {
    items: Vec<T>,
    page_size: usize,
    current_page: usize,
}

impl<T> Pager<T> {
    pub fn new(items: Vec<T>, page_size: usize) -> Self {
        Self {
            items,
            page_size: page_size.max(1),
            current_page: 1,
        }
    }

    pub fn total_pages(&self) -> usize {
        self.items.len().div_ceil(self.page_size)
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// The current page's slice of the source list.
    pub fn current_items(&self) -> &[T] {
        let start = (self.current_page - 1) * self.page_size;
        if start >= self.items.len() {
            return &[];
        }
        let end = (start + self.page_size).min(self.items.len());
        &self.items[start..end]
    }

    /// Clamped to `[1, total_pages]` (page 1 when the list is empty).
    pub fn go_to_page(&mut self, page: usize) {
        self.current_page = page.clamp(1, self.total_pages().max(1));
    }

    pub fn next(&mut self) {
        self.go_to_page(self.current_page + 1);
    }

    pub fn prev(&mut self) {
        self.go_to_page(self.current_page.saturating_sub(1));
    }

    pub fn first(&mut self) {
        self.go_to_page(1);
    }

    pub fn last(&mut self) {
        self.go_to_page(self.total_pages());
    }

    /// Replaces the source list and resets to page 1.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.current_page = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_25_items_into_3_pages_of_10() {
        let mut pager = Pager::new((0..25).collect::<Vec<_>>(), 10);
        assert_eq!(pager.total_pages(), 3);
        assert_eq!(pager.current_items().len(), 10);
        assert_eq!(pager.current_items()[0], 0);

        pager.go_to_page(3);
        assert_eq!(pager.current_items().len(), 5);
        assert_eq!(pager.current_items()[0], 20);
    }

    #[test]
    fn navigation_clamps_to_valid_pages() {
        let mut pager = Pager::new((0..25).collect::<Vec<_>>(), 10);
        pager.go_to_page(99);
        assert_eq!(pager.current_page(), 3);
        pager.next();
        assert_eq!(pager.current_page(), 3);
        pager.first();
        pager.prev();
        assert_eq!(pager.current_page(), 1);
        pager.last();
        assert_eq!(pager.current_page(), 3);
    }

    #[test]
    fn replacing_items_resets_to_page_1() {
        let mut pager = Pager::new((0..25).collect::<Vec<_>>(), 10);
        pager.last();
        pager.set_items((0..4).collect());
        assert_eq!(pager.current_page(), 1);
        assert_eq!(pager.total_pages(), 1);
        assert_eq!(pager.current_items(), &[0, 1, 2, 3]);
    }

    #[test]
    fn empty_list_has_no_pages_but_stays_navigable() {
        let mut pager: Pager<u8> = Pager::new(vec![], 10);
        assert_eq!(pager.total_pages(), 0);
        pager.go_to_page(5);
        assert_eq!(pager.current_page(), 1);
        assert!(pager.current_items().is_empty());
    }
}
