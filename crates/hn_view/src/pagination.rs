use std::ops::Range;

/// Numbered buttons shown around the current page.
pub const PAGE_WINDOW: usize = 5;

/// Pagination for one index page instance.
///
/// Holds `1 <= current_page <= total_pages`, except when there is nothing to
/// paginate, where `total_pages == 0` and `current_page` stays at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    current_page: usize,
    total_pages: usize,
    page_size: usize,
    total_items: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageControl {
    Previous(usize),
    Page { number: usize, current: bool },
    Ellipsis,
    Next(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationControls {
    pub items: Vec<PageControl>,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl Pagination {
    pub fn new(total_items: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            current_page: 1,
            total_pages: total_items.div_ceil(page_size),
            page_size,
            total_items,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    /// Move to `page`, clamped into the valid range. Returns the page actually selected.
    pub fn go_to(&mut self, page: usize) -> usize {
        self.current_page = page.clamp(1, self.total_pages.max(1));
        self.current_page
    }

    /// Item indices shown on the current page.
    pub fn range(&self) -> Range<usize> {
        let start = ((self.current_page - 1) * self.page_size).min(self.total_items);
        let end = (self.current_page * self.page_size).min(self.total_items);
        start..end
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let range = self.range();
        &items[range.start.min(items.len())..range.end.min(items.len())]
    }

    /// Contiguous page numbers shown as buttons, centred on the current page.
    pub fn window(&self) -> Range<usize> {
        if self.total_pages == 0 {
            return 1..1;
        }
        let half = PAGE_WINDOW / 2;
        let mut start = self.current_page.saturating_sub(half).max(1);
        let end = (start + PAGE_WINDOW - 1).min(self.total_pages);
        start = end.saturating_sub(PAGE_WINDOW - 1).max(1);
        start..end + 1
    }

    /// Controls for the current page, or `None` when everything fits on one page.
    pub fn controls(&self) -> Option<PaginationControls> {
        if self.total_pages <= 1 {
            return None;
        }

        let window = self.window();
        let mut items = Vec::new();

        if self.current_page > 1 {
            items.push(PageControl::Previous(self.current_page - 1));
        }

        if window.start > 1 {
            items.push(PageControl::Page { number: 1, current: false });
            if window.start > 2 {
                items.push(PageControl::Ellipsis);
            }
        }

        for number in window.clone() {
            items.push(PageControl::Page {
                number,
                current: number == self.current_page,
            });
        }

        if window.end <= self.total_pages {
            if window.end < self.total_pages {
                items.push(PageControl::Ellipsis);
            }
            items.push(PageControl::Page {
                number: self.total_pages,
                current: false,
            });
        }

        if self.current_page < self.total_pages {
            items.push(PageControl::Next(self.current_page + 1));
        }

        Some(PaginationControls {
            items,
            current_page: self.current_page,
            total_pages: self.total_pages,
            total_items: self.total_items,
        })
    }
}

impl PaginationControls {
    pub fn summary(&self) -> String {
        format!(
            "第 {} / {} 页，共 {} 篇报告",
            self.current_page, self.total_pages, self.total_items
        )
    }

    pub fn page_numbers(&self) -> Vec<usize> {
        self.items
            .iter()
            .filter_map(|item| match item {
                PageControl::Page { number, .. } => Some(*number),
                _ => None,
            })
            .collect()
    }

    pub fn has_previous(&self) -> bool {
        self.items.iter().any(|i| matches!(i, PageControl::Previous(_)))
    }

    pub fn has_next(&self) -> bool {
        self.items.iter().any(|i| matches!(i, PageControl::Next(_)))
    }
}
