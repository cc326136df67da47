use crate::constants::PAGINATION_WINDOW;

/// One element of the page control strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageControl {
    Previous { enabled: bool },
    Number { page: u32, current: bool },
    Ellipsis,
    Next { enabled: bool },
}

/// Page position within a listing of `total_count` items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    page_size: u32,
    total_count: u64,
}

impl Pagination {
    pub fn new(page: u32, page_size: u32, total_count: u64) -> Self {
        let mut pagination = Self {
            page: 1,
            page_size: page_size.max(1),
            total_count,
        };
        pagination.page = pagination.clamp(page);
        pagination
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// `ceil(total_count / page_size)`; zero for an empty listing
    pub fn total_pages(&self) -> u32 {
        let size = u64::from(self.page_size);
        let pages = self.total_count.div_ceil(size);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Bring `page` into `1..=total_pages` (an empty listing still has page 1)
    pub fn clamp(&self, page: u32) -> u32 {
        page.clamp(1, self.total_pages().max(1))
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Page that "previous" leads to, if enabled
    pub fn previous(&self) -> Option<u32> {
        self.has_previous().then(|| self.page - 1)
    }

    pub fn next(&self) -> Option<u32> {
        self.has_next().then(|| self.page + 1)
    }

    /// Up to five consecutive page numbers centred on the current page
    pub fn window(&self) -> Vec<u32> {
        let total = self.total_pages();
        let width = PAGINATION_WINDOW.min(total);
        let half = PAGINATION_WINDOW / 2;
        let start = if total <= PAGINATION_WINDOW || self.page <= half + 1 {
            1
        } else if self.page + half >= total {
            total + 1 - PAGINATION_WINDOW
        } else {
            self.page - half
        };
        (start..start + width).collect()
    }

    /// Full control strip: previous, first page jump, window, last page jump, next
    pub fn controls(&self) -> Vec<PageControl> {
        let total = self.total_pages();
        let window = self.window();
        let mut controls = vec![PageControl::Previous {
            enabled: self.has_previous(),
        }];

        let first = window.first().copied().unwrap_or(1);
        let last = window.last().copied().unwrap_or(1);

        if first > 1 {
            controls.push(PageControl::Number {
                page: 1,
                current: false,
            });
            if first > 2 {
                controls.push(PageControl::Ellipsis);
            }
        }

        controls.extend(window.iter().map(|&page| PageControl::Number {
            page,
            current: page == self.page,
        }));

        if last < total {
            if last + 1 < total {
                controls.push(PageControl::Ellipsis);
            }
            controls.push(PageControl::Number {
                page: total,
                current: false,
            });
        }

        controls.push(PageControl::Next {
            enabled: self.has_next(),
        });
        controls
    }

    /// Text rendering such as `< 1 [2] 3 >`; disabled arrows are blanked
    pub fn render(&self) -> String {
        self.controls()
            .iter()
            .map(|control| match control {
                PageControl::Previous { enabled: true } => "<".to_string(),
                PageControl::Next { enabled: true } => ">".to_string(),
                PageControl::Previous { enabled: false } | PageControl::Next { enabled: false } => {
                    " ".to_string()
                }
                PageControl::Number {
                    page,
                    current: true,
                } => format!("[{}]", page),
                PageControl::Number { page, .. } => page.to_string(),
                PageControl::Ellipsis => "...".to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn numbers(p: &Pagination) -> Vec<u32> {
        p.controls()
            .into_iter()
            .filter_map(|c| match c {
                PageControl::Number { page, .. } => Some(page),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_second_of_three_pages() {
        let p = Pagination::new(2, 10, 25);
        assert_eq!(p.total_pages(), 3);
        assert_eq!(p.window(), vec![1, 2, 3]);
        assert!(p.has_previous());
        assert!(p.has_next());
        assert_eq!(p.render(), "< 1 [2] 3 >");
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(Pagination::new(1, 10, 0).total_pages(), 0);
        assert_eq!(Pagination::new(1, 10, 10).total_pages(), 1);
        assert_eq!(Pagination::new(1, 10, 11).total_pages(), 2);
    }

    #[test]
    fn test_empty_listing_disables_both_arrows() {
        let p = Pagination::new(1, 10, 0);
        assert_eq!(p.page(), 1);
        assert!(!p.has_previous());
        assert!(!p.has_next());
    }

    #[test]
    fn test_page_is_clamped() {
        assert_eq!(Pagination::new(9, 10, 25).page(), 3);
        assert_eq!(Pagination::new(0, 10, 25).page(), 1);
    }

    #[test]
    fn test_window_near_start() {
        let p = Pagination::new(2, 10, 100);
        assert_eq!(p.window(), vec![1, 2, 3, 4, 5]);
        assert_eq!(numbers(&p), vec![1, 2, 3, 4, 5, 10]);
        assert_eq!(p.render(), "< 1 [2] 3 4 5 ... 10 >");
    }

    #[test]
    fn test_window_in_middle() {
        let p = Pagination::new(6, 10, 100);
        assert_eq!(p.window(), vec![4, 5, 6, 7, 8]);
        assert_eq!(p.render(), "< 1 ... 4 5 [6] 7 8 ... 10 >");
    }

    #[test]
    fn test_window_adjacent_to_first_page() {
        let p = Pagination::new(4, 10, 100);
        assert_eq!(p.window(), vec![2, 3, 4, 5, 6]);
        assert_eq!(p.render(), "< 1 2 3 [4] 5 6 ... 10 >");
    }

    #[test]
    fn test_window_near_end() {
        let p = Pagination::new(10, 10, 100);
        assert_eq!(p.window(), vec![6, 7, 8, 9, 10]);
        assert!(!p.has_next());
        assert_eq!(p.render(), "< 1 ... 6 7 8 9 [10]  ");
    }
}
