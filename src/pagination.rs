use serde::Serialize;

/// Pages shown either side of the current page.
const WINDOW_RADIUS: usize = 2;
/// Up to this many pages every page number is listed.
const SHOW_ALL_THRESHOLD: usize = 5;

/// Pages within `edge` of either end or `radius` of `current`, in order.
/// A gap of one page lists that page; a longer gap becomes a `None` ellipsis.
fn page_window(last_page: usize, current: usize, edge: usize, radius: usize) -> Vec<Option<usize>> {
    let mut pages = Vec::new();
    let mut previous = 0;

    for page in 1..=last_page {
        let near_edge = page <= edge || page > last_page.saturating_sub(edge);
        if !near_edge && page.abs_diff(current) > radius {
            continue;
        }
        match page - previous {
            1 => {}
            2 => pages.push(Some(previous + 1)),
            _ => pages.push(None),
        }
        pages.push(Some(page));
        previous = page;
    }

    pages
}

/// Offset and navigation metadata for one page of a list query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Pager {
    pub total_count: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub offset: usize,
}

impl Pager {
    /// Clamps `page` into `[1, total_pages]`; an empty result still has one page.
    pub fn new(total_count: usize, page: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total_count.div_ceil(page_size).max(1);
        let current_page = page.clamp(1, total_pages);

        Self {
            total_count,
            page_size,
            total_pages,
            current_page,
            offset: (current_page - 1) * page_size,
        }
    }

    pub fn limit(&self) -> usize {
        self.page_size
    }

    /// Page numbers for navigation; `None` marks an ellipsis.
    pub fn window(&self) -> Vec<Option<usize>> {
        if self.total_pages <= SHOW_ALL_THRESHOLD {
            return (1..=self.total_pages).map(Some).collect();
        }
        page_window(self.total_pages, self.current_page, 1, WINDOW_RADIUS)
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pages: Vec<Option<usize>>,
    pub page: usize,
    pub total_pages: usize,
    pub total_count: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, pager: &Pager) -> Self {
        Self {
            items,
            pages: pager.window(),
            page: pager.current_page,
            total_pages: pager.total_pages,
            total_count: pager.total_count,
            has_previous: pager.has_previous(),
            has_next: pager.has_next(),
        }
    }

    /// Converts every item, keeping the navigation metadata.
    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Paginated<U>, E> {
        let items = self.items.into_iter().map(f).collect::<Result<Vec<_>, E>>()?;
        Ok(Paginated {
            items,
            pages: self.pages,
            page: self.page,
            total_pages: self.total_pages,
            total_count: self.total_count,
            has_previous: self.has_previous,
            has_next: self.has_next,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_of_ninety_five() {
        let pager = Pager::new(95, 1, 10);
        assert_eq!(pager.total_pages, 10);
        assert_eq!(pager.current_page, 1);
        assert_eq!(pager.offset, 0);
        assert_eq!(pager.limit(), 10);
    }

    #[test]
    fn out_of_range_page_is_clamped_to_last() {
        let pager = Pager::new(95, 15, 10);
        assert_eq!(pager.current_page, 10);
        assert_eq!(pager.offset, 90);
        assert_eq!(pager.total_count - pager.offset, 5);
    }

    #[test]
    fn page_zero_is_clamped_to_first() {
        let pager = Pager::new(30, 0, 10);
        assert_eq!(pager.current_page, 1);
        assert_eq!(pager.offset, 0);
    }

    #[test]
    fn empty_result_has_one_page() {
        let pager = Pager::new(0, 4, 10);
        assert_eq!(pager.total_pages, 1);
        assert_eq!(pager.current_page, 1);
        assert_eq!(pager.window(), vec![Some(1)]);
        assert!(!pager.has_next());
        assert!(!pager.has_previous());
    }

    #[test]
    fn total_pages_and_current_page_stay_in_bounds() {
        for total in [0usize, 1, 9, 10, 11, 95, 100, 1001] {
            for size in [1usize, 3, 10, 25] {
                for page in [0usize, 1, 2, 7, 50, 5000] {
                    let pager = Pager::new(total, page, size);
                    assert_eq!(pager.total_pages, total.div_ceil(size).max(1));
                    assert!(pager.current_page >= 1);
                    assert!(pager.current_page <= pager.total_pages);
                }
            }
        }
    }

    #[test]
    fn small_page_counts_list_every_page() {
        let pager = Pager::new(50, 1, 10);
        assert_eq!(
            pager.window(),
            vec![Some(1), Some(2), Some(3), Some(4), Some(5)]
        );
    }

    #[test]
    fn window_in_the_middle_has_two_ellipses() {
        let pager = Pager::new(200, 10, 10);
        assert_eq!(
            pager.window(),
            vec![
                Some(1),
                None,
                Some(8),
                Some(9),
                Some(10),
                Some(11),
                Some(12),
                None,
                Some(20)
            ]
        );
    }

    #[test]
    fn window_at_the_start_reaches_the_first_page() {
        let pager = Pager::new(100, 1, 10);
        assert_eq!(
            pager.window(),
            vec![Some(1), Some(2), Some(3), None, Some(10)]
        );
    }

    #[test]
    fn window_at_the_end_reaches_the_last_page() {
        let pager = Pager::new(100, 10, 10);
        assert_eq!(
            pager.window(),
            vec![Some(1), None, Some(8), Some(9), Some(10)]
        );
    }

    #[test]
    fn single_page_gap_lists_the_page_instead_of_an_ellipsis() {
        let pager = Pager::new(100, 5, 10);
        assert_eq!(
            pager.window(),
            vec![
                Some(1),
                Some(2),
                Some(3),
                Some(4),
                Some(5),
                Some(6),
                Some(7),
                None,
                Some(10)
            ]
        );

        let pager = Pager::new(100, 7, 10);
        assert_eq!(
            pager.window(),
            vec![
                Some(1),
                None,
                Some(5),
                Some(6),
                Some(7),
                Some(8),
                Some(9),
                Some(10)
            ]
        );
    }

    #[test]
    fn paginated_carries_pager_metadata() {
        let pager = Pager::new(95, 15, 10);
        let page = Paginated::new(vec![1, 2, 3, 4, 5], &pager);
        assert_eq!(page.page, 10);
        assert_eq!(page.total_pages, 10);
        assert!(page.has_previous);
        assert!(!page.has_next);

        let mapped = page
            .try_map(|n| Ok::<_, ()>(n * 2))
            .expect("mapping succeeds");
        assert_eq!(mapped.items, vec![2, 4, 6, 8, 10]);
        assert_eq!(mapped.page, 10);
    }
}
