//! Client-side pagination of fetched lists.

/// Rows per page in list views.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// One page of a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 1-based page number actually shown (requests are clamped).
    pub number: usize,
    pub total_pages: usize,
    pub total_items: usize,
    /// Index of `items[0]` in the full list.
    pub offset: usize,
}

impl<T> Page<'_, T> {
    /// `(from, to)` 1-based inclusive positions, for "showing 11 to 20 of 42".
    pub fn showing(&self) -> Option<(usize, usize)> {
        if self.items.is_empty() {
            None
        } else {
            Some((self.offset + 1, self.offset + self.items.len()))
        }
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }
}

/// Slice `items` into page `page` (1-based) of `per_page` rows.
///
/// Out-of-range page numbers clamp to the first/last page; a zero page size
/// is treated as one.
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> Page<'_, T> {
    let per_page = per_page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page);
    let number = page.clamp(1, total_pages.max(1));

    let offset = ((number - 1) * per_page).min(total_items);
    let end = (offset + per_page).min(total_items);

    Page {
        items: &items[offset..end],
        number,
        total_pages,
        total_items,
        offset,
    }
}
