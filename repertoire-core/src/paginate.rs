use std::ops::RangeInclusive;

/// The number of results on a page.
pub const PAGE_SIZE: usize = 25;
/// The most page buttons shown at once.
pub const MAX_PAGE_BUTTONS: usize = 7;

/// The items on 1-based page `page`. Page 0 is read as page 1; a page past the
/// end is empty, and it is up to the caller to say so.
pub fn paginate<T>(items: &[T], page_size: usize, page: usize) -> &[T] {
    let start = (page.max(1) - 1).saturating_mul(page_size);
    if page_size == 0 || start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// The number of pages needed for `total` items. Never less than 1, so page
/// controls can always be drawn.
pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

/// The page numbers to show buttons for: a window of up to `max_buttons`
/// centred on `active`, shifted rather than shrunk near either end.
pub fn page_button_range(
    total_pages: usize,
    active: usize,
    max_buttons: usize,
) -> RangeInclusive<usize> {
    let max_buttons = max_buttons.max(1);
    let half = max_buttons / 2;
    let mut start = active.saturating_sub(half).max(1);
    let end = start.saturating_add(max_buttons - 1).min(total_pages);
    if end.saturating_sub(start) < max_buttons - 1 {
        start = end.saturating_sub(max_buttons - 1).max(1);
    }
    start..=end
}
