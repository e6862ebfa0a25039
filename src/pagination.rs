/// Slice one 1-based page out of `items`.
///
/// Out-of-range pages (including page 0) yield an empty slice; the page
/// number is never clamped.
pub fn paginate<T>(items: &[T], page: usize, items_per_page: usize) -> &[T] {
    if page == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(items_per_page);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(items_per_page).min(items.len());
    &items[start..end]
}

/// Number of pages needed to show `total` items, `items_per_page` at a time.
pub fn page_count(total: usize, items_per_page: usize) -> usize {
    if items_per_page == 0 {
        return 0;
    }
    total.div_ceil(items_per_page)
}
