use crate::types::{PaginatedResult, PaginationParams};

/// Slice one page out of an already filtered list.
///
/// Page 0 is read as page 1 and a page past the end comes back empty, with
/// `total` and `total_pages` still describing the whole list.
pub fn paginate<T>(items: Vec<T>, params: PaginationParams) -> PaginatedResult<T> {
    let total = items.len() as u64;
    let page_items: Vec<T> = if params.per_page == 0 {
        Vec::new()
    } else {
        items
            .into_iter()
            .skip(params.offset())
            .take(params.per_page as usize)
            .collect()
    };
    PaginatedResult::new(page_items, total, params)
}
