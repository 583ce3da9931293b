use serde::{Deserialize, Serialize};

use crate::errors::{DomainResult, ValidationError};
use crate::validation::Validate;

/// Page size used by the donations table when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Pagination parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaginationParams {
    pub page: u32,
    pub per_page: u32,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationParams {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    /// Pages are 1-based; page 0 is read as the first page.
    pub fn effective_page(&self) -> u32 {
        self.page.max(1)
    }

    /// Offset of the first item on the current page.
    pub fn offset(&self) -> usize {
        (self.effective_page() as usize - 1).saturating_mul(self.per_page as usize)
    }
}

impl Validate for PaginationParams {
    fn validate(&self) -> DomainResult<()> {
        if self.per_page == 0 {
            return Err(ValidationError::range("per_page", 1, u32::MAX).into());
        }
        Ok(())
    }
}

/// Paginated result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

impl<T> PaginatedResult<T> {
    pub fn new(items: Vec<T>, total: u64, params: PaginationParams) -> Self {
        Self {
            items,
            total,
            page: params.effective_page(),
            per_page: params.per_page,
            total_pages: total_pages(total, params.per_page),
        }
    }

    pub fn has_next_page(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous_page(&self) -> bool {
        self.page > 1
    }
}

/// `ceil(total / per_page)`, zero when there is nothing to show.
pub fn total_pages(total: u64, per_page: u32) -> u32 {
    if per_page == 0 {
        return 0;
    }
    let per_page = per_page as u64;
    ((total + per_page - 1) / per_page) as u32
}
