use serde::{Deserialize, Serialize};

use crate::domains::donation::types::Donation;
use crate::domains::table::filter::{filter_donations, DonationTableFilters};
use crate::domains::table::pagination::paginate;
use crate::errors::DomainResult;
use crate::types::{PaginatedResult, PaginationParams, DEFAULT_PAGE_SIZE};
use crate::validation::Validate;

/// Where the table is in its edit/apply cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterPhase {
    /// Pending values differ from what the table shows
    Editing,
    Applied,
    /// Back to defaults
    Cleared,
}

impl FilterPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterPhase::Editing => "editing",
            FilterPhase::Applied => "applied",
            FilterPhase::Cleared => "cleared",
        }
    }
}

/// Two-phase filter state for the donations table.
///
/// Edits only touch the pending search and filters. The rendered view always
/// uses the applied values until [`DonationTableState::apply`] commits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationTableState {
    pending_search: String,
    pending_filters: DonationTableFilters,
    applied_search: String,
    applied_filters: DonationTableFilters,
    page: u32,
    per_page: u32,
    phase: FilterPhase,
}

impl Default for DonationTableState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl DonationTableState {
    pub fn new(per_page: u32) -> Self {
        Self {
            pending_search: String::new(),
            pending_filters: DonationTableFilters::default(),
            applied_search: String::new(),
            applied_filters: DonationTableFilters::default(),
            page: 1,
            per_page: per_page.max(1),
            phase: FilterPhase::Cleared,
        }
    }

    pub fn phase(&self) -> FilterPhase {
        self.phase
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn pending_search(&self) -> &str {
        &self.pending_search
    }

    pub fn pending_filters(&self) -> &DonationTableFilters {
        &self.pending_filters
    }

    pub fn applied_search(&self) -> &str {
        &self.applied_search
    }

    pub fn applied_filters(&self) -> &DonationTableFilters {
        &self.applied_filters
    }

    pub fn has_pending_changes(&self) -> bool {
        self.pending_search != self.applied_search || self.pending_filters != self.applied_filters
    }

    pub fn set_search(&mut self, search: &str) {
        self.pending_search = search.to_string();
        self.phase = FilterPhase::Editing;
    }

    pub fn set_filters(&mut self, filters: DonationTableFilters) {
        self.pending_filters = filters;
        self.phase = FilterPhase::Editing;
    }

    /// Change one pending filter in place.
    pub fn edit_filters<F>(&mut self, edit: F)
    where
        F: FnOnce(&mut DonationTableFilters),
    {
        edit(&mut self.pending_filters);
        self.phase = FilterPhase::Editing;
    }

    /// Commit pending values and return to the first page.
    /// Invalid pending filters leave the applied state untouched.
    pub fn apply(&mut self) -> DomainResult<()> {
        self.pending_filters.validate()?;
        self.applied_search = self.pending_search.clone();
        self.applied_filters = self.pending_filters.clone();
        self.page = 1;
        self.phase = FilterPhase::Applied;
        log::debug!("Donation table filters applied: {:?}", self.applied_filters);
        Ok(())
    }

    /// Reset pending and applied values to the defaults.
    pub fn clear(&mut self) {
        self.pending_search.clear();
        self.applied_search.clear();
        self.pending_filters = DonationTableFilters::default();
        self.applied_filters = DonationTableFilters::default();
        self.page = 1;
        self.phase = FilterPhase::Cleared;
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.per_page)
    }

    /// Current page of donations under the applied search and filters.
    pub fn view(&self, donations: &[Donation]) -> PaginatedResult<Donation> {
        let filtered = filter_donations(donations, &self.applied_search, &self.applied_filters);
        paginate(filtered, self.pagination())
    }
}
