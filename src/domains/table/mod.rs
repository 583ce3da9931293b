pub mod filter;
pub mod pagination;
pub mod state;

pub use filter::{filter_donations, DonationTableFilters};
pub use pagination::paginate;
pub use state::{DonationTableState, FilterPhase};
