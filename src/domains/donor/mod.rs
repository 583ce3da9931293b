pub mod types;
pub mod enrichment;

pub use types::{Donor, EnrichedDonor};
pub use enrichment::{enrich_donors, relevant_donations_for_donor, search_donors};
