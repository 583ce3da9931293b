pub mod types;
pub mod normalize;
pub mod repository;
pub mod service;

pub use types::{Donation, DonationStatus, DonationType, ProjectWithDonations, RawDonation};
pub use normalize::{normalize_donation, normalize_donations};
pub use repository::{ApiDonationRepository, DonationRepository};
pub use service::{build_snapshot, DashboardService, DashboardSnapshot, DashboardState, DashboardStore};
