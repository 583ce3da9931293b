use std::sync::Arc;

// Public modules
pub mod auth;
pub mod config;
pub mod currency;
pub mod domains;
pub mod errors;
pub mod types;
pub mod validation;

// Private modules
mod utils;

pub use auth::{AuthContext, SessionUser};
pub use config::DashboardConfig;
pub use domains::donation::{ApiDonationRepository, DashboardService, DashboardSnapshot, DashboardState, DashboardStore};
pub use domains::table::DonationTableState;
pub use errors::{DomainError, DomainResult, ServiceError, ServiceResult, ValidationError};

/// Initialize logging and load configuration from the environment.
/// Call once at start-up before building any service.
pub fn initialize() -> ServiceResult<DashboardConfig> {
    config::init_logging();
    let config = DashboardConfig::from_env()?;
    log::info!("Donor dashboard core configured for {}", config.api_base_url);
    Ok(config)
}

/// Dashboard service talking to the configured backend.
pub fn dashboard_service(config: &DashboardConfig) -> DashboardService {
    DashboardService::new(Arc::new(ApiDonationRepository::new(&config.api_base_url)))
}

/// Dashboard store starting in the loading state; call `refresh` to populate it.
pub fn dashboard_store(config: &DashboardConfig) -> DashboardStore {
    DashboardStore::new(dashboard_service(config)).with_recent_limit(config.recent_donations_limit)
}

/// Empty donations table paged at the configured size.
pub fn donation_table(config: &DashboardConfig) -> DonationTableState {
    DonationTableState::new(config.page_size)
}
