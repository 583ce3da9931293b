use std::env;

use crate::errors::{DomainResult, ServiceError, ServiceResult};
use crate::types::DEFAULT_PAGE_SIZE;
use crate::validation::{Validate, ValidationBuilder};

pub const ENV_API_BASE_URL: &str = "DASHBOARD_API_BASE_URL";
pub const ENV_PAGE_SIZE: &str = "DASHBOARD_PAGE_SIZE";
pub const ENV_RECENT_LIMIT: &str = "DASHBOARD_RECENT_LIMIT";

/// Number of rows in the dashboard's recent donations card.
pub const DEFAULT_RECENT_DONATIONS_LIMIT: usize = 5;

/// Runtime settings for the dashboard core
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Backend origin, without a trailing slash
    pub api_base_url: String,
    pub page_size: u32,
    pub recent_donations_limit: usize,
}

impl DashboardConfig {
    pub fn new(api_base_url: &str) -> Self {
        Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            recent_donations_limit: DEFAULT_RECENT_DONATIONS_LIMIT,
        }
    }

    /// Load from the process environment, reading a `.env` file first if present.
    pub fn from_env() -> ServiceResult<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> ServiceResult<Self>
    where F: Fn(&str) -> Option<String> {
        let base_url = lookup(ENV_API_BASE_URL)
            .ok_or_else(|| ServiceError::Configuration(format!("{} is not set", ENV_API_BASE_URL)))?;

        let mut config = Self::new(base_url.trim());

        if let Some(raw) = lookup(ENV_PAGE_SIZE) {
            config.page_size = raw.trim().parse::<u32>().map_err(|e| {
                ServiceError::Configuration(format!("{} must be a positive integer: {}", ENV_PAGE_SIZE, e))
            })?;
        }

        if let Some(raw) = lookup(ENV_RECENT_LIMIT) {
            config.recent_donations_limit = raw.trim().parse::<usize>().map_err(|e| {
                ServiceError::Configuration(format!("{} must be a non-negative integer: {}", ENV_RECENT_LIMIT, e))
            })?;
        }

        config
            .validate()
            .map_err(|e| ServiceError::Configuration(e.to_string()))?;

        log::debug!("Dashboard config loaded: base_url={}, page_size={}", config.api_base_url, config.page_size);
        Ok(config)
    }
}

impl Validate for DashboardConfig {
    fn validate(&self) -> DomainResult<()> {
        ValidationBuilder::new("api_base_url", Some(self.api_base_url.clone()))
            .required()
            .http_url()
            .validate()?;

        ValidationBuilder::new("page_size", Some(self.page_size))
            .min(1)
            .validate()?;

        Ok(())
    }
}

/// Initialise `env_logger`, defaulting `RUST_LOG` when the host has not set it.
pub fn init_logging() {
    if env::var("RUST_LOG").is_err() {
        #[cfg(debug_assertions)]
        env::set_var("RUST_LOG", "debug");
        #[cfg(not(debug_assertions))]
        env::set_var("RUST_LOG", "info");
    }

    // A host may already have installed a logger
    let _ = env_logger::try_init();
}
