use serde::{Deserialize, Serialize};

use crate::domains::donation::types::{Donation, DonationStatus};
use crate::errors::{DomainError, DomainResult, ValidationError};
use crate::utils::{parse_date_bound, DateBound};
use crate::validation::common::validate_date_bound;
use crate::validation::{Validate, ValidationBuilder};

/// Filter set for the donations table. `None` or an empty string disables a filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationTableFilters {
    pub status: Option<DonationStatus>,
    /// Currency code, compared case-insensitively (`usd` matches `USD`)
    pub currency: Option<String>,
    pub project_name: Option<String>,
    /// Inclusive lower bound, `YYYY-MM-DD` or an ISO 8601 timestamp
    pub date_from: Option<String>,
    /// Inclusive upper bound; a bare date means midnight UTC at the start of that day
    pub date_to: Option<String>,
}

impl Default for DonationTableFilters {
    fn default() -> Self {
        Self {
            status: Some(DonationStatus::Completed),
            ..Self::none()
        }
    }
}

impl DonationTableFilters {
    /// No filter at all, every settled donation passes.
    pub fn none() -> Self {
        Self {
            status: None,
            currency: None,
            project_name: None,
            date_from: None,
            date_to: None,
        }
    }

    pub fn with_status(mut self, status: DonationStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_currency(mut self, currency: &str) -> Self {
        self.currency = Some(currency.to_string());
        self
    }

    pub fn with_project_name(mut self, project_name: &str) -> Self {
        self.project_name = Some(project_name.to_string());
        self
    }

    pub fn with_date_from(mut self, date_from: &str) -> Self {
        self.date_from = Some(date_from.to_string());
        self
    }

    pub fn with_date_to(mut self, date_to: &str) -> Self {
        self.date_to = Some(date_to.to_string());
        self
    }

    fn matches(&self, donation: &Donation) -> bool {
        if let Some(status) = self.status {
            if donation.status != status {
                return false;
            }
        }
        if let Some(currency) = active(&self.currency) {
            if !donation.currency.trim().eq_ignore_ascii_case(currency.trim()) {
                return false;
            }
        }
        if let Some(project_name) = active(&self.project_name) {
            if donation.project_name.as_deref() != Some(project_name) {
                return false;
            }
        }
        if let Some(from) = active(&self.date_from) {
            if !within_bound(donation, from, |created, bound| created >= bound.start()) {
                return false;
            }
        }
        if let Some(to) = active(&self.date_to) {
            if !within_bound(donation, to, |created, bound| created <= bound.start()) {
                return false;
            }
        }
        true
    }
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// A donation without a readable timestamp, or a bound that does not parse, never matches.
fn within_bound<F>(donation: &Donation, raw_bound: &str, check: F) -> bool
where
    F: Fn(chrono::DateTime<chrono::Utc>, DateBound) -> bool,
{
    match (donation.created_at_utc(), parse_date_bound(raw_bound)) {
        (Some(created), Some(bound)) => check(created, bound),
        _ => false,
    }
}

impl Validate for DonationTableFilters {
    fn validate(&self) -> DomainResult<()> {
        if let Some(currency) = active(&self.currency) {
            ValidationBuilder::new("currency", Some(currency.trim().to_string()))
                .currency_code()
                .validate()?;
        }

        let from = match active(&self.date_from) {
            Some(value) => {
                validate_date_bound(value, "date_from")?;
                parse_date_bound(value)
            }
            None => None,
        };
        let to = match active(&self.date_to) {
            Some(value) => {
                validate_date_bound(value, "date_to")?;
                parse_date_bound(value)
            }
            None => None,
        };

        if let (Some(from), Some(to)) = (from, to) {
            if from.start() > to.start() {
                return Err(DomainError::Validation(ValidationError::invalid_value(
                    "date_from",
                    "must not be after date_to",
                )));
            }
        }
        Ok(())
    }
}

fn matches_search(donation: &Donation, needle: &str) -> bool {
    donation.donor_name_or_unknown().to_lowercase().contains(needle)
        || donation.donor_email_or_unknown().to_lowercase().contains(needle)
        || donation
            .project_name
            .as_deref()
            .map(|name| name.to_lowercase().contains(needle))
            .unwrap_or(false)
        || donation.id.to_string().contains(needle)
}

/// Settled donations matching the search text and every active filter, in input order.
pub fn filter_donations(donations: &[Donation], search: &str, filters: &DonationTableFilters) -> Vec<Donation> {
    let needle = search.trim().to_lowercase();
    let filtered: Vec<Donation> = donations
        .iter()
        .filter(|d| d.is_relevant())
        .filter(|d| needle.is_empty() || matches_search(d, &needle))
        .filter(|d| filters.matches(d))
        .cloned()
        .collect();

    log::debug!(
        "Donation table: {} of {} donation(s) match search {:?}",
        filtered.len(),
        donations.len(),
        needle
    );
    filtered
}
