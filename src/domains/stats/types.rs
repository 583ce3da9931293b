use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Count and sum of completed donations in one currency
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrencyStat {
    pub count: usize,
    pub total: f64,
}

/// Dashboard headline numbers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DonationSummaryStats {
    /// Number of completed donations
    pub total_donations: usize,
    /// Sum of completed donation amounts, across currencies
    pub total_amount: f64,
    pub total_donors: usize,
    pub active_donors: usize,
    pub average_donation: f64,
    /// Keyed by upper-cased currency code
    pub currency_stats: HashMap<String, CurrencyStat>,
}

impl DonationSummaryStats {
    /// Currency rows ordered by code, for stable rendering and export.
    pub fn currency_breakdown(&self) -> Vec<(&str, CurrencyStat)> {
        let mut rows: Vec<(&str, CurrencyStat)> = self
            .currency_stats
            .iter()
            .map(|(code, stat)| (code.as_str(), *stat))
            .collect();
        rows.sort_by(|a, b| a.0.cmp(b.0));
        rows
    }
}

/// Totals for the export page's selected date range
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeSummary {
    pub start_date: String,
    pub end_date: String,
    pub total_donations: usize,
    pub total_amount: f64,
    /// Distinct donor emails in the range
    pub unique_donors: usize,
    pub average_donation: f64,
}

/// One month of completed donations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTrend {
    /// `YYYY-MM`
    pub month: String,
    pub donation_count: usize,
    pub total_amount: f64,
    pub average_donation: f64,
    /// Change in total versus the previous listed month, in percent
    pub growth_percent: Option<f64>,
}
