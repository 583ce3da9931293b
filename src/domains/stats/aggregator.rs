use std::collections::{BTreeMap, HashMap, HashSet};

use crate::domains::donation::types::Donation;
use crate::domains::donor::types::EnrichedDonor;
use crate::domains::stats::types::{CurrencyStat, DonationSummaryStats, MonthlyTrend, RangeSummary};
use crate::errors::{DomainError, DomainResult, ValidationError};
use crate::utils::parse_date_bound;

fn average(total: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

/// Headline statistics over completed donations and the enriched donor list.
pub fn summarize(donations: &[Donation], donors: &[EnrichedDonor]) -> DonationSummaryStats {
    let mut total_donations = 0usize;
    let mut total_amount = 0.0;
    let mut currency_stats: HashMap<String, CurrencyStat> = HashMap::new();

    for donation in donations.iter().filter(|d| d.is_completed()) {
        total_donations += 1;
        total_amount += donation.amount;

        let stat = currency_stats.entry(donation.currency_code()).or_default();
        stat.count += 1;
        stat.total += donation.amount;
    }

    DonationSummaryStats {
        total_donations,
        total_amount,
        total_donors: donors.len(),
        active_donors: donors.iter().filter(|d| d.total_donated > 0.0).count(),
        average_donation: average(total_amount, total_donations),
        currency_stats,
    }
}

/// Most recent donations of any status, newest first. Equal timestamps keep input order.
pub fn recent_donations(donations: &[Donation], limit: usize) -> Vec<Donation> {
    let mut sorted: Vec<&Donation> = donations.iter().collect();
    sorted.sort_by(|a, b| b.created_at_utc().cmp(&a.created_at_utc()));
    sorted.into_iter().take(limit).cloned().collect()
}

/// Completed donations created between the start of `start_date` and the end of `end_date`.
pub fn summarize_range(donations: &[Donation], start_date: &str, end_date: &str) -> DomainResult<RangeSummary> {
    let start = parse_date_bound(start_date)
        .ok_or_else(|| ValidationError::format("start_date", "Invalid date format. Expected YYYY-MM-DD"))?;
    let end = parse_date_bound(end_date)
        .ok_or_else(|| ValidationError::format("end_date", "Invalid date format. Expected YYYY-MM-DD"))?;

    let (from, to) = (start.start(), end.end());
    if from > to {
        return Err(DomainError::Validation(ValidationError::custom(
            "Start date cannot be after end date",
        )));
    }

    let in_range: Vec<&Donation> = donations
        .iter()
        .filter(|d| d.is_completed())
        .filter(|d| matches!(d.created_at_utc(), Some(ts) if ts >= from && ts <= to))
        .collect();

    let total_amount = in_range.iter().fold(0.0, |sum, d| sum + d.amount);
    let unique_donors: HashSet<&str> = in_range.iter().map(|d| d.donor_email_or_unknown()).collect();

    Ok(RangeSummary {
        start_date: start_date.trim().to_string(),
        end_date: end_date.trim().to_string(),
        total_donations: in_range.len(),
        total_amount,
        unique_donors: unique_donors.len(),
        average_donation: average(total_amount, in_range.len()),
    })
}

/// Completed donations grouped by calendar month (UTC), oldest month first.
pub fn monthly_trends(donations: &[Donation]) -> Vec<MonthlyTrend> {
    let mut months: BTreeMap<String, (usize, f64)> = BTreeMap::new();
    for donation in donations.iter().filter(|d| d.is_completed()) {
        let Some(created) = donation.created_at_utc() else {
            continue;
        };
        let entry = months.entry(created.format("%Y-%m").to_string()).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += donation.amount;
    }

    let mut previous_total: Option<f64> = None;
    months
        .into_iter()
        .map(|(month, (count, total))| {
            let growth_percent = match previous_total {
                Some(prev) if prev > 0.0 => Some((total - prev) / prev * 100.0),
                _ => None,
            };
            previous_total = Some(total);
            MonthlyTrend {
                month,
                donation_count: count,
                total_amount: total,
                average_donation: average(total, count),
                growth_percent,
            }
        })
        .collect()
}
