use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use crate::domains::donation::types::{Donation, DonationStatus};
use crate::domains::donor::types::{Donor, EnrichedDonor};

/// Join donors to their settled donations and compute per-donor aggregates.
///
/// Donors without a completed donation are dropped. The result is ordered by
/// `total_donated`, highest first; equal totals keep the donor list's order.
pub fn enrich_donors(donations: &[Donation], donors: &[Donor]) -> Vec<EnrichedDonor> {
    let mut relevant_by_donor: HashMap<i64, Vec<&Donation>> = HashMap::new();
    for donation in donations.iter().filter(|d| d.is_relevant()) {
        if let Some(donor_id) = donation.donor_id {
            relevant_by_donor.entry(donor_id).or_default().push(donation);
        }
    }

    let mut enriched: Vec<EnrichedDonor> = donors
        .iter()
        .map(|donor| {
            let relevant = relevant_by_donor
                .get(&donor.id)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            enrich_donor(donor, relevant)
        })
        .filter(|donor| donor.completed_donation_count > 0)
        .collect();

    enriched.sort_by(|a, b| {
        b.total_donated
            .partial_cmp(&a.total_donated)
            .unwrap_or(Ordering::Equal)
    });

    log::debug!(
        "Enriched {} of {} donor(s) from {} donation(s)",
        enriched.len(),
        donors.len(),
        donations.len()
    );
    enriched
}

fn enrich_donor(donor: &Donor, relevant: &[&Donation]) -> EnrichedDonor {
    let completed: Vec<&Donation> = relevant
        .iter()
        .copied()
        .filter(|d| d.status == DonationStatus::Completed)
        .collect();
    let failed_count = relevant.iter().filter(|d| d.status == DonationStatus::Failed).count();
    let expired_count = relevant.iter().filter(|d| d.status == DonationStatus::Expired).count();

    let total_donated = completed.iter().fold(0.0, |sum, d| sum + d.amount);

    EnrichedDonor {
        donor: donor.clone(),
        total_donated,
        donation_count: relevant.len(),
        completed_donation_count: completed.len(),
        failed_donation_count: failed_count,
        expired_donation_count: expired_count,
        has_failed_payments: failed_count > 0,
        has_expired_payments: expired_count > 0,
        last_donation_date: latest_created_at(&completed),
        primary_currency: single_currency(&completed),
    }
}

/// `created_at` of the latest donation; the earliest in input order wins a tie.
/// Unreadable timestamps sort before every readable one.
fn latest_created_at(donations: &[&Donation]) -> Option<String> {
    let mut latest: Option<&Donation> = None;
    for &donation in donations {
        let newer = match latest {
            None => true,
            Some(current) => donation.created_at_utc() > current.created_at_utc(),
        };
        if newer {
            latest = Some(donation);
        }
    }
    latest.map(|d| d.created_at.clone())
}

fn single_currency(donations: &[&Donation]) -> Option<String> {
    let codes: BTreeSet<String> = donations.iter().map(|d| d.currency_code()).collect();
    if codes.len() != 1 {
        return None;
    }
    codes.into_iter().next().filter(|code| !code.is_empty())
}

/// Case-insensitive search over donor name and email. A blank query keeps everyone.
pub fn search_donors<'a>(donors: &'a [EnrichedDonor], query: &str) -> Vec<&'a EnrichedDonor> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return donors.iter().collect();
    }
    donors.iter().filter(|d| d.donor.matches_search(&needle)).collect()
}

/// Settled donations for one donor, in input order (the donor detail list).
pub fn relevant_donations_for_donor(donations: &[Donation], donor_id: i64) -> Vec<Donation> {
    donations
        .iter()
        .filter(|d| d.donor_id == Some(donor_id) && d.is_relevant())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::donation::normalize::normalize_donations;
    use crate::domains::donation::types::RawDonation;
    use serde_json::json;

    fn donation(id: i64, donor_id: i64, amount: serde_json::Value, status: &str, currency: &str, created_at: &str) -> RawDonation {
        serde_json::from_value(json!({
            "id": id,
            "donor_id": donor_id,
            "amount": amount,
            "currency": currency,
            "status": status,
            "type": "one-time",
            "created_at": created_at
        }))
        .unwrap()
    }

    fn donors() -> Vec<Donor> {
        vec![
            Donor::new(1, "Jane", "j@x.com"),
            Donor::new(2, "John Banda", "johnbanda@example.com"),
            Donor::new(3, "Grace Mwansa", "grace@example.com"),
        ]
    }

    #[test]
    fn test_completed_and_failed_for_one_donor() {
        let donors = vec![Donor::new(1, "Jane", "j@x.com")];
        let donations = normalize_donations(
            vec![
                donation(1, 1, json!("100.50"), "completed", "usd", "2025-01-01"),
                donation(2, 1, json!(50), "failed", "usd", "2025-01-02"),
            ],
            &donors,
        );

        let enriched = enrich_donors(&donations, &donors);
        assert_eq!(enriched.len(), 1);
        let jane = &enriched[0];
        assert_eq!(jane.total_donated, 100.5);
        assert_eq!(jane.completed_donation_count, 1);
        assert_eq!(jane.failed_donation_count, 1);
        assert_eq!(jane.expired_donation_count, 0);
        assert_eq!(jane.donation_count, 2);
        assert!(jane.has_failed_payments);
        assert!(!jane.has_expired_payments);
        assert_eq!(jane.primary_currency.as_deref(), Some("USD"));
        assert_eq!(jane.last_donation_date.as_deref(), Some("2025-01-01"));
    }

    #[test]
    fn test_mixed_currency_has_no_primary() {
        let donors = vec![Donor::new(1, "Jane", "j@x.com")];
        let donations = normalize_donations(
            vec![
                donation(1, 1, json!(10), "completed", "USD", "2025-01-01"),
                donation(2, 1, json!(10), "completed", "EUR", "2025-01-02"),
            ],
            &donors,
        );
        let enriched = enrich_donors(&donations, &donors);
        assert!(enriched[0].primary_currency.is_none());
    }

    #[test]
    fn test_currency_case_does_not_split_primary() {
        let donors = vec![Donor::new(1, "Jane", "j@x.com")];
        let donations = normalize_donations(
            vec![
                donation(1, 1, json!(10), "completed", "usd", "2025-01-01"),
                donation(2, 1, json!(10), "completed", "USD", "2025-01-02"),
                donation(3, 1, json!(10), "failed", "EUR", "2025-01-03"),
            ],
            &donors,
        );
        let enriched = enrich_donors(&donations, &donors);
        assert_eq!(enriched[0].primary_currency.as_deref(), Some("USD"));
    }

    #[test]
    fn test_donors_without_completed_donations_are_dropped() {
        let donations = normalize_donations(
            vec![
                donation(1, 1, json!(10), "completed", "usd", "2025-01-01"),
                donation(2, 2, json!(10), "failed", "usd", "2025-01-01"),
                donation(3, 2, json!(10), "pending", "usd", "2025-01-01"),
                donation(4, 42, json!(10), "completed", "usd", "2025-01-01"),
            ],
            &donors(),
        );
        let enriched = enrich_donors(&donations, &donors());
        let ids: Vec<i64> = enriched.iter().map(|d| d.id()).collect();
        assert_eq!(ids, vec![1]);
        assert!(enriched.iter().all(|d| d.completed_donation_count > 0));
    }

    #[test]
    fn test_pending_and_initiated_are_ignored() {
        let donors = vec![Donor::new(1, "Jane", "j@x.com")];
        let donations = normalize_donations(
            vec![
                donation(1, 1, json!(10), "completed", "usd", "2025-01-01"),
                donation(2, 1, json!(99), "pending", "usd", "2025-02-01"),
                donation(3, 1, json!(99), "initiated", "usd", "2025-02-01"),
            ],
            &donors,
        );
        let enriched = enrich_donors(&donations, &donors);
        assert_eq!(enriched[0].total_donated, 10.0);
        assert_eq!(enriched[0].donation_count, 1);
    }

    #[test]
    fn test_sorted_by_total_with_stable_ties() {
        let donations = normalize_donations(
            vec![
                donation(1, 1, json!(50), "completed", "usd", "2025-01-01"),
                donation(2, 2, json!(200), "completed", "usd", "2025-01-01"),
                donation(3, 3, json!(50), "completed", "usd", "2025-01-01"),
            ],
            &donors(),
        );
        let enriched = enrich_donors(&donations, &donors());
        let ids: Vec<i64> = enriched.iter().map(|d| d.id()).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_last_donation_date_picks_latest_completed() {
        let donors = vec![Donor::new(1, "Jane", "j@x.com")];
        let donations = normalize_donations(
            vec![
                donation(1, 1, json!(10), "completed", "usd", "2025-01-05T10:00:00Z"),
                donation(2, 1, json!(10), "completed", "usd", "2025-03-01T09:00:00Z"),
                donation(3, 1, json!(10), "failed", "usd", "2025-04-01T09:00:00Z"),
                donation(4, 1, json!(10), "completed", "usd", "not-a-date"),
                donation(5, 1, json!(10), "completed", "usd", "2025-03-01T09:00:00.000Z"),
            ],
            &donors,
        );
        let enriched = enrich_donors(&donations, &donors);
        assert_eq!(enriched[0].last_donation_date.as_deref(), Some("2025-03-01T09:00:00Z"));
    }

    #[test]
    fn test_total_matches_completed_sum_per_donor() {
        let donations = normalize_donations(
            vec![
                donation(1, 1, json!("10.25"), "completed", "usd", "2025-01-01"),
                donation(2, 1, json!("abc"), "completed", "usd", "2025-01-02"),
                donation(3, 2, json!(7), "completed", "zmw", "2025-01-03"),
                donation(4, 2, json!(3), "completed", "zmw", "2025-01-04"),
                donation(5, 2, json!(1000), "expired", "zmw", "2025-01-05"),
            ],
            &donors(),
        );
        for enriched in enrich_donors(&donations, &donors()) {
            let expected = donations
                .iter()
                .filter(|d| d.donor_id == Some(enriched.id()) && d.is_completed())
                .fold(0.0, |sum, d| sum + d.amount);
            assert_eq!(enriched.total_donated, expected);
        }
    }

    #[test]
    fn test_search_donors() {
        let donations = normalize_donations(
            vec![
                donation(1, 1, json!(10), "completed", "usd", "2025-01-01"),
                donation(2, 2, json!(20), "completed", "usd", "2025-01-01"),
            ],
            &donors(),
        );
        let enriched = enrich_donors(&donations, &donors());
        assert_eq!(search_donors(&enriched, "  ").len(), 2);
        let hits = search_donors(&enriched, "BANDA");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id(), 2);
        assert_eq!(search_donors(&enriched, "x.com").len(), 1);
        assert!(search_donors(&enriched, "nobody").is_empty());
    }

    #[test]
    fn test_relevant_donations_for_donor() {
        let donations = normalize_donations(
            vec![
                donation(1, 1, json!(10), "completed", "usd", "2025-01-01"),
                donation(2, 1, json!(10), "pending", "usd", "2025-01-01"),
                donation(3, 1, json!(10), "expired", "usd", "2025-01-01"),
                donation(4, 2, json!(10), "completed", "usd", "2025-01-01"),
            ],
            &donors(),
        );
        let ids: Vec<i64> = relevant_donations_for_donor(&donations, 1).iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }
}
