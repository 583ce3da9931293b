//! Coercion of backend donation rows into [`Donation`] records.
//!
//! Nothing here fails: a malformed amount degrades to zero so that one bad
//! row never blocks the rest of the dashboard.

use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::domains::donation::types::{Donation, RawDonation, UNKNOWN_DONOR};
use crate::domains::donor::types::Donor;

fn leading_decimal_regex() -> &'static Regex {
    static LEADING_DECIMAL: OnceLock<Regex> = OnceLock::new();
    LEADING_DECIMAL.get_or_init(|| {
        Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?").unwrap()
    })
}

fn sanitize(amount: f64) -> f64 {
    if amount.is_finite() && amount > 0.0 {
        amount
    } else {
        0.0
    }
}

/// Parse the leading decimal number of `raw` (`"100.50"`, `" 12abc"`).
/// Anything that does not start with a number, or is negative, yields `0`.
pub fn parse_amount(raw: &str) -> f64 {
    let trimmed = raw.trim_start();
    leading_decimal_regex()
        .find(trimmed)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .map(sanitize)
        .unwrap_or(0.0)
}

/// Coerce a JSON amount of any shape into a finite, non-negative number.
pub fn normalize_amount(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().map(sanitize).unwrap_or(0.0),
        Value::String(s) => parse_amount(s),
        _ => 0.0,
    }
}

/// Decode each element of a JSON array on its own, dropping the ones that
/// cannot be read at all. `what` names the rows in the log.
pub fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>, what: &str) -> Vec<T> {
    let total = rows.len();
    let decoded: Vec<T> = rows
        .into_iter()
        .filter_map(|row| match serde_json::from_value::<T>(row) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Skipping unreadable {} row: {}", what, e);
                None
            }
        })
        .collect();

    if decoded.len() < total {
        log::warn!("Dropped {} of {} {} row(s)", total - decoded.len(), total, what);
    }
    decoded
}

/// Normalize a single row. Every field except `amount` passes through unchanged.
pub fn normalize_donation(raw: RawDonation) -> Donation {
    let amount = normalize_amount(&raw.amount);
    if amount == 0.0 && !raw.amount.is_null() {
        log::warn!("Donation {} has unusable amount {}; treating it as 0", raw.id, raw.amount);
    }

    Donation {
        id: raw.id,
        donor_id: raw.donor_id,
        project_id: raw.project_id,
        amount,
        currency: raw.currency,
        status: raw.status,
        donation_type: raw.donation_type,
        interval: raw.interval,
        stripe_checkout_session_id: raw.stripe_checkout_session_id,
        stripe_payment_intent: raw.stripe_payment_intent,
        stripe_subscription_id: raw.stripe_subscription_id,
        created_at: raw.created_at,
        updated_at: raw.updated_at,
        project_name: raw.project_name,
        project_description: raw.project_description,
        donor_name: raw.donor_name,
        donor_email: raw.donor_email,
    }
}

impl From<RawDonation> for Donation {
    fn from(raw: RawDonation) -> Self {
        normalize_donation(raw)
    }
}

/// Fill `donor_name`/`donor_email` from the donor list, `"Unknown"` when the
/// donor id is missing or does not resolve.
pub fn attach_donor_identity(donations: &mut [Donation], donors: &[Donor]) {
    let by_id: HashMap<i64, &Donor> = donors.iter().map(|d| (d.id, d)).collect();
    let mut unresolved = 0usize;

    for donation in donations.iter_mut() {
        match donation.donor_id.and_then(|id| by_id.get(&id)) {
            Some(donor) => {
                donation.donor_name = Some(donor.name.clone());
                donation.donor_email = Some(donor.email.clone());
            }
            None => {
                unresolved += 1;
                donation.donor_name = Some(UNKNOWN_DONOR.to_string());
                donation.donor_email = Some(UNKNOWN_DONOR.to_string());
            }
        }
    }

    if unresolved > 0 {
        log::warn!("{} donation(s) reference a donor that was not returned", unresolved);
    }
}

/// Normalize a fetched batch and join donor identity onto each row.
pub fn normalize_donations(raw: Vec<RawDonation>, donors: &[Donor]) -> Vec<Donation> {
    let mut donations: Vec<Donation> = raw.into_iter().map(normalize_donation).collect();
    attach_donor_identity(&mut donations, donors);
    log::debug!("Normalized {} donation(s) against {} donor(s)", donations.len(), donors.len());
    donations
}
