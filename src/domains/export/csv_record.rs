use serde::Serialize;

use crate::domains::donation::types::Donation;
use crate::domains::donor::types::EnrichedDonor;
use crate::domains::stats::types::MonthlyTrend;

/// Spreadsheet-safe cell text: drops line/paragraph separators, turns
/// non-breaking spaces into plain ones and trims.
pub fn sanitize_cell(s: &str) -> String {
    s.chars()
        .filter_map(|c| match c {
            '\u{2028}' | '\u{2029}' => None,
            '\u{00A0}' => Some(' '),
            c => Some(c),
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Trait for types that can be exported to CSV
pub trait CsvRecord: Serialize {
    /// Get CSV headers for this type
    fn headers() -> Vec<&'static str>;

    /// Convert to CSV row
    fn to_csv(&self) -> Vec<String>;
}

// Helper for converting values to CSV-safe strings
pub fn csv_value_to_string<T: std::fmt::Display>(value: &T) -> String {
    sanitize_cell(&value.to_string())
}

// Helper for optional values
pub fn csv_optional_to_string<T: std::fmt::Display>(value: &Option<T>) -> String {
    value.as_ref().map(|v| csv_value_to_string(v)).unwrap_or_default()
}

/// Amounts always carry two decimals so spreadsheets read them as money.
pub fn csv_amount_to_string(amount: f64) -> String {
    format!("{:.2}", amount)
}

impl CsvRecord for Donation {
    fn headers() -> Vec<&'static str> {
        vec![
            "id",
            "donor_name",
            "donor_email",
            "amount",
            "currency",
            "status",
            "type",
            "interval",
            "project_name",
            "created_at",
            "stripe_payment_intent",
        ]
    }

    fn to_csv(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            csv_value_to_string(&self.donor_name_or_unknown()),
            csv_value_to_string(&self.donor_email_or_unknown()),
            csv_amount_to_string(self.amount),
            self.currency_code(),
            self.status.to_string(),
            csv_optional_to_string(&self.donation_type),
            csv_optional_to_string(&self.interval),
            csv_optional_to_string(&self.project_name),
            csv_value_to_string(&self.created_at),
            csv_optional_to_string(&self.stripe_payment_intent),
        ]
    }
}

impl CsvRecord for EnrichedDonor {
    fn headers() -> Vec<&'static str> {
        vec![
            "id",
            "name",
            "email",
            "total_donated",
            "primary_currency",
            "donation_count",
            "completed_donation_count",
            "failed_donation_count",
            "expired_donation_count",
            "last_donation_date",
        ]
    }

    fn to_csv(&self) -> Vec<String> {
        vec![
            self.id().to_string(),
            csv_value_to_string(&self.donor.name),
            csv_value_to_string(&self.donor.email),
            csv_amount_to_string(self.total_donated),
            csv_optional_to_string(&self.primary_currency),
            self.donation_count.to_string(),
            self.completed_donation_count.to_string(),
            self.failed_donation_count.to_string(),
            self.expired_donation_count.to_string(),
            csv_optional_to_string(&self.last_donation_date),
        ]
    }
}

impl CsvRecord for MonthlyTrend {
    fn headers() -> Vec<&'static str> {
        vec!["month", "donation_count", "total_amount", "average_donation", "growth_percent"]
    }

    fn to_csv(&self) -> Vec<String> {
        vec![
            self.month.clone(),
            self.donation_count.to_string(),
            csv_amount_to_string(self.total_amount),
            csv_amount_to_string(self.average_donation),
            self.growth_percent.map(|g| format!("{:.1}", g)).unwrap_or_default(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::donation::normalize::normalize_donation;
    use crate::domains::donation::types::RawDonation;
    use serde_json::json;

    #[test]
    fn test_sanitize_cell() {
        assert_eq!(sanitize_cell(" a\u{00A0}b\u{2028} "), "a b");
    }

    #[test]
    fn test_donation_row_matches_headers() {
        let raw: RawDonation = serde_json::from_value(json!({
            "id": 12,
            "donor_id": 1,
            "amount": "100.5",
            "currency": "usd",
            "status": "completed",
            "type": "one-time",
            "created_at": "2025-01-01T10:00:00Z"
        }))
        .unwrap();
        let donation = normalize_donation(raw);
        let row = donation.to_csv();

        assert_eq!(row.len(), Donation::headers().len());
        assert_eq!(row[0], "12");
        assert_eq!(row[1], "Unknown");
        assert_eq!(row[3], "100.50");
        assert_eq!(row[4], "USD");
        assert_eq!(row[6], "one-time");
        assert_eq!(row[7], "");
    }

    #[test]
    fn test_trend_row() {
        let trend = MonthlyTrend {
            month: "2025-02".to_string(),
            donation_count: 2,
            total_amount: 51.0,
            average_donation: 25.5,
            growth_percent: Some(-50.0),
        };
        assert_eq!(trend.to_csv(), vec!["2025-02", "2", "51.00", "25.50", "-50.0"]);
        assert_eq!(trend.to_csv().len(), MonthlyTrend::headers().len());
    }
}
