use serde::{Deserialize, Serialize};

/// Donor entity - represents a donor as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donor {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub stripe_customer_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Donor {
    pub fn new(id: i64, name: &str, email: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            email: email.to_string(),
            stripe_customer_id: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Case-insensitive substring match on name or email. `needle` must already be lower-cased.
    pub fn matches_search(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.email.to_lowercase().contains(needle)
    }
}

/// Donor joined with the aggregates computed from their settled donations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedDonor {
    #[serde(flatten)]
    pub donor: Donor,
    /// Sum of completed donation amounts
    pub total_donated: f64,
    /// Completed + failed + expired donations
    pub donation_count: usize,
    pub completed_donation_count: usize,
    pub failed_donation_count: usize,
    pub expired_donation_count: usize,
    pub has_failed_payments: bool,
    pub has_expired_payments: bool,
    /// `created_at` of the latest completed donation
    pub last_donation_date: Option<String>,
    /// The only currency used across completed donations; `None` means mixed
    pub primary_currency: Option<String>,
}

impl EnrichedDonor {
    pub fn id(&self) -> i64 {
        self.donor.id
    }

    pub fn has_payment_issues(&self) -> bool {
        self.has_failed_payments || self.has_expired_payments
    }
}
