use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::currency::normalize_code;
use crate::utils::parse_timestamp;

/// Placeholder shown for a donation whose donor cannot be resolved.
pub const UNKNOWN_DONOR: &str = "Unknown";

/// Payment status enum
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DonationStatus {
    Initiated,
    Pending,
    Completed,
    Failed,
    Expired,
    /// Any status string the backend sends that this core does not know
    #[default]
    #[serde(other)]
    Unknown,
}

impl DonationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DonationStatus::Initiated => "initiated",
            DonationStatus::Pending => "pending",
            DonationStatus::Completed => "completed",
            DonationStatus::Failed => "failed",
            DonationStatus::Expired => "expired",
            DonationStatus::Unknown => "unknown",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "initiated" => Some(DonationStatus::Initiated),
            "pending" => Some(DonationStatus::Pending),
            "completed" => Some(DonationStatus::Completed),
            "failed" => Some(DonationStatus::Failed),
            "expired" => Some(DonationStatus::Expired),
            _ => None,
        }
    }

    /// Settled statuses: the only ones shown in donor aggregates and the donations table.
    pub fn is_relevant(&self) -> bool {
        matches!(
            self,
            DonationStatus::Completed | DonationStatus::Failed | DonationStatus::Expired
        )
    }
}

impl fmt::Display for DonationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One-time gift or recurring subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DonationType {
    #[serde(rename = "one-time")]
    OneTime,
    #[serde(rename = "subscription")]
    Subscription,
    #[serde(other, rename = "other")]
    Other,
}

impl DonationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DonationType::OneTime => "one-time",
            DonationType::Subscription => "subscription",
            DonationType::Other => "other",
        }
    }

    /// Unrecognized labels map to `Other`.
    pub fn from_label(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "one-time" => DonationType::OneTime,
            "subscription" => DonationType::Subscription,
            _ => DonationType::Other,
        }
    }
}

/// Field decoders for backend rows. A wrong-typed or null field degrades to an
/// empty value instead of failing the whole payload.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::{DonationStatus, DonationType, RawDonation};
    use crate::domains::donation::normalize::{decode_rows, normalize_amount};

    /// Integer id, or `None` for null, missing or non-numeric values.
    pub fn id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(optional_string(deserializer)?.unwrap_or_default())
    }

    pub fn optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    pub fn status<'de, D>(deserializer: D) -> Result<DonationStatus, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => DonationStatus::from_str(&s).unwrap_or(DonationStatus::Unknown),
            _ => DonationStatus::Unknown,
        })
    }

    pub fn donation_type<'de, D>(deserializer: D) -> Result<Option<DonationType>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => Some(DonationType::from_label(&s)),
            _ => None,
        })
    }

    /// Numeric column that may arrive as a number or a numeric string.
    pub fn amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => None,
            value => Some(normalize_amount(&value)),
        })
    }

    pub fn donation_rows<'de, D>(deserializer: D) -> Result<Vec<RawDonation>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(rows) => decode_rows(rows, "project donation"),
            _ => Vec::new(),
        })
    }
}

impl fmt::Display for DonationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// RawDonation - a donation row exactly as the backend returns it.
///
/// `amount` may arrive as a number, a numeric string, or garbage; it is only
/// coerced when the row is normalized into a [`Donation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDonation {
    pub id: i64,
    /// `None` when the backend sent no usable donor reference
    #[serde(default, deserialize_with = "lenient::id")]
    pub donor_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::id")]
    pub project_id: Option<i64>,
    #[serde(default)]
    pub amount: serde_json::Value,
    #[serde(default, deserialize_with = "lenient::string")]
    pub currency: String,
    #[serde(default, deserialize_with = "lenient::status")]
    pub status: DonationStatus,
    #[serde(rename = "type", default, deserialize_with = "lenient::donation_type")]
    pub donation_type: Option<DonationType>,
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub interval: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub stripe_checkout_session_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub stripe_payment_intent: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub stripe_subscription_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub created_at: String,
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub updated_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub project_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub project_description: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub donor_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub donor_email: Option<String>,
}

/// Donation entity after normalization: `amount` is always finite and non-negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donation {
    pub id: i64,
    pub donor_id: Option<i64>,
    pub project_id: Option<i64>,
    pub amount: f64,
    pub currency: String,
    pub status: DonationStatus,
    #[serde(rename = "type")]
    pub donation_type: Option<DonationType>,
    pub interval: Option<String>,
    pub stripe_checkout_session_id: Option<String>,
    pub stripe_payment_intent: Option<String>,
    pub stripe_subscription_id: Option<String>,
    pub created_at: String,
    pub updated_at: Option<String>,
    pub project_name: Option<String>,
    pub project_description: Option<String>,
    pub donor_name: Option<String>,
    pub donor_email: Option<String>,
}

impl Donation {
    pub fn is_relevant(&self) -> bool {
        self.status.is_relevant()
    }

    pub fn is_completed(&self) -> bool {
        self.status == DonationStatus::Completed
    }

    /// Upper-cased currency code used for display and grouping
    pub fn currency_code(&self) -> String {
        normalize_code(&self.currency)
    }

    /// Parsed `created_at`; `None` when the backend sent something unreadable
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }

    pub fn donor_name_or_unknown(&self) -> &str {
        self.donor_name.as_deref().unwrap_or(UNKNOWN_DONOR)
    }

    pub fn donor_email_or_unknown(&self) -> &str {
        self.donor_email.as_deref().unwrap_or(UNKNOWN_DONOR)
    }
}

/// Project detail payload returned with its donations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectWithDonations {
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub donation_goal: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub donation_raised: Option<f64>,
    #[serde(default, deserialize_with = "lenient::donation_rows")]
    pub donations: Vec<RawDonation>,
}
