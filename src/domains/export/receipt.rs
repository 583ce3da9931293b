use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::domains::donation::types::Donation;
use crate::errors::{ServiceError, ServiceResult};
use crate::utils::date_label;

/// Organization details printed on the receipt header
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reg_number: Option<String>,
}

/// Body of the receipt endpoint: the donation fields flattened next to `organizationInfo`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptRequest {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub amount: f64,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "created_at")]
    pub created_at: String,
    /// `one-time` or `subscription`
    pub method: String,
    #[serde(rename = "transaction_id", skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_info: Option<OrganizationInfo>,
}

impl ReceiptRequest {
    pub fn from_donation(donation: &Donation, organization_info: Option<OrganizationInfo>) -> Self {
        Self {
            id: donation.id,
            name: donation.donor_name_or_unknown().to_string(),
            email: donation.donor_email_or_unknown().to_string(),
            amount: donation.amount,
            currency: donation.currency_code(),
            message: donation.project_name.as_ref().map(|p| format!("Donation to {}", p)),
            created_at: donation.created_at.clone(),
            method: donation
                .donation_type
                .map(|t| t.as_str().to_string())
                .unwrap_or_else(|| "one-time".to_string()),
            transaction_id: donation
                .stripe_payment_intent
                .clone()
                .or_else(|| donation.stripe_checkout_session_id.clone()),
            organization_info,
        }
    }
}

/// `donation-receipt-{id}-{YYYY-MM-DD}.pdf`
pub fn receipt_file_name(donation: &Donation) -> String {
    format!("donation-receipt-{}-{}.pdf", donation.id, date_label(&donation.created_at))
}

/// Renders PDF receipts
#[async_trait]
pub trait ReceiptService: Send + Sync {
    /// PDF bytes for one receipt
    async fn generate_receipt(&self, request: &ReceiptRequest) -> ServiceResult<Vec<u8>>;
}

/// Implementation of ReceiptService backed by the server-side PDF endpoint
pub struct ApiReceiptService {
    client: Client,
    base_url: String,
}

impl ApiReceiptService {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::builder().build().unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ReceiptService for ApiReceiptService {
    async fn generate_receipt(&self, request: &ReceiptRequest) -> ServiceResult<Vec<u8>> {
        debug!("Requesting receipt for donation {}", request.id);
        let url = format!("{}/api/pdf/download-receipt", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!("Receipt request for donation {} failed: {}", request.id, e);
                ServiceError::Network(format!("Failed to generate PDF receipt: {}", e))
            })?;

        if response.status().is_success() {
            let bytes = response
                .bytes()
                .await
                .map_err(|e| ServiceError::ExternalService(format!("Failed to read PDF receipt: {}", e)))?;
            Ok(bytes.to_vec())
        } else {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to get error details".to_string());
            Err(ServiceError::ExternalService(format!(
                "Server returned error {}: {}",
                status, error_text
            )))
        }
    }
}
