use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::auth::AuthContext;
use crate::domains::donation::normalize::decode_rows;
use crate::domains::donation::types::{ProjectWithDonations, RawDonation};
use crate::domains::donor::types::Donor;
use crate::errors::{ServiceError, ServiceResult};

/// Read-only access to the donations backend
#[async_trait]
pub trait DonationRepository: Send + Sync {
    /// All donations, one-time and subscription
    async fn fetch_donations(&self, auth: &AuthContext) -> ServiceResult<Vec<RawDonation>>;

    async fn fetch_donors(&self, auth: &AuthContext) -> ServiceResult<Vec<Donor>>;

    async fn fetch_donations_by_donor(&self, donor_id: i64, auth: &AuthContext) -> ServiceResult<Vec<RawDonation>>;

    async fn fetch_project_with_donations(&self, project_id: i64, auth: &AuthContext) -> ServiceResult<ProjectWithDonations>;
}

/// Implementation of DonationRepository backed by the REST API
pub struct ApiDonationRepository {
    client: Client,
    base_url: String,
}

impl ApiDonationRepository {
    pub fn new(base_url: &str) -> Self {
        let client = Client::builder().build().unwrap_or_default();
        Self::with_client(client, base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn donations_url(&self) -> String {
        format!("{}/api/donations", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, what: &str, auth: &AuthContext) -> ServiceResult<T> {
        debug!("Fetching {} from {}", what, url);

        let response = self
            .client
            .get(url)
            .header("Authorization", auth.authorization_header())
            .send()
            .await
            .map_err(|e| {
                error!("Request for {} failed: {}", what, e);
                ServiceError::Network(format!("Failed to fetch {}: {}", what, e))
            })?;

        parse_response(response, what).await
    }

    /// A JSON array decoded row by row, so one unreadable row is dropped instead of failing the list.
    async fn get_rows<T: DeserializeOwned>(&self, url: &str, what: &str, auth: &AuthContext) -> ServiceResult<Vec<T>> {
        let rows: Vec<Value> = self.get_json(url, what, auth).await?;
        Ok(decode_rows(rows, what))
    }
}

async fn parse_response<T: DeserializeOwned>(response: Response, what: &str) -> ServiceResult<T> {
    if response.status().is_success() {
        response
            .json::<T>()
            .await
            .map_err(|e| ServiceError::ExternalService(format!("Failed to parse {} response: {}", what, e)))
    } else {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to get error details".to_string());
        error!("Fetching {} returned {}: {}", what, status, error_text);

        Err(ServiceError::ExternalService(format!(
            "Server returned error {}: {}",
            status, error_text
        )))
    }
}

#[async_trait]
impl DonationRepository for ApiDonationRepository {
    async fn fetch_donations(&self, auth: &AuthContext) -> ServiceResult<Vec<RawDonation>> {
        self.get_rows(&self.donations_url(), "donations", auth).await
    }

    async fn fetch_donors(&self, auth: &AuthContext) -> ServiceResult<Vec<Donor>> {
        let url = format!("{}/donors", self.donations_url());
        self.get_rows(&url, "donors", auth).await
    }

    async fn fetch_donations_by_donor(&self, donor_id: i64, auth: &AuthContext) -> ServiceResult<Vec<RawDonation>> {
        let url = format!("{}?donor_id={}", self.donations_url(), donor_id);
        self.get_rows(&url, "donor donations", auth).await
    }

    async fn fetch_project_with_donations(&self, project_id: i64, auth: &AuthContext) -> ServiceResult<ProjectWithDonations> {
        let url = format!("{}/project/{}", self.donations_url(), project_id);
        self.get_json(&url, "project donations", auth).await
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const DONATIONS_BODY: &str = r#"[
        {"id": 1, "donor_id": 3, "amount": "100.50", "currency": "usd", "status": "completed",
         "type": "one-time", "created_at": "2025-01-01T10:00:00Z"},
        {"id": 2, "donor_id": 3, "amount": 25, "currency": "usd", "status": "pending",
         "type": "subscription", "interval": "month", "created_at": "2025-01-02T10:00:00Z"}
    ]"#;

    fn auth() -> AuthContext {
        AuthContext::new("abc123", None)
    }

    #[tokio::test]
    async fn test_fetch_donations_sends_bearer_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/donations")
            .match_header("authorization", "Bearer abc123")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(DONATIONS_BODY)
            .create_async()
            .await;

        let repo = ApiDonationRepository::new(&server.url());
        let donations = repo.fetch_donations(&auth()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(donations.len(), 2);
        assert_eq!(donations[0].amount, serde_json::json!("100.50"));
        assert_eq!(donations[1].interval.as_deref(), Some("month"));
    }

    #[tokio::test]
    async fn test_fetch_donors_with_trailing_slash_base() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/donations/donors")
            .with_status(200)
            .with_body(r#"[{"id": 3, "name": "Jane", "email": "j@x.com"}]"#)
            .create_async()
            .await;

        let repo = ApiDonationRepository::new(&format!("{}/", server.url()));
        let donors = repo.fetch_donors(&AuthContext::anonymous()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(donors, vec![Donor::new(3, "Jane", "j@x.com")]);
    }

    #[tokio::test]
    async fn test_fetch_by_donor_and_project() {
        let mut server = mockito::Server::new_async().await;
        let by_donor = server
            .mock("GET", "/api/donations")
            .match_query(Matcher::UrlEncoded("donor_id".into(), "3".into()))
            .with_status(200)
            .with_body(DONATIONS_BODY)
            .create_async()
            .await;
        let project = server
            .mock("GET", "/api/donations/project/7")
            .with_status(200)
            .with_body(r#"{"id": 7, "name": "Clean Water", "donation_goal": 5000, "donations": []}"#)
            .create_async()
            .await;

        let repo = ApiDonationRepository::new(&server.url());
        assert_eq!(repo.fetch_donations_by_donor(3, &auth()).await.unwrap().len(), 2);
        let fetched = repo.fetch_project_with_donations(7, &auth()).await.unwrap();

        by_donor.assert_async().await;
        project.assert_async().await;
        assert_eq!(fetched.name, "Clean Water");
        assert_eq!(fetched.donation_goal, Some(5000.0));
        assert!(fetched.donations.is_empty());
    }

    #[tokio::test]
    async fn test_project_amounts_sent_as_strings() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/donations/project/8")
            .with_status(200)
            .with_body(
                r#"{"id": 8, "name": "School Meals", "description": null,
                    "donation_goal": "5000.00", "donation_raised": "1250.5",
                    "donations": [{"id": 1, "donor_id": 3, "amount": "10", "status": "completed"},
                                  {"id": "bad"}]}"#,
            )
            .create_async()
            .await;

        let repo = ApiDonationRepository::new(&server.url());
        let fetched = repo.fetch_project_with_donations(8, &auth()).await.unwrap();

        assert_eq!(fetched.donation_goal, Some(5000.0));
        assert_eq!(fetched.donation_raised, Some(1250.5));
        assert_eq!(fetched.donations.len(), 1);
    }

    #[tokio::test]
    async fn test_bad_rows_do_not_fail_the_batch() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/donations")
            .with_status(200)
            .with_body(
                r#"[
                {"id": 1, "donor_id": 3, "amount": "10", "currency": "usd", "status": "completed",
                 "created_at": "2025-01-01T10:00:00Z"},
                {"id": 2, "donor_id": null, "amount": 5, "currency": null, "status": "refunded",
                 "type": 4, "created_at": null},
                {"id": null},
                {"id": 3, "donor_id": "3", "amount": 7, "currency": "zmw", "status": "failed",
                 "created_at": "2025-01-03T10:00:00Z"}
            ]"#,
            )
            .create_async()
            .await;

        let repo = ApiDonationRepository::new(&server.url());
        let donations = repo.fetch_donations(&auth()).await.unwrap();

        assert_eq!(donations.iter().map(|d| d.id).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(donations[1].donor_id, None);
        assert_eq!(donations[1].currency, "");
        assert_eq!(donations[1].created_at, "");
        assert_eq!(donations[1].donation_type, None);
        assert_eq!(donations[1].status, crate::domains::donation::types::DonationStatus::Unknown);
        assert_eq!(donations[2].donor_id, Some(3));

        let normalized = crate::domains::donation::normalize::normalize_donations(
            donations,
            &[Donor::new(3, "Jane", "j@x.com")],
        );
        assert_eq!(normalized[0].donor_name_or_unknown(), "Jane");
        assert_eq!(normalized[1].donor_name_or_unknown(), "Unknown");
    }

    #[tokio::test]
    async fn test_error_status_is_external_service_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/donations")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let repo = ApiDonationRepository::new(&server.url());
        let result = repo.fetch_donations(&auth()).await;
        assert!(matches!(result, Err(ServiceError::ExternalService(msg)) if msg.contains("500")));
    }

    #[tokio::test]
    async fn test_malformed_body_is_external_service_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/donations/donors")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let repo = ApiDonationRepository::new(&server.url());
        let result = repo.fetch_donors(&auth()).await;
        assert!(matches!(result, Err(ServiceError::ExternalService(_))));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let repo = ApiDonationRepository::new("http://127.0.0.1:1");
        let result = repo.fetch_donations(&auth()).await;
        assert!(matches!(result, Err(ServiceError::Network(_))));
    }
}
