use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::auth::AuthContext;
use crate::config::DEFAULT_RECENT_DONATIONS_LIMIT;
use crate::domains::donation::normalize::{attach_donor_identity, normalize_donation, normalize_donations};
use crate::domains::donation::repository::DonationRepository;
use crate::domains::donation::types::{Donation, RawDonation};
use crate::domains::donor::enrichment::{enrich_donors, relevant_donations_for_donor};
use crate::domains::donor::types::{Donor, EnrichedDonor};
use crate::domains::stats::aggregator::{recent_donations, summarize};
use crate::domains::stats::types::DonationSummaryStats;
use crate::errors::ServiceResult;

/// Everything the dashboard renders, computed from one fetch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub donations: Vec<Donation>,
    pub donors: Vec<EnrichedDonor>,
    pub stats: DonationSummaryStats,
    pub fetched_at: DateTime<Utc>,
}

impl DashboardSnapshot {
    pub fn recent_donations(&self, limit: usize) -> Vec<Donation> {
        recent_donations(&self.donations, limit)
    }
}

/// Normalize, join and aggregate one fetched batch.
pub fn build_snapshot(raw: Vec<RawDonation>, donors: Vec<Donor>) -> DashboardSnapshot {
    let donations = normalize_donations(raw, &donors);
    let enriched = enrich_donors(&donations, &donors);
    let stats = summarize(&donations, &enriched);

    DashboardSnapshot {
        donations,
        donors: enriched,
        stats,
        fetched_at: Utc::now(),
    }
}

/// Project detail with its donations normalized
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectDonations {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub donation_goal: Option<f64>,
    pub donation_raised: Option<f64>,
    pub donations: Vec<Donation>,
}

impl ProjectDonations {
    /// Raised amount as a share of the goal, `None` without a positive goal.
    pub fn progress_percent(&self) -> Option<f64> {
        match (self.donation_goal, self.donation_raised) {
            (Some(goal), Some(raised)) if goal > 0.0 => Some(raised / goal * 100.0),
            (Some(goal), None) if goal > 0.0 => Some(0.0),
            _ => None,
        }
    }
}

/// Loads dashboard data through a [`DonationRepository`]
#[derive(Clone)]
pub struct DashboardService {
    repo: Arc<dyn DonationRepository>,
}

impl DashboardService {
    pub fn new(repo: Arc<dyn DonationRepository>) -> Self {
        Self { repo }
    }

    /// Fetch donations and donors concurrently, then build the snapshot once both arrive.
    pub async fn load(&self, auth: &AuthContext) -> ServiceResult<DashboardSnapshot> {
        let (raw, donors) = tokio::try_join!(
            self.repo.fetch_donations(auth),
            self.repo.fetch_donors(auth)
        )?;
        log::debug!("Fetched {} donation(s) and {} donor(s)", raw.len(), donors.len());
        Ok(build_snapshot(raw, donors))
    }

    /// Settled donations for one donor, with that donor's identity attached.
    pub async fn donor_donations(&self, donor: &Donor, auth: &AuthContext) -> ServiceResult<Vec<Donation>> {
        let raw = self.repo.fetch_donations_by_donor(donor.id, auth).await?;
        let normalized: Vec<Donation> = raw.into_iter().map(normalize_donation).collect();
        let mut donations = relevant_donations_for_donor(&normalized, donor.id);
        attach_donor_identity(&mut donations, std::slice::from_ref(donor));
        Ok(donations)
    }

    pub async fn project_donations(&self, project_id: i64, auth: &AuthContext) -> ServiceResult<ProjectDonations> {
        let project = self.repo.fetch_project_with_donations(project_id, auth).await?;
        Ok(ProjectDonations {
            id: project.id,
            name: project.name,
            description: project.description,
            donation_goal: project.donation_goal,
            donation_raised: project.donation_raised,
            donations: project.donations.into_iter().map(normalize_donation).collect(),
        })
    }
}

/// What the dashboard currently shows
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardState {
    Loading,
    Ready(DashboardSnapshot),
    Failed { message: String },
}

impl DashboardState {
    pub fn snapshot(&self) -> Option<&DashboardSnapshot> {
        match self {
            DashboardState::Ready(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}

/// Holds the latest dashboard state. Each refresh replaces it wholesale.
pub struct DashboardStore {
    service: DashboardService,
    state: DashboardState,
    recent_limit: usize,
}

impl DashboardStore {
    pub fn new(service: DashboardService) -> Self {
        Self {
            service,
            state: DashboardState::Loading,
            recent_limit: DEFAULT_RECENT_DONATIONS_LIMIT,
        }
    }

    /// Size of the recent donations card
    pub fn with_recent_limit(mut self, limit: usize) -> Self {
        self.recent_limit = limit;
        self
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Newest donations of the loaded snapshot, empty until a refresh succeeds.
    pub fn recent_donations(&self) -> Vec<Donation> {
        self.state
            .snapshot()
            .map(|snapshot| snapshot.recent_donations(self.recent_limit))
            .unwrap_or_default()
    }

    /// Reload everything. A failure replaces the state with a single message;
    /// calling `refresh` again is the retry.
    pub async fn refresh(&mut self, auth: &AuthContext) -> &DashboardState {
        self.state = DashboardState::Loading;
        self.state = match self.service.load(auth).await {
            Ok(snapshot) => DashboardState::Ready(snapshot),
            Err(e) => {
                log::error!("Failed to load dashboard data: {}", e);
                DashboardState::Failed {
                    message: e.user_message(),
                }
            }
        };
        &self.state
    }
}
