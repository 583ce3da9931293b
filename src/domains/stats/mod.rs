pub mod types;
pub mod aggregator;

pub use types::{CurrencyStat, DonationSummaryStats, MonthlyTrend, RangeSummary};
pub use aggregator::{monthly_trends, recent_donations, summarize, summarize_range};
