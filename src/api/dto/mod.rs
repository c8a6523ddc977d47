//! Data Transfer Objects for request/response serialization.

pub mod analytics;
pub mod conversion;
pub mod links;

pub use analytics::{
    ClickStatsResponse, EarningItem, EarningsResponse, LinkAnalytics, LinkAnalyticsResponse,
    LinkClicksResponse,
};
pub use conversion::{
    EarningResponse, PayEarningRequest, ReconcileResponse, RecordConversionRequest,
    TransactionResponse, TransitionStatusRequest,
};
pub use links::{RegisterLinkRequest, RetireLinksResponse};
