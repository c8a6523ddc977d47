//! HTTP request handlers.

pub mod analytics;
pub mod conversions;
pub mod health;
pub mod links;
pub mod redirect;

pub use analytics::{
    click_stats_handler, earnings_handler, link_analytics_handler, link_clicks_handler,
    reconcile_handler,
};
pub use conversions::{pay_earning_handler, record_conversion_handler, transition_status_handler};
pub use health::health_handler;
pub use links::{register_link_handler, retire_content_links_handler};
pub use redirect::redirect_handler;
