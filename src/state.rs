//! Shared application state injected into all handlers.

use std::sync::Arc;

use sqlx::PgPool;
use tokio::sync::mpsc;

use crate::application::services::{ClickService, LinkService, SettlementService};
use crate::domain::click_event::ClickEvent;
use crate::infrastructure::persistence::{
    PgClickRepository, PgLinkRepository, PgPartnerRepository, PgSettlementRepository,
};

pub type AppLinkService = LinkService<PgLinkRepository>;
pub type AppClickService = ClickService<PgClickRepository>;
pub type AppSettlementService =
    SettlementService<PgSettlementRepository, PgLinkRepository, PgPartnerRepository>;

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<AppLinkService>,
    pub click_service: Arc<AppClickService>,
    pub settlement_service: Arc<AppSettlementService>,
    /// Used directly by the webhook-auth middleware for secret lookups.
    pub partner_repository: Arc<PgPartnerRepository>,
    /// Bounded channel into the background click worker.
    pub click_sender: mpsc::Sender<ClickEvent>,
    /// Kept for the health check's connectivity probe.
    pub db: Arc<PgPool>,
}

impl AppState {
    /// Wires concrete Postgres repositories into the application services.
    pub fn new(
        pool: Arc<PgPool>,
        click_sender: mpsc::Sender<ClickEvent>,
        redirect_base_url: String,
    ) -> Self {
        let link_repository = Arc::new(PgLinkRepository::new(pool.clone()));
        let click_repository = Arc::new(PgClickRepository::new(pool.clone()));
        let settlement_repository = Arc::new(PgSettlementRepository::new(pool.clone()));
        let partner_repository = Arc::new(PgPartnerRepository::new(pool.clone()));

        Self {
            link_service: Arc::new(LinkService::new(link_repository.clone(), redirect_base_url)),
            click_service: Arc::new(ClickService::new(click_repository)),
            settlement_service: Arc::new(SettlementService::new(
                settlement_repository,
                link_repository,
                partner_repository.clone(),
            )),
            partner_repository,
            click_sender,
            db: pool,
        }
    }
}
