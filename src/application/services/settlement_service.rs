//! Conversion recording, status transitions, and earning settlement.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::json;

use crate::domain::entities::{
    Earning, NewTransaction, Transaction, TransactionStatus,
};
use crate::domain::repositories::{LinkRepository, PartnerRepository, SettlementRepository};
use crate::error::AppError;

/// Computes the commission owed on a conversion.
///
/// `rate_percent` is the partner's rate as a percentage (5.0 = 5%). The
/// result is rounded to the currency's minor unit (2 dp) with banker's
/// rounding so repeated settlements do not drift in either direction.
pub fn commission_for(amount: Decimal, rate_percent: Decimal) -> Decimal {
    (amount * rate_percent / Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

/// Service for the attribution/settlement ledger.
///
/// Conversion ingestion is idempotent on `(partner_id, external_order_id)`;
/// status transitions follow the one-directional table enforced by
/// [`TransactionStatus::can_transition_to`] and are serialized per
/// transaction through compare-and-set updates in the repository.
pub struct SettlementService<S, L, P>
where
    S: SettlementRepository,
    L: LinkRepository,
    P: PartnerRepository,
{
    settlement_repository: Arc<S>,
    link_repository: Arc<L>,
    partner_repository: Arc<P>,
}

impl<S, L, P> SettlementService<S, L, P>
where
    S: SettlementRepository,
    L: LinkRepository,
    P: PartnerRepository,
{
    pub fn new(
        settlement_repository: Arc<S>,
        link_repository: Arc<L>,
        partner_repository: Arc<P>,
    ) -> Self {
        Self {
            settlement_repository,
            link_repository,
            partner_repository,
        }
    }

    /// Records a conversion reported by a partner.
    ///
    /// Resolves the tracking code (tombstoned links included, so conversions
    /// that trail content removal still attribute), captures the commission
    /// at the partner's current rate, and inserts against the
    /// `(partner_id, external_order_id)` uniqueness boundary. A replayed
    /// delivery for the same order returns the original transaction
    /// unchanged; amount differences in the replay are ignored.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the tracking code is unknown
    /// - [`AppError::Validation`] if the partner is unknown or inactive
    pub async fn record_conversion(
        &self,
        tracking_code: &str,
        partner_id: i64,
        external_order_id: &str,
        amount: Decimal,
        occurred_at: DateTime<Utc>,
    ) -> Result<Transaction, AppError> {
        let link = self
            .link_repository
            .find_by_code_including_deleted(tracking_code)
            .await?
            .ok_or_else(|| {
                AppError::not_found(
                    "Unknown tracking link",
                    json!({ "tracking_code": tracking_code }),
                )
            })?;

        let partner = self
            .partner_repository
            .find_by_id(partner_id)
            .await?
            .ok_or_else(|| {
                AppError::bad_request("Unknown partner", json!({ "partner_id": partner_id }))
            })?;

        if !partner.is_active {
            return Err(AppError::bad_request(
                "Partner is inactive",
                json!({ "partner_id": partner_id }),
            ));
        }

        let new_transaction = NewTransaction {
            link_id: link.id,
            actor_id: link.actor_id,
            partner_id,
            external_order_id: external_order_id.to_string(),
            amount,
            commission: commission_for(amount, partner.commission_rate),
            transaction_date: occurred_at,
        };

        if let Some(created) = self
            .settlement_repository
            .insert_transaction(new_transaction)
            .await?
        {
            return Ok(created);
        }

        // Unique-constraint hit: a delivery for this order already landed.
        // Idempotent success - hand back the original row untouched.
        tracing::debug!(
            partner_id,
            external_order_id,
            "duplicate conversion delivery collapsed to existing transaction"
        );
        self.settlement_repository
            .find_by_external_order(partner_id, external_order_id)
            .await?
            .ok_or_else(|| {
                // Transactions are never deleted, so a conflict without a
                // readable row breaks the ledger's contract.
                AppError::invariant(
                    "Conversion conflicted with a transaction that does not exist",
                    json!({ "partner_id": partner_id, "external_order_id": external_order_id }),
                )
            })
    }

    /// Applies a status transition to a transaction.
    ///
    /// Legal transitions: pending→completed (creates the pending earning),
    /// pending→cancelled, completed→refunded (retracts or compensates the
    /// earning). Anything else fails with [`AppError::InvalidTransition`].
    /// Concurrent signals for the same transaction serialize on the
    /// repository's compare-and-set update; the loser observes the new state
    /// and fails the legality check.
    pub async fn transition_status(
        &self,
        transaction_id: i64,
        new_status: TransactionStatus,
    ) -> Result<Transaction, AppError> {
        self.transition_inner(transaction_id, new_status, None).await
    }

    /// [`Self::transition_status`] scoped to the authenticated partner:
    /// a transaction owned by another partner reads as not found.
    pub async fn transition_status_for_partner(
        &self,
        partner_id: i64,
        transaction_id: i64,
        new_status: TransactionStatus,
    ) -> Result<Transaction, AppError> {
        self.transition_inner(transaction_id, new_status, Some(partner_id))
            .await
    }

    async fn transition_inner(
        &self,
        transaction_id: i64,
        new_status: TransactionStatus,
        partner_scope: Option<i64>,
    ) -> Result<Transaction, AppError> {
        let current = self
            .settlement_repository
            .find_transaction(transaction_id)
            .await?
            .filter(|t| partner_scope.is_none_or(|pid| t.partner_id == pid))
            .ok_or_else(|| {
                AppError::not_found(
                    "Transaction not found",
                    json!({ "transaction_id": transaction_id }),
                )
            })?;

        if !current.status.can_transition_to(new_status) {
            return Err(Self::illegal_transition(current.status, new_status));
        }

        let applied = match new_status {
            TransactionStatus::Completed => self
                .settlement_repository
                .complete_transaction(transaction_id)
                .await?
                .map(|(transaction, _earning)| transaction),
            TransactionStatus::Cancelled => {
                self.settlement_repository
                    .cancel_transaction(transaction_id)
                    .await?
            }
            TransactionStatus::Refunded => {
                self.settlement_repository
                    .refund_transaction(transaction_id)
                    .await?
            }
            TransactionStatus::Pending => None, // unreachable: no legal edge into pending
        };

        applied.ok_or_else(|| {
            // CAS miss: a concurrent signal moved the transaction first.
            Self::illegal_transition(current.status, new_status)
        })
    }

    /// Marks an earning as paid out.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the earning does not exist
    /// - [`AppError::InvalidTransition`] unless the earning is currently
    ///   pending or processing
    pub async fn mark_earning_paid(
        &self,
        earning_id: i64,
        payment_date: DateTime<Utc>,
    ) -> Result<Earning, AppError> {
        if let Some(paid) = self
            .settlement_repository
            .mark_earning_paid(earning_id, payment_date)
            .await?
        {
            return Ok(paid);
        }

        match self.settlement_repository.find_earning(earning_id).await? {
            None => Err(AppError::not_found(
                "Earning not found",
                json!({ "earning_id": earning_id }),
            )),
            Some(earning) => Err(AppError::invalid_transition(
                "Earning is not payable",
                json!({ "earning_id": earning_id, "status": earning.status.as_str() }),
            )),
        }
    }

    /// Lists an actor's earnings for the payout/analytics surface.
    pub async fn earnings_for_actor(&self, actor_id: i64) -> Result<Vec<Earning>, AppError> {
        self.settlement_repository.earnings_for_actor(actor_id).await
    }

    fn illegal_transition(from: TransactionStatus, to: TransactionStatus) -> AppError {
        AppError::invalid_transition(
            "Illegal transaction status transition",
            json!({ "from": from.as_str(), "to": to.as_str() }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{EarningStatus, Partner, TrackingLink};
    use crate::domain::repositories::{
        MockLinkRepository, MockPartnerRepository, MockSettlementRepository,
    };
    use rust_decimal_macros::dec;

    fn sample_link(id: i64, actor_id: i64) -> TrackingLink {
        TrackingLink {
            id,
            actor_id,
            content_id: 21,
            product_id: 99,
            tracking_code: "q1w2e3r4t5y6".to_string(),
            destination_url: "https://shop.example.com/item/99".to_string(),
            click_count: 3,
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    fn sample_partner(id: i64, rate: Decimal, is_active: bool) -> Partner {
        Partner {
            id,
            name: "Acme Affiliates".to_string(),
            commission_rate: rate,
            webhook_secret: "s3cr3t".to_string(),
            is_active,
            created_at: Utc::now(),
        }
    }

    fn stored_transaction(id: i64, nt: &NewTransaction, status: TransactionStatus) -> Transaction {
        Transaction {
            id,
            link_id: nt.link_id,
            actor_id: nt.actor_id,
            partner_id: nt.partner_id,
            external_order_id: nt.external_order_id.clone(),
            amount: nt.amount,
            commission: nt.commission,
            status,
            transaction_date: nt.transaction_date,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn pending_transaction(id: i64) -> Transaction {
        stored_transaction(
            id,
            &NewTransaction {
                link_id: 3,
                actor_id: 7,
                partner_id: 1,
                external_order_id: "ORD-1".to_string(),
                amount: dec!(50.00),
                commission: dec!(2.50),
                transaction_date: Utc::now(),
            },
            TransactionStatus::Pending,
        )
    }

    fn pending_earning(id: i64, transaction_id: i64, amount: Decimal) -> Earning {
        Earning {
            id,
            actor_id: 7,
            transaction_id,
            amount,
            status: EarningStatus::Pending,
            payment_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn service(
        settlement: MockSettlementRepository,
        link: MockLinkRepository,
        partner: MockPartnerRepository,
    ) -> SettlementService<MockSettlementRepository, MockLinkRepository, MockPartnerRepository>
    {
        SettlementService::new(Arc::new(settlement), Arc::new(link), Arc::new(partner))
    }

    #[test]
    fn test_commission_five_percent_of_200() {
        assert_eq!(commission_for(dec!(200.00), dec!(5.0)), dec!(10.00));
    }

    #[test]
    fn test_commission_rounds_half_even() {
        // 5% of 0.50 = 0.025 -> 0.02 (2 is even)
        assert_eq!(commission_for(dec!(0.50), dec!(5.0)), dec!(0.02));
        // 5% of 0.70 = 0.035 -> 0.04 (4 is even)
        assert_eq!(commission_for(dec!(0.70), dec!(5.0)), dec!(0.04));
    }

    #[test]
    fn test_commission_fractional_rate() {
        // 5.5% of 19.99 = 1.09945 -> 1.10
        assert_eq!(commission_for(dec!(19.99), dec!(5.5)), dec!(1.10));
    }

    #[tokio::test]
    async fn test_record_conversion_computes_commission() {
        let mut link_repo = MockLinkRepository::new();
        link_repo
            .expect_find_by_code_including_deleted()
            .times(1)
            .returning(|_| Ok(Some(sample_link(3, 7))));

        let mut partner_repo = MockPartnerRepository::new();
        partner_repo
            .expect_find_by_id()
            .times(1)
            .returning(|id| Ok(Some(sample_partner(id, dec!(5.0), true))));

        let mut settlement_repo = MockSettlementRepository::new();
        settlement_repo
            .expect_insert_transaction()
            .withf(|nt| nt.link_id == 3 && nt.actor_id == 7 && nt.commission == dec!(10.00))
            .times(1)
            .returning(|nt| Ok(Some(stored_transaction(100, &nt, TransactionStatus::Pending))));

        let service = service(settlement_repo, link_repo, partner_repo);
        let tx = service
            .record_conversion("q1w2e3r4t5y6", 1, "ORD-1", dec!(200.00), Utc::now())
            .await
            .unwrap();

        assert_eq!(tx.commission, dec!(10.00));
        assert_eq!(tx.status, TransactionStatus::Pending);
    }

    #[tokio::test]
    async fn test_record_conversion_unknown_link() {
        let mut link_repo = MockLinkRepository::new();
        link_repo
            .expect_find_by_code_including_deleted()
            .times(1)
            .returning(|_| Ok(None));

        let service = service(
            MockSettlementRepository::new(),
            link_repo,
            MockPartnerRepository::new(),
        );
        let result = service
            .record_conversion("zzzzzzzzzzzz", 1, "ORD-1", dec!(50.00), Utc::now())
            .await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_record_conversion_inactive_partner() {
        let mut link_repo = MockLinkRepository::new();
        link_repo
            .expect_find_by_code_including_deleted()
            .times(1)
            .returning(|_| Ok(Some(sample_link(3, 7))));

        let mut partner_repo = MockPartnerRepository::new();
        partner_repo
            .expect_find_by_id()
            .times(1)
            .returning(|id| Ok(Some(sample_partner(id, dec!(5.0), false))));

        let service = service(MockSettlementRepository::new(), link_repo, partner_repo);
        let result = service
            .record_conversion("q1w2e3r4t5y6", 1, "ORD-1", dec!(50.00), Utc::now())
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_record_conversion_replay_returns_original_unchanged() {
        let mut link_repo = MockLinkRepository::new();
        link_repo
            .expect_find_by_code_including_deleted()
            .times(1)
            .returning(|_| Ok(Some(sample_link(3, 7))));

        let mut partner_repo = MockPartnerRepository::new();
        partner_repo
            .expect_find_by_id()
            .times(1)
            .returning(|id| Ok(Some(sample_partner(id, dec!(5.0), true))));

        let original = {
            let mut tx = pending_transaction(100);
            tx.amount = dec!(50.00);
            tx.commission = dec!(2.50);
            tx
        };
        let original_clone = original.clone();

        let mut settlement_repo = MockSettlementRepository::new();
        settlement_repo
            .expect_insert_transaction()
            .times(1)
            .returning(|_| Ok(None)); // unique (partner_id, order) hit
        settlement_repo
            .expect_find_by_external_order()
            .withf(|partner_id, order| *partner_id == 1 && order == "ORD-1")
            .times(1)
            .returning(move |_, _| Ok(Some(original_clone.clone())));

        let service = service(settlement_repo, link_repo, partner_repo);

        // Replay carries a different amount; the original wins.
        let tx = service
            .record_conversion("q1w2e3r4t5y6", 1, "ORD-1", dec!(999.00), Utc::now())
            .await
            .unwrap();

        assert_eq!(tx.id, original.id);
        assert_eq!(tx.amount, dec!(50.00));
        assert_eq!(tx.commission, dec!(2.50));
    }

    #[tokio::test]
    async fn test_pending_to_completed_creates_earning() {
        let mut settlement_repo = MockSettlementRepository::new();
        settlement_repo
            .expect_find_transaction()
            .times(1)
            .returning(|id| Ok(Some(pending_transaction(id))));
        settlement_repo
            .expect_complete_transaction()
            .withf(|id| *id == 100)
            .times(1)
            .returning(|id| {
                let mut tx = pending_transaction(id);
                tx.status = TransactionStatus::Completed;
                let earning = pending_earning(55, id, tx.commission);
                Ok(Some((tx, earning)))
            });

        let service = service(
            settlement_repo,
            MockLinkRepository::new(),
            MockPartnerRepository::new(),
        );
        let tx = service
            .transition_status(100, TransactionStatus::Completed)
            .await
            .unwrap();

        assert_eq!(tx.status, TransactionStatus::Completed);
    }

    #[tokio::test]
    async fn test_refunded_is_terminal() {
        let mut settlement_repo = MockSettlementRepository::new();
        settlement_repo.expect_find_transaction().returning(|id| {
            let mut tx = pending_transaction(id);
            tx.status = TransactionStatus::Refunded;
            Ok(Some(tx))
        });

        let service = service(
            settlement_repo,
            MockLinkRepository::new(),
            MockPartnerRepository::new(),
        );

        for target in [
            TransactionStatus::Pending,
            TransactionStatus::Completed,
            TransactionStatus::Cancelled,
            TransactionStatus::Refunded,
        ] {
            let result = service.transition_status(100, target).await;
            assert!(
                matches!(result.unwrap_err(), AppError::InvalidTransition { .. }),
                "refunded -> {:?} must be rejected",
                target
            );
        }
    }

    #[tokio::test]
    async fn test_transition_unknown_transaction() {
        let mut settlement_repo = MockSettlementRepository::new();
        settlement_repo
            .expect_find_transaction()
            .times(1)
            .returning(|_| Ok(None));

        let service = service(
            settlement_repo,
            MockLinkRepository::new(),
            MockPartnerRepository::new(),
        );
        let result = service
            .transition_status(404, TransactionStatus::Completed)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_transition_scoped_to_other_partner_reads_as_not_found() {
        let mut settlement_repo = MockSettlementRepository::new();
        settlement_repo
            .expect_find_transaction()
            .times(1)
            .returning(|id| Ok(Some(pending_transaction(id)))); // partner_id == 1

        let service = service(
            settlement_repo,
            MockLinkRepository::new(),
            MockPartnerRepository::new(),
        );
        let result = service
            .transition_status_for_partner(2, 100, TransactionStatus::Completed)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_lost_cas_race_reports_invalid_transition() {
        let mut settlement_repo = MockSettlementRepository::new();
        settlement_repo
            .expect_find_transaction()
            .times(1)
            .returning(|id| Ok(Some(pending_transaction(id))));
        // Another signal completed/cancelled the row between read and CAS.
        settlement_repo
            .expect_cancel_transaction()
            .times(1)
            .returning(|_| Ok(None));

        let service = service(
            settlement_repo,
            MockLinkRepository::new(),
            MockPartnerRepository::new(),
        );
        let result = service
            .transition_status(100, TransactionStatus::Cancelled)
            .await;

        assert!(matches!(
            result.unwrap_err(),
            AppError::InvalidTransition { .. }
        ));
    }

    #[tokio::test]
    async fn test_mark_earning_paid() {
        let paid_at = Utc::now();

        let mut settlement_repo = MockSettlementRepository::new();
        settlement_repo
            .expect_mark_earning_paid()
            .withf(move |id, date| *id == 55 && *date == paid_at)
            .times(1)
            .returning(|id, date| {
                let mut earning = pending_earning(id, 100, Decimal::TEN);
                earning.status = EarningStatus::Completed;
                earning.payment_date = Some(date);
                Ok(Some(earning))
            });

        let service = service(
            settlement_repo,
            MockLinkRepository::new(),
            MockPartnerRepository::new(),
        );
        let earning = service.mark_earning_paid(55, paid_at).await.unwrap();

        assert_eq!(earning.status, EarningStatus::Completed);
        assert_eq!(earning.payment_date, Some(paid_at));
    }

    #[tokio::test]
    async fn test_mark_earning_paid_twice_fails() {
        let mut settlement_repo = MockSettlementRepository::new();
        settlement_repo
            .expect_mark_earning_paid()
            .times(1)
            .returning(|_, _| Ok(None));
        settlement_repo.expect_find_earning().times(1).returning(|id| {
            let mut earning = pending_earning(id, 100, Decimal::TEN);
            earning.status = EarningStatus::Completed;
            earning.payment_date = Some(Utc::now());
            Ok(Some(earning))
        });

        let service = service(
            settlement_repo,
            MockLinkRepository::new(),
            MockPartnerRepository::new(),
        );
        let result = service.mark_earning_paid(55, Utc::now()).await;

        assert!(matches!(
            result.unwrap_err(),
            AppError::InvalidTransition { .. }
        ));
    }

    #[tokio::test]
    async fn test_mark_unknown_earning_paid() {
        let mut settlement_repo = MockSettlementRepository::new();
        settlement_repo
            .expect_mark_earning_paid()
            .times(1)
            .returning(|_, _| Ok(None));
        settlement_repo
            .expect_find_earning()
            .times(1)
            .returning(|_| Ok(None));

        let service = service(
            settlement_repo,
            MockLinkRepository::new(),
            MockPartnerRepository::new(),
        );
        let result = service.mark_earning_paid(404, Utc::now()).await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }
}
