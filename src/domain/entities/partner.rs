//! Affiliate partner: external merchant programme this engine settles against.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// A partner programme, looked up by id during conversion recording.
///
/// This engine treats the partner registry as read-only reference data;
/// partner CRUD belongs to the integration layer.
#[derive(Debug, Clone, FromRow)]
pub struct Partner {
    pub id: i64,
    pub name: String,
    /// Commission rate as a percentage, e.g. `5.0` for 5%.
    pub commission_rate: Decimal,
    /// Shared secret for authenticating webhook deliveries.
    pub webhook_secret: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partner_rate_is_a_percentage() {
        let partner = Partner {
            id: 1,
            name: "Acme Affiliates".to_string(),
            commission_rate: Decimal::new(55, 1), // 5.5%
            webhook_secret: "s3cr3t".to_string(),
            is_active: true,
            created_at: Utc::now(),
        };

        assert_eq!(partner.commission_rate.to_string(), "5.5");
    }
}
