//! Partner business logic service
//!
//! Owns the promo code limit assignment rule. HTTP handlers are thin
//! wrappers that delegate here.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use super::partner_locks::PartnerLocks;
use crate::domain::{
    DomainError, DomainResult, Partner, PartnerPromoCodeLimit, PartnerRepository,
};

/// Service for partner limit operations
pub struct PartnerService {
    repo: Arc<dyn PartnerRepository>,
    locks: PartnerLocks,
}

impl PartnerService {
    pub fn new(repo: Arc<dyn PartnerRepository>) -> Self {
        Self {
            repo,
            locks: PartnerLocks::new(),
        }
    }

    /// Assign a new promo code limit to a partner.
    ///
    /// Checks run in order: partner exists, partner is active, limit is
    /// positive. Nothing is written unless all of them pass. On success the
    /// previously active limit (if any) is cancelled, the issued-codes
    /// counter is reset alongside it, and the partner is persisted once.
    pub async fn set_promo_code_limit(
        &self,
        partner_id: Uuid,
        limit: i32,
        end_date: DateTime<Utc>,
    ) -> DomainResult<PartnerPromoCodeLimit> {
        let _guard = self.locks.acquire(partner_id).await;

        let Some(mut partner) = self.repo.find_by_id(partner_id).await? else {
            return Err(rejected(
                "not_found",
                DomainError::not_found("Partner", "id", partner_id),
            ));
        };

        if !partner.is_active {
            return Err(rejected(
                "inactive",
                DomainError::InvalidState("partner not active".to_string()),
            ));
        }

        if limit <= 0 {
            return Err(rejected(
                "invalid_limit",
                DomainError::Validation("limit must be greater than 0".to_string()),
            ));
        }

        let superseded = partner.active_limit().map(|l| l.id);
        let new_limit = partner.supersede_limit(limit, end_date, Utc::now());

        self.repo.update(partner).await?;

        metrics::counter!("partner_limits_set_total").increment(1);
        match superseded {
            Some(old) => info!(
                "Partner {} limit set to {} (limit {}), superseded {}",
                partner_id, limit, new_limit.id, old
            ),
            None => info!(
                "Partner {} limit set to {} (limit {})",
                partner_id, limit, new_limit.id
            ),
        }

        Ok(new_limit)
    }

    pub async fn list_partners(&self) -> DomainResult<Vec<Partner>> {
        self.repo.find_all().await
    }

    pub async fn get_partner(&self, partner_id: Uuid) -> DomainResult<Partner> {
        self.repo
            .find_by_id(partner_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Partner", "id", partner_id))
    }

    pub async fn get_partner_limit(
        &self,
        partner_id: Uuid,
        limit_id: Uuid,
    ) -> DomainResult<PartnerPromoCodeLimit> {
        let partner = self.get_partner(partner_id).await?;
        partner
            .find_limit(limit_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("Promo code limit", "id", limit_id))
    }
}

fn rejected(reason: &'static str, err: DomainError) -> DomainError {
    metrics::counter!("partner_limit_rejections_total", "reason" => reason).increment(1);
    warn!("Promo code limit rejected: {}", err);
    err
}
