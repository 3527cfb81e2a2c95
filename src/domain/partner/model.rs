//! Partner aggregate and its promo code limit history

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A promo code limit assigned to a partner.
///
/// Limits form an append-only history. A limit is considered active while
/// `cancel_date` is `None`; `end_date` alone never deactivates it.
#[derive(Debug, Clone, PartialEq)]
pub struct PartnerPromoCodeLimit {
    pub id: Uuid,
    /// Owning partner (back-reference only)
    pub partner_id: Uuid,
    /// Maximum number of promo codes that may be issued
    pub limit: i32,
    pub create_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub cancel_date: Option<DateTime<Utc>>,
}

impl PartnerPromoCodeLimit {
    pub fn is_active(&self) -> bool {
        self.cancel_date.is_none()
    }
}

/// Partner aggregate.
///
/// Owns its limit history exclusively. The history and the issued-codes
/// counter are only mutated through [`Partner::supersede_limit`].
#[derive(Debug, Clone, PartialEq)]
pub struct Partner {
    pub id: Uuid,
    pub name: String,
    pub is_active: bool,
    number_issued_promo_codes: u32,
    limits: Vec<PartnerPromoCodeLimit>,
}

impl Partner {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            is_active: true,
            number_issued_promo_codes: 0,
            limits: Vec::new(),
        }
    }

    /// Rebuild an aggregate from persisted state. `limits` must be in
    /// history order (oldest first).
    pub fn restore(
        id: Uuid,
        name: impl Into<String>,
        is_active: bool,
        number_issued_promo_codes: u32,
        limits: Vec<PartnerPromoCodeLimit>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            is_active,
            number_issued_promo_codes,
            limits,
        }
    }

    pub fn number_issued_promo_codes(&self) -> u32 {
        self.number_issued_promo_codes
    }

    /// Limit history, most recent last.
    pub fn limits(&self) -> &[PartnerPromoCodeLimit] {
        &self.limits
    }

    /// The current active limit, if any.
    pub fn active_limit(&self) -> Option<&PartnerPromoCodeLimit> {
        self.limits.iter().find(|l| l.is_active())
    }

    pub fn find_limit(&self, limit_id: Uuid) -> Option<&PartnerPromoCodeLimit> {
        self.limits.iter().find(|l| l.id == limit_id)
    }

    /// Cancel the active limit (resetting the issued counter) and append a
    /// new active one. If no limit is active, the counter is left untouched.
    ///
    /// Input validation is the caller's job.
    pub(crate) fn supersede_limit(
        &mut self,
        limit: i32,
        end_date: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> PartnerPromoCodeLimit {
        if let Some(active) = self.limits.iter_mut().find(|l| l.is_active()) {
            active.cancel_date = Some(now);
            self.number_issued_promo_codes = 0;
        }

        let new_limit = PartnerPromoCodeLimit {
            id: Uuid::new_v4(),
            partner_id: self.id,
            limit,
            create_date: now,
            end_date,
            cancel_date: None,
        };
        self.limits.push(new_limit.clone());
        new_limit
    }
}
