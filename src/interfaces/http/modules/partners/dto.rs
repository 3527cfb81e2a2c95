//! Partner DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{Partner, PartnerPromoCodeLimit};

/// Partner API representation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PartnerDto {
    pub id: String,
    pub name: String,
    pub is_active: bool,
    pub number_issued_promo_codes: u32,
    /// Limit history, oldest first
    pub limits: Vec<PartnerPromoCodeLimitDto>,
}

impl PartnerDto {
    pub fn from_domain(p: &Partner) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name.clone(),
            is_active: p.is_active,
            number_issued_promo_codes: p.number_issued_promo_codes(),
            limits: p
                .limits()
                .iter()
                .map(PartnerPromoCodeLimitDto::from_domain)
                .collect(),
        }
    }
}

/// Promo code limit API representation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PartnerPromoCodeLimitDto {
    pub id: String,
    pub partner_id: String,
    pub limit: i32,
    pub create_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_date: Option<DateTime<Utc>>,
}

impl PartnerPromoCodeLimitDto {
    pub fn from_domain(l: &PartnerPromoCodeLimit) -> Self {
        Self {
            id: l.id.to_string(),
            partner_id: l.partner_id.to_string(),
            limit: l.limit,
            create_date: l.create_date,
            end_date: l.end_date,
            cancel_date: l.cancel_date,
        }
    }
}

/// Request body for assigning a new promo code limit
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SetPartnerPromoCodeLimitRequest {
    #[validate(range(min = 1, message = "limit must be greater than 0"))]
    #[schema(example = 100, minimum = 1)]
    pub limit: i32,
    /// RFC 3339 timestamp
    #[schema(example = "2026-12-31T23:59:59Z")]
    pub end_date: DateTime<Utc>,
}
