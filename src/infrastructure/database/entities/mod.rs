//! Database entities module

pub mod partner;
pub mod partner_promo_code_limit;

pub use partner::Entity as Partner;
pub use partner_promo_code_limit::Entity as PartnerPromoCodeLimit;
