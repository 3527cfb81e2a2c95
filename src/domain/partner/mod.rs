//! Partner aggregate
//!
//! Contains the Partner entity, its promo code limit history, and the
//! repository interface.

pub mod model;
pub mod repository;

pub use model::{Partner, PartnerPromoCodeLimit};
pub use repository::PartnerRepository;
