//! Application services

mod partner;
mod partner_locks;

pub use partner::PartnerService;
pub use partner_locks::{PartnerLockGuard, PartnerLocks};
