pub mod partner;

pub use partner::{Partner, PartnerPromoCodeLimit, PartnerRepository};

pub use crate::shared::errors::{DomainError, ErrorKind};

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
