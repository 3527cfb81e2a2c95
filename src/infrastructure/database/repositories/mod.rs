//! Database repository implementations

pub mod partner_repository;

pub use partner_repository::SeaOrmPartnerRepository;
