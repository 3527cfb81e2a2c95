//! Infrastructure layer - external concerns

pub mod database;
pub mod storage;

pub use database::{init_database, seed_demo_partners, DatabaseConfig, SeaOrmPartnerRepository};
pub use storage::InMemoryPartnerRepository;
