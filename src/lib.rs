//! # Promo Code Factory
//!
//! Partner promo code limit service: assigns a new issuance limit to a
//! partner, cancelling the previously active one and resetting the issued
//! codes counter.
//!
//! ## Architecture
//!
//! - **domain**: `Partner` aggregate, limit history and the repository trait
//! - **application**: `PartnerService` with the limit assignment rule
//! - **infrastructure**: SeaORM/SQLite and in-memory repositories, migrations, seeding
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: runtime lifecycle used by the binary

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use application::PartnerService;
pub use config::{default_config_path, AppConfig};
pub use infrastructure::{init_database, DatabaseConfig};
pub use interfaces::http::create_api_router;
