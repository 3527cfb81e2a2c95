//! Partner module: read queries and promo code limit assignment

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
