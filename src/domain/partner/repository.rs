//! Partner repository interface

use async_trait::async_trait;
use uuid::Uuid;

use super::model::Partner;
use crate::domain::DomainResult;

#[async_trait]
pub trait PartnerRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Partner>>;
    async fn find_all(&self) -> DomainResult<Vec<Partner>>;
    /// Persist the partner and its full limit history as one atomic write.
    async fn update(&self, partner: Partner) -> DomainResult<()>;
    async fn insert(&self, partner: Partner) -> DomainResult<()>;
}
