//! In-memory partner storage

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::{DomainError, DomainResult, Partner, PartnerRepository};

/// In-memory partner repository for development and testing
#[derive(Default)]
pub struct InMemoryPartnerRepository {
    partners: DashMap<Uuid, Partner>,
}

impl InMemoryPartnerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PartnerRepository for InMemoryPartnerRepository {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Partner>> {
        Ok(self.partners.get(&id).map(|p| p.clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<Partner>> {
        let mut all: Vec<Partner> = self.partners.iter().map(|p| p.clone()).collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn update(&self, partner: Partner) -> DomainResult<()> {
        match self.partners.get_mut(&partner.id) {
            Some(mut slot) => {
                *slot = partner;
                Ok(())
            }
            None => Err(DomainError::not_found("Partner", "id", partner.id)),
        }
    }

    async fn insert(&self, partner: Partner) -> DomainResult<()> {
        match self.partners.entry(partner.id) {
            Entry::Occupied(_) => Err(DomainError::Conflict(format!(
                "Partner '{}' already exists",
                partner.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(partner);
                Ok(())
            }
        }
    }
}
