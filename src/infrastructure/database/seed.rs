//! Demo data for development setups

use tracing::info;

use crate::domain::{DomainResult, Partner, PartnerRepository};

/// Insert a handful of demo partners when the store is empty.
///
/// Returns the number of partners inserted.
pub async fn seed_demo_partners(repo: &dyn PartnerRepository) -> DomainResult<usize> {
    if !repo.find_all().await?.is_empty() {
        return Ok(0);
    }

    let mut inactive = Partner::new("Mister Fishkin");
    inactive.is_active = false;

    let partners = vec![
        Partner::new("Super Toys"),
        Partner::new("Toys for Kids"),
        Partner::new("Fish of Your Dreams"),
        inactive,
    ];
    let count = partners.len();

    for partner in partners {
        info!("Seeding demo partner {} ({})", partner.name, partner.id);
        repo.insert(partner).await?;
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::InMemoryPartnerRepository;

    #[tokio::test]
    async fn seeds_only_empty_store() {
        let repo = InMemoryPartnerRepository::new();

        assert_eq!(seed_demo_partners(&repo).await.unwrap(), 4);
        assert_eq!(seed_demo_partners(&repo).await.unwrap(), 0);

        let partners = repo.find_all().await.unwrap();
        assert_eq!(partners.len(), 4);
        assert_eq!(partners.iter().filter(|p| !p.is_active).count(), 1);
        assert!(partners.iter().all(|p| p.limits().is_empty()));
    }
}
