//! SeaORM implementation of PartnerRepository

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::domain::partner::{Partner, PartnerPromoCodeLimit, PartnerRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{partner, partner_promo_code_limit};

pub struct SeaOrmPartnerRepository {
    db: DatabaseConnection,
}

impl SeaOrmPartnerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(format!("Database error: {}", e))
}

fn parse_id(value: &str, what: &str) -> DomainResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|e| DomainError::Storage(format!("Corrupt {} id '{}': {}", what, value, e)))
}

fn limit_from_model(m: partner_promo_code_limit::Model) -> DomainResult<PartnerPromoCodeLimit> {
    Ok(PartnerPromoCodeLimit {
        id: parse_id(&m.id, "limit")?,
        partner_id: parse_id(&m.partner_id, "partner")?,
        limit: m.limit,
        create_date: m.create_date,
        end_date: m.end_date,
        cancel_date: m.cancel_date,
    })
}

fn partner_from_models(
    model: partner::Model,
    mut limits: Vec<partner_promo_code_limit::Model>,
) -> DomainResult<Partner> {
    limits.sort_by_key(|l| l.position);
    let limits = limits
        .into_iter()
        .map(limit_from_model)
        .collect::<DomainResult<Vec<_>>>()?;
    let issued = u32::try_from(model.number_issued_promo_codes).map_err(|_| {
        DomainError::Storage(format!(
            "Negative issued promo code counter for partner {}",
            model.id
        ))
    })?;

    Ok(Partner::restore(
        parse_id(&model.id, "partner")?,
        model.name,
        model.is_active,
        issued,
        limits,
    ))
}

fn issued_to_column(partner: &Partner) -> DomainResult<i32> {
    i32::try_from(partner.number_issued_promo_codes()).map_err(|_| {
        DomainError::Validation(format!(
            "Issued promo code counter out of range for partner {}",
            partner.id
        ))
    })
}

fn limit_to_active(
    limit: &PartnerPromoCodeLimit,
    position: usize,
) -> DomainResult<partner_promo_code_limit::ActiveModel> {
    let position = i32::try_from(position)
        .map_err(|_| DomainError::Validation("Limit history too long".to_string()))?;
    Ok(partner_promo_code_limit::ActiveModel {
        id: Set(limit.id.to_string()),
        partner_id: Set(limit.partner_id.to_string()),
        position: Set(position),
        limit: Set(limit.limit),
        create_date: Set(limit.create_date),
        end_date: Set(limit.end_date),
        cancel_date: Set(limit.cancel_date),
    })
}

async fn load_limits<C: ConnectionTrait>(
    db: &C,
    partner_id: &str,
) -> DomainResult<Vec<partner_promo_code_limit::Model>> {
    partner_promo_code_limit::Entity::find()
        .filter(partner_promo_code_limit::Column::PartnerId.eq(partner_id))
        .order_by_asc(partner_promo_code_limit::Column::Position)
        .all(db)
        .await
        .map_err(db_err)
}

// ── PartnerRepository impl ──────────────────────────────────────

#[async_trait]
impl PartnerRepository for SeaOrmPartnerRepository {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Partner>> {
        let key = id.to_string();
        let Some(model) = partner::Entity::find_by_id(key.clone())
            .one(&self.db)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };

        let limits = load_limits(&self.db, &key).await?;
        partner_from_models(model, limits).map(Some)
    }

    async fn find_all(&self) -> DomainResult<Vec<Partner>> {
        let partners = partner::Entity::find()
            .order_by_asc(partner::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let mut limits_by_partner: HashMap<String, Vec<partner_promo_code_limit::Model>> =
            HashMap::new();
        for limit in partner_promo_code_limit::Entity::find()
            .all(&self.db)
            .await
            .map_err(db_err)?
        {
            limits_by_partner
                .entry(limit.partner_id.clone())
                .or_default()
                .push(limit);
        }

        partners
            .into_iter()
            .map(|model| {
                let limits = limits_by_partner.remove(&model.id).unwrap_or_default();
                partner_from_models(model, limits)
            })
            .collect()
    }

    async fn update(&self, p: Partner) -> DomainResult<()> {
        debug!("Updating partner: {}", p.id);
        let key = p.id.to_string();
        let txn = self.db.begin().await.map_err(db_err)?;

        let Some(existing) = partner::Entity::find_by_id(key.clone())
            .one(&txn)
            .await
            .map_err(db_err)?
        else {
            return Err(DomainError::not_found("Partner", "id", &key));
        };

        let mut active: partner::ActiveModel = existing.into();
        active.name = Set(p.name.clone());
        active.is_active = Set(p.is_active);
        active.number_issued_promo_codes = Set(issued_to_column(&p)?);
        active.updated_at = Set(Utc::now());
        active.update(&txn).await.map_err(db_err)?;

        let stored: HashSet<String> = load_limits(&txn, &key)
            .await?
            .into_iter()
            .map(|l| l.id)
            .collect();

        // History is append-only: existing rows only ever gain a cancel date.
        for (position, limit) in p.limits().iter().enumerate() {
            let id = limit.id.to_string();
            if stored.contains(&id) {
                partner_promo_code_limit::ActiveModel {
                    id: Set(id),
                    cancel_date: Set(limit.cancel_date),
                    ..Default::default()
                }
                .update(&txn)
                .await
                .map_err(db_err)?;
            } else {
                limit_to_active(limit, position)?
                    .insert(&txn)
                    .await
                    .map_err(db_err)?;
            }
        }

        txn.commit().await.map_err(db_err)?;
        info!("Partner {} saved with {} limits", p.id, p.limits().len());
        Ok(())
    }

    async fn insert(&self, p: Partner) -> DomainResult<()> {
        let key = p.id.to_string();
        let txn = self.db.begin().await.map_err(db_err)?;

        let existing = partner::Entity::find_by_id(key.clone())
            .one(&txn)
            .await
            .map_err(db_err)?;
        if existing.is_some() {
            return Err(DomainError::Conflict(format!("Partner '{}' already exists", key)));
        }

        let now = Utc::now();
        partner::ActiveModel {
            id: Set(key),
            name: Set(p.name.clone()),
            is_active: Set(p.is_active),
            number_issued_promo_codes: Set(issued_to_column(&p)?),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        for (position, limit) in p.limits().iter().enumerate() {
            limit_to_active(limit, position)?
                .insert(&txn)
                .await
                .map_err(db_err)?;
        }

        txn.commit().await.map_err(db_err)?;
        info!("Partner created: {} ({})", p.name, p.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use sea_orm::{ConnectOptions, Database};
    use sea_orm_migration::MigratorTrait;

    use super::*;
    use crate::infrastructure::database::migrator::Migrator;

    async fn repo() -> SeaOrmPartnerRepository {
        let mut opts = ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opts).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        SeaOrmPartnerRepository::new(db)
    }

    fn partner_with_limit(issued: u32, cancelled: bool) -> Partner {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let limit = PartnerPromoCodeLimit {
            id: Uuid::new_v4(),
            partner_id: id,
            limit: 50,
            create_date: now - Duration::days(10),
            end_date: now + Duration::days(10),
            cancel_date: cancelled.then(|| now - Duration::days(5)),
        };
        Partner::restore(id, "Fish of your dreams", true, issued, vec![limit])
    }

    #[tokio::test]
    async fn insert_and_load_round_trips_history() {
        let repo = repo().await;
        let p = partner_with_limit(10, false);
        repo.insert(p.clone()).await.unwrap();

        let loaded = repo.find_by_id(p.id).await.unwrap().unwrap();
        assert_eq!(loaded.id, p.id);
        assert_eq!(loaded.number_issued_promo_codes(), 10);
        assert_eq!(loaded.limits().len(), 1);
        assert_eq!(loaded.limits()[0].id, p.limits()[0].id);
        assert!(loaded.active_limit().is_some());
    }

    #[tokio::test]
    async fn missing_partner_is_none() {
        let repo = repo().await;
        assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_insert_conflicts() {
        let repo = repo().await;
        let p = partner_with_limit(0, false);
        repo.insert(p.clone()).await.unwrap();
        let err = repo.insert(p).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_persists_supersession() {
        let repo = repo().await;
        let mut p = partner_with_limit(10, false);
        repo.insert(p.clone()).await.unwrap();

        let now = Utc::now();
        let created = p.supersede_limit(100, now + Duration::days(1), now);
        repo.update(p.clone()).await.unwrap();

        let loaded = repo.find_by_id(p.id).await.unwrap().unwrap();
        assert_eq!(loaded.number_issued_promo_codes(), 0);
        assert_eq!(loaded.limits().len(), 2);
        assert!(loaded.limits()[0].cancel_date.is_some());
        assert_eq!(loaded.limits()[1].id, created.id);
        assert_eq!(loaded.limits()[1].limit, 100);
        assert_eq!(loaded.active_limit().map(|l| l.id), Some(created.id));
    }

    #[tokio::test]
    async fn update_unknown_partner_is_not_found() {
        let repo = repo().await;
        let err = repo.update(Partner::new("Ghost")).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn find_all_returns_partners_by_name() {
        let repo = repo().await;
        let a = Partner::new("Alpha Toys");
        let b = partner_with_limit(3, true);
        repo.insert(b.clone()).await.unwrap();
        repo.insert(a.clone()).await.unwrap();

        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, a.id);
        assert_eq!(all[1].id, b.id);
        assert_eq!(all[1].limits().len(), 1);
        assert!(all[1].active_limit().is_none());
    }
}
