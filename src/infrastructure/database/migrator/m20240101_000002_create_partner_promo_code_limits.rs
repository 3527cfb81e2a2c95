//! Migration to create partner_promo_code_limits table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PartnerPromoCodeLimits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PartnerPromoCodeLimits::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PartnerPromoCodeLimits::PartnerId)
                            .string_len(36)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PartnerPromoCodeLimits::Position)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PartnerPromoCodeLimits::Limit)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PartnerPromoCodeLimits::CreateDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PartnerPromoCodeLimits::EndDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PartnerPromoCodeLimits::CancelDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_partner_limits_partner")
                            .from(PartnerPromoCodeLimits::Table, PartnerPromoCodeLimits::PartnerId)
                            .to(Partners::Table, Partners::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_partner_limits_partner_position")
                    .table(PartnerPromoCodeLimits::Table)
                    .col(PartnerPromoCodeLimits::PartnerId)
                    .col(PartnerPromoCodeLimits::Position)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PartnerPromoCodeLimits::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PartnerPromoCodeLimits {
    Table,
    Id,
    PartnerId,
    Position,
    Limit,
    CreateDate,
    EndDate,
    CancelDate,
}

#[derive(Iden)]
enum Partners {
    Table,
    Id,
}
