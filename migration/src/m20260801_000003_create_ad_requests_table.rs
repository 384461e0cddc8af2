use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `ad_requests` table and its columns.
#[derive(DeriveIden)]
enum AdRequests {
    Table,
    Id,
    AdId,
    ContractorId,
    Status,
    Note,
    CreatedAt,
    UpdatedAt,
}

/// Re-declare parent table identifiers for foreign-key references.
#[derive(DeriveIden)]
enum Ads {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AdRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdRequests::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AdRequests::AdId).uuid().not_null())
                    .col(ColumnDef::new(AdRequests::ContractorId).uuid().not_null())
                    .col(ColumnDef::new(AdRequests::Status).string().not_null())
                    .col(
                        ColumnDef::new(AdRequests::Note)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(AdRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdRequests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ad_requests_ad_id")
                            .from(AdRequests::Table, AdRequests::AdId)
                            .to(Ads::Table, Ads::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ad_requests_contractor_id")
                            .from(AdRequests::Table, AdRequests::ContractorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One application per (ad, contractor); withdraw flips the row,
        // re-apply resurrects it. Also the conflict target of the
        // apply upsert.
        manager
            .create_index(
                Index::create()
                    .name("idx_ad_requests_ad_contractor_unique")
                    .table(AdRequests::Table)
                    .col(AdRequests::AdId)
                    .col(AdRequests::ContractorId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdRequests::Table).to_owned())
            .await
    }
}
