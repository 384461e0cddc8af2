use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `ads` table and its columns.
#[derive(DeriveIden)]
enum Ads {
    Table,
    Id,
    CreatorId,
    Title,
    Description,
    Category,
    Status,
    AssignedContractorId,
    ScheduledAt,
    Location,
    WorkReportedDoneAt,
    CompletedAt,
    CanceledAt,
    CreatedAt,
    UpdatedAt,
}

/// Re-declare parent table identifiers for foreign-key references.
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
                    .table(Ads::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Ads::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Ads::CreatorId).uuid().not_null())
                    .col(ColumnDef::new(Ads::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Ads::Description).text().not_null())
                    .col(
                        ColumnDef::new(Ads::Category)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Ads::Status).string().not_null())
                    .col(ColumnDef::new(Ads::AssignedContractorId).uuid())
                    .col(ColumnDef::new(Ads::ScheduledAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Ads::Location).string_len(255))
                    .col(ColumnDef::new(Ads::WorkReportedDoneAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Ads::CompletedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Ads::CanceledAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Ads::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Ads::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ads_creator_id")
                            .from(Ads::Table, Ads::CreatorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ads_assigned_contractor_id")
                            .from(Ads::Table, Ads::AssignedContractorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Ads::Table).to_owned())
            .await
    }
}
