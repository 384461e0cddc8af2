use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Ads {
    Table,
    CreatorId,
    Status,
    AssignedContractorId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AdRequests {
    Table,
    AdId,
    ContractorId,
    Status,
}

#[derive(DeriveIden)]
enum Reviews {
    Table,
    ContractorId,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Feed / list queries.
        manager
            .create_index(
                Index::create()
                    .name("idx_ads_status_created_at")
                    .table(Ads::Table)
                    .col(Ads::Status)
                    .col(Ads::CreatedAt)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_ads_creator_created_at")
                    .table(Ads::Table)
                    .col(Ads::CreatorId)
                    .col(Ads::CreatedAt)
                    .to_owned(),
            )
            .await?;
        // Contractor dashboard: assigned/done ads for a contractor.
        manager
            .create_index(
                Index::create()
                    .name("idx_ads_assignee_status")
                    .table(Ads::Table)
                    .col(Ads::AssignedContractorId)
                    .col(Ads::Status)
                    .to_owned(),
            )
            .await?;
        // Applicant listing per ad.
        manager
            .create_index(
                Index::create()
                    .name("idx_ad_requests_ad_status")
                    .table(AdRequests::Table)
                    .col(AdRequests::AdId)
                    .col(AdRequests::Status)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_ad_requests_contractor_status")
                    .table(AdRequests::Table)
                    .col(AdRequests::ContractorId)
                    .col(AdRequests::Status)
                    .to_owned(),
            )
            .await?;
        // Contractor profile: newest reviews first.
        manager
            .create_index(
                Index::create()
                    .name("idx_reviews_contractor_created_at")
                    .table(Reviews::Table)
                    .col(Reviews::ContractorId)
                    .col(Reviews::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_reviews_contractor_created_at",
            "idx_ad_requests_contractor_status",
            "idx_ad_requests_ad_status",
            "idx_ads_assignee_status",
            "idx_ads_creator_created_at",
            "idx_ads_status_created_at",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }
        Ok(())
    }
}
