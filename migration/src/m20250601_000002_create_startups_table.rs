use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Startups::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Startups::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Startups::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Startups::Industry).string_len(50).null())
                    .col(ColumnDef::new(Startups::Description).text().null())
                    .col(ColumnDef::new(Startups::TeamSize).integer().null())
                    .col(ColumnDef::new(Startups::Website).string().null())
                    .col(ColumnDef::new(Startups::ContactEmail).string().null())
                    .col(ColumnDef::new(Startups::ContactPhone).string().null())
                    .col(ColumnDef::new(Startups::BusinessModel).string().null())
                    .col(ColumnDef::new(Startups::FundingStage).string().null())
                    .col(ColumnDef::new(Startups::TotalFunding).string().null())
                    .col(ColumnDef::new(Startups::Location).string().null())
                    .col(ColumnDef::new(Startups::FoundedYear).integer().null())
                    .col(
                        ColumnDef::new(Startups::Status)
                            .string_len(16)
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(Startups::PitchDeck).string().null())
                    .col(
                        ColumnDef::new(Startups::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Startups::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Startups::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Startups {
    Table,
    Id,
    Name,
    Industry,
    Description,
    TeamSize,
    Website,
    ContactEmail,
    ContactPhone,
    BusinessModel,
    FundingStage,
    TotalFunding,
    Location,
    FoundedYear,
    Status,
    PitchDeck,
    CreatedAt,
    UpdatedAt,
}
