use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Incubators::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Incubators::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Incubators::Name).string().not_null())
                    .col(ColumnDef::new(Incubators::Description).text().null())
                    .col(ColumnDef::new(Incubators::LogoUrl).string().null())
                    .col(ColumnDef::new(Incubators::City).string().null())
                    .col(ColumnDef::new(Incubators::State).string().null())
                    .col(ColumnDef::new(Incubators::ApplicationProcess).text().null())
                    .col(ColumnDef::new(Incubators::ContactInfo).text().null())
                    .col(ColumnDef::new(Incubators::EligibilityCriteria).json().not_null())
                    .col(
                        ColumnDef::new(Incubators::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Incubators::UpdatedAt)
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
            .drop_table(Table::drop().table(Incubators::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Incubators {
    Table,
    Id,
    Name,
    Description,
    LogoUrl,
    City,
    State,
    ApplicationProcess,
    ContactInfo,
    EligibilityCriteria,
    CreatedAt,
    UpdatedAt,
}
