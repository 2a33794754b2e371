use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Investors::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Investors::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Investors::Name).string().not_null())
                    .col(ColumnDef::new(Investors::Email).string().not_null())
                    .col(ColumnDef::new(Investors::Organization).string().null())
                    // Investment amounts are free text ("5M", "100K")
                    .col(ColumnDef::new(Investors::TotalInvestment).string().null())
                    .col(
                        ColumnDef::new(Investors::InvestedStartups)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Investors::InvestmentFocus).text().null())
                    .col(ColumnDef::new(Investors::City).string().null())
                    .col(ColumnDef::new(Investors::Country).string().null())
                    .col(ColumnDef::new(Investors::MinimumInvestment).string().null())
                    .col(ColumnDef::new(Investors::MaximumInvestment).string().null())
                    .col(
                        ColumnDef::new(Investors::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Investors::Active).boolean().not_null().default(true))
                    .col(ColumnDef::new(Investors::Avatar).string().null())
                    .col(ColumnDef::new(Investors::LinkedinUrl).string().null())
                    .col(ColumnDef::new(Investors::Website).string().null())
                    .col(
                        ColumnDef::new(Investors::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Investors::UpdatedAt)
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
            .drop_table(Table::drop().table(Investors::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Investors {
    Table,
    Id,
    Name,
    Email,
    Organization,
    TotalInvestment,
    InvestedStartups,
    InvestmentFocus,
    City,
    Country,
    MinimumInvestment,
    MaximumInvestment,
    Status,
    Active,
    Avatar,
    LinkedinUrl,
    Website,
    CreatedAt,
    UpdatedAt,
}
