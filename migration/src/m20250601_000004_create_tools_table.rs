use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tools::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tools::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Tools::Name).string().not_null())
                    .col(ColumnDef::new(Tools::Category).string().null())
                    .col(ColumnDef::new(Tools::Description).text().null())
                    .col(ColumnDef::new(Tools::PriceModel).string().null())
                    .col(ColumnDef::new(Tools::Website).string().null())
                    .col(ColumnDef::new(Tools::ContactEmail).string().null())
                    .col(ColumnDef::new(Tools::IntegrationDetails).text().null())
                    // JSON array of strings; sqlite has no native array type
                    .col(ColumnDef::new(Tools::Tags).json().not_null())
                    .col(ColumnDef::new(Tools::UsageCount).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Tools::Status)
                            .string_len(16)
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Tools::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Tools::UpdatedAt)
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
            .drop_table(Table::drop().table(Tools::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Tools {
    Table,
    Id,
    Name,
    Category,
    Description,
    PriceModel,
    Website,
    ContactEmail,
    IntegrationDetails,
    Tags,
    UsageCount,
    Status,
    CreatedAt,
    UpdatedAt,
}
