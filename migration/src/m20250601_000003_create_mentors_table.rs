use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Mentors::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Mentors::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Mentors::Name).string().not_null())
                    .col(ColumnDef::new(Mentors::Email).string().not_null())
                    .col(ColumnDef::new(Mentors::Expertise).string().null())
                    .col(
                        ColumnDef::new(Mentors::YearsOfExperience)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Mentors::Industry).string().null())
                    .col(ColumnDef::new(Mentors::City).string().null())
                    .col(ColumnDef::new(Mentors::Country).string().null())
                    .col(ColumnDef::new(Mentors::Availability).string().null())
                    .col(ColumnDef::new(Mentors::LinkedinUrl).string().null())
                    .col(ColumnDef::new(Mentors::Website).string().null())
                    .col(ColumnDef::new(Mentors::Avatar).string().null())
                    .col(
                        ColumnDef::new(Mentors::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Mentors::Active).boolean().not_null().default(true))
                    .col(
                        ColumnDef::new(Mentors::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Mentors::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MentorAvailability::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MentorAvailability::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MentorAvailability::MentorId).uuid().not_null())
                    .col(
                        ColumnDef::new(MentorAvailability::DayOfWeek)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MentorAvailability::StartTime)
                            .string_len(5)
                            .not_null(),
                    )
                    .col(ColumnDef::new(MentorAvailability::EndTime).string_len(5).not_null())
                    .col(
                        ColumnDef::new(MentorAvailability::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_mentor_availability_mentor")
                            .from(MentorAvailability::Table, MentorAvailability::MentorId)
                            .to(Mentors::Table, Mentors::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_mentor_availability_mentor_id")
                    .table(MentorAvailability::Table)
                    .col(MentorAvailability::MentorId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MentorAvailability::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Mentors::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Mentors {
    Table,
    Id,
    Name,
    Email,
    Expertise,
    YearsOfExperience,
    Industry,
    City,
    Country,
    Availability,
    LinkedinUrl,
    Website,
    Avatar,
    Status,
    Active,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum MentorAvailability {
    Table,
    Id,
    MentorId,
    DayOfWeek,
    StartTime,
    EndTime,
    CreatedAt,
}
