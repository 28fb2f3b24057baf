use sea_orm_migration::prelude::*;

use crate::m20260801_000001_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
pub enum Birthdays {
    Table,
    Id,
    CelebrantId,
    OrganizerId,
    CelebrationDate,
    CelebrationYear,
    GiftDescription,
    TotalAmountMinor,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Birthdays::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Birthdays::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Birthdays::CelebrantId).string().not_null())
                    .col(ColumnDef::new(Birthdays::OrganizerId).string())
                    .col(
                        ColumnDef::new(Birthdays::CelebrationDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Birthdays::CelebrationYear)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Birthdays::GiftDescription)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Birthdays::TotalAmountMinor).big_integer())
                    .col(ColumnDef::new(Birthdays::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Birthdays::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-birthdays-celebrant_id")
                            .from(Birthdays::Table, Birthdays::CelebrantId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-birthdays-organizer_id")
                            .from(Birthdays::Table, Birthdays::OrganizerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // One entry per celebrant per year.
        manager
            .create_index(
                Index::create()
                    .name("uq-birthdays-celebrant-year")
                    .table(Birthdays::Table)
                    .col(Birthdays::CelebrantId)
                    .col(Birthdays::CelebrationYear)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-birthdays-celebration_date")
                    .table(Birthdays::Table)
                    .col(Birthdays::CelebrationDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Birthdays::Table).to_owned())
            .await?;
        Ok(())
    }
}
