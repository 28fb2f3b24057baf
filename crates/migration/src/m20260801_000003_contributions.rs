use sea_orm_migration::prelude::*;

use crate::{m20260801_000001_users::Users, m20260801_000002_birthdays::Birthdays};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Contributions {
    Table,
    Id,
    BirthdayId,
    ContributorId,
    AmountMinor,
    Paid,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Contributions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Contributions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Contributions::BirthdayId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Contributions::ContributorId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Contributions::AmountMinor).big_integer())
                    .col(
                        ColumnDef::new(Contributions::Paid)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Contributions::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-contributions-birthday_id")
                            .from(Contributions::Table, Contributions::BirthdayId)
                            .to(Birthdays::Table, Birthdays::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-contributions-contributor_id")
                            .from(Contributions::Table, Contributions::ContributorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One contribution per contributor per birthday.
        manager
            .create_index(
                Index::create()
                    .name("uq-contributions-birthday-contributor")
                    .table(Contributions::Table)
                    .col(Contributions::BirthdayId)
                    .col(Contributions::ContributorId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-contributions-contributor_id")
                    .table(Contributions::Table)
                    .col(Contributions::ContributorId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Contributions::Table).to_owned())
            .await?;
        Ok(())
    }
}
