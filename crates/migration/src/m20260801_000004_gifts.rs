use sea_orm_migration::prelude::*;

use crate::m20260801_000001_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Gifts {
    Table,
    Id,
    UserId,
    Name,
    Description,
    Link,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Gifts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Gifts::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Gifts::UserId).string().not_null())
                    .col(ColumnDef::new(Gifts::Name).string().not_null())
                    .col(ColumnDef::new(Gifts::Description).text())
                    .col(ColumnDef::new(Gifts::Link).string())
                    .col(ColumnDef::new(Gifts::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Gifts::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-gifts-user_id")
                            .from(Gifts::Table, Gifts::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-gifts-user_id")
                    .table(Gifts::Table)
                    .col(Gifts::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Gifts::Table).to_owned())
            .await?;
        Ok(())
    }
}
