//! Create `request` table with FK to `user` (the requestor).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Request::Table)
                    .if_not_exists()
                    .col(big_integer(Request::Id).primary_key().auto_increment())
                    .col(big_integer(Request::RequestorId).not_null())
                    .col(string_len(Request::Description, 512).not_null())
                    .col(timestamp_with_time_zone(Request::Created).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_request_requestor")
                            .from(Request::Table, Request::RequestorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Request::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Request { Table, Id, RequestorId, Description, Created }

#[derive(DeriveIden)]
enum User { Table, Id }
