//! Create `comment` table with FKs to `item` and `user` (the author).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Comment::Table)
                    .if_not_exists()
                    .col(big_integer(Comment::Id).primary_key().auto_increment())
                    .col(big_integer(Comment::ItemId).not_null())
                    .col(big_integer(Comment::AuthorId).not_null())
                    .col(string_len(Comment::Text, 2048).not_null())
                    .col(timestamp_with_time_zone(Comment::Created).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comment_item")
                            .from(Comment::Table, Comment::ItemId)
                            .to(Item::Table, Item::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comment_author")
                            .from(Comment::Table, Comment::AuthorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Comment::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Comment { Table, Id, ItemId, AuthorId, Text, Created }

#[derive(DeriveIden)]
enum Item { Table, Id }

#[derive(DeriveIden)]
enum User { Table, Id }
