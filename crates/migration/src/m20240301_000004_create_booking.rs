//! Create `booking` table with FKs to `item` and `user` (the booker).
//!
//! `status` is a short string column; the finite value set lives in the
//! entity's active enum.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Booking::Table)
                    .if_not_exists()
                    .col(big_integer(Booking::Id).primary_key().auto_increment())
                    .col(big_integer(Booking::ItemId).not_null())
                    .col(big_integer(Booking::BookerId).not_null())
                    .col(timestamp_with_time_zone(Booking::StartDate).not_null())
                    .col(timestamp_with_time_zone(Booking::EndDate).not_null())
                    .col(string_len(Booking::Status, 16).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_item")
                            .from(Booking::Table, Booking::ItemId)
                            .to(Item::Table, Item::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_booker")
                            .from(Booking::Table, Booking::BookerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Booking::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Booking { Table, Id, ItemId, BookerId, StartDate, EndDate, Status }

#[derive(DeriveIden)]
enum Item { Table, Id }

#[derive(DeriveIden)]
enum User { Table, Id }
