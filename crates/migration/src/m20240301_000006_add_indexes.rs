//! Secondary indexes for the hot lookup paths: bookings by item/booker,
//! items by owner/request, comments by item, requests by requestor.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_booking_item")
                    .table(Booking::Table)
                    .col(Booking::ItemId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_booking_booker")
                    .table(Booking::Table)
                    .col(Booking::BookerId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_item_owner")
                    .table(Item::Table)
                    .col(Item::OwnerId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_item_request")
                    .table(Item::Table)
                    .col(Item::RequestId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_comment_item")
                    .table(Comment::Table)
                    .col(Comment::ItemId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_request_requestor")
                    .table(Request::Table)
                    .col(Request::RequestorId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_index(Index::drop().name("idx_request_requestor").table(Request::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_comment_item").table(Comment::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_item_request").table(Item::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_item_owner").table(Item::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_booking_booker").table(Booking::Table).to_owned()).await?;
        manager.drop_index(Index::drop().name("idx_booking_item").table(Booking::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Booking { Table, ItemId, BookerId }

#[derive(DeriveIden)]
enum Item { Table, OwnerId, RequestId }

#[derive(DeriveIden)]
enum Comment { Table, ItemId }

#[derive(DeriveIden)]
enum Request { Table, RequestorId }
