//! Shared fixtures for the service tests: a fresh in-memory SQLite database
//! with the full schema, plus seed helpers that bypass the creation-time
//! invariants so tests can place bookings in the past.

use chrono::{Duration, Utc};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};

use models::booking::{self, BookingStatus};
use models::{comment, item, request, user};

pub async fn test_db() -> DatabaseConnection {
    // A single pooled connection keeps every query on the same in-memory
    // database.
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1);
    let db = Database::connect(opts).await.expect("connect to sqlite");
    Migrator::up(&db, None).await.expect("apply migrations");
    db
}

pub async fn seed_user(db: &DatabaseConnection, name: &str, email: &str) -> user::Model {
    user::ActiveModel {
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert user")
}

pub async fn seed_item(
    db: &DatabaseConnection,
    owner_id: i64,
    name: &str,
    available: bool,
) -> item::Model {
    item::ActiveModel {
        owner_id: Set(owner_id),
        name: Set(name.to_string()),
        description: Set(format!("{name} description")),
        available: Set(available),
        request_id: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert item")
}

/// Insert a booking with start/end offset from now by whole hours; negative
/// offsets land in the past.
pub async fn seed_booking(
    db: &DatabaseConnection,
    item_id: i64,
    booker_id: i64,
    start_offset_hours: i64,
    end_offset_hours: i64,
    status: BookingStatus,
) -> booking::Model {
    let now = Utc::now();
    booking::ActiveModel {
        item_id: Set(item_id),
        booker_id: Set(booker_id),
        start_date: Set((now + Duration::hours(start_offset_hours)).into()),
        end_date: Set((now + Duration::hours(end_offset_hours)).into()),
        status: Set(status),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert booking")
}

pub async fn seed_comment(
    db: &DatabaseConnection,
    item_id: i64,
    author_id: i64,
    text: &str,
) -> comment::Model {
    comment::ActiveModel {
        item_id: Set(item_id),
        author_id: Set(author_id),
        text: Set(text.to_string()),
        created: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert comment")
}

pub async fn seed_request(
    db: &DatabaseConnection,
    requestor_id: i64,
    description: &str,
) -> request::Model {
    request::ActiveModel {
        requestor_id: Set(requestor_id),
        description: Set(description.to_string()),
        created: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert request")
}
