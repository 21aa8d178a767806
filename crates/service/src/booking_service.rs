use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select, Set,
};
use tracing::info;

use crate::booking_state::BookingState;
use crate::errors::ServiceError;
use crate::{fetch, mapping};
use common::dto::{BookingDto, NewBookingDto};
use common::pagination::Pagination;
use models::booking::{self, BookingStatus};
use models::{item, user};

fn now_tz() -> sea_orm::prelude::DateTimeWithTimeZone {
    Utc::now().into()
}

/// Interval sanity shared by creation paths: both bounds present, ordered,
/// strictly in the future, and non-degenerate.
pub fn validate_interval(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<(DateTime<Utc>, DateTime<Utc>), ServiceError> {
    let start = start.ok_or_else(|| ServiceError::Validation("start is required".into()))?;
    let end = end.ok_or_else(|| ServiceError::Validation("end is required".into()))?;
    let now = Utc::now();
    if end <= start {
        return Err(ServiceError::Validation("end must be after start".into()));
    }
    if start <= now || end <= now {
        return Err(ServiceError::Validation("booking interval must lie in the future".into()));
    }
    Ok((start, end))
}

/// Create a booking in WAITING state.
///
/// An owner booking their own item is denied with a not-found-shaped error:
/// the caller learns nothing they would not learn probing a random id.
pub async fn add_booking(
    db: &DatabaseConnection,
    user_id: i64,
    dto: &NewBookingDto,
) -> Result<BookingDto, ServiceError> {
    let (start, end) = validate_interval(dto.start, dto.end)?;
    let item_id = dto
        .item_id
        .ok_or_else(|| ServiceError::Validation("itemId is required".into()))?;
    let booker = fetch::user(db, user_id).await?;
    let item = fetch::item(db, item_id).await?;
    if !item.available {
        return Err(ServiceError::Validation(format!(
            "item {} is not available for booking",
            item.id
        )));
    }
    if item.owner_id == booker.id {
        return Err(ServiceError::not_found("booking", item.id));
    }

    let am = booking::ActiveModel {
        item_id: Set(item.id),
        booker_id: Set(booker.id),
        start_date: Set(start.into()),
        end_date: Set(end.into()),
        status: Set(BookingStatus::Waiting),
        ..Default::default()
    };
    let saved = am.insert(db).await.map_err(ServiceError::db)?;
    info!(booking_id = saved.id, item_id = item.id, booker_id = booker.id, "booking created");
    Ok(mapping::to_booking_dto(saved, &item, &booker))
}

/// Decide a WAITING booking: APPROVED or REJECTED, by the item's owner only.
pub async fn approve_booking(
    db: &DatabaseConnection,
    booking_id: i64,
    user_id: i64,
    approve: bool,
) -> Result<BookingDto, ServiceError> {
    let user = fetch::user(db, user_id).await?;
    let found = fetch::booking(db, booking_id).await?;
    let item = fetch::item(db, found.item_id).await?;
    if item.owner_id != user.id {
        return Err(ServiceError::not_found("booking", booking_id));
    }
    let target = if approve { BookingStatus::Approved } else { BookingStatus::Rejected };
    transition_from_waiting(db, booking_id, target).await?;

    let updated = fetch::booking(db, booking_id).await?;
    let booker = fetch::user(db, updated.booker_id).await?;
    info!(booking_id, status = target.as_str(), "booking decided");
    Ok(mapping::to_booking_dto(updated, &item, &booker))
}

/// Withdraw a WAITING booking, by its booker only.
pub async fn cancel_booking(
    db: &DatabaseConnection,
    booking_id: i64,
    user_id: i64,
) -> Result<BookingDto, ServiceError> {
    let user = fetch::user(db, user_id).await?;
    let found = fetch::booking(db, booking_id).await?;
    if found.booker_id != user.id {
        return Err(ServiceError::not_found("booking", booking_id));
    }
    transition_from_waiting(db, booking_id, BookingStatus::Canceled).await?;

    let updated = fetch::booking(db, booking_id).await?;
    let item = fetch::item(db, updated.item_id).await?;
    info!(booking_id, "booking canceled");
    Ok(mapping::to_booking_dto(updated, &item, &user))
}

/// Conditional status transition out of WAITING. Zero affected rows means a
/// concurrent decision (or an earlier one) already landed; the database is
/// the only arbiter here.
async fn transition_from_waiting(
    db: &DatabaseConnection,
    booking_id: i64,
    target: BookingStatus,
) -> Result<(), ServiceError> {
    let res = booking::Entity::update_many()
        .col_expr(booking::Column::Status, Expr::value(target))
        .filter(booking::Column::Id.eq(booking_id))
        .filter(booking::Column::Status.eq(BookingStatus::Waiting))
        .exec(db)
        .await
        .map_err(ServiceError::db)?;
    if res.rows_affected == 0 {
        return Err(ServiceError::Validation(format!(
            "booking {booking_id} is not in WAITING state"
        )));
    }
    Ok(())
}

/// Visible to the booker and the item's owner only; everyone else gets the
/// same answer as for a nonexistent booking.
pub async fn get_booking(
    db: &DatabaseConnection,
    booking_id: i64,
    user_id: i64,
) -> Result<BookingDto, ServiceError> {
    let found = fetch::booking(db, booking_id).await?;
    let user = fetch::user(db, user_id).await?;
    let item = fetch::item(db, found.item_id).await?;
    if user.id != found.booker_id && user.id != item.owner_id {
        return Err(ServiceError::not_found("booking", booking_id));
    }
    let booker = fetch::user(db, found.booker_id).await?;
    Ok(mapping::to_booking_dto(found, &item, &booker))
}

/// Bookings made by the user, filtered by state, newest start first.
pub async fn get_own_bookings(
    db: &DatabaseConnection,
    user_id: i64,
    state: &str,
    page: Pagination,
) -> Result<Vec<BookingDto>, ServiceError> {
    let state = BookingState::parse(state)?;
    fetch::user(db, user_id).await?;
    let query = booking::Entity::find().filter(booking::Column::BookerId.eq(user_id));
    list_filtered(db, query, state, page).await
}

/// Bookings on items the user owns, filtered by state, newest start first.
pub async fn get_bookings_for_own_items(
    db: &DatabaseConnection,
    user_id: i64,
    state: &str,
    page: Pagination,
) -> Result<Vec<BookingDto>, ServiceError> {
    let state = BookingState::parse(state)?;
    fetch::user(db, user_id).await?;
    let query = booking::Entity::find()
        .inner_join(item::Entity)
        .filter(item::Column::OwnerId.eq(user_id));
    list_filtered(db, query, state, page).await
}

async fn list_filtered(
    db: &DatabaseConnection,
    query: Select<booking::Entity>,
    state: BookingState,
    page: Pagination,
) -> Result<Vec<BookingDto>, ServiceError> {
    let (page_idx, per_page) = page.page();
    let bookings = apply_state_filter(query, state)
        .order_by_desc(booking::Column::StartDate)
        .paginate(db, per_page)
        .fetch_page(page_idx)
        .await
        .map_err(ServiceError::db)?;
    to_booking_dtos(db, bookings).await
}

/// The state predicate table, evaluated against "now" at query time.
fn apply_state_filter(
    query: Select<booking::Entity>,
    state: BookingState,
) -> Select<booking::Entity> {
    let now = now_tz();
    match state {
        BookingState::All => query,
        BookingState::Current => query
            .filter(booking::Column::StartDate.lte(now))
            .filter(booking::Column::EndDate.gt(now)),
        BookingState::Past => query.filter(booking::Column::EndDate.lt(now)),
        BookingState::Future => query.filter(booking::Column::StartDate.gt(now)),
        BookingState::Waiting => query
            .filter(booking::Column::StartDate.gt(now))
            .filter(booking::Column::Status.eq(BookingStatus::Waiting)),
        BookingState::Rejected => query.filter(
            booking::Column::Status
                .is_in([BookingStatus::Rejected, BookingStatus::Canceled]),
        ),
    }
}

/// Resolve items and bookers in bulk, then map.
async fn to_booking_dtos(
    db: &DatabaseConnection,
    bookings: Vec<booking::Model>,
) -> Result<Vec<BookingDto>, ServiceError> {
    if bookings.is_empty() {
        return Ok(Vec::new());
    }
    let item_ids: Vec<i64> = bookings.iter().map(|b| b.item_id).collect();
    let booker_ids: Vec<i64> = bookings.iter().map(|b| b.booker_id).collect();
    let items: HashMap<i64, item::Model> = item::Entity::find()
        .filter(item::Column::Id.is_in(item_ids))
        .all(db)
        .await
        .map_err(ServiceError::db)?
        .into_iter()
        .map(|i| (i.id, i))
        .collect();
    let bookers: HashMap<i64, user::Model> = user::Entity::find()
        .filter(user::Column::Id.is_in(booker_ids))
        .all(db)
        .await
        .map_err(ServiceError::db)?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    bookings
        .into_iter()
        .map(|b| {
            let i = items.get(&b.item_id).ok_or_else(|| {
                ServiceError::Db(format!("booking {} references missing item {}", b.id, b.item_id))
            })?;
            let u = bookers.get(&b.booker_id).ok_or_else(|| {
                ServiceError::Db(format!("booking {} references missing user {}", b.id, b.booker_id))
            })?;
            Ok(mapping::to_booking_dto(b, i, u))
        })
        .collect()
}
