use std::collections::HashMap;

use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use tracing::info;

use crate::errors::ServiceError;
use crate::{fetch, mapping};
use common::dto::{CommentDto, ItemDto, NewCommentDto, NewItemDto, UpdateItemDto};
use common::pagination::Pagination;
use models::booking::{self, BookingStatus};
use models::{comment, item, user};

fn now_tz() -> DateTimeWithTimeZone {
    Utc::now().into()
}

fn required_text(value: Option<&str>, field: &str) -> Result<String, ServiceError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.to_string()),
        _ => Err(ServiceError::Validation(format!("{field} is required"))),
    }
}

pub async fn add_item(
    db: &DatabaseConnection,
    user_id: i64,
    dto: &NewItemDto,
) -> Result<ItemDto, ServiceError> {
    let owner = fetch::user(db, user_id).await?;
    let name = required_text(dto.name.as_deref(), "name")?;
    let description = required_text(dto.description.as_deref(), "description")?;
    let available = dto
        .available
        .ok_or_else(|| ServiceError::Validation("available is required".into()))?;
    if let Some(request_id) = dto.request_id {
        fetch::request(db, request_id).await?;
    }

    let am = item::ActiveModel {
        owner_id: Set(owner.id),
        name: Set(name),
        description: Set(description),
        available: Set(available),
        request_id: Set(dto.request_id),
        ..Default::default()
    };
    let saved = am.insert(db).await.map_err(ServiceError::db)?;
    info!(item_id = saved.id, owner_id = owner.id, "item created");
    Ok(mapping::to_item_dto(saved, None, None, Vec::new()))
}

/// Partial update, owner only.
pub async fn update_item(
    db: &DatabaseConnection,
    user_id: i64,
    item_id: i64,
    dto: &UpdateItemDto,
) -> Result<ItemDto, ServiceError> {
    let user = fetch::user(db, user_id).await?;
    let found = fetch::item(db, item_id).await?;
    if found.owner_id != user.id {
        return Err(ServiceError::Forbidden(format!(
            "user {} is not the owner of item {}",
            user.id, item_id
        )));
    }
    if dto.name.is_none() && dto.description.is_none() && dto.available.is_none() {
        return Ok(mapping::to_item_dto(found, None, None, Vec::new()));
    }
    let mut am: item::ActiveModel = found.into();
    if let Some(name) = dto.name.as_deref() {
        am.name = Set(required_text(Some(name), "name")?);
    }
    if let Some(description) = dto.description.as_deref() {
        am.description = Set(required_text(Some(description), "description")?);
    }
    if let Some(available) = dto.available {
        am.available = Set(available);
    }
    let updated = am.update(db).await.map_err(ServiceError::db)?;
    info!(item_id = updated.id, owner_id = user.id, "item updated");
    Ok(mapping::to_item_dto(updated, None, None, Vec::new()))
}

/// Item view. Booking summaries are computed for the owner only; everyone
/// gets the comments.
pub async fn get_item(
    db: &DatabaseConnection,
    item_id: i64,
    user_id: i64,
) -> Result<ItemDto, ServiceError> {
    let found = fetch::item(db, item_id).await?;
    let comments = comments_for_items(db, &[found.id])
        .await?
        .remove(&found.id)
        .unwrap_or_default();

    let (last, next) = if found.owner_id == user_id {
        let bookings = booking::Entity::find()
            .filter(booking::Column::ItemId.eq(found.id))
            .filter(booking::Column::Status.is_in([BookingStatus::Approved, BookingStatus::Waiting]))
            .order_by_asc(booking::Column::StartDate)
            .all(db)
            .await
            .map_err(ServiceError::db)?;
        let (last, next) = scan_last_next(&bookings, now_tz());
        (last.map(mapping::to_booking_short), next.map(mapping::to_booking_short))
    } else {
        (None, None)
    };
    Ok(mapping::to_item_dto(found, last, next, comments))
}

/// All of the owner's items with booking summaries and comments, resolved
/// in bulk: one query for the bookings and one for the comments across the
/// whole item set, then a group-reduce per item.
pub async fn get_items_for_owner(
    db: &DatabaseConnection,
    user_id: i64,
    page: Pagination,
) -> Result<Vec<ItemDto>, ServiceError> {
    fetch::user(db, user_id).await?;
    let (page_idx, per_page) = page.page();
    let items = item::Entity::find()
        .filter(item::Column::OwnerId.eq(user_id))
        .order_by_asc(item::Column::Id)
        .paginate(db, per_page)
        .fetch_page(page_idx)
        .await
        .map_err(ServiceError::db)?;
    if items.is_empty() {
        return Ok(Vec::new());
    }

    let item_ids: Vec<i64> = items.iter().map(|i| i.id).collect();
    let bookings = booking::Entity::find()
        .filter(booking::Column::ItemId.is_in(item_ids.clone()))
        .filter(booking::Column::Status.is_in([BookingStatus::Approved, BookingStatus::Waiting]))
        .all(db)
        .await
        .map_err(ServiceError::db)?;
    let mut comments = comments_for_items(db, &item_ids).await?;

    let now = now_tz();
    // Running max(start < now) and min(start > now) per item.
    let mut last_by_item: HashMap<i64, booking::Model> = HashMap::new();
    let mut next_by_item: HashMap<i64, booking::Model> = HashMap::new();
    for b in bookings {
        if b.start_date < now {
            match last_by_item.get(&b.item_id) {
                Some(prev) if prev.start_date >= b.start_date => {}
                _ => {
                    last_by_item.insert(b.item_id, b);
                }
            }
        } else if b.start_date > now {
            match next_by_item.get(&b.item_id) {
                Some(prev) if prev.start_date <= b.start_date => {}
                _ => {
                    next_by_item.insert(b.item_id, b);
                }
            }
        }
    }

    Ok(items
        .into_iter()
        .map(|i| {
            let last = last_by_item.remove(&i.id).map(|b| mapping::to_booking_short(&b));
            let next = next_by_item.remove(&i.id).map(|b| mapping::to_booking_short(&b));
            let item_comments = comments.remove(&i.id).unwrap_or_default();
            mapping::to_item_dto(i, last, next, item_comments)
        })
        .collect())
}

/// Keyword search over available items. A blank query returns nothing and
/// never reaches the database.
pub async fn find_available(
    db: &DatabaseConnection,
    text: Option<&str>,
    page: Pagination,
) -> Result<Vec<ItemDto>, ServiceError> {
    let text = match text {
        Some(t) if !t.trim().is_empty() => t.trim().to_lowercase(),
        _ => return Ok(Vec::new()),
    };
    let pattern = format!("%{text}%");
    let (page_idx, per_page) = page.page();
    let items = item::Entity::find()
        .filter(item::Column::Available.eq(true))
        .filter(
            Condition::any()
                .add(
                    Expr::expr(Func::lower(Expr::col((item::Entity, item::Column::Name))))
                        .like(pattern.as_str()),
                )
                .add(
                    Expr::expr(Func::lower(Expr::col((
                        item::Entity,
                        item::Column::Description,
                    ))))
                    .like(pattern.as_str()),
                ),
        )
        .order_by_asc(item::Column::Id)
        .paginate(db, per_page)
        .fetch_page(page_idx)
        .await
        .map_err(ServiceError::db)?;
    Ok(items
        .into_iter()
        .map(|i| mapping::to_item_dto(i, None, None, Vec::new()))
        .collect())
}

/// Leave a comment on an item. Allowed only after a completed stay: an
/// APPROVED booking of this item by this author whose end has passed.
pub async fn add_comment(
    db: &DatabaseConnection,
    item_id: i64,
    user_id: i64,
    dto: &NewCommentDto,
) -> Result<CommentDto, ServiceError> {
    let found = fetch::item(db, item_id).await?;
    let author = fetch::user(db, user_id).await?;
    let text = required_text(dto.text.as_deref(), "text")?;

    let completed = booking::Entity::find()
        .filter(booking::Column::ItemId.eq(found.id))
        .filter(booking::Column::BookerId.eq(author.id))
        .filter(booking::Column::Status.eq(BookingStatus::Approved))
        .filter(booking::Column::EndDate.lt(now_tz()))
        .count(db)
        .await
        .map_err(ServiceError::db)?;
    if completed == 0 {
        return Err(ServiceError::Validation(format!(
            "user {} may not comment on item {}",
            author.id, found.id
        )));
    }

    let am = comment::ActiveModel {
        item_id: Set(found.id),
        author_id: Set(author.id),
        text: Set(text),
        created: Set(now_tz()),
        ..Default::default()
    };
    let saved = am.insert(db).await.map_err(ServiceError::db)?;
    info!(comment_id = saved.id, item_id = found.id, author_id = author.id, "comment added");
    Ok(mapping::to_comment_dto(saved, author.name))
}

/// Single-item rule: walk bookings in start order; the latest one starting
/// before now is "last", the first one starting at or after now is "next".
fn scan_last_next(
    bookings: &[booking::Model],
    now: DateTimeWithTimeZone,
) -> (Option<&booking::Model>, Option<&booking::Model>) {
    let mut last = None;
    for b in bookings {
        if b.start_date < now {
            last = Some(b);
        } else {
            return (last, Some(b));
        }
    }
    (last, None)
}

/// Comments grouped per item, enriched with author display names.
async fn comments_for_items(
    db: &DatabaseConnection,
    item_ids: &[i64],
) -> Result<HashMap<i64, Vec<CommentDto>>, ServiceError> {
    let comments = comment::Entity::find()
        .filter(comment::Column::ItemId.is_in(item_ids.to_vec()))
        .order_by_asc(comment::Column::Id)
        .all(db)
        .await
        .map_err(ServiceError::db)?;
    if comments.is_empty() {
        return Ok(HashMap::new());
    }
    let author_ids: Vec<i64> = comments.iter().map(|c| c.author_id).collect();
    let authors: HashMap<i64, String> = user::Entity::find()
        .filter(user::Column::Id.is_in(author_ids))
        .all(db)
        .await
        .map_err(ServiceError::db)?
        .into_iter()
        .map(|u| (u.id, u.name))
        .collect();

    let mut grouped: HashMap<i64, Vec<CommentDto>> = HashMap::new();
    for c in comments {
        let name = authors.get(&c.author_id).cloned().unwrap_or_default();
        grouped
            .entry(c.item_id)
            .or_default()
            .push(mapping::to_comment_dto(c, name));
    }
    Ok(grouped)
}
