use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::info;

use crate::errors::ServiceError;
use crate::{fetch, mapping};
use common::dto::{ItemRequestDto, ItemShortDto, NewItemRequestDto};
use common::pagination::Pagination;
use models::{item, request};

pub async fn add_request(
    db: &DatabaseConnection,
    user_id: i64,
    dto: &NewItemRequestDto,
) -> Result<ItemRequestDto, ServiceError> {
    let requestor = fetch::user(db, user_id).await?;
    let description = match dto.description.as_deref() {
        Some(d) if !d.trim().is_empty() => d.to_string(),
        _ => return Err(ServiceError::Validation("description is required".into())),
    };
    let am = request::ActiveModel {
        requestor_id: Set(requestor.id),
        description: Set(description),
        created: Set(Utc::now().into()),
        ..Default::default()
    };
    let saved = am.insert(db).await.map_err(ServiceError::db)?;
    info!(request_id = saved.id, requestor_id = requestor.id, "item request created");
    Ok(mapping::to_request_dto(saved, Vec::new()))
}

/// The user's own requests, newest first, with fulfilling items attached.
pub async fn get_own(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<ItemRequestDto>, ServiceError> {
    fetch::user(db, user_id).await?;
    let requests = request::Entity::find()
        .filter(request::Column::RequestorId.eq(user_id))
        .order_by_desc(request::Column::Created)
        .all(db)
        .await
        .map_err(ServiceError::db)?;
    attach_items(db, requests).await
}

/// Everyone else's requests, newest first, paginated.
pub async fn get_all(
    db: &DatabaseConnection,
    user_id: i64,
    page: Pagination,
) -> Result<Vec<ItemRequestDto>, ServiceError> {
    fetch::user(db, user_id).await?;
    let (page_idx, per_page) = page.page();
    let requests = request::Entity::find()
        .filter(request::Column::RequestorId.ne(user_id))
        .order_by_desc(request::Column::Created)
        .paginate(db, per_page)
        .fetch_page(page_idx)
        .await
        .map_err(ServiceError::db)?;
    attach_items(db, requests).await
}

pub async fn get_one(
    db: &DatabaseConnection,
    user_id: i64,
    request_id: i64,
) -> Result<ItemRequestDto, ServiceError> {
    fetch::user(db, user_id).await?;
    let found = fetch::request(db, request_id).await?;
    let mut dtos = attach_items(db, vec![found]).await?;
    dtos.pop()
        .ok_or_else(|| ServiceError::Db("request mapping produced no result".into()))
}

/// Bulk-fetch the items answering the given requests and group them onto
/// their requests, preserving the input order.
async fn attach_items(
    db: &DatabaseConnection,
    requests: Vec<request::Model>,
) -> Result<Vec<ItemRequestDto>, ServiceError> {
    if requests.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i64> = requests.iter().map(|r| r.id).collect();
    let items = item::Entity::find()
        .filter(item::Column::RequestId.is_in(ids))
        .all(db)
        .await
        .map_err(ServiceError::db)?;

    let mut by_request: HashMap<i64, Vec<ItemShortDto>> = HashMap::new();
    for i in &items {
        if let Some(request_id) = i.request_id {
            by_request.entry(request_id).or_default().push(mapping::to_item_short(i));
        }
    }
    Ok(requests
        .into_iter()
        .map(|r| {
            let attached = by_request.remove(&r.id).unwrap_or_default();
            mapping::to_request_dto(r, attached)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item_service::add_item;
    use crate::test_support::{seed_user, test_db};
    use common::dto::NewItemDto;

    fn request_dto(description: &str) -> NewItemRequestDto {
        NewItemRequestDto { description: Some(description.into()) }
    }

    #[tokio::test]
    async fn fulfilled_request_carries_its_items() {
        let db = test_db().await;
        let requestor = seed_user(&db, "Rita", "rita@example.com").await;
        let owner = seed_user(&db, "Olga", "olga@example.com").await;

        let created = add_request(&db, requestor.id, &request_dto("need a drill")).await.unwrap();
        assert!(created.items.is_empty());

        let listing = NewItemDto {
            name: Some("drill".into()),
            description: Some("cordless".into()),
            available: Some(true),
            request_id: Some(created.id),
        };
        let item = add_item(&db, owner.id, &listing).await.unwrap();

        let own = get_own(&db, requestor.id).await.unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].id, created.id);
        assert_eq!(own[0].items.len(), 1);
        assert_eq!(own[0].items[0].id, item.id);
        assert_eq!(own[0].items[0].owner_id, owner.id);
    }

    #[tokio::test]
    async fn own_and_others_are_disjoint() {
        let db = test_db().await;
        let rita = seed_user(&db, "Rita", "rita@example.com").await;
        let olga = seed_user(&db, "Olga", "olga@example.com").await;
        let mine = add_request(&db, rita.id, &request_dto("need a drill")).await.unwrap();
        let theirs = add_request(&db, olga.id, &request_dto("need a ladder")).await.unwrap();

        let own = get_own(&db, rita.id).await.unwrap();
        assert_eq!(own.iter().map(|r| r.id).collect::<Vec<_>>(), vec![mine.id]);

        let others = get_all(&db, rita.id, Pagination::default()).await.unwrap();
        assert_eq!(others.iter().map(|r| r.id).collect::<Vec<_>>(), vec![theirs.id]);

        // Requests with no fulfilling items expose an empty list, not null.
        assert!(others[0].items.is_empty());
    }

    #[tokio::test]
    async fn get_one_is_visible_to_any_user() {
        let db = test_db().await;
        let rita = seed_user(&db, "Rita", "rita@example.com").await;
        let olga = seed_user(&db, "Olga", "olga@example.com").await;
        let created = add_request(&db, rita.id, &request_dto("need a drill")).await.unwrap();

        let seen = get_one(&db, olga.id, created.id).await.unwrap();
        assert_eq!(seen.id, created.id);

        let err = get_one(&db, olga.id, 999).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn blank_description_is_rejected() {
        let db = test_db().await;
        let rita = seed_user(&db, "Rita", "rita@example.com").await;
        let err = add_request(&db, rita.id, &request_dto("   ")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        let err = add_request(&db, rita.id, &NewItemRequestDto::default()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}
