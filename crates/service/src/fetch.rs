//! Lookup-or-error per entity type: `find(id) -> Result<Model, NotFound>`.

use sea_orm::{DatabaseConnection, EntityTrait};

use crate::errors::ServiceError;
use models::{booking, item, request, user};

pub async fn user(db: &DatabaseConnection, id: i64) -> Result<user::Model, ServiceError> {
    user::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(ServiceError::db)?
        .ok_or_else(|| ServiceError::not_found("user", id))
}

pub async fn item(db: &DatabaseConnection, id: i64) -> Result<item::Model, ServiceError> {
    item::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(ServiceError::db)?
        .ok_or_else(|| ServiceError::not_found("item", id))
}

pub async fn booking(db: &DatabaseConnection, id: i64) -> Result<booking::Model, ServiceError> {
    booking::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(ServiceError::db)?
        .ok_or_else(|| ServiceError::not_found("booking", id))
}

pub async fn request(db: &DatabaseConnection, id: i64) -> Result<request::Model, ServiceError> {
    request::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(ServiceError::db)?
        .ok_or_else(|| ServiceError::not_found("request", id))
}
