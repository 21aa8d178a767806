use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::info;

use crate::errors::ServiceError;
use crate::{fetch, mapping};
use common::dto::{NewUserDto, UpdateUserDto, UserDto};
use models::user;

/// Register a new user. Email uniqueness is checked up front and backed by
/// the unique index, which surfaces as a conflict if a concurrent signup
/// wins the race.
pub async fn create_user(db: &DatabaseConnection, dto: &NewUserDto) -> Result<UserDto, ServiceError> {
    let name = dto
        .name
        .as_deref()
        .ok_or_else(|| ServiceError::Validation("name is required".into()))?;
    let email = dto
        .email
        .as_deref()
        .ok_or_else(|| ServiceError::Validation("email is required".into()))?;
    user::validate_name(name)?;
    user::validate_email(email)?;
    ensure_email_free(db, email, None).await?;

    let am = user::ActiveModel {
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        ..Default::default()
    };
    let saved = am.insert(db).await.map_err(|e| conflict_or_db(e, email))?;
    info!(user_id = saved.id, "user created");
    Ok(mapping::to_user_dto(saved))
}

/// Partial update: only the provided fields change.
pub async fn update_user(
    db: &DatabaseConnection,
    id: i64,
    dto: &UpdateUserDto,
) -> Result<UserDto, ServiceError> {
    let found = fetch::user(db, id).await?;
    if dto.name.is_none() && dto.email.is_none() {
        return Ok(mapping::to_user_dto(found));
    }
    let mut am: user::ActiveModel = found.into();
    if let Some(name) = dto.name.as_deref() {
        user::validate_name(name)?;
        am.name = Set(name.to_string());
    }
    if let Some(email) = dto.email.as_deref() {
        user::validate_email(email)?;
        ensure_email_free(db, email, Some(id)).await?;
        am.email = Set(email.to_string());
    }
    let updated = am.update(db).await.map_err(ServiceError::db)?;
    info!(user_id = updated.id, "user updated");
    Ok(mapping::to_user_dto(updated))
}

pub async fn get_user(db: &DatabaseConnection, id: i64) -> Result<UserDto, ServiceError> {
    Ok(mapping::to_user_dto(fetch::user(db, id).await?))
}

pub async fn list_users(db: &DatabaseConnection) -> Result<Vec<UserDto>, ServiceError> {
    let users = user::Entity::find()
        .order_by_asc(user::Column::Id)
        .all(db)
        .await
        .map_err(ServiceError::db)?;
    Ok(users.into_iter().map(mapping::to_user_dto).collect())
}

/// Delete and return the removed user.
pub async fn delete_user(db: &DatabaseConnection, id: i64) -> Result<UserDto, ServiceError> {
    let found = fetch::user(db, id).await?;
    user::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(ServiceError::db)?;
    info!(user_id = id, "user deleted");
    Ok(mapping::to_user_dto(found))
}

async fn ensure_email_free(
    db: &DatabaseConnection,
    email: &str,
    exclude: Option<i64>,
) -> Result<(), ServiceError> {
    let existing = user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await
        .map_err(ServiceError::db)?;
    match existing {
        Some(u) if Some(u.id) != exclude => {
            Err(ServiceError::Conflict(format!("email {email} is already in use")))
        }
        _ => Ok(()),
    }
}

fn conflict_or_db(e: sea_orm::DbErr, email: &str) -> ServiceError {
    let msg = e.to_string().to_lowercase();
    if msg.contains("unique") || msg.contains("duplicate key") {
        ServiceError::Conflict(format!("email {email} is already in use"))
    } else {
        ServiceError::db(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_db;

    fn new_user(name: &str, email: &str) -> NewUserDto {
        NewUserDto { name: Some(name.into()), email: Some(email.into()) }
    }

    #[tokio::test]
    async fn create_get_update_delete_roundtrip() {
        let db = test_db().await;
        let created = create_user(&db, &new_user("Bob", "bob@example.com")).await.unwrap();
        assert_eq!(created.name, "Bob");

        let fetched = get_user(&db, created.id).await.unwrap();
        assert_eq!(fetched, created);

        let patch = UpdateUserDto { name: Some("Robert".into()), email: None };
        let updated = update_user(&db, created.id, &patch).await.unwrap();
        assert_eq!(updated.name, "Robert");
        assert_eq!(updated.email, "bob@example.com");

        delete_user(&db, created.id).await.unwrap();
        assert!(matches!(get_user(&db, created.id).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let db = test_db().await;
        create_user(&db, &new_user("Bob", "bob@example.com")).await.unwrap();
        let err = create_user(&db, &new_user("Alice", "bob@example.com")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_to_taken_email_conflicts() {
        let db = test_db().await;
        create_user(&db, &new_user("Bob", "bob@example.com")).await.unwrap();
        let alice = create_user(&db, &new_user("Alice", "alice@example.com")).await.unwrap();
        let patch = UpdateUserDto { name: None, email: Some("bob@example.com".into()) };
        let err = update_user(&db, alice.id, &patch).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        // Re-submitting your own email is not a conflict.
        let patch = UpdateUserDto { name: None, email: Some("alice@example.com".into()) };
        assert!(update_user(&db, alice.id, &patch).await.is_ok());
    }

    #[tokio::test]
    async fn missing_fields_are_validation_errors() {
        let db = test_db().await;
        let err = create_user(&db, &NewUserDto::default()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        let err = create_user(&db, &new_user("Bob", "not-an-email")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}
