use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Item,
    Booking,
    Comment,
    Request,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Item => Entity::has_many(crate::item::Entity).into(),
            Relation::Booking => Entity::has_many(crate::booking::Entity).into(),
            Relation::Comment => Entity::has_many(crate::comment::Entity).into(),
            Relation::Request => Entity::has_many(crate::request::Entity).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::Validation("name required".into()));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    if email.trim().is_empty() || !email.contains('@') {
        return Err(ModelError::Validation(format!("invalid email: {email}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_requires_at_sign() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("user.example.com").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn name_must_not_be_blank() {
        assert!(validate_name("Bob").is_ok());
        assert!(validate_name("   ").is_err());
    }
}
