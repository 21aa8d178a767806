use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "item")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
    /// Set when the item was listed in answer to a request.
    pub request_id: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Owner,
    Request,
    Booking,
    Comment,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Owner => Entity::belongs_to(crate::user::Entity)
                .from(Column::OwnerId)
                .to(crate::user::Column::Id)
                .into(),
            Relation::Request => Entity::belongs_to(crate::request::Entity)
                .from(Column::RequestId)
                .to(crate::request::Column::Id)
                .into(),
            Relation::Booking => Entity::has_many(crate::booking::Entity).into(),
            Relation::Comment => Entity::has_many(crate::comment::Entity).into(),
        }
    }
}

impl Related<crate::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<crate::request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Request.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
