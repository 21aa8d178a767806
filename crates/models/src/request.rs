use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A post describing a desired item, fulfillable by other users' listings.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "request")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub requestor_id: i64,
    pub description: String,
    pub created: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Requestor,
    Item,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Requestor => Entity::belongs_to(crate::user::Entity)
                .from(Column::RequestorId)
                .to(crate::user::Column::Id)
                .into(),
            Relation::Item => Entity::has_many(crate::item::Entity).into(),
        }
    }
}

impl Related<crate::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Requestor.def()
    }
}

impl Related<crate::item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Item.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
