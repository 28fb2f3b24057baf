//! Wishlist primitives.
//!
//! A `Gift` is one item on a user's wishlist. The list is writable only by
//! its owner; other users may browse it read-only when picking a present.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gift {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Gift {
    pub fn new(
        user_id: String,
        name: String,
        description: Option<String>,
        link: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            name,
            description,
            link,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for adding a wishlist item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGift {
    pub name: String,
    pub description: Option<String>,
    pub link: Option<String>,
}

/// Partial update. `None` means "leave unchanged".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "gifts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub link: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Gift {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            description: model.description,
            link: model.link,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<&Gift> for ActiveModel {
    fn from(gift: &Gift) -> Self {
        Self {
            id: ActiveValue::Set(gift.id.clone()),
            user_id: ActiveValue::Set(gift.user_id.clone()),
            name: ActiveValue::Set(gift.name.clone()),
            description: ActiveValue::Set(gift.description.clone()),
            link: ActiveValue::Set(gift.link.clone()),
            created_at: ActiveValue::Set(gift.created_at),
            updated_at: ActiveValue::Set(gift.updated_at),
        }
    }
}
