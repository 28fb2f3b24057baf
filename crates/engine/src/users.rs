//! Users table and profile type.
//!
//! `birth_date` is opt-in: the generator only creates birthday entries for
//! users that filled it in. `bank_details` is an opaque blob owned by the
//! user; the engine never inspects it.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub nickname: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub bank_details: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        email: String,
        first_name: String,
        last_name: String,
        nickname: Option<String>,
        birth_date: Option<NaiveDate>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email,
            first_name,
            last_name,
            nickname,
            birth_date,
            bank_details: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Name shown in birthday lists: nickname when present, full name otherwise.
    pub fn display_name(&self) -> String {
        match &self.nickname {
            Some(nick) => nick.clone(),
            None => format!("{} {}", self.first_name, self.last_name),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub nickname: Option<String>,
    pub birth_date: Option<Date>,
    #[sea_orm(column_type = "Json", nullable)]
    pub bank_details: Option<Json>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::contributions::Entity")]
    Contributions,
}

impl Related<super::contributions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contributions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            nickname: model.nickname,
            birth_date: model.birth_date,
            bank_details: model.bank_details,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<(&User, &str)> for ActiveModel {
    fn from((user, password): (&User, &str)) -> Self {
        Self {
            id: ActiveValue::Set(user.id.clone()),
            email: ActiveValue::Set(user.email.clone()),
            password: ActiveValue::Set(password.to_string()),
            first_name: ActiveValue::Set(user.first_name.clone()),
            last_name: ActiveValue::Set(user.last_name.clone()),
            nickname: ActiveValue::Set(user.nickname.clone()),
            birth_date: ActiveValue::Set(user.birth_date),
            bank_details: ActiveValue::Set(user.bank_details.clone()),
            created_at: ActiveValue::Set(user.created_at),
            updated_at: ActiveValue::Set(user.updated_at),
        }
    }
}

/// Input for user registration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub nickname: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

/// Partial profile update. `None` means "leave unchanged".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub nickname: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub bank_details: Option<serde_json::Value>,
}
