//! Birthday primitives.
//!
//! A `Birthday` is one yearly occurrence of a celebrant's birthday. It starts
//! unorganized (`organizer_id` is `None`); a non-celebrant may claim the
//! organizer role exactly once, after which they own gift description, date
//! and total amount.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Birthday {
    pub id: String,
    pub celebrant_id: String,
    pub organizer_id: Option<String>,
    pub celebration_date: NaiveDate,
    pub gift_description: String,
    pub total_amount_minor: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Birthday {
    /// A fresh, unorganized entry as the generator creates it.
    pub fn new(celebrant_id: String, celebration_date: NaiveDate, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            celebrant_id,
            organizer_id: None,
            celebration_date,
            gift_description: String::new(),
            total_amount_minor: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for organizer-owned fields. `None` means "leave unchanged";
/// there is no way to clear a field through a patch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthdayPatch {
    pub celebration_date: Option<NaiveDate>,
    pub gift_description: Option<String>,
    pub total_amount_minor: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "birthdays")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub celebrant_id: String,
    pub organizer_id: Option<String>,
    pub celebration_date: Date,
    // Denormalized so the (celebrant_id, celebration_year) unique index can
    // enforce one entry per celebrant per year.
    pub celebration_year: i32,
    pub gift_description: String,
    pub total_amount_minor: Option<i64>,
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

impl From<Model> for Birthday {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            celebrant_id: model.celebrant_id,
            organizer_id: model.organizer_id,
            celebration_date: model.celebration_date,
            gift_description: model.gift_description,
            total_amount_minor: model.total_amount_minor,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<&Birthday> for ActiveModel {
    fn from(birthday: &Birthday) -> Self {
        Self {
            id: ActiveValue::Set(birthday.id.clone()),
            celebrant_id: ActiveValue::Set(birthday.celebrant_id.clone()),
            organizer_id: ActiveValue::Set(birthday.organizer_id.clone()),
            celebration_date: ActiveValue::Set(birthday.celebration_date),
            celebration_year: ActiveValue::Set(birthday.celebration_date.year()),
            gift_description: ActiveValue::Set(birthday.gift_description.clone()),
            total_amount_minor: ActiveValue::Set(birthday.total_amount_minor),
            created_at: ActiveValue::Set(birthday.created_at),
            updated_at: ActiveValue::Set(birthday.updated_at),
        }
    }
}
