//! Contribution primitives.
//!
//! A `Contribution` is one user's pledge toward one birthday's gift. It is
//! created with no amount; the split calculator assigns equal amounts to all
//! rows of a birthday in one write.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    pub id: String,
    pub birthday_id: String,
    pub contributor_id: String,
    pub amount_minor: Option<i64>,
    pub paid: bool,
    pub created_at: DateTime<Utc>,
}

impl Contribution {
    pub fn new(birthday_id: String, contributor_id: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            birthday_id,
            contributor_id,
            amount_minor: None,
            paid: false,
            created_at: now,
        }
    }
}

/// Result of an equal split over a birthday's contributions.
///
/// `per_person_minor` is the truncated quotient; when the contributor count
/// does not divide the total evenly the remainder is neither distributed nor
/// tracked, so `per_person_minor * contributor_count` may be less than
/// `total_amount_minor`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub total_amount_minor: i64,
    pub contributor_count: u64,
    pub per_person_minor: i64,
}

/// Aggregate view over a birthday's contributions. Exposes totals only,
/// never per-person rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionSummary {
    pub contributor_count: i64,
    pub assigned_minor: i64,
    pub paid_minor: i64,
    pub unpaid_minor: i64,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "contributions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub birthday_id: String,
    pub contributor_id: String,
    pub amount_minor: Option<i64>,
    pub paid: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::birthdays::Entity",
        from = "Column::BirthdayId",
        to = "super::birthdays::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Birthdays,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ContributorId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
}

impl Related<super::birthdays::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Birthdays.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Contribution {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            birthday_id: model.birthday_id,
            contributor_id: model.contributor_id,
            amount_minor: model.amount_minor,
            paid: model.paid,
            created_at: model.created_at,
        }
    }
}

impl From<&Contribution> for ActiveModel {
    fn from(contribution: &Contribution) -> Self {
        Self {
            id: ActiveValue::Set(contribution.id.clone()),
            birthday_id: ActiveValue::Set(contribution.birthday_id.clone()),
            contributor_id: ActiveValue::Set(contribution.contributor_id.clone()),
            amount_minor: ActiveValue::Set(contribution.amount_minor),
            paid: ActiveValue::Set(contribution.paid),
            created_at: ActiveValue::Set(contribution.created_at),
        }
    }
}
