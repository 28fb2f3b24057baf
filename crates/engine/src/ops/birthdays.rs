//! Birthday lifecycle: yearly entry generation, organizer assignment and
//! organizer-only refinement, plus the read paths feeding the lists.

use std::collections::HashMap;

use chrono::{Datelike, Months, NaiveDate, Utc};
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, SqlErr, Statement, TransactionTrait,
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    Birthday, BirthdayPatch, EngineError, ResultEngine, birthdays, contributions,
    users::{self, User},
    util::{conflict_on_unique, ensure_not_past},
};

use super::{BirthdayRole, Engine, with_tx};

/// List-view projection: the birthday plus display names, never individual
/// contribution amounts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthdaySummary {
    pub birthday: Birthday,
    pub celebrant_name: String,
    pub organizer_name: Option<String>,
}

/// Full detail view, only reachable through a role check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthdayDetail {
    pub birthday: Birthday,
    pub role: BirthdayRole,
    pub celebrant_name: String,
    pub organizer_name: Option<String>,
    pub contributions: Vec<crate::Contribution>,
}

/// The celebrant's birthday in a given year.
///
/// Feb 29 rolls to Mar 1 outside leap years. Returns `None` only for
/// month/day pairs no year can hold, which cannot come from a stored date.
fn birthday_in_year(birth_date: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, birth_date.month(), birth_date.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
}

/// Next occurrence of the birthday on or after `today`.
fn next_occurrence(birth_date: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
    let this_year = birthday_in_year(birth_date, today.year())?;
    if this_year < today {
        birthday_in_year(birth_date, today.year() + 1)
    } else {
        Some(this_year)
    }
}

impl Engine {
    /// Creates missing birthday entries for every user whose next birthday
    /// falls within the configured look-ahead window.
    ///
    /// Idempotent: entries are keyed by `(celebrant, year)`; re-running with
    /// the same window never duplicates, and a concurrent run losing the
    /// insert race is treated as "already exists".
    pub async fn generate_entries(&self, today: NaiveDate) -> ResultEngine<Vec<Birthday>> {
        let window_end = self.window_end(today)?;
        with_tx!(self, |db_tx| {
            let candidates = users::Entity::find()
                .filter(users::Column::BirthDate.is_not_null())
                .all(&db_tx)
                .await?;

            let now = Utc::now();
            let mut created = Vec::new();
            for user in candidates {
                let Some(birth_date) = user.birth_date else {
                    continue;
                };
                let Some(occurrence) = next_occurrence(birth_date, today) else {
                    continue;
                };
                if occurrence > window_end {
                    continue;
                }

                let exists = birthdays::Entity::find()
                    .filter(birthdays::Column::CelebrantId.eq(user.id.clone()))
                    .filter(birthdays::Column::CelebrationYear.eq(occurrence.year()))
                    .one(&db_tx)
                    .await?
                    .is_some();
                if exists {
                    continue;
                }

                let birthday = Birthday::new(user.id.clone(), occurrence, now);
                match birthdays::ActiveModel::from(&birthday).insert(&db_tx).await {
                    Ok(_) => created.push(birthday),
                    Err(err)
                        if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {}
                    Err(err) => return Err(err.into()),
                }
            }
            Ok(created)
        })
    }

    /// Claim the organizer role for an unorganized birthday.
    ///
    /// First successful claim wins: the `organizer_id IS NULL` guard on the
    /// update closes the race between concurrent claimants, so at most one
    /// caller sees success and the rest get a conflict.
    pub async fn assign_organizer(
        &self,
        birthday_id: &str,
        claimant_id: &str,
        patch: BirthdayPatch,
    ) -> ResultEngine<Birthday> {
        with_tx!(self, |db_tx| {
            let birthday = self.require_birthday(&db_tx, birthday_id).await?;
            self.require_user_exists(&db_tx, claimant_id).await?;

            if birthday.celebrant_id == claimant_id {
                return Err(EngineError::InvalidOperation(
                    "cannot organize own birthday".to_string(),
                ));
            }
            if birthday.organizer_id.is_some() {
                return Err(EngineError::Conflict(
                    "birthday already has an organizer".to_string(),
                ));
            }
            if let Some(date) = patch.celebration_date {
                ensure_not_past(date, Utc::now().date_naive())?;
            }

            let now = Utc::now();
            let backend = self.database.get_database_backend();
            let result = db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "UPDATE birthdays SET organizer_id = ?, updated_at = ? \
                     WHERE id = ? AND organizer_id IS NULL;",
                    vec![claimant_id.into(), now.into(), birthday_id.into()],
                ))
                .await?;
            if result.rows_affected() == 0 {
                return Err(EngineError::Conflict(
                    "birthday already has an organizer".to_string(),
                ));
            }

            let model = self.apply_patch(&db_tx, birthday_id, patch, now).await?;
            Ok(Birthday::from(model))
        })
    }

    /// Organizer-only refinement of gift description, date and total amount.
    /// Celebrant and organizer are immutable through this path.
    pub async fn update_birthday(
        &self,
        birthday_id: &str,
        caller_id: &str,
        patch: BirthdayPatch,
    ) -> ResultEngine<Birthday> {
        with_tx!(self, |db_tx| {
            self.require_organizer(&db_tx, birthday_id, caller_id).await?;
            if let Some(date) = patch.celebration_date {
                ensure_not_past(date, Utc::now().date_naive())?;
            }
            let model = self
                .apply_patch(&db_tx, birthday_id, patch, Utc::now())
                .await?;
            Ok(Birthday::from(model))
        })
    }

    /// Upcoming birthdays within the look-ahead window, visible to any
    /// authenticated caller. Summary data only.
    pub async fn upcoming_birthdays(&self, today: NaiveDate) -> ResultEngine<Vec<BirthdaySummary>> {
        let window_end = self.window_end(today)?;
        with_tx!(self, |db_tx| {
            let models = birthdays::Entity::find()
                .filter(birthdays::Column::CelebrationDate.gte(today))
                .filter(birthdays::Column::CelebrationDate.lte(window_end))
                .order_by_asc(birthdays::Column::CelebrationDate)
                .all(&db_tx)
                .await?;
            self.summaries(&db_tx, models).await
        })
    }

    /// Upcoming birthdays nobody has claimed yet.
    pub async fn unorganized_birthdays(
        &self,
        today: NaiveDate,
    ) -> ResultEngine<Vec<BirthdaySummary>> {
        with_tx!(self, |db_tx| {
            let models = birthdays::Entity::find()
                .filter(birthdays::Column::OrganizerId.is_null())
                .filter(birthdays::Column::CelebrationDate.gte(today))
                .order_by_asc(birthdays::Column::CelebrationDate)
                .all(&db_tx)
                .await?;
            self.summaries(&db_tx, models).await
        })
    }

    /// Birthdays the caller organizes.
    pub async fn organized_by(&self, user_id: &str) -> ResultEngine<Vec<Birthday>> {
        with_tx!(self, |db_tx| {
            let models = birthdays::Entity::find()
                .filter(birthdays::Column::OrganizerId.eq(user_id.to_string()))
                .order_by_asc(birthdays::Column::CelebrationDate)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(Birthday::from).collect())
        })
    }

    /// The caller's own celebration entries.
    pub async fn birthdays_for_celebrant(&self, celebrant_id: &str) -> ResultEngine<Vec<Birthday>> {
        with_tx!(self, |db_tx| {
            let models = birthdays::Entity::find()
                .filter(birthdays::Column::CelebrantId.eq(celebrant_id.to_string()))
                .order_by_asc(birthdays::Column::CelebrationDate)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(Birthday::from).collect())
        })
    }

    /// Full detail including the contribution list. Celebrant, organizer and
    /// contributors only; outsiders are rejected.
    pub async fn birthday_details(
        &self,
        birthday_id: &str,
        caller_id: &str,
    ) -> ResultEngine<BirthdayDetail> {
        with_tx!(self, |db_tx| {
            let (birthday, role) = self
                .require_detail_access(&db_tx, birthday_id, caller_id)
                .await?;

            let rows = contributions::Entity::find()
                .filter(contributions::Column::BirthdayId.eq(birthday.id.clone()))
                .order_by_asc(contributions::Column::CreatedAt)
                .all(&db_tx)
                .await?;

            let names = self
                .display_names(
                    &db_tx,
                    [Some(&birthday.celebrant_id), birthday.organizer_id.as_ref()]
                        .into_iter()
                        .flatten(),
                )
                .await?;
            let celebrant_name = display_or_id(&names, &birthday.celebrant_id);
            let organizer_name = birthday
                .organizer_id
                .as_ref()
                .map(|id| display_or_id(&names, id));

            Ok(BirthdayDetail {
                birthday: Birthday::from(birthday),
                role,
                celebrant_name,
                organizer_name,
                contributions: rows.into_iter().map(crate::Contribution::from).collect(),
            })
        })
    }

    fn window_end(&self, today: NaiveDate) -> ResultEngine<NaiveDate> {
        today
            .checked_add_months(Months::new(self.config.lookahead_months))
            .ok_or_else(|| {
                EngineError::InvalidOperation("look-ahead window out of range".to_string())
            })
    }

    /// Write only the fields the patch supplies, bumping `updated_at`.
    async fn apply_patch(
        &self,
        db: &DatabaseTransaction,
        birthday_id: &str,
        patch: BirthdayPatch,
        now: chrono::DateTime<Utc>,
    ) -> ResultEngine<birthdays::Model> {
        let mut active = birthdays::ActiveModel {
            id: ActiveValue::Set(birthday_id.to_string()),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };
        if let Some(date) = patch.celebration_date {
            active.celebration_date = ActiveValue::Set(date);
            active.celebration_year = ActiveValue::Set(date.year());
        }
        if let Some(description) = patch.gift_description {
            active.gift_description = ActiveValue::Set(description);
        }
        if let Some(total_minor) = patch.total_amount_minor {
            if total_minor <= 0 {
                return Err(EngineError::InvalidOperation(
                    "total amount must be > 0".to_string(),
                ));
            }
            active.total_amount_minor = ActiveValue::Set(Some(total_minor));
        }
        active
            .update(db)
            .await
            // Moving the date into a year that already has an entry would
            // break the one-entry-per-year invariant.
            .map_err(|err| conflict_on_unique(err, "an entry for that year already exists"))
    }

    async fn summaries(
        &self,
        db: &DatabaseTransaction,
        models: Vec<birthdays::Model>,
    ) -> ResultEngine<Vec<BirthdaySummary>> {
        // Collected eagerly rather than via `flat_map` over arrays of
        // references: that iterator type trips a rustc higher-ranked
        // lifetime limitation once it ends up inside the handler futures.
        let mut ids = Vec::new();
        for model in &models {
            ids.push(&model.celebrant_id);
            if let Some(organizer_id) = model.organizer_id.as_ref() {
                ids.push(organizer_id);
            }
        }
        let names = self.display_names(db, ids.into_iter()).await?;

        Ok(models
            .into_iter()
            .map(|model| {
                let celebrant_name = display_or_id(&names, &model.celebrant_id);
                let organizer_name = model
                    .organizer_id
                    .as_ref()
                    .map(|id| display_or_id(&names, id));
                BirthdaySummary {
                    birthday: Birthday::from(model),
                    celebrant_name,
                    organizer_name,
                }
            })
            .collect())
    }

    /// One query resolving user ids to display names.
    async fn display_names<'a, I>(
        &self,
        db: &DatabaseTransaction,
        ids: I,
    ) -> ResultEngine<HashMap<String, String>>
    where
        I: Iterator<Item = &'a String>,
    {
        let ids: Vec<String> = ids.cloned().collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = users::Entity::find()
            .filter(users::Column::Id.is_in(ids))
            .all(db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|model| {
                let user = User::from(model);
                (user.id.clone(), user.display_name())
            })
            .collect())
    }
}

fn display_or_id(names: &HashMap<String, String>, id: &str) -> String {
    names.get(id).cloned().unwrap_or_else(|| id.to_string())
}
