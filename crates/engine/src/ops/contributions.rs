//! Contribution enrollment, payment status and the equal-split calculator.

use chrono::Utc;
use sea_orm::{
    ActiveValue, QueryFilter, QueryOrder, Statement, TransactionTrait, prelude::*, sea_query::Expr,
};

use crate::{
    Contribution, ContributionSummary, EngineError, ResultEngine, Split, contributions,
    util::conflict_on_unique,
};

use super::{Engine, with_tx};

impl Engine {
    /// Register intent to contribute, before any amount is known.
    ///
    /// The `(birthday_id, contributor_id)` unique index is the source of
    /// truth for double enrollment; a violation surfaces as a conflict.
    pub async fn enroll(&self, birthday_id: &str, contributor_id: &str) -> ResultEngine<Contribution> {
        with_tx!(self, |db_tx| {
            let birthday = self.require_birthday(&db_tx, birthday_id).await?;
            self.require_user_exists(&db_tx, contributor_id).await?;

            if birthday.celebrant_id == contributor_id {
                return Err(EngineError::InvalidOperation(
                    "cannot contribute to own birthday".to_string(),
                ));
            }

            let contribution =
                Contribution::new(birthday.id, contributor_id.to_string(), Utc::now());
            contributions::ActiveModel::from(&contribution)
                .insert(&db_tx)
                .await
                .map_err(|err| {
                    conflict_on_unique(err, "already signed up to contribute to this birthday")
                })?;
            Ok(contribution)
        })
    }

    /// Delete the caller's own pledge.
    ///
    /// Withdrawal stays allowed after a split has been calculated; the
    /// remaining rows keep their old amounts until the organizer re-runs the
    /// split.
    pub async fn withdraw(&self, contribution_id: &str, caller_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let contribution = self.require_contribution(&db_tx, contribution_id).await?;
            if contribution.contributor_id != caller_id {
                return Err(EngineError::Forbidden(
                    "only the contributor may remove their contribution".to_string(),
                ));
            }
            contributions::Entity::delete_by_id(contribution.id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Flip the paid flag: contributors on their own row, the organizer on
    /// any row of their birthday.
    pub async fn set_contribution_paid(
        &self,
        contribution_id: &str,
        caller_id: &str,
        paid: bool,
    ) -> ResultEngine<Contribution> {
        with_tx!(self, |db_tx| {
            let contribution = self.require_contribution(&db_tx, contribution_id).await?;
            let birthday = self
                .require_birthday(&db_tx, &contribution.birthday_id)
                .await?;

            let is_organizer = birthday.organizer_id.as_deref() == Some(caller_id);
            let is_owner = contribution.contributor_id == caller_id;
            if !is_organizer && !is_owner {
                return Err(EngineError::Forbidden(
                    "only the contributor or the organizer may update payment status".to_string(),
                ));
            }

            let active = contributions::ActiveModel {
                id: ActiveValue::Set(contribution.id.clone()),
                paid: ActiveValue::Set(paid),
                ..Default::default()
            };
            let model = active.update(&db_tx).await?;
            Ok(Contribution::from(model))
        })
    }

    /// All pledges of one user across birthdays.
    pub async fn user_contributions(&self, user_id: &str) -> ResultEngine<Vec<Contribution>> {
        with_tx!(self, |db_tx| {
            let rows = contributions::Entity::find()
                .filter(contributions::Column::ContributorId.eq(user_id.to_string()))
                .order_by_asc(contributions::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            Ok(rows.into_iter().map(Contribution::from).collect())
        })
    }

    /// Divide the finalized total equally across all enrolled contributors.
    ///
    /// Truncating division: the remainder of a non-exact split is neither
    /// distributed nor tracked, so the assigned shares may sum to slightly
    /// less than the total. All rows are written in one statement inside the
    /// transaction; re-running after new enrollments overwrites every amount.
    pub async fn calculate_equal_split(
        &self,
        birthday_id: &str,
        caller_id: &str,
    ) -> ResultEngine<Split> {
        with_tx!(self, |db_tx| {
            let birthday = self.require_organizer(&db_tx, birthday_id, caller_id).await?;

            let Some(total_amount_minor) = birthday.total_amount_minor else {
                return Err(EngineError::InvalidOperation(
                    "total amount must be set first".to_string(),
                ));
            };

            let contributor_count = contributions::Entity::find()
                .filter(contributions::Column::BirthdayId.eq(birthday.id.clone()))
                .count(&db_tx)
                .await?;
            if contributor_count == 0 {
                return Err(EngineError::InvalidOperation(
                    "no contributors yet".to_string(),
                ));
            }

            let per_person_minor = total_amount_minor / contributor_count as i64;

            contributions::Entity::update_many()
                .col_expr(
                    contributions::Column::AmountMinor,
                    Expr::value(Some(per_person_minor)),
                )
                .filter(contributions::Column::BirthdayId.eq(birthday.id))
                .exec(&db_tx)
                .await?;

            Ok(Split {
                total_amount_minor,
                contributor_count,
                per_person_minor,
            })
        })
    }

    /// Aggregate totals over a birthday's contributions.
    ///
    /// Readable by any authenticated caller: the summary exposes counts and
    /// sums only, never per-person rows. The role-gated detail view is
    /// [`Engine::birthday_details`].
    pub async fn contribution_summary(
        &self,
        birthday_id: &str,
    ) -> ResultEngine<ContributionSummary> {
        with_tx!(self, |db_tx| {
            let birthday = self.require_birthday(&db_tx, birthday_id).await?;

            let backend = self.database.get_database_backend();
            let stmt = Statement::from_sql_and_values(
                backend,
                "SELECT COUNT(id) AS contributor_count, \
                        COALESCE(SUM(amount_minor), 0) AS assigned_minor, \
                        COALESCE(SUM(CASE WHEN paid THEN amount_minor ELSE 0 END), 0) AS paid_minor \
                 FROM contributions \
                 WHERE birthday_id = ?;",
                vec![birthday.id.into()],
            );
            let row = db_tx.query_one(stmt).await?;

            let (contributor_count, assigned_minor, paid_minor) = match row {
                Some(row) => (
                    row.try_get("", "contributor_count").unwrap_or(0),
                    row.try_get("", "assigned_minor").unwrap_or(0),
                    row.try_get("", "paid_minor").unwrap_or(0),
                ),
                None => (0, 0, 0),
            };

            Ok(ContributionSummary {
                contributor_count,
                assigned_minor,
                paid_minor,
                unpaid_minor: assigned_minor - paid_minor,
            })
        })
    }
}
