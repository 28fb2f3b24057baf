//! Role classification and authorization checks.
//!
//! Every operation resolves the caller's relationship to a birthday through
//! [`BirthdayRole`] and performs exactly one `require_*` check, so the whole
//! visibility policy lives in this module.

use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine, birthdays, contributions, users};

use super::Engine;

/// The caller's relationship to one birthday. Exactly one applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BirthdayRole {
    Celebrant,
    Organizer,
    Contributor,
    Outsider,
}

impl BirthdayRole {
    /// Whether the full detail view (contributor list and amounts) is visible.
    pub fn can_view_detail(self) -> bool {
        !matches!(self, Self::Outsider)
    }
}

impl Engine {
    pub(super) async fn require_birthday(
        &self,
        db: &DatabaseTransaction,
        birthday_id: &str,
    ) -> ResultEngine<birthdays::Model> {
        birthdays::Entity::find_by_id(birthday_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("birthday not exists".to_string()))
    }

    pub(super) async fn require_contribution(
        &self,
        db: &DatabaseTransaction,
        contribution_id: &str,
    ) -> ResultEngine<contributions::Model> {
        contributions::Entity::find_by_id(contribution_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("contribution not exists".to_string()))
    }

    pub(super) async fn require_user_exists(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(user_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))
    }

    /// Classify `user_id` against a birthday row.
    pub(super) async fn birthday_role(
        &self,
        db: &DatabaseTransaction,
        birthday: &birthdays::Model,
        user_id: &str,
    ) -> ResultEngine<BirthdayRole> {
        if birthday.celebrant_id == user_id {
            return Ok(BirthdayRole::Celebrant);
        }
        if birthday.organizer_id.as_deref() == Some(user_id) {
            return Ok(BirthdayRole::Organizer);
        }
        let enrolled = contributions::Entity::find()
            .filter(contributions::Column::BirthdayId.eq(birthday.id.clone()))
            .filter(contributions::Column::ContributorId.eq(user_id.to_string()))
            .one(db)
            .await?
            .is_some();
        Ok(if enrolled {
            BirthdayRole::Contributor
        } else {
            BirthdayRole::Outsider
        })
    }

    /// The birthday, provided the caller is its organizer.
    pub(super) async fn require_organizer(
        &self,
        db: &DatabaseTransaction,
        birthday_id: &str,
        user_id: &str,
    ) -> ResultEngine<birthdays::Model> {
        let birthday = self.require_birthday(db, birthday_id).await?;
        if birthday.organizer_id.as_deref() != Some(user_id) {
            return Err(EngineError::Forbidden(
                "only the organizer may do this".to_string(),
            ));
        }
        Ok(birthday)
    }

    /// The birthday and the caller's role, provided the caller may see the
    /// full detail view (celebrant, organizer or contributor).
    pub(super) async fn require_detail_access(
        &self,
        db: &DatabaseTransaction,
        birthday_id: &str,
        user_id: &str,
    ) -> ResultEngine<(birthdays::Model, BirthdayRole)> {
        let birthday = self.require_birthday(db, birthday_id).await?;
        let role = self.birthday_role(db, &birthday, user_id).await?;
        if !role.can_view_detail() {
            return Err(EngineError::Forbidden(
                "only participants may view contributions".to_string(),
            ));
        }
        Ok((birthday, role))
    }
}
