//! User registration and profile updates.
//!
//! Profiles feed the birthday generator (`birth_date`) and the display names
//! in list views; `bank_details` is an opaque blob only its owner touches.

use chrono::Utc;
use sea_orm::{ActiveValue, TransactionTrait, prelude::*};

use crate::{
    NewUser, ProfilePatch, ResultEngine, User, users,
    util::{conflict_on_unique, normalize_optional_text},
};

use super::{Engine, normalize_required_text, with_tx};

impl Engine {
    /// Create a user. Emails are unique; a duplicate registration is a
    /// conflict, not an upsert.
    pub async fn register_user(&self, new_user: NewUser) -> ResultEngine<User> {
        let email = normalize_required_text(&new_user.email, "email")?.to_lowercase();
        let password = normalize_required_text(&new_user.password, "password")?;
        let first_name = normalize_required_text(&new_user.first_name, "first name")?;
        let last_name = normalize_required_text(&new_user.last_name, "last name")?;
        let nickname = normalize_optional_text(new_user.nickname.as_deref());

        let user = User::new(
            email,
            first_name,
            last_name,
            nickname,
            new_user.birth_date,
            Utc::now(),
        );

        with_tx!(self, |db_tx| {
            users::ActiveModel::from((&user, password.as_str()))
                .insert(&db_tx)
                .await
                .map_err(|err| conflict_on_unique(err, "email already registered"))?;
            Ok(user)
        })
    }

    pub async fn user_profile(&self, user_id: &str) -> ResultEngine<User> {
        with_tx!(self, |db_tx| {
            let model = self.require_user_exists(&db_tx, user_id).await?;
            Ok(User::from(model))
        })
    }

    /// Partial profile update; only supplied fields are written.
    pub async fn update_profile(&self, user_id: &str, patch: ProfilePatch) -> ResultEngine<User> {
        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, user_id).await?;

            let mut active = users::ActiveModel {
                id: ActiveValue::Set(user_id.to_string()),
                updated_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            };
            if let Some(first_name) = patch.first_name {
                active.first_name = ActiveValue::Set(normalize_required_text(
                    &first_name,
                    "first name",
                )?);
            }
            if let Some(last_name) = patch.last_name {
                active.last_name =
                    ActiveValue::Set(normalize_required_text(&last_name, "last name")?);
            }
            if let Some(nickname) = patch.nickname {
                active.nickname = ActiveValue::Set(normalize_optional_text(Some(&nickname)));
            }
            if let Some(birth_date) = patch.birth_date {
                active.birth_date = ActiveValue::Set(Some(birth_date));
            }
            if let Some(bank_details) = patch.bank_details {
                active.bank_details = ActiveValue::Set(Some(bank_details));
            }

            let model = active.update(&db_tx).await?;
            Ok(User::from(model))
        })
    }
}
