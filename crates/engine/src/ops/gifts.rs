//! Wishlist maintenance and browsing.
//!
//! Items belong to their owner; adding, editing and deleting require
//! ownership. Reading someone else's list is open to any caller so gift
//! pickers can browse it.

use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    EngineError, Gift, GiftPatch, NewGift, ResultEngine, gifts, util::normalize_optional_text,
};

use super::{Engine, normalize_required_text, with_tx};

impl Engine {
    /// Add an item to the caller's own wishlist.
    pub async fn add_gift(&self, owner_id: &str, new_gift: NewGift) -> ResultEngine<Gift> {
        let name = normalize_required_text(&new_gift.name, "gift name")?;
        let description = normalize_optional_text(new_gift.description.as_deref());
        let link = normalize_optional_text(new_gift.link.as_deref());

        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, owner_id).await?;
            let gift = Gift::new(owner_id.to_string(), name, description, link, Utc::now());
            gifts::ActiveModel::from(&gift).insert(&db_tx).await?;
            Ok(gift)
        })
    }

    /// A user's wishlist, oldest items first. Readable by anyone; the list
    /// exists so others can pick a present from it.
    pub async fn wishlist(&self, user_id: &str) -> ResultEngine<Vec<Gift>> {
        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, user_id).await?;
            let rows = gifts::Entity::find()
                .filter(gifts::Column::UserId.eq(user_id.to_string()))
                .order_by_asc(gifts::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            Ok(rows.into_iter().map(Gift::from).collect())
        })
    }

    /// One item, owner only.
    pub async fn gift(&self, gift_id: &str, caller_id: &str) -> ResultEngine<Gift> {
        with_tx!(self, |db_tx| {
            let gift = self.require_own_gift(&db_tx, gift_id, caller_id).await?;
            Ok(Gift::from(gift))
        })
    }

    /// Partial update of an owned item; only supplied fields are written.
    pub async fn update_gift(
        &self,
        gift_id: &str,
        caller_id: &str,
        patch: GiftPatch,
    ) -> ResultEngine<Gift> {
        with_tx!(self, |db_tx| {
            self.require_own_gift(&db_tx, gift_id, caller_id).await?;

            let mut active = gifts::ActiveModel {
                id: ActiveValue::Set(gift_id.to_string()),
                updated_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            };
            if let Some(name) = patch.name {
                active.name = ActiveValue::Set(normalize_required_text(&name, "gift name")?);
            }
            if let Some(description) = patch.description {
                active.description = ActiveValue::Set(normalize_optional_text(Some(&description)));
            }
            if let Some(link) = patch.link {
                active.link = ActiveValue::Set(normalize_optional_text(Some(&link)));
            }

            let model = active.update(&db_tx).await?;
            Ok(Gift::from(model))
        })
    }

    /// Remove an owned item.
    pub async fn delete_gift(&self, gift_id: &str, caller_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let gift = self.require_own_gift(&db_tx, gift_id, caller_id).await?;
            gifts::Entity::delete_by_id(gift.id).exec(&db_tx).await?;
            Ok(())
        })
    }

    async fn require_own_gift(
        &self,
        db: &sea_orm::DatabaseTransaction,
        gift_id: &str,
        caller_id: &str,
    ) -> ResultEngine<gifts::Model> {
        let gift = gifts::Entity::find_by_id(gift_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("gift not exists".to_string()))?;
        if gift.user_id != caller_id {
            return Err(EngineError::Forbidden(
                "only the owner may manage this wishlist item".to_string(),
            ));
        }
        Ok(gift)
    }
}
