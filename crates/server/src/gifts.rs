//! Wishlist API endpoints.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use api_types::gift::{GiftList, GiftNew, GiftUpdate, GiftView};

use crate::{ServerError, server::ServerState};
use engine::{Gift, GiftPatch, NewGift, users};

fn gift_view(gift: Gift) -> GiftView {
    GiftView {
        id: gift.id,
        user_id: gift.user_id,
        name: gift.name,
        description: gift.description,
        link: gift.link,
        created_at: gift.created_at,
        updated_at: gift.updated_at,
    }
}

pub async fn add(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<GiftNew>,
) -> Result<(StatusCode, Json<GiftView>), ServerError> {
    let gift = state
        .engine
        .add_gift(
            &user.id,
            NewGift {
                name: payload.name,
                description: payload.description,
                link: payload.link,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(gift_view(gift))))
}

pub async fn list_my(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<GiftList>, ServerError> {
    let gifts = state
        .engine
        .wishlist(&user.id)
        .await?
        .into_iter()
        .map(gift_view)
        .collect();
    Ok(Json(GiftList { gifts }))
}

/// Someone else's wishlist, for picking a present.
pub async fn list_for_user(
    Extension(_user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
) -> Result<Json<GiftList>, ServerError> {
    let gifts = state
        .engine
        .wishlist(&user_id)
        .await?
        .into_iter()
        .map(gift_view)
        .collect();
    Ok(Json(GiftList { gifts }))
}

pub async fn detail(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(gift_id): Path<String>,
) -> Result<Json<GiftView>, ServerError> {
    let gift = state.engine.gift(&gift_id, &user.id).await?;
    Ok(Json(gift_view(gift)))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(gift_id): Path<String>,
    Json(payload): Json<GiftUpdate>,
) -> Result<Json<GiftView>, ServerError> {
    let gift = state
        .engine
        .update_gift(
            &gift_id,
            &user.id,
            GiftPatch {
                name: payload.name,
                description: payload.description,
                link: payload.link,
            },
        )
        .await?;
    Ok(Json(gift_view(gift)))
}

pub async fn remove(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(gift_id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_gift(&gift_id, &user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
