//! User registration and profile endpoints.

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};

use api_types::user::{ProfileUpdate, UserNew, UserView};

use crate::{ServerError, server::ServerState};
use engine::{NewUser, ProfilePatch, User, users};

fn user_view(user: User) -> UserView {
    UserView {
        id: user.id,
        email: user.email,
        first_name: user.first_name,
        last_name: user.last_name,
        nickname: user.nickname,
        birth_date: user.birth_date,
        bank_details: user.bank_details,
    }
}

pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<UserNew>,
) -> Result<(StatusCode, Json<UserView>), ServerError> {
    let user = state
        .engine
        .register_user(NewUser {
            email: payload.email,
            password: payload.password,
            first_name: payload.first_name,
            last_name: payload.last_name,
            nickname: payload.nickname,
            birth_date: payload.birth_date,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user_view(user))))
}

pub async fn me(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<UserView>, ServerError> {
    let profile = state.engine.user_profile(&user.id).await?;
    Ok(Json(user_view(profile)))
}

pub async fn update_me(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ProfileUpdate>,
) -> Result<Json<UserView>, ServerError> {
    let profile = state
        .engine
        .update_profile(
            &user.id,
            ProfilePatch {
                first_name: payload.first_name,
                last_name: payload.last_name,
                nickname: payload.nickname,
                birth_date: payload.birth_date,
                bank_details: payload.bank_details,
            },
        )
        .await?;
    Ok(Json(user_view(profile)))
}
