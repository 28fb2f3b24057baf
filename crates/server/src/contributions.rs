//! Contribution API endpoints.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use api_types::contribution::{
    ContributionList, ContributionNew, ContributionUpdate, ContributionView,
};

use crate::{ServerError, server::ServerState};
use engine::{Contribution, users};

pub(crate) fn contribution_view(contribution: Contribution) -> ContributionView {
    ContributionView {
        id: contribution.id,
        birthday_id: contribution.birthday_id,
        contributor_id: contribution.contributor_id,
        amount_minor: contribution.amount_minor,
        paid: contribution.paid,
        created_at: contribution.created_at,
    }
}

pub async fn enroll(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ContributionNew>,
) -> Result<(StatusCode, Json<ContributionView>), ServerError> {
    let contribution = state.engine.enroll(&payload.birthday_id, &user.id).await?;
    Ok((StatusCode::CREATED, Json(contribution_view(contribution))))
}

pub async fn list_my(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<ContributionList>, ServerError> {
    let contributions = state
        .engine
        .user_contributions(&user.id)
        .await?
        .into_iter()
        .map(contribution_view)
        .collect();
    Ok(Json(ContributionList { contributions }))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(contribution_id): Path<String>,
    Json(payload): Json<ContributionUpdate>,
) -> Result<Json<ContributionView>, ServerError> {
    let contribution = state
        .engine
        .set_contribution_paid(&contribution_id, &user.id, payload.paid)
        .await?;
    Ok(Json(contribution_view(contribution)))
}

pub async fn withdraw(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(contribution_id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.withdraw(&contribution_id, &user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
