//! Birthday API endpoints.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;

use api_types::birthday::{
    BirthdayDetailResponse, BirthdayList, BirthdayUpdate, BirthdayView, CallerRole,
    GenerateResponse, SplitResponse, SummaryResponse,
};

use crate::{ServerError, contributions::contribution_view, server::ServerState};
use engine::{Birthday, BirthdayPatch, BirthdayRole, BirthdaySummary, users};

fn patch_from(update: BirthdayUpdate) -> BirthdayPatch {
    BirthdayPatch {
        celebration_date: update.celebration_date,
        gift_description: update.gift_description,
        total_amount_minor: update.total_amount_minor,
    }
}

fn bare_view(birthday: Birthday) -> BirthdayView {
    BirthdayView {
        id: birthday.id,
        celebrant_id: birthday.celebrant_id,
        celebrant_name: None,
        organizer_id: birthday.organizer_id,
        organizer_name: None,
        celebration_date: birthday.celebration_date,
        gift_description: birthday.gift_description,
        total_amount_minor: birthday.total_amount_minor,
    }
}

fn summary_view(summary: BirthdaySummary) -> BirthdayView {
    let mut view = bare_view(summary.birthday);
    view.celebrant_name = Some(summary.celebrant_name);
    view.organizer_name = summary.organizer_name;
    view
}

fn role_view(role: BirthdayRole) -> CallerRole {
    match role {
        BirthdayRole::Celebrant => CallerRole::Celebrant,
        BirthdayRole::Organizer => CallerRole::Organizer,
        BirthdayRole::Contributor => CallerRole::Contributor,
        BirthdayRole::Outsider => CallerRole::Outsider,
    }
}

/// Upcoming birthdays within the look-ahead window. Summary data only,
/// visible to every authenticated user.
pub async fn list_upcoming(
    Extension(_user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<BirthdayList>, ServerError> {
    let birthdays = state
        .engine
        .upcoming_birthdays(Utc::now().date_naive())
        .await?
        .into_iter()
        .map(summary_view)
        .collect();
    Ok(Json(BirthdayList { birthdays }))
}

/// Upcoming birthdays still waiting for someone to claim the organizer role.
pub async fn list_unorganized(
    Extension(_user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<BirthdayList>, ServerError> {
    let birthdays = state
        .engine
        .unorganized_birthdays(Utc::now().date_naive())
        .await?
        .into_iter()
        .map(summary_view)
        .collect();
    Ok(Json(BirthdayList { birthdays }))
}

pub async fn list_organized_by_me(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<BirthdayList>, ServerError> {
    let birthdays = state
        .engine
        .organized_by(&user.id)
        .await?
        .into_iter()
        .map(bare_view)
        .collect();
    Ok(Json(BirthdayList { birthdays }))
}

pub async fn list_mine(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<BirthdayList>, ServerError> {
    let birthdays = state
        .engine
        .birthdays_for_celebrant(&user.id)
        .await?
        .into_iter()
        .map(bare_view)
        .collect();
    Ok(Json(BirthdayList { birthdays }))
}

/// Cron hook: create missing entries for birthdays inside the window.
pub async fn generate(
    Extension(_user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<(StatusCode, Json<GenerateResponse>), ServerError> {
    let created = state
        .engine
        .generate_entries(Utc::now().date_naive())
        .await?;
    let birthdays: Vec<BirthdayView> = created.into_iter().map(bare_view).collect();
    Ok((
        StatusCode::CREATED,
        Json(GenerateResponse {
            created_count: birthdays.len(),
            birthdays,
        }),
    ))
}

/// Role-gated full view including the contribution list.
pub async fn detail(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(birthday_id): Path<String>,
) -> Result<Json<BirthdayDetailResponse>, ServerError> {
    let detail = state.engine.birthday_details(&birthday_id, &user.id).await?;

    let mut view = bare_view(detail.birthday);
    view.celebrant_name = Some(detail.celebrant_name);
    view.organizer_name = detail.organizer_name;

    Ok(Json(BirthdayDetailResponse {
        birthday: view,
        role: role_view(detail.role),
        contributions: detail
            .contributions
            .into_iter()
            .map(contribution_view)
            .collect(),
    }))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(birthday_id): Path<String>,
    Json(payload): Json<BirthdayUpdate>,
) -> Result<Json<BirthdayView>, ServerError> {
    let birthday = state
        .engine
        .update_birthday(&birthday_id, &user.id, patch_from(payload))
        .await?;
    Ok(Json(bare_view(birthday)))
}

pub async fn claim_organizer(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(birthday_id): Path<String>,
    Json(payload): Json<BirthdayUpdate>,
) -> Result<Json<BirthdayView>, ServerError> {
    let birthday = state
        .engine
        .assign_organizer(&birthday_id, &user.id, patch_from(payload))
        .await?;
    Ok(Json(bare_view(birthday)))
}

pub async fn split(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(birthday_id): Path<String>,
) -> Result<Json<SplitResponse>, ServerError> {
    let split = state
        .engine
        .calculate_equal_split(&birthday_id, &user.id)
        .await?;
    Ok(Json(SplitResponse {
        total_amount_minor: split.total_amount_minor,
        contributor_count: split.contributor_count,
        per_person_minor: split.per_person_minor,
    }))
}

/// Aggregate totals; exposes no per-person rows, so it is open to any
/// authenticated caller.
pub async fn summary(
    Extension(_user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(birthday_id): Path<String>,
) -> Result<Json<SummaryResponse>, ServerError> {
    let summary = state.engine.contribution_summary(&birthday_id).await?;
    Ok(Json(SummaryResponse {
        contributor_count: summary.contributor_count,
        assigned_minor: summary.assigned_minor,
        paid_minor: summary.paid_minor,
        unpaid_minor: summary.unpaid_minor,
    }))
}
