//! Internal helpers for validation and error mapping.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use chrono::NaiveDate;
use sea_orm::{DbErr, SqlErr};

use crate::{EngineError, ResultEngine};

/// Map a unique-constraint violation to [`EngineError::Conflict`].
///
/// Uniqueness rules (one entry per celebrant per year, one contribution per
/// contributor per birthday, unique emails) are enforced by the database
/// indexes rather than racy application pre-checks.
pub(crate) fn conflict_on_unique(err: DbErr, message: &str) -> EngineError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            EngineError::Conflict(message.to_string())
        }
        _ => EngineError::Database(err),
    }
}

/// Celebration dates must not lie in the past at creation or update time.
pub(crate) fn ensure_not_past(date: NaiveDate, today: NaiveDate) -> ResultEngine<()> {
    if date < today {
        return Err(EngineError::InvalidOperation(
            "celebration date must not be in the past".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}
