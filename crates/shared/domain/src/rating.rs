//! Rating entity and the validated score value object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::constants::{MAX_RATING, MIN_RATING};
use crate::error::{DomainError, DomainResult};

const SCORE_MESSAGE: &str = "Rating must be an integer between 1 and 5.";

/// An integer rating in `[1, 5]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(transparent)]
pub struct Score(i32);

impl Score {
    pub fn value(self) -> i32 {
        self.0
    }
}

impl TryFrom<i64> for Score {
    type Error = DomainError;

    fn try_from(raw: i64) -> DomainResult<Self> {
        i32::try_from(raw)
            .ok()
            .filter(|value| (MIN_RATING..=MAX_RATING).contains(value))
            .map(Score)
            .ok_or_else(|| DomainError::validation(SCORE_MESSAGE))
    }
}

impl TryFrom<&Value> for Score {
    type Error = DomainError;

    /// Accepts JSON integers and whole-valued numbers such as `4.0`.
    /// Fractions, strings and null are validation errors rather than coerced.
    fn try_from(raw: &Value) -> DomainResult<Self> {
        raw.as_i64()
            .or_else(|| {
                raw.as_f64()
                    .filter(|value| value.fract() == 0.0)
                    .map(|value| value as i64)
            })
            .ok_or_else(|| DomainError::validation(SCORE_MESSAGE))
            .and_then(Score::try_from)
    }
}

/// A single user's rating of a single store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub id: Uuid,
    pub user_id: Uuid,
    pub store_id: Uuid,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Outcome of inserting a rating under the (user, store) unique constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum RatingInsert {
    Created(Rating),
    /// A row for this (user, store) pair already exists; nothing was written.
    AlreadyRated,
}
