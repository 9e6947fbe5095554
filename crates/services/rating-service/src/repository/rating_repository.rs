//! Rating repository implementation.
//!
//! Inserts go through `ON CONFLICT (user_id, store_id) DO NOTHING`, so a
//! duplicate rating is reported as [`RatingInsert::AlreadyRated`] instead of
//! racing a read-then-write check.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::{Expr, OnConflict},
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
};
use uuid::Uuid;

use super::entities::{
    rating::{self, ActiveModel, Entity as RatingEntity},
    user,
};
use common::AppResult;
use domain::{RaterEntry, Rating, RatingInsert, Score};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Rating repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RatingRepository: Send + Sync {
    /// Insert unless the (user, store) pair already has a rating.
    async fn insert(&self, user_id: Uuid, store_id: Uuid, score: Score) -> AppResult<RatingInsert>;

    /// Change the value of the caller's rating. `None` when no row matched.
    async fn update(&self, user_id: Uuid, store_id: Uuid, score: Score)
        -> AppResult<Option<Rating>>;

    /// Store id to rating value for every store the user has rated
    async fn ratings_by_user(&self, user_id: Uuid) -> AppResult<HashMap<Uuid, i32>>;

    /// Ratings of one store joined with rater identity, most recent first
    async fn raters_for_store(&self, store_id: Uuid) -> AppResult<Vec<RaterEntry>>;

    /// Number of ratings
    async fn count(&self) -> AppResult<u64>;
}

#[derive(Debug, FromQueryResult)]
struct RaterRow {
    user_id: Uuid,
    name: String,
    email: String,
    rating: i32,
    rated_at: DateTime<Utc>,
}

impl From<RaterRow> for RaterEntry {
    fn from(row: RaterRow) -> Self {
        RaterEntry {
            user_id: row.user_id,
            name: row.name,
            email: row.email,
            rating: row.rating,
            rated_at: row.rated_at,
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct OwnRatingRow {
    store_id: Uuid,
    rating: i32,
}

/// SeaORM implementation of RatingRepository
pub struct RatingStore {
    db: DatabaseConnection,
}

impl RatingStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

#[async_trait]
impl RatingRepository for RatingStore {
    async fn insert(&self, user_id: Uuid, store_id: Uuid, score: Score) -> AppResult<RatingInsert> {
        let now = Utc::now();
        let rating = Rating {
            id: Uuid::new_v4(),
            user_id,
            store_id,
            rating: score.value(),
            created_at: now,
            updated_at: now,
        };
        let active_model = ActiveModel {
            id: Set(rating.id),
            user_id: Set(user_id),
            store_id: Set(store_id),
            rating: Set(rating.rating),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = RatingEntity::insert(active_model)
            .on_conflict(
                OnConflict::columns([rating::Column::UserId, rating::Column::StoreId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await;

        match result {
            Ok(0) | Err(DbErr::RecordNotInserted) => Ok(RatingInsert::AlreadyRated),
            Ok(_) => Ok(RatingInsert::Created(rating)),
            Err(e) if is_unique_violation(&e) => Ok(RatingInsert::AlreadyRated),
            Err(e) => Err(e.into()),
        }
    }

    async fn update(
        &self,
        user_id: Uuid,
        store_id: Uuid,
        score: Score,
    ) -> AppResult<Option<Rating>> {
        let result = RatingEntity::update_many()
            .col_expr(rating::Column::Rating, Expr::value(score.value()))
            .col_expr(rating::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(rating::Column::UserId.eq(user_id))
            .filter(rating::Column::StoreId.eq(store_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        let updated = RatingEntity::find()
            .filter(rating::Column::UserId.eq(user_id))
            .filter(rating::Column::StoreId.eq(store_id))
            .one(&self.db)
            .await?;
        Ok(updated.map(Rating::from))
    }

    async fn ratings_by_user(&self, user_id: Uuid) -> AppResult<HashMap<Uuid, i32>> {
        let rows = RatingEntity::find()
            .select_only()
            .column(rating::Column::StoreId)
            .column(rating::Column::Rating)
            .filter(rating::Column::UserId.eq(user_id))
            .into_model::<OwnRatingRow>()
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(|r| (r.store_id, r.rating)).collect())
    }

    async fn raters_for_store(&self, store_id: Uuid) -> AppResult<Vec<RaterEntry>> {
        let rows = RatingEntity::find()
            .select_only()
            .column(rating::Column::UserId)
            .column(user::Column::Name)
            .column(user::Column::Email)
            .column(rating::Column::Rating)
            .column_as(rating::Column::UpdatedAt, "rated_at")
            .inner_join(user::Entity)
            .filter(rating::Column::StoreId.eq(store_id))
            .order_by_desc(rating::Column::UpdatedAt)
            .order_by_asc(rating::Column::Id)
            .into_model::<RaterRow>()
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(RaterEntry::from).collect())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(RatingEntity::find().count(&self.db).await?)
    }
}
