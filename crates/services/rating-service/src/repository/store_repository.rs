//! Store repository implementation.

use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionError,
    TransactionTrait,
};
use uuid::Uuid;

use super::entities::{
    rating,
    store::{self, Entity as StoreEntity},
    user,
};
use super::map_write_err;
use common::{AppError, AppResult};
use domain::{NewStore, Role, Store, StoreRatingStats};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Store repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait StoreRepository: Send + Sync {
    /// Find store by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Store>>;

    /// The store owned by a user, if any
    async fn find_by_owner(&self, owner_id: Uuid) -> AppResult<Option<Store>>;

    /// Promote the owner from NORMAL_USER to STORE_OWNER and insert the
    /// store, atomically. An owner that is no longer a NORMAL_USER, or a
    /// taken store email, is a `Conflict`.
    async fn create_for_owner(&self, new_store: NewStore) -> AppResult<Store>;

    /// Every store with its rating average, ordered by name
    async fn list_with_ratings(&self) -> AppResult<Vec<StoreRatingStats>>;

    /// Number of stores
    async fn count(&self) -> AppResult<u64>;
}

/// One row of the store/rating aggregate.
#[derive(Debug, FromQueryResult)]
struct StoreStatsRow {
    id: Uuid,
    name: String,
    email: Option<String>,
    address: String,
    avg_rating: Option<f64>,
}

impl From<StoreStatsRow> for StoreRatingStats {
    fn from(row: StoreStatsRow) -> Self {
        StoreRatingStats {
            store_id: row.id,
            name: row.name,
            email: row.email,
            address: row.address,
            average_rating: row.avg_rating.unwrap_or(0.0),
        }
    }
}

/// SeaORM implementation of StoreRepository
pub struct StoreStore {
    db: DatabaseConnection,
}

impl StoreStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StoreRepository for StoreStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Store>> {
        let result = StoreEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Store::from))
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> AppResult<Option<Store>> {
        let result = StoreEntity::find()
            .filter(store::Column::OwnerId.eq(owner_id))
            .one(&self.db)
            .await?;
        Ok(result.map(Store::from))
    }

    async fn create_for_owner(&self, new_store: NewStore) -> AppResult<Store> {
        let result = self
            .db
            .transaction::<_, Store, AppError>(|txn| {
                Box::pin(async move {
                    let now = chrono::Utc::now();

                    let promoted = user::Entity::update_many()
                        .col_expr(user::Column::Role, Expr::value(Role::StoreOwner.as_str()))
                        .col_expr(user::Column::UpdatedAt, Expr::value(now))
                        .filter(user::Column::Id.eq(new_store.owner_id))
                        .filter(user::Column::Role.eq(Role::NormalUser.as_str()))
                        .exec(txn)
                        .await?;
                    if promoted.rows_affected == 0 {
                        return Err(AppError::conflict("Store owner"));
                    }

                    let active_model = store::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        name: Set(new_store.name),
                        email: Set(Some(new_store.email)),
                        address: Set(new_store.address),
                        owner_id: Set(new_store.owner_id),
                        created_at: Set(now),
                        updated_at: Set(now),
                    };
                    let model = StoreEntity::insert(active_model)
                        .exec_with_returning(txn)
                        .await
                        .map_err(|e| map_write_err(e, "Store"))?;

                    Ok(Store::from(model))
                })
            })
            .await;

        result.map_err(|err| match err {
            TransactionError::Connection(e) => map_write_err(e, "Store"),
            TransactionError::Transaction(e) => e,
        })
    }

    async fn list_with_ratings(&self) -> AppResult<Vec<StoreRatingStats>> {
        let rows = StoreEntity::find()
            .select_only()
            .column(store::Column::Id)
            .column(store::Column::Name)
            .column(store::Column::Email)
            .column(store::Column::Address)
            .column_as(
                Expr::cust("CAST(AVG(ratings.rating) AS DOUBLE PRECISION)"),
                "avg_rating",
            )
            .left_join(rating::Entity)
            .group_by(store::Column::Id)
            .order_by_asc(store::Column::Name)
            .into_model::<StoreStatsRow>()
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(StoreRatingStats::from).collect())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(StoreEntity::find().count(&self.db).await?)
    }
}
