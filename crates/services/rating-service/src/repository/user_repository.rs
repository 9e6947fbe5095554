//! User repository implementation.

use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use super::map_write_err;
use common::{AppError, AppResult};
use domain::{NewUser, User};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Insert a user; a taken email is `Conflict("Email")`
    async fn create(&self, new_user: NewUser) -> AppResult<User>;

    /// Replace the stored hash. Returns false when no such user exists.
    async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<bool>;

    /// All users ordered by name
    async fn list(&self) -> AppResult<Vec<User>>;

    /// Number of users
    async fn count(&self) -> AppResult<u64>;
}

/// SeaORM implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(new_user.name),
            email: Set(new_user.email),
            address: Set(new_user.address),
            password_hash: Set(new_user.password_hash),
            role: Set(new_user.role.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = UserEntity::insert(active_model)
            .exec_with_returning(&self.db)
            .await
            .map_err(|e| map_write_err(e, "Email"))?;
        User::try_from(model)
    }

    async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<bool> {
        let result = UserEntity::update_many()
            .col_expr(user::Column::PasswordHash, Expr::value(password_hash))
            .col_expr(user::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected > 0)
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        UserEntity::find()
            .order_by_asc(user::Column::Name)
            .all(&self.db)
            .await?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(UserEntity::find().count(&self.db).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::Role;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};

    fn new_user() -> NewUser {
        NewUser {
            name: "Repository Test Account Holder".to_string(),
            email: "holder@example.com".to_string(),
            address: None,
            password_hash: "$argon2id$stub".to_string(),
            role: Role::NormalUser,
        }
    }

    fn row(role: &str) -> user::Model {
        let now = chrono::Utc::now();
        user::Model {
            id: Uuid::new_v4(),
            name: "Repository Test Account Holder".to_string(),
            email: "holder@example.com".to_string(),
            address: None,
            password_hash: "$argon2id$stub".to_string(),
            role: role.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_returns_inserted_user() {
        let inserted = row(Role::NormalUser.as_str());
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[inserted.clone()]])
            .into_connection();

        let user = UserStore::new(db).create(new_user()).await.unwrap();
        assert_eq!(user.id, inserted.id);
        assert_eq!(user.role, Role::NormalUser);
    }

    #[tokio::test]
    async fn test_create_storage_fault_is_database_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("disk full".to_string())])
            .into_connection();

        let result = UserStore::new(db).create(new_user()).await;
        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[tokio::test]
    async fn test_unknown_stored_role_is_internal_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[row("SUPERUSER")]])
            .into_connection();

        let result = UserStore::new(db).find_by_email("holder@example.com").await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_update_password_reports_missing_user() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
            ])
            .into_connection();
        let users = UserStore::new(db);

        assert!(!users.update_password(Uuid::new_v4(), "h".into()).await.unwrap());
        assert!(users.update_password(Uuid::new_v4(), "h".into()).await.unwrap());
    }
}
