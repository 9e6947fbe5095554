//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use common::AppError;
use domain::User;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub address: Option<String>,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::store::Entity")]
    Store,
    #[sea_orm(has_many = "super::rating::Entity")]
    Ratings,
}

impl Related<super::store::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Store.def()
    }
}

impl Related<super::rating::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ratings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity.
///
/// The role column is check-constrained, so an unknown value means the
/// schema and the code disagree.
impl TryFrom<Model> for User {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let role = model.role.parse().map_err(|_| {
            AppError::internal(format!("Unknown role '{}' stored for user {}", model.role, model.id))
        })?;

        Ok(User {
            id: model.id,
            name: model.name,
            email: model.email,
            address: model.address,
            password_hash: model.password_hash,
            role,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
