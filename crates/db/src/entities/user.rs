//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(unique)]
    pub username: String,

    pub first_name: String,

    pub last_name: String,

    #[sea_orm(unique)]
    pub email: String,

    /// Argon2 password hash; never leaves the db/core layers.
    pub password_hash: String,

    /// Avatar URL
    #[sea_orm(nullable)]
    pub avatar_url: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::form::Entity")]
    Forms,

    #[sea_orm(has_many = "super::form_passage::Entity")]
    Passages,

    #[sea_orm(has_many = "super::session::Entity")]
    Sessions,
}

impl Related<super::form::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Forms.def()
    }
}

impl Related<super::form_passage::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Passages.def()
    }
}

impl Related<super::session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
