//! Submitted answer entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "passage_answer")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub form_passage_id: i64,

    pub question_id: i64,

    /// Raw answer text; for choice questions this is the option text.
    #[sea_orm(column_type = "Text")]
    pub answer_text: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::form_passage::Entity",
        from = "Column::FormPassageId",
        to = "super::form_passage::Column::Id",
        on_delete = "Cascade"
    )]
    Passage,

    #[sea_orm(
        belongs_to = "super::question::Entity",
        from = "Column::QuestionId",
        to = "super::question::Column::Id",
        on_delete = "Cascade"
    )]
    Question,
}

impl Related<super::form_passage::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Passage.def()
    }
}

impl Related<super::question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Question.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
