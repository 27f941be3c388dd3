//! Create passage answer table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PassageAnswer::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PassageAnswer::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PassageAnswer::FormPassageId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PassageAnswer::QuestionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PassageAnswer::AnswerText).text().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_passage_answer_passage")
                            .from(PassageAnswer::Table, PassageAnswer::FormPassageId)
                            .to(FormPassage::Table, FormPassage::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_passage_answer_question")
                            .from(PassageAnswer::Table, PassageAnswer::QuestionId)
                            .to(Question::Table, Question::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: form_passage_id (answers are read per passage)
        manager
            .create_index(
                Index::create()
                    .name("idx_passage_answer_passage_id")
                    .table(PassageAnswer::Table)
                    .col(PassageAnswer::FormPassageId)
                    .to_owned(),
            )
            .await?;

        // Index: question_id (per-question selection counts)
        manager
            .create_index(
                Index::create()
                    .name("idx_passage_answer_question_id")
                    .table(PassageAnswer::Table)
                    .col(PassageAnswer::QuestionId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PassageAnswer::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PassageAnswer {
    Table,
    Id,
    FormPassageId,
    QuestionId,
    AnswerText,
}

#[derive(Iden)]
enum FormPassage {
    Table,
    Id,
}

#[derive(Iden)]
enum Question {
    Table,
    Id,
}
