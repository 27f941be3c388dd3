//! Create question answer (predefined option) table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(QuestionAnswer::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QuestionAnswer::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(QuestionAnswer::QuestionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(QuestionAnswer::AnswerText).text().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_question_answer_question")
                            .from(QuestionAnswer::Table, QuestionAnswer::QuestionId)
                            .to(Question::Table, Question::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: question_id (options are fetched per question)
        manager
            .create_index(
                Index::create()
                    .name("idx_question_answer_question_id")
                    .table(QuestionAnswer::Table)
                    .col(QuestionAnswer::QuestionId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(QuestionAnswer::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum QuestionAnswer {
    Table,
    Id,
    QuestionId,
    AnswerText,
}

#[derive(Iden)]
enum Question {
    Table,
    Id,
}
