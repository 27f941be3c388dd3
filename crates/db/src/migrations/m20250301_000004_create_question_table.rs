//! Create question table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Question::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Question::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Question::FormId).big_integer().not_null())
                    .col(ColumnDef::new(Question::Title).string_len(256).not_null())
                    .col(ColumnDef::new(Question::Description).text().null())
                    .col(
                        ColumnDef::new(Question::QuestionType)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Question::Required)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Question::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_question_form")
                            .from(Question::Table, Question::FormId)
                            .to(Form::Table, Form::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (form_id, position) - definition rows are read in display order
        manager
            .create_index(
                Index::create()
                    .name("idx_question_form_position")
                    .table(Question::Table)
                    .col(Question::FormId)
                    .col(Question::Position)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Question::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Question {
    Table,
    Id,
    FormId,
    Title,
    Description,
    QuestionType,
    Required,
    Position,
}

#[derive(Iden)]
enum Form {
    Table,
    Id,
}
