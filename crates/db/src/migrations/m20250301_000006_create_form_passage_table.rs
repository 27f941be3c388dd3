//! Create form passage table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FormPassage::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FormPassage::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FormPassage::FormId).big_integer().not_null())
                    .col(ColumnDef::new(FormPassage::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(FormPassage::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_form_passage_form")
                            .from(FormPassage::Table, FormPassage::FormId)
                            .to(Form::Table, Form::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_form_passage_user")
                            .from(FormPassage::Table, FormPassage::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: form_id (the passage stream is fetched per form)
        manager
            .create_index(
                Index::create()
                    .name("idx_form_passage_form_id")
                    .table(FormPassage::Table)
                    .col(FormPassage::FormId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FormPassage::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum FormPassage {
    Table,
    Id,
    FormId,
    UserId,
    CreatedAt,
}

#[derive(Iden)]
enum Form {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
