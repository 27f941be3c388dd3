//! Create form table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Form::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Form::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Form::Title).string_len(256).not_null())
                    .col(ColumnDef::new(Form::Description).text().null())
                    .col(ColumnDef::new(Form::AuthorId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Form::Anonymous)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Form::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_form_author")
                            .from(Form::Table, Form::AuthorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: author_id (listing a user's forms)
        manager
            .create_index(
                Index::create()
                    .name("idx_form_author_id")
                    .table(Form::Table)
                    .col(Form::AuthorId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Form::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Form {
    Table,
    Id,
    Title,
    Description,
    AuthorId,
    Anonymous,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
