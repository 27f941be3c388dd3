//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250301_000001_create_user_table;
mod m20250301_000002_create_session_table;
mod m20250301_000003_create_form_table;
mod m20250301_000004_create_question_table;
mod m20250301_000005_create_question_answer_table;
mod m20250301_000006_create_form_passage_table;
mod m20250301_000007_create_passage_answer_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_user_table::Migration),
            Box::new(m20250301_000002_create_session_table::Migration),
            Box::new(m20250301_000003_create_form_table::Migration),
            Box::new(m20250301_000004_create_question_table::Migration),
            Box::new(m20250301_000005_create_question_answer_table::Migration),
            Box::new(m20250301_000006_create_form_passage_table::Migration),
            Box::new(m20250301_000007_create_passage_answer_table::Migration),
        ]
    }
}
