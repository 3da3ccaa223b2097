//! Migrator for the student records schema.
pub use sea_orm_migration::prelude::*;

mod m20240801_000001_create_aluno;
mod m20240802_000001_aluno_text_columns;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240801_000001_create_aluno::Migration),
            Box::new(m20240802_000001_aluno_text_columns::Migration),
        ]
    }
}
