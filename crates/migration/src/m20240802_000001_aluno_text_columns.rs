//! Drop the length caps on `matricula` and `nome`; both become `text`.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Aluno::Table)
                    .modify_column(ColumnDef::new(Aluno::Matricula).text().not_null())
                    .modify_column(ColumnDef::new(Aluno::Nome).text().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Aluno::Table)
                    .modify_column(ColumnDef::new(Aluno::Matricula).string_len(64).not_null())
                    .modify_column(ColumnDef::new(Aluno::Nome).string_len(255).not_null())
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Aluno {
    Table,
    Matricula,
    Nome,
}
