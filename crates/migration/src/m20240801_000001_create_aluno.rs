//! Create `aluno` table.
//! Address and course list are stored as JSONB documents; `matricula` carries
//! a unique index so duplicates are rejected by the database itself.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Aluno::Table)
                    .if_not_exists()
                    .col(string_len(Aluno::Id, 24).primary_key())
                    .col(string_len(Aluno::Matricula, 64).not_null())
                    .col(string_len(Aluno::Nome, 255).not_null())
                    .col(json_binary(Aluno::Endereco).not_null())
                    .col(json_binary(Aluno::Cursos).not_null())
                    .col(timestamp_with_time_zone(Aluno::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Aluno::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_aluno_matricula_unique")
                    .table(Aluno::Table)
                    .col(Aluno::Matricula)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_aluno_nome")
                    .table(Aluno::Table)
                    .col(Aluno::Nome)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Aluno::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Aluno {
    Table,
    Id,
    Matricula,
    Nome,
    Endereco,
    Cursos,
    CreatedAt,
    UpdatedAt,
}
