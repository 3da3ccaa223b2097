use async_trait::async_trait;
use models::aluno::{self, AlunoChanges, Model, NewAluno};
use sea_orm::DatabaseConnection;

use crate::errors::ServiceError;

/// Storage contract for student records.
///
/// Implementations must enforce `matricula` uniqueness atomically: two
/// concurrent `create`/`update` calls for the same value may not both succeed.
#[async_trait]
pub trait AlunoRepository: Send + Sync {
    async fn create(&self, input: NewAluno) -> Result<Model, ServiceError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Model>, ServiceError>;
    async fn find_by_matricula(&self, matricula: &str) -> Result<Option<Model>, ServiceError>;
    /// All records ordered by `nome` (code point order), ties by `id`.
    async fn list_all(&self) -> Result<Vec<Model>, ServiceError>;
    async fn update(&self, id: &str, changes: AlunoChanges) -> Result<Model, ServiceError>;
    /// Returns false when no record had this id.
    async fn delete(&self, id: &str) -> Result<bool, ServiceError>;
}

/// SeaORM-backed repository; uniqueness comes from `idx_aluno_matricula_unique`.
#[derive(Clone)]
pub struct SeaOrmAlunoRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmAlunoRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AlunoRepository for SeaOrmAlunoRepository {
    async fn create(&self, input: NewAluno) -> Result<Model, ServiceError> {
        Ok(aluno::create(&self.db, input).await?)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Model>, ServiceError> {
        Ok(aluno::find_by_id(&self.db, id).await?)
    }

    async fn find_by_matricula(&self, matricula: &str) -> Result<Option<Model>, ServiceError> {
        Ok(aluno::find_by_matricula(&self.db, matricula).await?)
    }

    async fn list_all(&self) -> Result<Vec<Model>, ServiceError> {
        Ok(aluno::list_sorted(&self.db).await?)
    }

    async fn update(&self, id: &str, changes: AlunoChanges) -> Result<Model, ServiceError> {
        Ok(aluno::update(&self.db, id, changes).await?)
    }

    async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
        Ok(aluno::delete(&self.db, id).await?)
    }
}

/// In-process repository for tests and local runs without Postgres.
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use tokio::sync::RwLock;

    /// Records keyed by id. The uniqueness check and the write happen under
    /// the same write lock, which plays the role of the unique index.
    #[derive(Default)]
    pub struct InMemoryAlunoRepository {
        rows: RwLock<HashMap<String, Model>>,
    }

    impl InMemoryAlunoRepository {
        pub fn new() -> Self {
            Self::default()
        }
    }

    #[async_trait]
    impl AlunoRepository for InMemoryAlunoRepository {
        async fn create(&self, input: NewAluno) -> Result<Model, ServiceError> {
            input.validate()?;
            let mut rows = self.rows.write().await;
            if rows.values().any(|r| r.matricula == input.matricula) {
                return Err(ServiceError::matricula_taken(&input.matricula));
            }
            let model = Model::from_new(input);
            rows.insert(model.id.clone(), model.clone());
            Ok(model)
        }

        async fn find_by_id(&self, id: &str) -> Result<Option<Model>, ServiceError> {
            Ok(self.rows.read().await.get(id).cloned())
        }

        async fn find_by_matricula(&self, matricula: &str) -> Result<Option<Model>, ServiceError> {
            Ok(self.rows.read().await.values().find(|r| r.matricula == matricula).cloned())
        }

        async fn list_all(&self) -> Result<Vec<Model>, ServiceError> {
            let mut out: Vec<Model> = self.rows.read().await.values().cloned().collect();
            aluno::sort_by_nome(&mut out);
            Ok(out)
        }

        async fn update(&self, id: &str, changes: AlunoChanges) -> Result<Model, ServiceError> {
            changes.validate()?;
            let mut rows = self.rows.write().await;
            if let Some(m) = &changes.matricula {
                if rows.values().any(|r| r.id != id && &r.matricula == m) {
                    return Err(ServiceError::matricula_taken(m));
                }
            }
            let row = rows.get_mut(id).ok_or_else(|| ServiceError::not_found("aluno"))?;
            changes.apply_to(row);
            Ok(row.clone())
        }

        async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
            Ok(self.rows.write().await.remove(id).is_some())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use models::aluno::Endereco;
    use uuid::Uuid;

    fn new_aluno(matricula: &str, nome: &str) -> NewAluno {
        NewAluno {
            matricula: matricula.into(),
            nome: nome.into(),
            endereco: Endereco { cep: "18110000".into(), cidade: Some("Votorantim".into()), ..Default::default() },
            cursos: vec!["DSM".into()],
        }
    }

    #[tokio::test]
    async fn seaorm_repository_crud() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let repo = SeaOrmAlunoRepository::new(db);

        let m = format!("repo-{}", Uuid::new_v4());
        let a = repo.create(new_aluno(&m, "Beatriz")).await?;
        assert_eq!(repo.find_by_id(&a.id).await?.map(|r| r.id), Some(a.id.clone()));
        assert!(matches!(repo.create(new_aluno(&m, "Outra")).await, Err(ServiceError::Conflict(_))));

        let u = repo.update(&a.id, AlunoChanges { nome: Some("Bia".into()), ..Default::default() }).await?;
        assert_eq!(u.nome, "Bia");
        assert_eq!(u.matricula, m);

        assert!(repo.delete(&a.id).await?);
        assert!(repo.find_by_matricula(&m).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn memory_update_keeps_own_matricula() -> Result<(), anyhow::Error> {
        let repo = memory::InMemoryAlunoRepository::new();
        let a = repo.create(new_aluno("1", "Ana")).await?;
        let u = repo
            .update(&a.id, AlunoChanges { matricula: Some("1".into()), ..Default::default() })
            .await?;
        assert_eq!(u.matricula, "1");
        assert!(u.updated_at >= a.updated_at);
        assert_eq!(u.created_at, a.created_at);
        Ok(())
    }

    #[tokio::test]
    async fn memory_update_missing_is_not_found() {
        let repo = memory::InMemoryAlunoRepository::new();
        let res = repo.update(&models::object_id::generate(), AlunoChanges::default()).await;
        assert!(matches!(res, Err(ServiceError::NotFound(_))));
    }
}
