use std::sync::Arc;

use models::{aluno::Model, object_id};
use tracing::{debug, info, instrument};

use super::domain::{CreateAlunoInput, UpdateAlunoInput};
use super::repository::AlunoRepository;
use crate::errors::ServiceError;

/// Application service for student records, independent of the web framework.
///
/// Input is validated before the repository is touched. The `matricula`
/// pre-checks here only save a round trip; the repository's atomic
/// uniqueness guarantee is what actually prevents duplicates.
pub struct AlunoService<R: AlunoRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: AlunoRepository + ?Sized> AlunoService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Canonical (lowercase) form of a well-shaped id.
    fn parse_id(id: &str) -> Result<String, ServiceError> {
        if !object_id::is_valid(id) {
            return Err(ServiceError::InvalidIdentifier(format!("'{}' is not a 24-character hex id", id)));
        }
        Ok(id.to_ascii_lowercase())
    }

    /// Create a new record.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::aluno::{AlunoService, CreateAlunoInput, EnderecoInput, InMemoryAlunoRepository};
    /// let svc = AlunoService::new(Arc::new(InMemoryAlunoRepository::new()));
    /// let input = CreateAlunoInput {
    ///     matricula: Some("2024001".into()),
    ///     nome: Some("Ana".into()),
    ///     endereco: Some(EnderecoInput { cep: Some("01310930".into()), ..Default::default() }),
    ///     cursos: None,
    /// };
    /// let aluno = tokio_test::block_on(svc.create(input)).unwrap();
    /// assert_eq!(aluno.matricula, "2024001");
    /// assert!(aluno.cursos.0.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(matricula = ?input.matricula))]
    pub async fn create(&self, input: CreateAlunoInput) -> Result<Model, ServiceError> {
        let new = input.into_new()?;
        if self.repo.find_by_matricula(&new.matricula).await?.is_some() {
            debug!("matricula already present");
            return Err(ServiceError::matricula_taken(&new.matricula));
        }
        let created = self.repo.create(new).await?;
        info!(id = %created.id, matricula = %created.matricula, "aluno_created");
        Ok(created)
    }

    /// Every record, ordered by `nome`.
    pub async fn list(&self) -> Result<Vec<Model>, ServiceError> {
        self.repo.list_all().await
    }

    pub async fn get(&self, id: &str) -> Result<Model, ServiceError> {
        let id = Self::parse_id(id)?;
        self.repo.find_by_id(&id).await?.ok_or_else(|| ServiceError::not_found("aluno"))
    }

    pub async fn get_by_matricula(&self, matricula: &str) -> Result<Model, ServiceError> {
        self.repo
            .find_by_matricula(matricula)
            .await?
            .ok_or_else(|| ServiceError::not_found("aluno"))
    }

    /// Replace the fields present in `input`; absent fields keep their value.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: &str, input: UpdateAlunoInput) -> Result<Model, ServiceError> {
        let id = Self::parse_id(id)?;
        if self.repo.find_by_id(&id).await?.is_none() {
            return Err(ServiceError::not_found("aluno"));
        }
        let changes = input.into_changes()?;
        if let Some(m) = &changes.matricula {
            if let Some(other) = self.repo.find_by_matricula(m).await? {
                if other.id != id {
                    return Err(ServiceError::matricula_taken(m));
                }
            }
        }
        let updated = self.repo.update(&id, changes).await?;
        info!(id = %updated.id, "aluno_updated");
        Ok(updated)
    }

    /// Permanently remove a record. Malformed ids never reach the repository.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let id = Self::parse_id(id)?;
        if !self.repo.delete(&id).await? {
            return Err(ServiceError::not_found("aluno"));
        }
        info!(%id, "aluno_deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aluno::domain::EnderecoInput;
    use crate::aluno::repository::memory::InMemoryAlunoRepository;
    use async_trait::async_trait;
    use models::aluno::{AlunoChanges, NewAluno};

    fn svc() -> AlunoService<InMemoryAlunoRepository> {
        AlunoService::new(Arc::new(InMemoryAlunoRepository::new()))
    }

    fn input(matricula: &str, nome: &str, cursos: &[&str]) -> CreateAlunoInput {
        CreateAlunoInput {
            matricula: Some(matricula.into()),
            nome: Some(nome.into()),
            endereco: Some(EnderecoInput {
                cep: Some("18110000".into()),
                logradouro: Some("Rua Um".into()),
                cidade: Some("Votorantim".into()),
                estado: Some("SP".into()),
                ..Default::default()
            }),
            cursos: Some(cursos.iter().map(|c| c.to_string()).collect()),
        }
    }

    #[tokio::test]
    async fn create_then_get_returns_same_record() -> anyhow::Result<()> {
        let svc = svc();
        let created = svc.create(input("2024001", "Ana", &["DSM", "DSM", "ADS"])).await?;
        let found = svc.get(&created.id).await?;
        assert_eq!(found, created);
        assert_eq!(found.nome, "Ana");
        assert_eq!(found.endereco.cep, "18110000");
        assert_eq!(found.endereco.cidade.as_deref(), Some("Votorantim"));
        assert_eq!(found.cursos.0, vec!["DSM", "DSM", "ADS"]);
        assert_eq!(found.created_at, found.updated_at);
        assert!(object_id::is_valid(&found.id));

        let by_m = svc.get_by_matricula("2024001").await?;
        assert_eq!(by_m.id, created.id);
        Ok(())
    }

    #[tokio::test]
    async fn uppercase_id_resolves() -> anyhow::Result<()> {
        let svc = svc();
        let created = svc.create(input("1", "Ana", &[])).await?;
        let found = svc.get(&created.id.to_ascii_uppercase()).await?;
        assert_eq!(found.id, created.id);
        Ok(())
    }

    #[tokio::test]
    async fn create_requires_core_fields() {
        let svc = svc();
        let mut i = input("1", "Ana", &[]);
        i.matricula = None;
        assert!(matches!(svc.create(i).await, Err(ServiceError::Validation(_))));

        let mut i = input("1", "Ana", &[]);
        i.nome = Some(String::new());
        assert!(matches!(svc.create(i).await, Err(ServiceError::Validation(_))));

        let mut i = input("1", "Ana", &[]);
        i.endereco = Some(EnderecoInput::default());
        assert!(matches!(svc.create(i).await, Err(ServiceError::Validation(_))));

        assert!(svc.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_matricula_conflicts() -> anyhow::Result<()> {
        let svc = svc();
        svc.create(input("2024001", "Ana", &[])).await?;
        let dup = svc.create(input("2024001", "Bruno", &[])).await;
        assert!(matches!(dup, Err(ServiceError::Conflict(_))));
        let all = svc.list().await?;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].nome, "Ana");
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_duplicate_creates_yield_one_record() -> anyhow::Result<()> {
        let svc = Arc::new(svc());
        let mut handles = Vec::new();
        for i in 0..32 {
            let svc = Arc::clone(&svc);
            handles.push(tokio::spawn(async move {
                svc.create(input("race", &format!("Aluno {i}"), &[])).await
            }));
        }
        let mut created = 0;
        for h in handles {
            match h.await? {
                Ok(_) => created += 1,
                Err(ServiceError::Conflict(_)) => {}
                Err(e) => anyhow::bail!("unexpected error: {e}"),
            }
        }
        assert_eq!(created, 1);
        let all = svc.list().await?;
        assert_eq!(all.iter().filter(|a| a.matricula == "race").count(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn update_omitted_fields_are_kept_present_ones_replaced() -> anyhow::Result<()> {
        let svc = svc();
        let a = svc.create(input("2024001", "Ana", &["A", "B", "X"])).await?;

        let u = svc
            .update(&a.id, UpdateAlunoInput { cursos: Some(vec!["X".into()]), ..Default::default() })
            .await?;
        assert_eq!(u.cursos.0, vec!["X"]);
        assert_eq!(u.nome, "Ana");
        assert_eq!(u.matricula, "2024001");
        assert_eq!(u.endereco, a.endereco);
        assert_eq!(u.created_at, a.created_at);
        assert!(u.updated_at >= a.updated_at);

        // address is replaced as a whole, not merged
        let u = svc
            .update(
                &a.id,
                UpdateAlunoInput {
                    endereco: Some(EnderecoInput { cep: Some("01310930".into()), ..Default::default() }),
                    ..Default::default()
                },
            )
            .await?;
        assert_eq!(u.endereco.cep, "01310930");
        assert_eq!(u.endereco.cidade, None);
        assert_eq!(u.endereco.logradouro, None);
        assert_eq!(u.cursos.0, vec!["X"]);
        Ok(())
    }

    #[tokio::test]
    async fn update_errors() -> anyhow::Result<()> {
        let svc = svc();
        let a = svc.create(input("1", "Ana", &[])).await?;
        let b = svc.create(input("2", "Bruno", &[])).await?;

        let res = svc.update(&b.id, UpdateAlunoInput { matricula: Some("1".into()), ..Default::default() }).await;
        assert!(matches!(res, Err(ServiceError::Conflict(_))));
        assert_eq!(svc.get(&b.id).await?.matricula, "2");

        // keeping one's own matricula is not a conflict
        let same = svc.update(&a.id, UpdateAlunoInput { matricula: Some("1".into()), ..Default::default() }).await?;
        assert_eq!(same.matricula, "1");

        let res = svc.update(&a.id, UpdateAlunoInput { nome: Some(" ".into()), ..Default::default() }).await;
        assert!(matches!(res, Err(ServiceError::Validation(_))));

        let missing = object_id::generate();
        let res = svc.update(&missing, UpdateAlunoInput { nome: Some("Zé".into()), ..Default::default() }).await;
        assert!(matches!(res, Err(ServiceError::NotFound(_))));

        let res = svc.update("123", UpdateAlunoInput::default()).await;
        assert!(matches!(res, Err(ServiceError::InvalidIdentifier(_))));
        Ok(())
    }

    #[tokio::test]
    async fn delete_semantics() -> anyhow::Result<()> {
        let svc = svc();
        let a = svc.create(input("1", "Ana", &[])).await?;
        svc.delete(&a.id).await?;
        assert!(matches!(svc.delete(&a.id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.get(&a.id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(
            svc.delete(&object_id::generate()).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(svc.delete("123").await, Err(ServiceError::InvalidIdentifier(_))));

        // a new record never takes over a deleted id
        let b = svc.create(input("1", "Ana", &[])).await?;
        assert_ne!(b.id, a.id);
        Ok(())
    }

    /// Repository that fails every call; proves a code path never touched storage.
    struct UnreachableRepo;

    #[async_trait]
    impl AlunoRepository for UnreachableRepo {
        async fn create(&self, _: NewAluno) -> Result<Model, ServiceError> {
            Err(ServiceError::Db("touched".into()))
        }
        async fn find_by_id(&self, _: &str) -> Result<Option<Model>, ServiceError> {
            Err(ServiceError::Db("touched".into()))
        }
        async fn find_by_matricula(&self, _: &str) -> Result<Option<Model>, ServiceError> {
            Err(ServiceError::Db("touched".into()))
        }
        async fn list_all(&self) -> Result<Vec<Model>, ServiceError> {
            Err(ServiceError::Db("touched".into()))
        }
        async fn update(&self, _: &str, _: AlunoChanges) -> Result<Model, ServiceError> {
            Err(ServiceError::Db("touched".into()))
        }
        async fn delete(&self, _: &str) -> Result<bool, ServiceError> {
            Err(ServiceError::Db("touched".into()))
        }
    }

    #[tokio::test]
    async fn malformed_id_is_rejected_before_storage() {
        let repo: Arc<dyn AlunoRepository> = Arc::new(UnreachableRepo);
        let svc = AlunoService::new(repo);
        assert!(matches!(svc.delete("123").await, Err(ServiceError::InvalidIdentifier(_))));
        assert!(matches!(svc.delete("zzzzzzzzzzzzzzzzzzzzzzzz").await, Err(ServiceError::InvalidIdentifier(_))));
        assert!(matches!(svc.get("123").await, Err(ServiceError::InvalidIdentifier(_))));
        assert!(matches!(
            svc.update("123", UpdateAlunoInput::default()).await,
            Err(ServiceError::InvalidIdentifier(_))
        ));
        // and validation failures never reach it either
        assert!(matches!(
            svc.create(CreateAlunoInput::default()).await,
            Err(ServiceError::Validation(_))
        ));
        // well-formed ids do go to storage
        assert!(matches!(svc.delete(&object_id::generate()).await, Err(ServiceError::Db(_))));
    }

    #[tokio::test]
    async fn list_is_sorted_by_nome() -> anyhow::Result<()> {
        let svc = svc();
        for (m, n) in [("1", "Zilda"), ("2", "Ana"), ("3", "Marcos"), ("4", "Bruno")] {
            svc.create(input(m, n, &[])).await?;
        }
        let names: Vec<String> = svc.list().await?.into_iter().map(|a| a.nome).collect();
        assert_eq!(names, ["Ana", "Bruno", "Marcos", "Zilda"]);
        Ok(())
    }
}
