use std::sync::Arc;

use common::cep::CepLookup;
use service::aluno::{AlunoRepository, AlunoService};

/// Shared handler state: the record service and the CEP client.
#[derive(Clone)]
pub struct AppState {
    pub alunos: Arc<AlunoService<dyn AlunoRepository>>,
    pub cep: Arc<dyn CepLookup>,
}

impl AppState {
    pub fn new(repo: Arc<dyn AlunoRepository>, cep: Arc<dyn CepLookup>) -> Self {
        Self { alunos: Arc::new(AlunoService::new(repo)), cep }
    }
}
