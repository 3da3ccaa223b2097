use models::aluno::{AlunoChanges, Endereco, NewAluno};
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

/// Address as accepted from clients. Every field is optional at the schema
/// level so a missing `cep` is reported as a validation error, not a decode error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EnderecoInput {
    pub cep: Option<String>,
    pub logradouro: Option<String>,
    pub cidade: Option<String>,
    pub bairro: Option<String>,
    pub estado: Option<String>,
    pub numero: Option<String>,
    pub complemento: Option<String>,
}

/// Body of `POST /alunos`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CreateAlunoInput {
    pub matricula: Option<String>,
    pub nome: Option<String>,
    pub endereco: Option<EnderecoInput>,
    pub cursos: Option<Vec<String>>,
}

/// Body of `PUT /alunos/:id`. Absent or `null` fields are left untouched;
/// present ones replace the stored value wholesale.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UpdateAlunoInput {
    pub matricula: Option<String>,
    pub nome: Option<String>,
    pub endereco: Option<EnderecoInput>,
    pub cursos: Option<Vec<String>>,
}

fn required(value: Option<String>, field: &str) -> Result<String, ServiceError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ServiceError::Validation(format!("{field} is required"))),
    }
}

impl EnderecoInput {
    pub fn into_endereco(self) -> Result<Endereco, ServiceError> {
        Ok(Endereco {
            cep: required(self.cep, "endereco.cep")?,
            logradouro: self.logradouro,
            cidade: self.cidade,
            bairro: self.bairro,
            estado: self.estado,
            numero: self.numero,
            complemento: self.complemento,
        })
    }
}

impl CreateAlunoInput {
    pub fn into_new(self) -> Result<NewAluno, ServiceError> {
        let matricula = required(self.matricula, "matricula")?;
        let nome = required(self.nome, "nome")?;
        let endereco = self
            .endereco
            .ok_or_else(|| ServiceError::Validation("endereco.cep is required".into()))?
            .into_endereco()?;
        Ok(NewAluno { matricula, nome, endereco, cursos: self.cursos.unwrap_or_default() })
    }
}

impl UpdateAlunoInput {
    pub fn into_changes(self) -> Result<AlunoChanges, ServiceError> {
        let matricula = self.matricula.map(|m| required(Some(m), "matricula")).transpose()?;
        let nome = self.nome.map(|n| required(Some(n), "nome")).transpose()?;
        let endereco = self.endereco.map(EnderecoInput::into_endereco).transpose()?;
        Ok(AlunoChanges { matricula, nome, endereco, cursos: self.cursos })
    }
}
