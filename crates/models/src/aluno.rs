use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, FromJsonQueryResult, Set, SqlErr};
use serde::{Deserialize, Serialize};

use crate::{errors::ModelError, object_id};

/// Student record. Serialized with `_id`, `createdAt` and `updatedAt` keys.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "aluno")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    #[serde(rename = "_id")]
    pub id: String,
    #[sea_orm(unique)]
    pub matricula: String,
    pub nome: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub endereco: Endereco,
    #[sea_orm(column_type = "JsonBinary")]
    pub cursos: Cursos,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

/// Address sub-document; only `cep` is mandatory.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Endereco {
    pub cep: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logradouro: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cidade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bairro: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estado: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numero: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complemento: Option<String>,
}

/// Ordered course list; duplicates allowed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct Cursos(pub Vec<String>);

impl From<Vec<String>> for Cursos {
    fn from(v: Vec<String>) -> Self {
        Self(v)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Validated input for a new record.
#[derive(Clone, Debug, PartialEq)]
pub struct NewAluno {
    pub matricula: String,
    pub nome: String,
    pub endereco: Endereco,
    pub cursos: Vec<String>,
}

/// Fields to replace on update; `None` leaves the stored value alone.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AlunoChanges {
    pub matricula: Option<String>,
    pub nome: Option<String>,
    pub endereco: Option<Endereco>,
    pub cursos: Option<Vec<String>>,
}

impl AlunoChanges {
    pub fn is_empty(&self) -> bool {
        self.matricula.is_none() && self.nome.is_none() && self.endereco.is_none() && self.cursos.is_none()
    }
}

pub fn validate_matricula(m: &str) -> Result<(), ModelError> {
    if m.trim().is_empty() {
        return Err(ModelError::Validation("matricula required".into()));
    }
    Ok(())
}

pub fn validate_nome(n: &str) -> Result<(), ModelError> {
    if n.trim().is_empty() {
        return Err(ModelError::Validation("nome required".into()));
    }
    Ok(())
}

pub fn validate_endereco(e: &Endereco) -> Result<(), ModelError> {
    if e.cep.trim().is_empty() {
        return Err(ModelError::Validation("endereco.cep required".into()));
    }
    Ok(())
}

impl NewAluno {
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_matricula(&self.matricula)?;
        validate_nome(&self.nome)?;
        validate_endereco(&self.endereco)
    }
}

impl AlunoChanges {
    pub fn validate(&self) -> Result<(), ModelError> {
        if let Some(m) = &self.matricula {
            validate_matricula(m)?;
        }
        if let Some(n) = &self.nome {
            validate_nome(n)?;
        }
        if let Some(e) = &self.endereco {
            validate_endereco(e)?;
        }
        Ok(())
    }

    /// Apply onto an in-memory record, refreshing `updated_at`.
    pub fn apply_to(self, m: &mut Model) {
        if let Some(v) = self.matricula {
            m.matricula = v;
        }
        if let Some(v) = self.nome {
            m.nome = v;
        }
        if let Some(v) = self.endereco {
            m.endereco = v;
        }
        if let Some(v) = self.cursos {
            m.cursos = Cursos(v);
        }
        m.updated_at = Utc::now().into();
    }
}

impl Model {
    /// Build a fresh record with a new id and identical timestamps.
    pub fn from_new(input: NewAluno) -> Self {
        let now: DateTimeWithTimeZone = Utc::now().into();
        Self {
            id: object_id::generate(),
            matricula: input.matricula,
            nome: input.nome,
            endereco: input.endereco,
            cursos: Cursos(input.cursos),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Listing order: `nome` by code point (case-sensitive), then `id`.
pub fn sort_by_nome(rows: &mut [Model]) {
    rows.sort_by(|a, b| a.nome.cmp(&b.nome).then_with(|| a.id.cmp(&b.id)));
}

fn map_write_err(e: DbErr, matricula: &str) -> ModelError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            ModelError::Conflict(format!("matricula '{matricula}' already in use"))
        }
        _ => ModelError::Db(e.to_string()),
    }
}

fn db_err(e: DbErr) -> ModelError {
    ModelError::Db(e.to_string())
}

pub async fn create(db: &DatabaseConnection, input: NewAluno) -> Result<Model, ModelError> {
    input.validate()?;
    let matricula = input.matricula.clone();
    let m = Model::from_new(input);
    let am = ActiveModel {
        id: Set(m.id),
        matricula: Set(m.matricula),
        nome: Set(m.nome),
        endereco: Set(m.endereco),
        cursos: Set(m.cursos),
        created_at: Set(m.created_at),
        updated_at: Set(m.updated_at),
    };
    am.insert(db).await.map_err(|e| map_write_err(e, &matricula))
}

pub async fn find_by_id(db: &DatabaseConnection, id: &str) -> Result<Option<Model>, ModelError> {
    Entity::find_by_id(id.to_string()).one(db).await.map_err(db_err)
}

pub async fn find_by_matricula(db: &DatabaseConnection, matricula: &str) -> Result<Option<Model>, ModelError> {
    Entity::find()
        .filter(Column::Matricula.eq(matricula))
        .one(db)
        .await
        .map_err(db_err)
}

pub async fn list_sorted(db: &DatabaseConnection) -> Result<Vec<Model>, ModelError> {
    let mut rows = Entity::find().all(db).await.map_err(db_err)?;
    sort_by_nome(&mut rows);
    Ok(rows)
}

/// Replace the supplied fields of record `id`.
pub async fn update(db: &DatabaseConnection, id: &str, changes: AlunoChanges) -> Result<Model, ModelError> {
    changes.validate()?;
    let existing = find_by_id(db, id)
        .await?
        .ok_or_else(|| ModelError::NotFound(format!("aluno {id}")))?;
    let matricula = changes.matricula.clone().unwrap_or_else(|| existing.matricula.clone());

    let mut am: ActiveModel = existing.into();
    if let Some(v) = changes.matricula {
        am.matricula = Set(v);
    }
    if let Some(v) = changes.nome {
        am.nome = Set(v);
    }
    if let Some(v) = changes.endereco {
        am.endereco = Set(v);
    }
    if let Some(v) = changes.cursos {
        am.cursos = Set(Cursos(v));
    }
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| match e {
        DbErr::RecordNotUpdated => ModelError::NotFound(format!("aluno {id}")),
        other => map_write_err(other, &matricula),
    })
}

/// Delete by id; returns true if a row was removed.
pub async fn delete(db: &DatabaseConnection, id: &str) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id.to_string()).exec(db).await.map_err(db_err)?;
    Ok(res.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(nome: &str) -> Model {
        Model::from_new(NewAluno {
            matricula: format!("m-{nome}"),
            nome: nome.into(),
            endereco: Endereco { cep: "01310930".into(), ..Default::default() },
            cursos: vec![],
        })
    }

    #[test]
    fn validation_requires_core_fields() {
        let ok = NewAluno {
            matricula: "2024001".into(),
            nome: "Ana".into(),
            endereco: Endereco { cep: "01310930".into(), ..Default::default() },
            cursos: vec!["ADS".into()],
        };
        assert!(ok.validate().is_ok());

        let mut bad = ok.clone();
        bad.matricula = "  ".into();
        assert!(matches!(bad.validate(), Err(ModelError::Validation(_))));

        let mut bad = ok.clone();
        bad.nome = String::new();
        assert!(matches!(bad.validate(), Err(ModelError::Validation(_))));

        let mut bad = ok;
        bad.endereco.cep = String::new();
        assert!(matches!(bad.validate(), Err(ModelError::Validation(_))));
    }

    #[test]
    fn new_record_has_equal_timestamps() {
        let m = sample("Ana");
        assert_eq!(m.created_at, m.updated_at);
        assert!(object_id::is_valid(&m.id));
    }

    #[test]
    fn changes_replace_whole_fields() {
        let mut m = sample("Ana");
        m.cursos = Cursos(vec!["A".into(), "B".into()]);
        m.endereco.cidade = Some("São Paulo".into());

        AlunoChanges {
            cursos: Some(vec!["X".into()]),
            endereco: Some(Endereco { cep: "20040002".into(), ..Default::default() }),
            ..Default::default()
        }
        .apply_to(&mut m);

        assert_eq!(m.cursos, Cursos(vec!["X".into()]));
        assert_eq!(m.endereco.cidade, None);
        assert_eq!(m.nome, "Ana");
    }

    #[test]
    fn sort_is_code_point_order() {
        let mut rows = vec![sample("bruno"), sample("Carla"), sample("Ana")];
        sort_by_nome(&mut rows);
        let names: Vec<_> = rows.iter().map(|r| r.nome.as_str()).collect();
        assert_eq!(names, ["Ana", "Carla", "bruno"]);
    }

    #[test]
    fn serializes_with_wire_names() {
        let m = sample("Ana");
        let v = serde_json::to_value(&m).unwrap();
        assert!(v.get("_id").is_some());
        assert!(v.get("createdAt").is_some());
        assert!(v.get("updatedAt").is_some());
        assert_eq!(v["endereco"]["cep"], "01310930");
        assert!(v["endereco"].get("logradouro").is_none());
        assert_eq!(v["cursos"], serde_json::json!([]));
    }
}
