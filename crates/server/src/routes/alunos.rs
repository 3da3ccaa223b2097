use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use common::types::MessageBody;
use models::aluno::Model;
use serde::Serialize;
use service::aluno::{CreateAlunoInput, UpdateAlunoInput};
use tracing::info;

use crate::{errors::JsonApiError, state::AppState};

/// `{message, aluno}` returned by create and update.
#[derive(Debug, Serialize)]
pub struct AlunoEnvelope {
    pub message: &'static str,
    pub aluno: Model,
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, JsonApiError> {
    payload
        .map(|Json(v)| v)
        .map_err(|e| JsonApiError::new(StatusCode::BAD_REQUEST, "Dados inválidos", Some(e.body_text())))
}

#[utoipa::path(
    get, path = "/alunos", tag = "alunos",
    responses(
        (status = 200, description = "All records ordered by nome", body = [crate::openapi::AlunoDoc]),
        (status = 500, description = "Erro ao buscar alunos", body = crate::openapi::MessageDoc)
    )
)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Model>>, JsonApiError> {
    let rows = state
        .alunos
        .list()
        .await
        .map_err(|e| JsonApiError::from_service(e, "Erro ao buscar alunos"))?;
    info!(count = rows.len(), "list alunos");
    Ok(Json(rows))
}

#[utoipa::path(
    get, path = "/alunos/{id}", tag = "alunos",
    params(("id" = String, Path, description = "24-character hex id")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::AlunoDoc),
        (status = 400, description = "ID inválido", body = crate::openapi::MessageDoc),
        (status = 404, description = "Aluno não encontrado", body = crate::openapi::MessageDoc)
    )
)]
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Model>, JsonApiError> {
    state
        .alunos
        .get(&id)
        .await
        .map(Json)
        .map_err(|e| JsonApiError::from_service(e, "Erro ao buscar aluno"))
}

#[utoipa::path(
    get, path = "/alunos/matricula/{matricula}", tag = "alunos",
    params(("matricula" = String, Path, description = "Enrollment number")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::AlunoDoc),
        (status = 404, description = "Aluno não encontrado", body = crate::openapi::MessageDoc)
    )
)]
pub async fn get_by_matricula(
    State(state): State<AppState>,
    Path(matricula): Path<String>,
) -> Result<Json<Model>, JsonApiError> {
    state
        .alunos
        .get_by_matricula(&matricula)
        .await
        .map(Json)
        .map_err(|e| JsonApiError::from_service(e, "Erro ao buscar aluno"))
}

#[utoipa::path(
    post, path = "/alunos", tag = "alunos",
    request_body = crate::openapi::CreateAlunoDoc,
    responses(
        (status = 201, description = "Aluno criado com sucesso!", body = crate::openapi::AlunoEnvelopeDoc),
        (status = 400, description = "Matrícula já existe / Dados inválidos", body = crate::openapi::MessageDoc),
        (status = 500, description = "Erro ao criar aluno", body = crate::openapi::MessageDoc)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateAlunoInput>, JsonRejection>,
) -> Result<(StatusCode, Json<AlunoEnvelope>), JsonApiError> {
    let input = body(payload)?;
    let aluno = state
        .alunos
        .create(input)
        .await
        .map_err(|e| JsonApiError::from_service(e, "Erro ao criar aluno"))?;
    Ok((StatusCode::CREATED, Json(AlunoEnvelope { message: "Aluno criado com sucesso!", aluno })))
}

#[utoipa::path(
    put, path = "/alunos/{id}", tag = "alunos",
    params(("id" = String, Path, description = "24-character hex id")),
    request_body = crate::openapi::UpdateAlunoDoc,
    responses(
        (status = 200, description = "Aluno atualizado com sucesso!", body = crate::openapi::AlunoEnvelopeDoc),
        (status = 400, description = "Matrícula já existe / Dados inválidos / ID inválido", body = crate::openapi::MessageDoc),
        (status = 404, description = "Aluno não encontrado", body = crate::openapi::MessageDoc),
        (status = 500, description = "Erro ao atualizar aluno", body = crate::openapi::MessageDoc)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateAlunoInput>, JsonRejection>,
) -> Result<Json<AlunoEnvelope>, JsonApiError> {
    let input = body(payload)?;
    let aluno = state
        .alunos
        .update(&id, input)
        .await
        .map_err(|e| JsonApiError::from_service(e, "Erro ao atualizar aluno"))?;
    Ok(Json(AlunoEnvelope { message: "Aluno atualizado com sucesso!", aluno }))
}

#[utoipa::path(
    delete, path = "/alunos/{id}", tag = "alunos",
    params(("id" = String, Path, description = "24-character hex id")),
    responses(
        (status = 200, description = "Aluno deletado com sucesso!", body = crate::openapi::MessageDoc),
        (status = 400, description = "ID inválido", body = crate::openapi::MessageDoc),
        (status = 404, description = "Aluno não encontrado", body = crate::openapi::MessageDoc),
        (status = 500, description = "Erro ao deletar aluno", body = crate::openapi::MessageDoc)
    )
)]
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<MessageBody>, JsonApiError> {
    state
        .alunos
        .delete(&id)
        .await
        .map_err(|e| JsonApiError::from_service(e, "Erro ao deletar aluno"))?;
    Ok(Json(MessageBody { message: "Aluno deletado com sucesso!".into(), error: None }))
}
