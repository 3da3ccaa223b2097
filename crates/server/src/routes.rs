use std::collections::BTreeMap;

use axum::{
    extract::Request,
    routing::get,
    Json, Router,
};
use tower::{util::MapRequest, Layer};
use tower::util::MapRequestLayer;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::{Health, ServiceInfo};

use crate::{method_override, openapi::ApiDoc, state::AppState};

pub mod alunos;
pub mod cep;

/// Router wrapped with the method-override rewrite.
pub type App = MapRequest<Router, fn(Request) -> Request>;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

#[utoipa::path(get, path = "/", tag = "health", responses((status = 200, description = "Service description and endpoint list")))]
pub async fn index() -> Json<ServiceInfo> {
    let endpoints = BTreeMap::from([
        ("GET /alunos", "Listar todos os alunos"),
        ("GET /alunos/:id", "Buscar aluno por ID"),
        ("GET /alunos/matricula/:matricula", "Buscar aluno por matrícula"),
        ("POST /alunos", "Criar novo aluno"),
        ("PUT /alunos/:id", "Atualizar aluno"),
        ("DELETE /alunos/:id", "Deletar aluno"),
        ("GET /cep/:cep", "Buscar endereço por CEP"),
    ]);
    Json(ServiceInfo { status: "ok", message: "API de Gerenciamento de Alunos", endpoints })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the application router with CORS and request tracing.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/cep/:cep", get(cep::lookup))
        .route("/alunos", get(alunos::list).post(alunos::create))
        .route("/alunos/matricula/:matricula", get(alunos::get_by_matricula))
        .route("/alunos/:id", get(alunos::get).put(alunos::update).delete(alunos::delete))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

/// Full service: router plus the POST method-override rewrite, which has to
/// run before route matching.
pub fn build_app(state: AppState, cors: CorsLayer) -> App {
    let rewrite: fn(Request) -> Request = method_override::override_method;
    MapRequestLayer::new(rewrite).layer(build_router(state, cors))
}
