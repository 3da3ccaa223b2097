use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use common::cep::{is_valid_cep, normalize_cep, CepAddress, CepError};
use tracing::error;

use crate::{errors::JsonApiError, state::AppState};

/// Resolve a CEP through the upstream provider. Codes that do not normalize
/// to eight digits are rejected here and never reach the client.
#[utoipa::path(
    get, path = "/cep/{cep}", tag = "cep",
    params(("cep" = String, Path, description = "Postal code; non-digits are ignored")),
    responses(
        (status = 200, description = "Address", body = crate::openapi::CepAddressDoc),
        (status = 400, description = "CEP inválido", body = crate::openapi::MessageDoc),
        (status = 404, description = "CEP não encontrado", body = crate::openapi::MessageDoc),
        (status = 500, description = "Erro ao buscar CEP", body = crate::openapi::MessageDoc)
    )
)]
pub async fn lookup(State(state): State<AppState>, Path(raw): Path<String>) -> Result<Json<CepAddress>, JsonApiError> {
    let cep = normalize_cep(&raw);
    if !is_valid_cep(&cep) {
        return Err(JsonApiError::new(StatusCode::BAD_REQUEST, "CEP inválido", None));
    }
    match state.cep.lookup(&cep).await {
        Ok(addr) => Ok(Json(addr)),
        Err(CepError::NotFound) => Err(JsonApiError::new(StatusCode::NOT_FOUND, "CEP não encontrado", None)),
        Err(CepError::Upstream(msg)) => {
            error!(%cep, err = %msg, "cep lookup failed");
            Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Erro ao buscar CEP", Some(msg)))
        }
    }
}
