//! CEP (Brazilian postal code) lookups.
//!
//! The HTTP layer owns input validation: callers are expected to run
//! [`normalize_cep`] and check [`is_valid_cep`] before calling
//! [`CepLookup::lookup`]. The client performs a single attempt with a bounded
//! timeout; there is no retry.

use std::{collections::BTreeMap, time::Duration};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://viacep.com.br/ws";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum CepError {
    #[error("cep not found")]
    NotFound,
    #[error("upstream error: {0}")]
    Upstream(String),
}

/// Address as returned by ViaCEP. Fields beyond the core ones
/// (`ibge`, `ddd`, `siafi`, ...) are carried through untouched in `extra`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CepAddress {
    pub cep: String,
    #[serde(default)]
    pub logradouro: String,
    #[serde(default)]
    pub complemento: String,
    #[serde(default)]
    pub bairro: String,
    pub localidade: String,
    pub uf: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Strip everything but ASCII digits, so `"01310-930"` becomes `"01310930"`.
pub fn normalize_cep(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// A CEP is valid when it is exactly eight ASCII digits.
pub fn is_valid_cep(cep: &str) -> bool {
    cep.len() == 8 && cep.bytes().all(|b| b.is_ascii_digit())
}

/// Interpret a decoded upstream body.
///
/// ViaCEP answers unknown codes with `200 {"erro": true}`; older deployments
/// send the flag as the string `"true"`.
pub fn parse_response(body: Value) -> Result<CepAddress, CepError> {
    let erro = match body.get("erro") {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    };
    if erro {
        return Err(CepError::NotFound);
    }
    serde_json::from_value(body)
        .map_err(|e| CepError::Upstream(format!("malformed upstream response: {e}")))
}

#[async_trait]
pub trait CepLookup: Send + Sync {
    /// Look up an already normalized, eight-digit CEP.
    async fn lookup(&self, cep: &str) -> Result<CepAddress, CepError>;
}

/// reqwest-backed ViaCEP client.
#[derive(Clone, Debug)]
pub struct ViaCepClient {
    http: reqwest::Client,
    base_url: String,
}

impl ViaCepClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, CepError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CepError::Upstream(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub fn url_for(&self, cep: &str) -> String {
        format!("{}/{}/json/", self.base_url, cep)
    }
}

#[async_trait]
impl CepLookup for ViaCepClient {
    async fn lookup(&self, cep: &str) -> Result<CepAddress, CepError> {
        let url = self.url_for(cep);
        debug!(%url, "cep_lookup_request");

        let resp = self.http.get(&url).send().await.map_err(|e| {
            warn!(%cep, error = %e, timeout = e.is_timeout(), "cep upstream request failed");
            CepError::Upstream(e.to_string())
        })?;

        let status = resp.status();
        if !status.is_success() {
            warn!(%cep, %status, "cep upstream returned non-success status");
            return Err(CepError::Upstream(format!("upstream status {status}")));
        }

        let body = resp
            .json::<Value>()
            .await
            .map_err(|e| CepError::Upstream(format!("invalid upstream body: {e}")))?;
        parse_response(body)
    }
}
