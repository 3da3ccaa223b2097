//! Shared building blocks: logging setup, response types and the CEP lookup client.

pub mod cep;
pub mod types;
pub mod utils;
