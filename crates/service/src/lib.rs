//! Service layer for student records.
//! - Validates input before any storage call.
//! - Talks to storage only through the `AlunoRepository` trait.
//! - Reports outcomes as `ServiceError` variants the HTTP layer maps to status codes.

pub mod errors;
pub mod aluno;
#[cfg(test)]
pub mod test_support;
