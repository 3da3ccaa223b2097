pub mod domain;
pub mod repository;
pub mod service;

pub use domain::{CreateAlunoInput, EnderecoInput, UpdateAlunoInput};
pub use repository::{memory::InMemoryAlunoRepository, AlunoRepository, SeaOrmAlunoRepository};
pub use service::AlunoService;
