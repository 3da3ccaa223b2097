pub mod errors;
pub mod db;
pub mod object_id;
pub mod aluno;
