use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(Serialize, ToSchema)]
pub struct MessageDoc {
    pub message: String,
    pub error: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct EnderecoDoc {
    pub cep: String,
    pub logradouro: String,
    pub cidade: String,
    pub bairro: String,
    pub estado: String,
    pub numero: String,
    pub complemento: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlunoDoc {
    #[serde(rename = "_id")]
    pub id: String,
    pub matricula: String,
    pub nome: String,
    pub endereco: EnderecoDoc,
    pub cursos: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Serialize, ToSchema)]
pub struct AlunoEnvelopeDoc {
    pub message: String,
    pub aluno: AlunoDoc,
}

#[derive(Serialize, ToSchema)]
pub struct CreateAlunoDoc {
    pub matricula: String,
    pub nome: String,
    pub endereco: EnderecoDoc,
    pub cursos: Option<Vec<String>>,
}

/// Every field optional; present fields replace the stored value whole.
#[derive(Serialize, ToSchema)]
pub struct UpdateAlunoDoc {
    pub matricula: Option<String>,
    pub nome: Option<String>,
    pub endereco: Option<EnderecoDoc>,
    pub cursos: Option<Vec<String>>,
}

#[derive(Serialize, ToSchema)]
pub struct CepAddressDoc {
    pub cep: String,
    pub logradouro: String,
    pub complemento: String,
    pub bairro: String,
    pub localidade: String,
    pub uf: String,
}

#[derive(OpenApi)]
#[openapi(
    info(title = "API de Gerenciamento de Alunos"),
    paths(
        crate::routes::index,
        crate::routes::health,
        crate::routes::alunos::list,
        crate::routes::alunos::get,
        crate::routes::alunos::get_by_matricula,
        crate::routes::alunos::create,
        crate::routes::alunos::update,
        crate::routes::alunos::delete,
        crate::routes::cep::lookup,
    ),
    components(
        schemas(
            HealthResponse,
            MessageDoc,
            EnderecoDoc,
            AlunoDoc,
            AlunoEnvelopeDoc,
            CreateAlunoDoc,
            UpdateAlunoDoc,
            CepAddressDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "alunos"),
        (name = "cep")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = doc["paths"].as_object().unwrap();
        for p in ["/", "/health", "/alunos", "/alunos/{id}", "/alunos/matricula/{matricula}", "/cep/{cep}"] {
            assert!(paths.contains_key(p), "missing {p}");
        }
        assert!(doc["components"]["schemas"]["AlunoDoc"]["properties"].get("_id").is_some());
    }
}
