use std::sync::Arc;

use axum::extract::Request;
use axum::ServiceExt;
use common::cep::{CepLookup, ViaCepClient};
use configs::AppConfig;
use migration::{Migrator, MigratorTrait};
use service::aluno::{AlunoRepository, SeaOrmAlunoRepository};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::{routes, state::AppState};

pub fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Public entry: prepare the database and serve HTTP until the listener
/// fails. Logging must already be initialized by the caller.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    models::db::ping(&db).await?;
    if cfg.database.run_migrations {
        Migrator::up(&db, None).await?;
        info!(event = "migrations_applied", "database schema up to date");
    }

    let repo: Arc<dyn AlunoRepository> = Arc::new(SeaOrmAlunoRepository::new(db));
    let cep: Arc<dyn CepLookup> = Arc::new(ViaCepClient::new(cfg.cep.base_url.clone(), cfg.cep.timeout())?);
    let state = AppState::new(repo, cep);

    let app = routes::build_app(state, build_cors());

    let addr = cfg.server.bind_addr();
    info!(%addr, "starting alunos api");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app)).await?;
    Ok(())
}
