//! Pessoa API - micro-serviço HTTP do cadastro de pessoas
//!
//! Inicializa logs, configuração e banco SQLite, e expõe as rotas de
//! [`routes::create_router`].
//!
//! ```bash
//! RUST_LOG=debug PESSOA_DB_PATH=data/pessoas.db cargo run -p pessoa-api
//! ```

mod config;
mod error;
mod handlers;
mod routes;

use anyhow::{Context, Result};
use pessoa_db::{init_db_pool, PessoaService, SqlitePessoaStore};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env().context("Configuração inválida")?;

    init_tracing(config.log_json);

    let pool = init_db_pool(&config.db).await?;
    let service = PessoaService::new(SqlitePessoaStore::new(pool.clone()));
    let app = routes::create_router(service, config.max_concurrent_requests);

    tracing::info!("Servidor ouvindo em http://{}", config.bind_addr);
    axum::Server::try_bind(&config.bind_addr)
        .with_context(|| format!("Falha ao abrir {}", config.bind_addr))?
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Servidor HTTP falhou")?;

    pool.close().await;
    tracing::info!("Servidor encerrado");
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Falha ao escutar Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Sinal de encerramento recebido");
}
