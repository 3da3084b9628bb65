//! Configuração do serviço, lida de variáveis de ambiente
//!
//! | Variável | Padrão |
//! |----------|--------|
//! | `PESSOA_BIND_ADDR` | `0.0.0.0:8000` |
//! | `PESSOA_DB_PATH` | `data/pessoas.db` |
//! | `PESSOA_DB_MAX_CONNECTIONS` | `5` |
//! | `PESSOA_MAX_CONCURRENT_REQUESTS` | `64` |
//! | `PESSOA_LOG_JSON` | `false` |
//!
//! Um arquivo `.env` no diretório corrente é carregado antes, se existir.

use std::net::SocketAddr;
use std::str::FromStr;

use pessoa_db::DbConfig;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Valor inválido para {var}: {value}")]
    InvalidValue { var: &'static str, value: String },

    #[error("Arquivo .env inválido: {0}")]
    DotEnv(String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub db: DbConfig,
    pub max_concurrent_requests: usize,
    /// Logs em JSON em vez do formato legível
    pub log_json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            db: DbConfig::default(),
            max_concurrent_requests: 64,
            log_json: false,
        }
    }
}

impl AppConfig {
    /// Carrega `.env` (se houver) e lê a configuração do ambiente do processo
    pub fn from_env() -> Result<Self, ConfigError> {
        carregar_dotenv(dotenvy::dotenv().map(|_| ()))?;
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Lê a configuração a partir de uma função de consulta de variáveis
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            bind_addr: parse_var(&lookup, "PESSOA_BIND_ADDR", defaults.bind_addr)?,
            db: DbConfig {
                db_path: lookup("PESSOA_DB_PATH").unwrap_or(defaults.db.db_path),
                max_connections: parse_var(
                    &lookup,
                    "PESSOA_DB_MAX_CONNECTIONS",
                    defaults.db.max_connections,
                )?,
            },
            max_concurrent_requests: parse_var(
                &lookup,
                "PESSOA_MAX_CONCURRENT_REQUESTS",
                defaults.max_concurrent_requests,
            )?,
            log_json: parse_var(&lookup, "PESSOA_LOG_JSON", defaults.log_json)?,
        })
    }
}

/// Ausência do `.env` é normal; qualquer outra falha é erro de configuração
fn carregar_dotenv(resultado: Result<(), dotenvy::Error>) -> Result<(), ConfigError> {
    match resultado {
        Err(e) if !e.not_found() => Err(ConfigError::DotEnv(e.to_string())),
        _ => Ok(()),
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var, value }),
    }
}
