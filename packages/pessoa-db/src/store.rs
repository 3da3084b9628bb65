//! Armazenamento do cadastro de pessoas
//!
//! O trait [`PessoaStore`] é o contrato que o núcleo espera de qualquer
//! armazenamento, indexado pelo CPF normalizado. [`SqlitePessoaStore`] é a
//! implementação de produção; em testes há `memory::InMemoryPessoaStore`.
//!
//! Concorrência: alterações e exclusões simultâneas do mesmo CPF seguem a
//! regra "última escrita vence" do banco, sem bloqueio no núcleo.

use std::future::Future;

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, PessoaError};
use crate::models::{Pessoa, PessoaValidada};
use crate::validation::normalize_cpf;

/// Contrato do armazenamento de pessoas
pub trait PessoaStore: Send + Sync {
    /// Inclui a pessoa e devolve o registro com `id`; `Conflict` se o CPF já existe
    fn create(
        &self,
        pessoa: &PessoaValidada,
    ) -> impl Future<Output = Result<Pessoa, PessoaError>> + Send;

    /// Substitui os dados da pessoa com o mesmo CPF; `NotFound` se não existe
    fn update(
        &self,
        pessoa: &PessoaValidada,
    ) -> impl Future<Output = Result<Pessoa, PessoaError>> + Send;

    /// Remove a pessoa; `NotFound` se não existe
    fn delete(&self, cpf: &str) -> impl Future<Output = Result<(), PessoaError>> + Send;

    fn get_by_cpf(&self, cpf: &str) -> impl Future<Output = Result<Pessoa, PessoaError>> + Send;

    /// Lista todas as pessoas; a ordem é estável, mas não garantida pelo contrato
    fn list_all(&self) -> impl Future<Output = Result<Vec<Pessoa>, PessoaError>> + Send;
}

/// Chave de busca normalizada; CPFs malformados nunca existem no cadastro
pub(crate) fn lookup_key(cpf: &str) -> Result<String, PessoaError> {
    normalize_cpf(cpf).ok_or_else(|| PessoaError::NotFound(cpf.to_string()))
}

const SELECT_PESSOA: &str =
    "SELECT id, nome, cpf, data_nasc, sexo, altura, peso FROM pessoa_pessoa";

/// Armazenamento em SQLite
#[derive(Debug, Clone)]
pub struct SqlitePessoaStore {
    pool: SqlitePool,
}

impl SqlitePessoaStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, cpf: &str) -> Result<Option<Pessoa>, PessoaError> {
        let pessoa = sqlx::query_as::<_, Pessoa>(&format!("{} WHERE cpf = ?", SELECT_PESSOA))
            .bind(cpf)
            .fetch_optional(&self.pool)
            .await?;
        Ok(pessoa)
    }
}

impl PessoaStore for SqlitePessoaStore {
    async fn create(&self, pessoa: &PessoaValidada) -> Result<Pessoa, PessoaError> {
        let result = sqlx::query(
            "INSERT INTO pessoa_pessoa (nome, cpf, data_nasc, sexo, altura, peso) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(pessoa.nome())
        .bind(pessoa.cpf())
        .bind(pessoa.data_nasc())
        .bind(pessoa.sexo().as_str())
        .bind(pessoa.altura())
        .bind(pessoa.peso())
        .execute(&self.pool)
        .await;

        let result = match result.map_err(DbError::from) {
            Ok(result) => result,
            Err(DbError::ConstraintViolation(_)) => {
                return Err(PessoaError::Conflict(pessoa.cpf().to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        let id = result.last_insert_rowid();
        info!("Pessoa incluída: id {}", id);

        Ok(Pessoa {
            id: Some(id),
            ..pessoa.clone().into_pessoa()
        })
    }

    async fn update(&self, pessoa: &PessoaValidada) -> Result<Pessoa, PessoaError> {
        let result = sqlx::query(
            "UPDATE pessoa_pessoa \
             SET nome = ?, data_nasc = ?, sexo = ?, altura = ?, peso = ? \
             WHERE cpf = ?",
        )
        .bind(pessoa.nome())
        .bind(pessoa.data_nasc())
        .bind(pessoa.sexo().as_str())
        .bind(pessoa.altura())
        .bind(pessoa.peso())
        .bind(pessoa.cpf())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(PessoaError::NotFound(pessoa.cpf().to_string()));
        }

        debug!("Pessoa alterada: CPF {}", pessoa.cpf());
        self.get_by_cpf(pessoa.cpf()).await
    }

    async fn delete(&self, cpf: &str) -> Result<(), PessoaError> {
        let cpf = lookup_key(cpf)?;
        let result = sqlx::query("DELETE FROM pessoa_pessoa WHERE cpf = ?")
            .bind(&cpf)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PessoaError::NotFound(cpf));
        }

        info!("Pessoa excluída: CPF {}", cpf);
        Ok(())
    }

    async fn get_by_cpf(&self, cpf: &str) -> Result<Pessoa, PessoaError> {
        let cpf = lookup_key(cpf)?;
        self.fetch(&cpf).await?.ok_or(PessoaError::NotFound(cpf))
    }

    async fn list_all(&self) -> Result<Vec<Pessoa>, PessoaError> {
        let pessoas = sqlx::query_as::<_, Pessoa>(&format!("{} ORDER BY nome, id", SELECT_PESSOA))
            .fetch_all(&self.pool)
            .await?;
        debug!("{} pessoas carregadas", pessoas.len());
        Ok(pessoas)
    }
}
