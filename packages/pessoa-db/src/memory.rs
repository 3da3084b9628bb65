//! Armazenamento em memória, para testes
//!
//! Segue o mesmo contrato de [`crate::store::SqlitePessoaStore`], inclusive a
//! ordenação por nome na listagem.

use std::sync::Mutex;

use crate::error::{DbError, PessoaError};
use crate::models::{Pessoa, PessoaValidada};
use crate::store::{lookup_key, PessoaStore};

#[derive(Debug, Default)]
struct Registros {
    pessoas: Vec<Pessoa>,
    proximo_id: i64,
}

#[derive(Debug, Default)]
pub struct InMemoryPessoaStore {
    registros: Mutex<Registros>,
}

impl InMemoryPessoaStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_registros<T>(
        &self,
        f: impl FnOnce(&mut Registros) -> Result<T, PessoaError>,
    ) -> Result<T, PessoaError> {
        let mut registros = self
            .registros
            .lock()
            .map_err(|_| DbError::InternalError("Lock do armazenamento envenenado".to_string()))?;
        f(&mut registros)
    }
}

impl PessoaStore for InMemoryPessoaStore {
    async fn create(&self, pessoa: &PessoaValidada) -> Result<Pessoa, PessoaError> {
        self.with_registros(|r| {
            if r.pessoas.iter().any(|p| p.cpf == pessoa.cpf()) {
                return Err(PessoaError::Conflict(pessoa.cpf().to_string()));
            }
            r.proximo_id += 1;
            let criada = Pessoa {
                id: Some(r.proximo_id),
                ..pessoa.clone().into_pessoa()
            };
            r.pessoas.push(criada.clone());
            Ok(criada)
        })
    }

    async fn update(&self, pessoa: &PessoaValidada) -> Result<Pessoa, PessoaError> {
        self.with_registros(|r| {
            let atual = r
                .pessoas
                .iter_mut()
                .find(|p| p.cpf == pessoa.cpf())
                .ok_or_else(|| PessoaError::NotFound(pessoa.cpf().to_string()))?;
            *atual = Pessoa {
                id: atual.id,
                ..pessoa.clone().into_pessoa()
            };
            Ok(atual.clone())
        })
    }

    async fn delete(&self, cpf: &str) -> Result<(), PessoaError> {
        let cpf = lookup_key(cpf)?;
        self.with_registros(|r| {
            let antes = r.pessoas.len();
            r.pessoas.retain(|p| p.cpf != cpf);
            if r.pessoas.len() == antes {
                return Err(PessoaError::NotFound(cpf));
            }
            Ok(())
        })
    }

    async fn get_by_cpf(&self, cpf: &str) -> Result<Pessoa, PessoaError> {
        let cpf = lookup_key(cpf)?;
        self.with_registros(|r| {
            r.pessoas
                .iter()
                .find(|p| p.cpf == cpf)
                .cloned()
                .ok_or(PessoaError::NotFound(cpf))
        })
    }

    async fn list_all(&self) -> Result<Vec<Pessoa>, PessoaError> {
        self.with_registros(|r| {
            let mut pessoas = r.pessoas.clone();
            pessoas.sort_by(|a, b| a.nome.cmp(&b.nome).then(a.id.cmp(&b.id)));
            Ok(pessoas)
        })
    }
}
