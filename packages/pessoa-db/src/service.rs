//! Serviço do cadastro de pessoas
//!
//! Orquestra validação, armazenamento, pesquisa e peso ideal. O
//! armazenamento é injetado na construção; não há instância global.

use tracing::debug;

use crate::error::PessoaError;
use crate::filter::filter;
use crate::models::{FiltroPessoa, Pessoa, PessoaInput, PesoIdeal, PesoIdealRequest};
use crate::peso_ideal;
use crate::store::PessoaStore;
use crate::validation::validate;

#[derive(Debug, Clone)]
pub struct PessoaService<S> {
    store: S,
}

impl<S: PessoaStore> PessoaService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Valida e inclui uma nova pessoa
    pub async fn incluir(&self, input: PessoaInput) -> Result<Pessoa, PessoaError> {
        let pessoa = validate(&input)?;
        self.store.create(&pessoa).await
    }

    /// Valida e altera a pessoa identificada por `cpf`
    ///
    /// O CPF do caminho prevalece sobre o do corpo. O registro devolvido não
    /// traz campos derivados de cálculos anteriores.
    pub async fn alterar(&self, cpf: &str, input: PessoaInput) -> Result<Pessoa, PessoaError> {
        let input = PessoaInput {
            cpf: Some(cpf.to_string()),
            ..input
        };
        let pessoa = validate(&input)?;
        let alterada = self.store.update(&pessoa).await?;
        Ok(alterada.sem_derivados())
    }

    pub async fn excluir(&self, cpf: &str) -> Result<(), PessoaError> {
        self.store.delete(cpf).await
    }

    pub async fn pesquisar_por_cpf(&self, cpf: &str) -> Result<Pessoa, PessoaError> {
        self.store.get_by_cpf(cpf).await
    }

    pub async fn listar_todos(&self) -> Result<Vec<Pessoa>, PessoaError> {
        self.store.list_all().await
    }

    /// Carrega o cadastro e aplica o filtro em memória
    pub async fn pesquisar(&self, filtro: &FiltroPessoa) -> Result<Vec<Pessoa>, PessoaError> {
        let pessoas = self.store.list_all().await?;
        if filtro.is_empty() {
            return Ok(pessoas);
        }

        let encontradas = filter(&pessoas, filtro);
        debug!(
            "Pesquisa: {} de {} pessoas atendem ao filtro",
            encontradas.len(),
            pessoas.len()
        );
        Ok(encontradas)
    }

    /// Calcula o peso ideal da pessoa cadastrada com o CPF informado
    pub async fn calcular_peso_ideal(&self, cpf: &str) -> Result<PesoIdeal, PessoaError> {
        let pessoa = self.store.get_by_cpf(cpf).await?;
        Ok(peso_ideal::assess(&pessoa)?)
    }

    /// Acrescenta à pessoa os campos derivados do peso ideal
    pub fn avaliar(&self, pessoa: Pessoa) -> Result<Pessoa, PessoaError> {
        Ok(peso_ideal::enrich(pessoa)?)
    }

    /// Pessoa cadastrada já avaliada, para a tela de detalhes
    pub async fn detalhar(&self, cpf: &str) -> Result<Pessoa, PessoaError> {
        let pessoa = self.store.get_by_cpf(cpf).await?;
        self.avaliar(pessoa)
    }

    /// Peso ideal a partir de sexo e altura, sem consultar o cadastro
    pub fn calcular_peso_ideal_avulso(
        &self,
        request: &PesoIdealRequest,
    ) -> Result<PesoIdeal, PessoaError> {
        Ok(peso_ideal::evaluate_request(request)?)
    }
}
