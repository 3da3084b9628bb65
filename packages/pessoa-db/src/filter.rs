//! Pesquisa em memória sobre pessoas já carregadas
//!
//! Sem índice: cada chamada percorre a lista inteira, preservando a ordem.

use crate::models::{FiltroPessoa, Pessoa};

impl FiltroPessoa {
    /// Indica se a pessoa atende a todos os campos presentes do filtro
    ///
    /// Nome e CPF em branco contam como ausentes; um nome preenchido é
    /// comparado como veio, espaços inclusive. Separadores do CPF informado
    /// são descartados antes da comparação.
    pub fn matches(&self, pessoa: &Pessoa) -> bool {
        let nome_ok = match self.nome.as_deref() {
            None => true,
            Some(nome) if nome.trim().is_empty() => true,
            Some(nome) => pessoa
                .nome
                .to_lowercase()
                .contains(&nome.to_lowercase()),
        };

        let cpf_ok = match self.cpf.as_deref().map(sem_separadores) {
            None => true,
            Some(cpf) if cpf.is_empty() => true,
            Some(cpf) => pessoa.cpf.contains(&cpf),
        };

        let altura_ok = self.altura.map_or(true, |altura| pessoa.altura == altura);
        let peso_ok = self.peso.map_or(true, |peso| pessoa.peso == peso);

        nome_ok && cpf_ok && altura_ok && peso_ok
    }

    /// Indica se nenhum campo do filtro restringe o resultado
    pub fn is_empty(&self) -> bool {
        self.nome.as_deref().map_or(true, |n| n.trim().is_empty())
            && self.cpf.as_deref().map_or(true, |c| sem_separadores(c).is_empty())
            && self.altura.is_none()
            && self.peso.is_none()
    }
}

/// Devolve as pessoas que atendem ao filtro, na ordem original
pub fn filter(records: &[Pessoa], filtro: &FiltroPessoa) -> Vec<Pessoa> {
    records
        .iter()
        .filter(|pessoa| filtro.matches(pessoa))
        .cloned()
        .collect()
}

fn sem_separadores(cpf: &str) -> String {
    cpf.chars()
        .filter(|c| !matches!(c, '.' | '-' | ' '))
        .collect()
}
