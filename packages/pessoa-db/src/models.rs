//! Modelos de dados do cadastro de pessoas
//!
//! Este módulo define a entidade `Pessoa`, o candidato bruto recebido dos
//! chamadores (`PessoaInput`), o registro já validado (`PessoaValidada`) e
//! os tipos derivados do cálculo de peso ideal.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use validator::Validate;

use crate::validation::{
    validar_altura, validar_cpf, validar_data_nasc, validar_nome, validar_peso, validar_sexo,
};

/// Sexo biológico, usado pela fórmula de peso ideal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sexo {
    #[serde(rename = "M")]
    Masculino,
    #[serde(rename = "F")]
    Feminino,
}

impl Sexo {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sexo::Masculino => "M",
            Sexo::Feminino => "F",
        }
    }
}

impl std::fmt::Display for Sexo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Sexo {
    type Err = String;

    /// Aceita exatamente `M` ou `F`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "M" => Ok(Sexo::Masculino),
            "F" => Ok(Sexo::Feminino),
            _ => Err(format!("Valor de sexo inválido: {}", s)),
        }
    }
}

/// Situação do peso atual em relação ao peso ideal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusPeso {
    /// Dentro da faixa de ±10% do peso ideal
    Adequado,
    /// Acima de 110% do peso ideal
    Acima,
    /// Abaixo de 90% do peso ideal
    Abaixo,
}

impl StatusPeso {
    /// Mensagem legível que resume a classificação
    pub fn mensagem(&self) -> &'static str {
        match self {
            StatusPeso::Adequado => "Peso adequado",
            StatusPeso::Acima => "Acima do peso ideal",
            StatusPeso::Abaixo => "Abaixo do peso ideal",
        }
    }
}

impl std::fmt::Display for StatusPeso {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusPeso::Adequado => write!(f, "adequado"),
            StatusPeso::Acima => write!(f, "acima"),
            StatusPeso::Abaixo => write!(f, "abaixo"),
        }
    }
}

/// Pessoa cadastrada
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pessoa {
    /// Chave substituta atribuída pelo banco; ausente antes da primeira gravação
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Nome de exibição
    pub nome: String,
    /// CPF normalizado (11 dígitos), chave de negócio
    pub cpf: String,
    /// Data de nascimento
    pub data_nasc: NaiveDate,
    pub sexo: Sexo,
    /// Altura em metros
    pub altura: f64,
    /// Peso em quilogramas
    pub peso: f64,
    /// Peso ideal calculado (nunca persistido)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peso_ideal: Option<f64>,
    /// Mensagem do cálculo de peso ideal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_peso: Option<StatusPeso>,
}

impl Pessoa {
    /// Remove os campos derivados de um cálculo anterior
    pub fn sem_derivados(mut self) -> Self {
        self.peso_ideal = None;
        self.status = None;
        self.status_peso = None;
        self
    }
}

impl FromRow<'_, SqliteRow> for Pessoa {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        let sexo: String = row.try_get("sexo")?;
        let sexo = sexo.parse::<Sexo>().map_err(|e| sqlx::Error::ColumnDecode {
            index: String::from("sexo"),
            source: Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, e)),
        })?;

        Ok(Self {
            id: row.try_get("id")?,
            nome: row.try_get("nome")?,
            cpf: row.try_get("cpf")?,
            data_nasc: row.try_get("data_nasc")?,
            sexo,
            altura: row.try_get("altura")?,
            peso: row.try_get("peso")?,
            peso_ideal: None,
            status: None,
            status_peso: None,
        })
    }
}

/// Candidato bruto a cadastro, como recebido do chamador
///
/// Nenhum campo é confiável até passar por [`crate::validation::validate`].
/// Altura e peso chegam como qualquer valor JSON, para que um valor não
/// numérico seja relatado junto com as demais violações. Campos derivados
/// não fazem parte deste tipo.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct PessoaInput {
    #[serde(default)]
    #[validate(
        required(code = "nome_obrigatorio"),
        length(max = 100, code = "nome_muito_longo"),
        custom = "validar_nome"
    )]
    pub nome: Option<String>,
    #[serde(default)]
    #[validate(required(code = "cpf_obrigatorio"), custom = "validar_cpf")]
    pub cpf: Option<String>,
    /// Data no formato `YYYY-MM-DD`
    #[serde(default)]
    #[validate(
        required(code = "data_nasc_obrigatoria"),
        custom(function = "validar_data_nasc", arg = "&'v_a NaiveDate")
    )]
    pub data_nasc: Option<String>,
    #[serde(default)]
    #[validate(required(code = "sexo_obrigatorio"), custom = "validar_sexo")]
    pub sexo: Option<String>,
    /// Altura em metros
    #[serde(default)]
    #[validate(required(code = "altura_obrigatoria"), custom = "validar_altura")]
    pub altura: Option<Value>,
    /// Peso em quilogramas
    #[serde(default)]
    #[validate(required(code = "peso_obrigatorio"), custom = "validar_peso")]
    pub peso: Option<Value>,
}

/// Pessoa aceita pelo validador, pronta para inclusão ou alteração
///
/// Só pode ser construída por [`crate::validation::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct PessoaValidada {
    pub(crate) nome: String,
    pub(crate) cpf: String,
    pub(crate) data_nasc: NaiveDate,
    pub(crate) sexo: Sexo,
    pub(crate) altura: f64,
    pub(crate) peso: f64,
}

impl PessoaValidada {
    pub fn nome(&self) -> &str {
        &self.nome
    }

    /// CPF normalizado (11 dígitos)
    pub fn cpf(&self) -> &str {
        &self.cpf
    }

    pub fn data_nasc(&self) -> NaiveDate {
        self.data_nasc
    }

    pub fn sexo(&self) -> Sexo {
        self.sexo
    }

    pub fn altura(&self) -> f64 {
        self.altura
    }

    pub fn peso(&self) -> f64 {
        self.peso
    }

    /// Converte em `Pessoa` sem `id` e sem campos derivados
    pub fn into_pessoa(self) -> Pessoa {
        Pessoa {
            id: None,
            nome: self.nome,
            cpf: self.cpf,
            data_nasc: self.data_nasc,
            sexo: self.sexo,
            altura: self.altura,
            peso: self.peso,
            peso_ideal: None,
            status: None,
            status_peso: None,
        }
    }
}

/// Especificação parcial de filtro sobre pessoas já carregadas
///
/// Campos ausentes não restringem o resultado.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FiltroPessoa {
    /// Trecho do nome, sem diferenciar maiúsculas
    #[serde(default)]
    pub nome: Option<String>,
    /// Trecho do CPF
    #[serde(default)]
    pub cpf: Option<String>,
    /// Altura exata
    #[serde(default)]
    pub altura: Option<f64>,
    /// Peso exato
    #[serde(default)]
    pub peso: Option<f64>,
}

/// Resultado do cálculo de peso ideal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PesoIdeal {
    /// Peso ideal em kg, arredondado a duas casas
    pub peso_ideal: f64,
    /// Mensagem legível
    pub status: String,
    /// Classificação; ausente quando o peso atual não foi informado
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_peso: Option<StatusPeso>,
}

/// Pedido de cálculo de peso ideal sem pessoa cadastrada
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PesoIdealRequest {
    pub sexo: String,
    pub altura: f64,
    #[serde(default)]
    pub peso: Option<f64>,
}
