//! Definições de erro para a biblioteca pessoa-db
//!
//! Este módulo define os tipos de erro usados pela biblioteca. Nenhuma
//! função do núcleo registra ou descarta erros: todos são devolvidos ao
//! chamador, que decide como apresentá-los.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::validation::formatar_cpf;

/// Violação de uma regra de validação do cadastro de pessoa
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Nome é obrigatório")]
    NomeObrigatorio,

    #[error("Nome deve ter no máximo 100 caracteres")]
    NomeMuitoLongo,

    #[error("CPF é obrigatório")]
    CpfObrigatorio,

    #[error("CPF deve conter 11 dígitos, com ou sem pontos e traço")]
    CpfInvalido,

    #[error("Data de nascimento é obrigatória")]
    DataNascObrigatoria,

    #[error("Data em formato inválido. Use o formato YYYY-MM-DD.")]
    DataNascInvalida,

    #[error("Data de nascimento não pode estar no futuro")]
    DataNascFutura,

    #[error("Sexo é obrigatório")]
    SexoObrigatorio,

    #[error("Sexo deve ser 'M' ou 'F'")]
    SexoInvalido,

    #[error("Altura é obrigatória")]
    AlturaObrigatoria,

    #[error("Altura deve ser um número")]
    AlturaNaoNumerica,

    #[error("Altura deve estar entre 0.5 e 2.5 metros")]
    AlturaForaDoIntervalo,

    #[error("Peso é obrigatório")]
    PesoObrigatorio,

    #[error("Peso deve ser um número")]
    PesoNaoNumerico,

    #[error("Peso deve estar entre 20 e 300 kg")]
    PesoForaDoIntervalo,
}

/// Campos do cadastro, na ordem em que as violações são relatadas
const CAMPOS: [&str; 6] = ["nome", "cpf", "data_nasc", "sexo", "altura", "peso"];

const REGRAS: [ValidationError; 15] = [
    ValidationError::NomeObrigatorio,
    ValidationError::NomeMuitoLongo,
    ValidationError::CpfObrigatorio,
    ValidationError::CpfInvalido,
    ValidationError::DataNascObrigatoria,
    ValidationError::DataNascInvalida,
    ValidationError::DataNascFutura,
    ValidationError::SexoObrigatorio,
    ValidationError::SexoInvalido,
    ValidationError::AlturaObrigatoria,
    ValidationError::AlturaNaoNumerica,
    ValidationError::AlturaForaDoIntervalo,
    ValidationError::PesoObrigatorio,
    ValidationError::PesoNaoNumerico,
    ValidationError::PesoForaDoIntervalo,
];

impl ValidationError {
    /// Campo do cadastro ao qual a regra se refere
    pub fn campo(&self) -> &'static str {
        match self {
            ValidationError::NomeObrigatorio | ValidationError::NomeMuitoLongo => "nome",
            ValidationError::CpfObrigatorio | ValidationError::CpfInvalido => "cpf",
            ValidationError::DataNascObrigatoria
            | ValidationError::DataNascInvalida
            | ValidationError::DataNascFutura => "data_nasc",
            ValidationError::SexoObrigatorio | ValidationError::SexoInvalido => "sexo",
            ValidationError::AlturaObrigatoria
            | ValidationError::AlturaNaoNumerica
            | ValidationError::AlturaForaDoIntervalo => "altura",
            ValidationError::PesoObrigatorio
            | ValidationError::PesoNaoNumerico
            | ValidationError::PesoForaDoIntervalo => "peso",
        }
    }

    /// Código da regra nos erros do `validator`
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::NomeObrigatorio => "nome_obrigatorio",
            ValidationError::NomeMuitoLongo => "nome_muito_longo",
            ValidationError::CpfObrigatorio => "cpf_obrigatorio",
            ValidationError::CpfInvalido => "cpf_invalido",
            ValidationError::DataNascObrigatoria => "data_nasc_obrigatoria",
            ValidationError::DataNascInvalida => "data_nasc_invalida",
            ValidationError::DataNascFutura => "data_nasc_futura",
            ValidationError::SexoObrigatorio => "sexo_obrigatorio",
            ValidationError::SexoInvalido => "sexo_invalido",
            ValidationError::AlturaObrigatoria => "altura_obrigatoria",
            ValidationError::AlturaNaoNumerica => "altura_nao_numerica",
            ValidationError::AlturaForaDoIntervalo => "altura_fora_do_intervalo",
            ValidationError::PesoObrigatorio => "peso_obrigatorio",
            ValidationError::PesoNaoNumerico => "peso_nao_numerico",
            ValidationError::PesoForaDoIntervalo => "peso_fora_do_intervalo",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        REGRAS.into_iter().find(|regra| regra.code() == code)
    }
}

impl From<ValidationError> for validator::ValidationError {
    fn from(error: ValidationError) -> Self {
        let mut regra = validator::ValidationError::new(error.code());
        regra.message = Some(error.to_string().into());
        regra
    }
}

/// Conjunto (nunca vazio) de regras violadas por um candidato
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub(crate) fn new(errors: Vec<ValidationError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self(errors))
        }
    }

    pub fn as_slice(&self) -> &[ValidationError] {
        &self.0
    }

    pub fn contains(&self, error: ValidationError) -> bool {
        self.0.contains(&error)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Agrupa as mensagens por campo, no formato `{campo: [mensagens]}`
    pub fn por_campo(&self) -> BTreeMap<&'static str, Vec<String>> {
        let mut campos: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();
        for error in &self.0 {
            campos.entry(error.campo()).or_default().push(error.to_string());
        }
        campos
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self(vec![error])
    }
}

/// Converte o relatório do `validator`, campo a campo, na ordem do cadastro
impl From<validator::ValidationErrors> for ValidationErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let por_campo = errors.field_errors();
        let errors = CAMPOS
            .iter()
            .filter_map(|campo| por_campo.get(campo))
            .flat_map(|regras| regras.iter())
            .filter_map(|regra| ValidationError::from_code(&regra.code))
            .collect();
        Self(errors)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mensagens: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", mensagens.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Erros do cálculo de peso ideal
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalculationError {
    #[error("Entrada inválida para o cálculo de peso ideal: {0}")]
    InvalidInput(String),
}

/// Erros específicos para operações de banco de dados
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Erro de conexão com banco de dados: {0}")]
    ConnectionError(String),

    #[error("Erro de consulta: {0}")]
    QueryError(String),

    #[error("Entidade não encontrada: {0}")]
    NotFound(String),

    #[error("Violação de restrição: {0}")]
    ConstraintViolation(String),

    #[error("Erro interno: {0}")]
    InternalError(String),
}

/// Conversão de erros específicos do SQLx para nossos tipos de erro
impl From<sqlx::Error> for DbError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => DbError::NotFound("Registro não encontrado".to_string()),
            sqlx::Error::Database(dbe) => {
                if dbe.is_unique_violation() {
                    return DbError::ConstraintViolation(dbe.message().to_string());
                }
                if let Some(code) = dbe.code() {
                    if code.as_ref() == "23000" || code.as_ref() == "2067" {
                        return DbError::ConstraintViolation(dbe.message().to_string());
                    }
                }
                DbError::QueryError(dbe.message().to_string())
            }
            sqlx::Error::ColumnNotFound(col) => {
                DbError::QueryError(format!("Coluna não encontrada: {}", col))
            }
            sqlx::Error::TypeNotFound { type_name } => {
                DbError::QueryError(format!("Tipo não encontrado: {}", type_name))
            }
            sqlx::Error::ColumnDecode { index, source } => {
                DbError::QueryError(format!("Erro ao decodificar coluna {}: {}", index, source))
            }
            sqlx::Error::Io(io_err) => DbError::ConnectionError(io_err.to_string()),
            sqlx::Error::Configuration(conf_err) => DbError::ConnectionError(conf_err.to_string()),
            sqlx::Error::PoolClosed => {
                DbError::ConnectionError("Pool de conexões fechado".to_string())
            }
            sqlx::Error::PoolTimedOut => {
                DbError::ConnectionError("Timeout no pool de conexões".to_string())
            }
            sqlx::Error::WorkerCrashed => {
                DbError::InternalError("Worker do banco de dados falhou".to_string())
            }
            _ => DbError::InternalError(format!("Erro inesperado: {:?}", error)),
        }
    }
}

/// Erros das operações sobre o cadastro de pessoas
#[derive(Error, Debug)]
pub enum PessoaError {
    #[error("Dados inválidos: {0}")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Calculation(#[from] CalculationError),

    #[error("Pessoa não encontrada: CPF {}", formatar_cpf(.0))]
    NotFound(String),

    #[error("CPF já cadastrado: {}", formatar_cpf(.0))]
    Conflict(String),

    #[error(transparent)]
    Database(#[from] DbError),
}

impl From<sqlx::Error> for PessoaError {
    fn from(error: sqlx::Error) -> Self {
        PessoaError::Database(error.into())
    }
}
