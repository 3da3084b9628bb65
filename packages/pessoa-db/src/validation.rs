//! Validação de candidatos a cadastro
//!
//! As regras ficam declaradas em [`PessoaInput`] com o derive do
//! `validator`; este módulo fornece as regras personalizadas e converte o
//! candidato em [`PessoaValidada`], relatando todas as violações de uma vez.

use std::ops::RangeInclusive;

use chrono::{NaiveDate, Utc};
use serde_json::Value;
use validator::ValidateArgs;

use crate::error::{ValidationError, ValidationErrors};
use crate::models::{PessoaInput, PessoaValidada, Sexo};

pub const ALTURA_RANGE: RangeInclusive<f64> = 0.5..=2.5;
pub const PESO_RANGE: RangeInclusive<f64> = 20.0..=300.0;

const CPF_DIGITOS: usize = 11;

/// Valida o candidato usando a data corrente (UTC) como referência
pub fn validate(candidate: &PessoaInput) -> Result<PessoaValidada, ValidationErrors> {
    validate_at(candidate, Utc::now().date_naive())
}

/// Valida o candidato considerando `today` como a data corrente
pub fn validate_at(
    candidate: &PessoaInput,
    today: NaiveDate,
) -> Result<PessoaValidada, ValidationErrors> {
    candidate.validate_args(&today)?;

    Ok(PessoaValidada {
        nome: ler_nome(candidate.nome.as_deref().ok_or(ValidationError::NomeObrigatorio)?)?,
        cpf: ler_cpf(candidate.cpf.as_deref().ok_or(ValidationError::CpfObrigatorio)?)?,
        data_nasc: ler_data_nasc(
            candidate
                .data_nasc
                .as_deref()
                .ok_or(ValidationError::DataNascObrigatoria)?,
            today,
        )?,
        sexo: ler_sexo(candidate.sexo.as_deref().ok_or(ValidationError::SexoObrigatorio)?)?,
        altura: ler_altura(candidate.altura.as_ref().ok_or(ValidationError::AlturaObrigatoria)?)?,
        peso: ler_peso(candidate.peso.as_ref().ok_or(ValidationError::PesoObrigatorio)?)?,
    })
}

pub(crate) fn validar_nome(nome: &str) -> Result<(), validator::ValidationError> {
    regra(ler_nome(nome))
}

pub(crate) fn validar_cpf(cpf: &str) -> Result<(), validator::ValidationError> {
    regra(ler_cpf(cpf))
}

pub(crate) fn validar_data_nasc(
    data: &str,
    today: &NaiveDate,
) -> Result<(), validator::ValidationError> {
    regra(ler_data_nasc(data, *today))
}

pub(crate) fn validar_sexo(sexo: &str) -> Result<(), validator::ValidationError> {
    regra(ler_sexo(sexo))
}

pub(crate) fn validar_altura(altura: &Value) -> Result<(), validator::ValidationError> {
    regra(ler_altura(altura))
}

pub(crate) fn validar_peso(peso: &Value) -> Result<(), validator::ValidationError> {
    regra(ler_peso(peso))
}

fn regra<T>(resultado: Result<T, ValidationError>) -> Result<(), validator::ValidationError> {
    resultado.map(|_| ()).map_err(Into::into)
}

/// O limite de tamanho é verificado pelo derive; aqui só o nome em branco
fn ler_nome(nome: &str) -> Result<String, ValidationError> {
    let nome = nome.trim();
    if nome.is_empty() {
        return Err(ValidationError::NomeObrigatorio);
    }
    Ok(nome.to_string())
}

fn ler_cpf(cpf: &str) -> Result<String, ValidationError> {
    if cpf.trim().is_empty() {
        return Err(ValidationError::CpfObrigatorio);
    }
    normalize_cpf(cpf).ok_or(ValidationError::CpfInvalido)
}

fn ler_data_nasc(data: &str, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    let data = data.trim();
    if data.is_empty() {
        return Err(ValidationError::DataNascObrigatoria);
    }
    match NaiveDate::parse_from_str(data, "%Y-%m-%d") {
        Ok(data) if data > today => Err(ValidationError::DataNascFutura),
        Ok(data) => Ok(data),
        Err(_) => Err(ValidationError::DataNascInvalida),
    }
}

fn ler_sexo(sexo: &str) -> Result<Sexo, ValidationError> {
    if sexo.trim().is_empty() {
        return Err(ValidationError::SexoObrigatorio);
    }
    sexo.parse().map_err(|_| ValidationError::SexoInvalido)
}

fn ler_altura(altura: &Value) -> Result<f64, ValidationError> {
    let altura = numero(altura).ok_or(ValidationError::AlturaNaoNumerica)?;
    if !ALTURA_RANGE.contains(&altura) {
        return Err(ValidationError::AlturaForaDoIntervalo);
    }
    Ok(altura)
}

fn ler_peso(peso: &Value) -> Result<f64, ValidationError> {
    let peso = numero(peso).ok_or(ValidationError::PesoNaoNumerico)?;
    if !PESO_RANGE.contains(&peso) {
        return Err(ValidationError::PesoForaDoIntervalo);
    }
    Ok(peso)
}

/// Números JSON e textos numéricos (`"1.75"`) são aceitos
fn numero(valor: &Value) -> Option<f64> {
    let numero = match valor {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    numero.is_finite().then_some(numero)
}

/// Normaliza um CPF para 11 dígitos
///
/// Aceita a forma crua (`12345678900`) e a formatada (`123.456.789-00`).
/// Retorna `None` para qualquer outro caractere ou quantidade de dígitos.
pub fn normalize_cpf(cpf: &str) -> Option<String> {
    let mut digitos = String::with_capacity(CPF_DIGITOS);
    for c in cpf.trim().chars() {
        match c {
            '0'..='9' => digitos.push(c),
            '.' | '-' | ' ' => {}
            _ => return None,
        }
    }
    (digitos.len() == CPF_DIGITOS).then_some(digitos)
}

/// Formata um CPF como `###.###.###-##`; valores malformados voltam como vieram
pub fn formatar_cpf(cpf: &str) -> String {
    match normalize_cpf(cpf) {
        Some(d) => format!("{}.{}.{}-{}", &d[0..3], &d[3..6], &d[6..9], &d[9..11]),
        None => cpf.to_string(),
    }
}
