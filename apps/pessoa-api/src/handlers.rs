//! Handlers HTTP do cadastro de pessoas
//!
//! Cada handler delega ao [`PessoaService`] compartilhado e converte
//! falhas em [`ApiError`].

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use pessoa_db::{
    FiltroPessoa, Pessoa, PessoaInput, PessoaService, PessoaStore, PesoIdeal, PesoIdealRequest,
};
use tracing::info;

use crate::error::ApiError;

pub type SharedService<S> = Arc<PessoaService<S>>;

/// Corpo JSON cuja rejeição vira resposta 400 em vez do 422 padrão
type Corpo<T> = Result<Json<T>, JsonRejection>;

pub async fn incluir<S: PessoaStore + 'static>(
    State(service): State<SharedService<S>>,
    corpo: Corpo<PessoaInput>,
) -> Result<(StatusCode, Json<Pessoa>), ApiError> {
    let Json(input) = corpo?;
    let pessoa = service.incluir(input).await?;
    Ok((StatusCode::CREATED, Json(pessoa)))
}

pub async fn alterar<S: PessoaStore + 'static>(
    State(service): State<SharedService<S>>,
    Path(cpf): Path<String>,
    corpo: Corpo<PessoaInput>,
) -> Result<Json<Pessoa>, ApiError> {
    let Json(input) = corpo?;
    Ok(Json(service.alterar(&cpf, input).await?))
}

pub async fn excluir<S: PessoaStore + 'static>(
    State(service): State<SharedService<S>>,
    Path(cpf): Path<String>,
) -> Result<StatusCode, ApiError> {
    service.excluir(&cpf).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn pesquisar_por_cpf<S: PessoaStore + 'static>(
    State(service): State<SharedService<S>>,
    Path(cpf): Path<String>,
) -> Result<Json<Pessoa>, ApiError> {
    Ok(Json(service.pesquisar_por_cpf(&cpf).await?))
}

/// Pessoa com peso ideal e classificação, como na tela de detalhes
pub async fn detalhar<S: PessoaStore + 'static>(
    State(service): State<SharedService<S>>,
    Path(cpf): Path<String>,
) -> Result<Json<Pessoa>, ApiError> {
    Ok(Json(service.detalhar(&cpf).await?))
}

/// Lista o cadastro; parâmetros de consulta opcionais filtram o resultado
pub async fn pesquisar<S: PessoaStore + 'static>(
    State(service): State<SharedService<S>>,
    Query(filtro): Query<FiltroPessoa>,
) -> Result<Json<Vec<Pessoa>>, ApiError> {
    let pessoas = service.pesquisar(&filtro).await?;
    info!("Encontradas {} pessoas", pessoas.len());
    Ok(Json(pessoas))
}

pub async fn peso_ideal_por_cpf<S: PessoaStore + 'static>(
    State(service): State<SharedService<S>>,
    Path(cpf): Path<String>,
) -> Result<Json<PesoIdeal>, ApiError> {
    Ok(Json(service.calcular_peso_ideal(&cpf).await?))
}

pub async fn peso_ideal_avulso<S: PessoaStore + 'static>(
    State(service): State<SharedService<S>>,
    corpo: Corpo<PesoIdealRequest>,
) -> Result<Json<PesoIdeal>, ApiError> {
    let Json(request) = corpo?;
    Ok(Json(service.calcular_peso_ideal_avulso(&request)?))
}
