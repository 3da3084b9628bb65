//! Tradução dos erros do cadastro em respostas HTTP

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pessoa_db::PessoaError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Pessoa(#[from] PessoaError),

    /// Corpo que nem chega a ser um candidato (JSON malformado ou de outro tipo)
    #[error(transparent)]
    Corpo(#[from] JsonRejection),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = match self {
            ApiError::Pessoa(error) => error,
            ApiError::Corpo(rejection) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "non_field_errors": [rejection.body_text()] })),
                )
                    .into_response()
            }
        };

        match error {
            PessoaError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(errors.por_campo())).into_response()
            }
            PessoaError::Calculation(e) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() }))).into_response()
            }
            PessoaError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Pessoa não encontrada" })),
            )
                .into_response(),
            PessoaError::Conflict(_) => (
                StatusCode::CONFLICT,
                Json(json!({ "cpf": ["CPF já cadastrado."] })),
            )
                .into_response(),
            PessoaError::Database(e) => {
                error!("Erro de banco de dados: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Erro interno" })),
                )
                    .into_response()
            }
        }
    }
}
