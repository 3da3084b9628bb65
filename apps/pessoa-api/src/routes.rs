//! Rotas do serviço
//!
//! ```text
//! POST   /api/pessoa/incluir/          → 201 Pessoa
//! PUT    /api/pessoa/alterar/:cpf/     → 200 Pessoa
//! DELETE /api/pessoa/excluir/:cpf/     → 204
//! GET    /api/pessoa/pesquisar/:cpf/   → 200 Pessoa
//! GET    /api/pessoa/pesquisar/        → 200 [Pessoa] (filtro opcional na query)
//! GET    /api/pessoa/detalhes/:cpf/    → 200 Pessoa com peso ideal
//! GET    /api/pessoa/peso-ideal/:cpf/  → 200 PesoIdeal
//! POST   /api/pessoa/peso-ideal/       → 200 PesoIdeal (sexo + altura)
//! ```

use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;
use pessoa_db::{PessoaService, PessoaStore};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;

pub fn create_router<S: PessoaStore + 'static>(
    service: PessoaService<S>,
    max_concurrent_requests: usize,
) -> Router {
    Router::new()
        .route("/api/pessoa/incluir/", post(handlers::incluir::<S>))
        .route("/api/pessoa/alterar/:cpf/", put(handlers::alterar::<S>))
        .route("/api/pessoa/excluir/:cpf/", delete(handlers::excluir::<S>))
        .route("/api/pessoa/pesquisar/", get(handlers::pesquisar::<S>))
        .route(
            "/api/pessoa/pesquisar/:cpf/",
            get(handlers::pesquisar_por_cpf::<S>),
        )
        .route(
            "/api/pessoa/detalhes/:cpf/",
            get(handlers::detalhar::<S>),
        )
        .route("/api/pessoa/peso-ideal/", post(handlers::peso_ideal_avulso::<S>))
        .route(
            "/api/pessoa/peso-ideal/:cpf/",
            get(handlers::peso_ideal_por_cpf::<S>),
        )
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(ConcurrencyLimitLayer::new(max_concurrent_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(service))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use pessoa_db::memory::InMemoryPessoaStore;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        create_router(PessoaService::new(InMemoryPessoaStore::new()), 8)
    }

    fn joao() -> Value {
        json!({
            "nome": "João Silva",
            "cpf": "123.456.789-00",
            "data_nasc": "1990-01-01",
            "sexo": "M",
            "altura": 1.75,
            "peso": 70.0
        })
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    #[tokio::test]
    async fn test_incluir_e_pesquisar() {
        let app = app();

        let (status, criada) = send(&app, "POST", "/api/pessoa/incluir/", Some(joao())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(criada["cpf"], "12345678900");
        assert!(criada["id"].is_i64());

        let (status, lida) = send(&app, "GET", "/api/pessoa/pesquisar/12345678900/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(lida, criada);
    }

    #[tokio::test]
    async fn test_incluir_invalido_lista_campos() {
        let app = app();
        let mut body = joao();
        body.as_object_mut().unwrap().remove("nome");
        body["data_nasc"] = json!("01-01-1990");

        let (status, erros) = send(&app, "POST", "/api/pessoa/incluir/", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(erros.get("nome").is_some());
        assert!(erros.get("data_nasc").is_some());
        assert!(erros.get("peso").is_none());
    }

    #[tokio::test]
    async fn test_altura_nao_numerica_junto_com_outras_violacoes() {
        let app = app();
        let mut body = joao();
        body["nome"] = json!("");
        body["cpf"] = json!("123");
        body["altura"] = json!("abc");

        let (status, erros) = send(&app, "POST", "/api/pessoa/incluir/", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(erros["altura"], json!(["Altura deve ser um número"]));
        assert!(erros.get("nome").is_some());
        assert!(erros.get("cpf").is_some());
        assert!(erros.get("peso").is_none());
    }

    #[tokio::test]
    async fn test_json_malformado_vira_400() {
        let app = app();
        let request = Request::builder()
            .method("POST")
            .uri("/api/pessoa/incluir/")
            .header("content-type", "application/json")
            .body(Body::from("{\"nome\": "))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["non_field_errors"].is_array());
    }

    #[tokio::test]
    async fn test_cpf_duplicado() {
        let app = app();
        send(&app, "POST", "/api/pessoa/incluir/", Some(joao())).await;
        let (status, body) = send(&app, "POST", "/api/pessoa/incluir/", Some(joao())).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body.get("cpf").is_some());
    }

    #[tokio::test]
    async fn test_alterar() {
        let app = app();
        send(&app, "POST", "/api/pessoa/incluir/", Some(joao())).await;

        let mut body = joao();
        body["nome"] = json!("João Silva Atualizado");
        let (status, alterada) =
            send(&app, "PUT", "/api/pessoa/alterar/12345678900/", Some(body.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(alterada["nome"], "João Silva Atualizado");

        let (status, _) = send(&app, "PUT", "/api/pessoa/alterar/00000000000/", Some(body)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_excluir() {
        let app = app();
        send(&app, "POST", "/api/pessoa/incluir/", Some(joao())).await;

        let (status, _) = send(&app, "DELETE", "/api/pessoa/excluir/12345678900/", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, "DELETE", "/api/pessoa/excluir/12345678900/", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_pesquisar_com_filtro() {
        let app = app();
        send(&app, "POST", "/api/pessoa/incluir/", Some(joao())).await;
        let mut maria = joao();
        maria["nome"] = json!("Maria Santos");
        maria["cpf"] = json!("98765432100");
        maria["sexo"] = json!("F");
        send(&app, "POST", "/api/pessoa/incluir/", Some(maria)).await;

        let (status, todas) = send(&app, "GET", "/api/pessoa/pesquisar/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(todas.as_array().unwrap().len(), 2);

        let (_, filtradas) = send(&app, "GET", "/api/pessoa/pesquisar/?nome=mar", None).await;
        let filtradas = filtradas.as_array().unwrap();
        assert_eq!(filtradas.len(), 1);
        assert_eq!(filtradas[0]["nome"], "Maria Santos");
    }

    #[tokio::test]
    async fn test_peso_ideal() {
        let app = app();
        send(&app, "POST", "/api/pessoa/incluir/", Some(joao())).await;

        let (status, body) = send(&app, "GET", "/api/pessoa/peso-ideal/12345678900/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!((body["peso_ideal"].as_f64().unwrap() - 70.7).abs() < 1e-9);
        assert_eq!(body["status_peso"], "adequado");
        assert_eq!(body["status"], "Peso adequado");

        let (status, _) = send(&app, "GET", "/api/pessoa/peso-ideal/00000000000/", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_detalhes() {
        let app = app();
        send(&app, "POST", "/api/pessoa/incluir/", Some(joao())).await;

        let (status, body) = send(&app, "GET", "/api/pessoa/detalhes/123.456.789-00/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["nome"], "João Silva");
        assert_eq!(body["status_peso"], "adequado");

        let (status, body) = send(&app, "GET", "/api/pessoa/detalhes/00000000000/", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Pessoa não encontrada");
    }

    #[tokio::test]
    async fn test_peso_ideal_avulso() {
        let app = app();

        let (status, body) = send(
            &app,
            "POST",
            "/api/pessoa/peso-ideal/",
            Some(json!({ "sexo": "F", "altura": 1.52 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["peso_ideal"], 45.5);
        assert!(body.get("status_peso").is_none());

        let (status, _) = send(
            &app,
            "POST",
            "/api/pessoa/peso-ideal/",
            Some(json!({ "sexo": "X", "altura": 1.52 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
