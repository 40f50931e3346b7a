use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::{common::messages, middleware::i18n::Locale};

// Nosso tipo de erro, agora com `thiserror` para melhor ergonomia.
// Os `&'static str` são códigos estáveis (ex.: "order_terminal") que o cliente pode tratar.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Entrada inválida: {0}")]
    InvalidInput(&'static str),

    #[error("Usuário não identificado")]
    MissingActor,

    #[error("Recurso não encontrado: {0}")]
    NotFound(&'static str),

    #[error("Operação em conflito com o estado atual: {0}")]
    Conflict(&'static str),

    // Variante para erros de banco de dados (StoreError)
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

/// Erro já "renderizado" para a resposta HTTP (status + mensagem traduzida).
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: String,
    pub error: String,
    pub details: Option<serde_json::Value>,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::MissingActor => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "validation_failed",
            AppError::InvalidInput(code) | AppError::NotFound(code) | AppError::Conflict(code) => *code,
            AppError::MissingActor => "auth_required",
            AppError::DatabaseError(_) => "store_error",
            AppError::InternalServerError(_) => "internal_error",
        }
    }

    pub fn to_api_error(&self, locale: &Locale) -> ApiError {
        let status = self.status_code();
        let code = self.code();

        if status.is_server_error() {
            // O `tracing` loga a mensagem detalhada; o cliente recebe só a genérica.
            tracing::error!(error = %self, "Erro Interno do Servidor");
        }

        let details = match self {
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), json!(messages));
                }
                Some(serde_json::Value::Object(details))
            }
            _ => None,
        };

        ApiError {
            status,
            code: code.to_string(),
            error: messages::translate(code, locale).to_string(),
            details,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({ "error": self.error, "code": self.code });
        if let Some(details) = self.details {
            body["details"] = details;
        }
        (self.status, Json(body)).into_response()
    }
}

// Usado quando não há `Locale` à mão (ex.: rejeição de extratores).
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default()).into_response()
    }
}
