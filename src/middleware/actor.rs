// src/middleware/actor.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::common::error::AppError;

// Cabeçalhos preenchidos pelo gateway de autenticação depois de validar as credenciais
pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Quem está executando a operação (funcionário do salão/caixa).
/// O papel é apenas informativo aqui: autorização por rota fica no gateway.
#[derive(Debug, Clone)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: Option<String>,
}

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::parse_str(value.trim()).ok())
            .ok_or(AppError::MissingActor)?;

        let role = parts
            .headers
            .get(USER_ROLE_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        Ok(Actor { user_id, role })
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn parts_with(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/api/orders");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn reads_user_and_trimmed_role() {
        let id = Uuid::new_v4();
        let mut parts = parts_with(&[(USER_ID_HEADER, &id.to_string()), (USER_ROLE_HEADER, "  cashier ")]);

        let actor = Actor::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(actor.user_id, id);
        assert_eq!(actor.role.as_deref(), Some("cashier"));
    }

    #[tokio::test]
    async fn blank_role_is_absent_and_missing_user_is_rejected() {
        let id = Uuid::new_v4().to_string();
        let mut parts = parts_with(&[(USER_ID_HEADER, &id), (USER_ROLE_HEADER, "   ")]);
        assert!(Actor::from_request_parts(&mut parts, &()).await.unwrap().role.is_none());

        let mut parts = parts_with(&[(USER_ROLE_HEADER, "waiter")]);
        let err = Actor::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(err.code(), "auth_required");
    }
}
