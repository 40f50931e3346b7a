use sqlx::PgConnection;

use crate::common::error::AppError;

// ---
// Helper de sessão: limites de espera por lock/statement
// ---
/// Aplicado em toda conexão nova da pool (`after_connect`), assim uma espera por
/// lock de linha de outro pedido nunca passa do `lock_timeout` configurado.
pub(crate) async fn apply_session_timeouts(
    conn: &mut PgConnection,
    lock_timeout_ms: u64,
    statement_timeout_ms: u64,
) -> Result<(), sqlx::Error> {
    // SET não aceita parâmetros; set_config(.., false) vale para a sessão inteira
    sqlx::query("SELECT set_config('lock_timeout', $1, false), set_config('statement_timeout', $2, false)")
        .bind(format!("{}ms", lock_timeout_ms))
        .bind(format!("{}ms", statement_timeout_ms))
        .execute(&mut *conn)
        .await?;
    Ok(())
}

// ---
// Tradução de violações de constraint para erros de domínio
// ---
/// Converte um erro do sqlx em `AppError`, trocando violações de constraint
/// conhecidas pelo erro de domínio correspondente.
pub(crate) fn map_constraint_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        // 22003 = numeric_value_out_of_range (valor não cabe em NUMERIC(12,2))
        if db_err.code().as_deref() == Some("22003") {
            return AppError::InvalidInput("amount_out_of_range");
        }
        let constraint = db_err.constraint().unwrap_or_default();
        if db_err.is_unique_violation() && constraint == "orders_order_number_key" {
            return AppError::Conflict("order_number_conflict");
        }
        if db_err.is_foreign_key_violation() {
            if constraint.contains("table_id") {
                return AppError::NotFound("table_not_found");
            }
            if constraint.contains("product_id") {
                return AppError::NotFound("product_unavailable");
            }
        }
    }
    e.into()
}

#[cfg(test)]
mod tests {
    use std::{borrow::Cow, error::Error as StdError, fmt};

    use sqlx::error::{DatabaseError, ErrorKind};

    use super::*;

    #[derive(Debug)]
    struct FakePgError {
        code: &'static str,
        constraint: Option<&'static str>,
        kind: ErrorKind,
    }

    impl fmt::Display for FakePgError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "pg error {}", self.code)
        }
    }

    impl StdError for FakePgError {}

    impl DatabaseError for FakePgError {
        fn message(&self) -> &str {
            "fake"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.code))
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn constraint(&self) -> Option<&str> {
            self.constraint
        }

        fn kind(&self) -> ErrorKind {
            match self.kind {
                ErrorKind::UniqueViolation => ErrorKind::UniqueViolation,
                ErrorKind::ForeignKeyViolation => ErrorKind::ForeignKeyViolation,
                _ => ErrorKind::Other,
            }
        }
    }

    fn pg_error(code: &'static str, constraint: Option<&'static str>, kind: ErrorKind) -> sqlx::Error {
        sqlx::Error::Database(Box::new(FakePgError { code, constraint, kind }))
    }

    #[test]
    fn numeric_overflow_becomes_a_client_error() {
        let err = map_constraint_error(pg_error("22003", None, ErrorKind::Other));
        assert_eq!(err.code(), "amount_out_of_range");
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn known_constraints_map_to_domain_errors() {
        let dup = pg_error("23505", Some("orders_order_number_key"), ErrorKind::UniqueViolation);
        assert_eq!(map_constraint_error(dup).code(), "order_number_conflict");

        let fk = pg_error("23503", Some("orders_table_id_fkey"), ErrorKind::ForeignKeyViolation);
        assert_eq!(map_constraint_error(fk).code(), "table_not_found");

        let other = pg_error("23514", Some("payments_amount_check"), ErrorKind::Other);
        assert_eq!(map_constraint_error(other).code(), "store_error");
    }
}
