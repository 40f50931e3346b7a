// src/db/table_repo.rs

use sqlx::{Executor, PgConnection, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::tables::{LocationOccupancyRow, DEFAULT_LOCATION},
};

// Subquery única que define "mesa ocupada": existe pedido dine_in não terminal nela
const ACTIVE_ORDER_EXISTS: &str = r#"
    EXISTS (
        SELECT 1 FROM orders o
        WHERE o.table_id = t.id
          AND o.order_type = 'dine_in'
          AND o.status NOT IN ('completed', 'cancelled')
    )
"#;

#[derive(Clone, Default)]
pub struct TableRepository;

impl TableRepository {
    pub fn new() -> Self {
        Self
    }

    /// Retorna `false` se a mesa não existe.
    pub async fn mark_occupied<'e, E>(&self, executor: E, table_id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let updated = sqlx::query_scalar::<_, Uuid>(
            "UPDATE dining_tables SET is_occupied = TRUE, updated_at = NOW() WHERE id = $1 RETURNING id",
        )
        .bind(table_id)
        .fetch_optional(executor)
        .await?;

        Ok(updated.is_some())
    }

    /// Recalcula a ocupação a partir dos pedidos ativos.
    ///
    /// Primeiro trava a linha da mesa: se outro pedido estiver sendo aberto nela,
    /// esperamos o commit dele e o UPDATE seguinte (novo snapshot) já o enxerga.
    /// Por isso são duas queries e a função recebe a conexão, não um `Executor`.
    pub async fn recompute_occupancy(&self, conn: &mut PgConnection, table_id: Uuid) -> Result<Option<bool>, AppError> {
        let locked = sqlx::query_scalar::<_, Uuid>("SELECT id FROM dining_tables WHERE id = $1 FOR UPDATE")
            .bind(table_id)
            .fetch_optional(&mut *conn)
            .await?;

        if locked.is_none() {
            return Ok(None);
        }

        let sql = format!(
            "UPDATE dining_tables t SET is_occupied = {ACTIVE_ORDER_EXISTS}, updated_at = NOW() \
             WHERE t.id = $1 RETURNING t.is_occupied"
        );
        let occupied = sqlx::query_scalar::<_, bool>(&sql)
            .bind(table_id)
            .fetch_one(&mut *conn)
            .await?;

        Ok(Some(occupied))
    }

    /// Corrige todas as mesas divergentes de uma vez; devolve os ids corrigidos.
    pub async fn reconcile_all<'e, E>(&self, executor: E) -> Result<Vec<Uuid>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE dining_tables d
            SET is_occupied = derived.active, updated_at = NOW()
            FROM (
                SELECT t.id, {ACTIVE_ORDER_EXISTS} AS active
                FROM dining_tables t
            ) AS derived
            WHERE d.id = derived.id
              AND d.is_occupied IS DISTINCT FROM derived.active
            RETURNING d.id
            "#
        );
        let corrected = sqlx::query_scalar::<_, Uuid>(&sql).fetch_all(executor).await?;

        Ok(corrected)
    }

    pub async fn occupancy_by_location<'e, E>(
        &self,
        executor: E,
        location: Option<&str>,
    ) -> Result<Vec<LocationOccupancyRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, LocationOccupancyRow>(
            r#"
            SELECT
                COALESCE(location, $2::text) AS location,
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE is_occupied) AS occupied
            FROM dining_tables
            WHERE $1::text IS NULL OR location ILIKE '%' || $1 || '%'
            GROUP BY 1
            ORDER BY 1
            "#,
        )
        .bind(location)
        .bind(DEFAULT_LOCATION)
        .fetch_all(executor)
        .await?;

        Ok(rows)
    }
}
