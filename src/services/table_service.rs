// src/services/table_service.rs

use sqlx::{Executor, PgConnection, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::TableRepository,
    models::tables::{ReconcileReport, TableStatusSummary},
};

/// Mantém `dining_tables.is_occupied` coerente com os pedidos ativos.
///
/// Só dois caminhos escrevem o flag: a criação de um pedido `dine_in` (ocupa)
/// e a transição para `completed`/`cancelled` (recalcula). Tudo o mais é leitura
/// ou o passe de reconciliação.
#[derive(Clone)]
pub struct TableOccupancyTracker {
    repo: TableRepository,
}

impl TableOccupancyTracker {
    pub fn new(repo: TableRepository) -> Self {
        Self { repo }
    }

    pub async fn occupy<'e, E>(&self, executor: E, table_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if !self.repo.mark_occupied(executor, table_id).await? {
            return Err(AppError::NotFound("table_not_found"));
        }
        Ok(())
    }

    /// Libera a mesa se não restar nenhum pedido ativo nela.
    /// Retorna o novo valor do flag (`true` = ainda ocupada por outro pedido).
    pub async fn release(&self, conn: &mut PgConnection, table_id: Uuid) -> Result<bool, AppError> {
        let still_occupied = self
            .repo
            .recompute_occupancy(conn, table_id)
            .await?
            .ok_or(AppError::NotFound("table_not_found"))?;

        tracing::debug!(%table_id, still_occupied, "Ocupação da mesa recalculada");

        Ok(still_occupied)
    }

    pub async fn get_status<'e, E>(&self, executor: E, location: Option<&str>) -> Result<TableStatusSummary, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let location = location.map(str::trim).filter(|l| !l.is_empty());
        let rows = self.repo.occupancy_by_location(executor, location).await?;
        Ok(TableStatusSummary::from_rows(rows))
    }

    pub async fn reconcile<'e, E>(&self, executor: E) -> Result<ReconcileReport, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let corrected_table_ids = self.repo.reconcile_all(executor).await?;

        if corrected_table_ids.is_empty() {
            tracing::info!("Ocupação das mesas já está consistente");
        } else {
            tracing::warn!(
                corrected = corrected_table_ids.len(),
                tables = ?corrected_table_ids,
                "⚠️ Ocupação de mesas corrigida pela reconciliação"
            );
        }

        Ok(ReconcileReport { corrected_table_ids })
    }
}
