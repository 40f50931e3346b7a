// src/services/audit_service.rs

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{HistoryRepository, OrderRepository},
    models::orders::{OrderStatus, OrderStatusHistory},
};

#[derive(Clone)]
pub struct AuditTrail {
    history_repo: HistoryRepository,
    order_repo: OrderRepository,
}

impl AuditTrail {
    pub fn new(history_repo: HistoryRepository, order_repo: OrderRepository) -> Self {
        Self { history_repo, order_repo }
    }

    /// Grava uma linha de histórico. Chamado sempre dentro da transação da transição.
    pub async fn record<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        previous_status: Option<OrderStatus>,
        new_status: OrderStatus,
        changed_by: Uuid,
        notes: Option<&str>,
    ) -> Result<OrderStatusHistory, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.history_repo
            .append(executor, order_id, previous_status, new_status, Some(changed_by), notes)
            .await
    }

    pub async fn list_history<'e, E>(&self, executor: E, order_id: Uuid) -> Result<Vec<OrderStatusHistory>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        self.order_repo
            .find_order(&mut *tx, order_id)
            .await?
            .ok_or(AppError::NotFound("order_not_found"))?;

        let entries = self.history_repo.list_for_order(&mut *tx, order_id).await?;

        tx.commit().await?;

        Ok(entries)
    }
}
