// src/services/status_service.rs

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{order_repo::StatusUpdate, OrderRepository},
    models::orders::{Order, OrderStatus, OrderType},
    services::{audit_service::AuditTrail, table_service::TableOccupancyTracker},
};

/// Regra de transição, sem I/O.
///
/// O grafo é permissivo entre estados não terminais (pular etapas é permitido).
/// Um pedido terminal só aceita a reaplicação do mesmo status.
pub fn check_transition(current: OrderStatus, next: OrderStatus) -> Result<StatusUpdate, AppError> {
    if current.is_terminal() && current != next {
        return Err(AppError::Conflict("order_terminal"));
    }

    Ok(StatusUpdate {
        status: next,
        stamp_served: next == OrderStatus::Served,
        stamp_completed: next == OrderStatus::Completed,
    })
}

#[derive(Clone)]
pub struct OrderStatusMachine {
    order_repo: OrderRepository,
    audit: AuditTrail,
    tables: TableOccupancyTracker,
}

impl OrderStatusMachine {
    pub fn new(order_repo: OrderRepository, audit: AuditTrail, tables: TableOccupancyTracker) -> Self {
        Self { order_repo, audit, tables }
    }

    /// Aplica a transição, grava o histórico e libera a mesa quando o pedido termina.
    ///
    /// Quando chamado com a conexão de uma transação aberta (ex.: pelo
    /// `PaymentLedger`), o `begin()` vira um SAVEPOINT e tudo faz parte da
    /// transação de fora.
    pub async fn transition<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        new_status: OrderStatus,
        actor: Uuid,
        notes: Option<&str>,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        // 1. Trava o pedido: transições e pagamentos do mesmo pedido ficam em fila
        let current = self
            .order_repo
            .lock_order(&mut *tx, order_id)
            .await?
            .ok_or(AppError::NotFound("order_not_found"))?;

        // 2. Valida
        let update = check_transition(current.status, new_status)?;

        // 3. Aplica
        let order = self.order_repo.update_status(&mut *tx, order_id, update).await?;

        // 4. Histórico (inclusive em reaplicação do mesmo status)
        self.audit
            .record(&mut *tx, order_id, Some(current.status), new_status, actor, notes)
            .await?;

        // 5. Mesa
        if new_status.is_terminal() && order.order_type == OrderType::DineIn {
            if let Some(table_id) = order.table_id {
                self.tables.release(&mut *tx, table_id).await?;
            }
        }

        tx.commit().await?;

        tracing::info!(
            order_id = %order.id,
            from = %current.status,
            to = %order.status,
            "Status do pedido atualizado"
        );

        Ok(order)
    }
}
