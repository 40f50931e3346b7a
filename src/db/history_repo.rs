// src/db/history_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::orders::{OrderStatus, OrderStatusHistory},
};

// order_status_history é somente inserção (o banco rejeita UPDATE/DELETE)
#[derive(Clone, Default)]
pub struct HistoryRepository;

impl HistoryRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn append<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        previous_status: Option<OrderStatus>,
        new_status: OrderStatus,
        changed_by: Option<Uuid>,
        notes: Option<&str>,
    ) -> Result<OrderStatusHistory, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entry = sqlx::query_as::<_, OrderStatusHistory>(
            r#"
            INSERT INTO order_status_history (id, order_id, previous_status, new_status, changed_by, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(order_id)
        .bind(previous_status)
        .bind(new_status)
        .bind(changed_by)
        .bind(notes)
        .fetch_one(executor)
        .await?;

        Ok(entry)
    }

    pub async fn list_for_order<'e, E>(&self, executor: E, order_id: Uuid) -> Result<Vec<OrderStatusHistory>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entries = sqlx::query_as::<_, OrderStatusHistory>(
            "SELECT * FROM order_status_history WHERE order_id = $1 ORDER BY created_at, id",
        )
        .bind(order_id)
        .fetch_all(executor)
        .await?;

        Ok(entries)
    }
}
