// src/db/payment_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::payments::{Payment, PaymentMethod, PaymentStatus, PaymentTotals},
};

pub struct PaymentInsert<'a> {
    pub order_id: Uuid,
    pub method: PaymentMethod,
    pub amount: Decimal,
    pub reference_number: Option<&'a str>,
    pub status: PaymentStatus,
    pub processed_by: Option<Uuid>,
}

#[derive(Clone, Default)]
pub struct PaymentRepository;

impl PaymentRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn insert_payment<'e, E>(&self, executor: E, payment: PaymentInsert<'_>) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (
                id, order_id, payment_method, amount, reference_number, status, processed_by, processed_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(payment.order_id)
        .bind(payment.method)
        .bind(payment.amount)
        .bind(payment.reference_number)
        .bind(payment.status)
        .bind(payment.processed_by)
        .fetch_one(executor)
        .await?;

        Ok(payment)
    }

    /// Soma dos pagamentos liquidados. Só é confiável para decidir um novo
    /// pagamento se a linha do pedido já estiver travada na mesma transação.
    pub async fn completed_total<'e, E>(&self, executor: E, order_id: Uuid) -> Result<Decimal, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let paid = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(amount), 0)
            FROM payments
            WHERE order_id = $1 AND status = 'completed'
            "#,
        )
        .bind(order_id)
        .fetch_one(executor)
        .await?;

        Ok(paid)
    }

    pub async fn totals_for_order<'e, E>(&self, executor: E, order_id: Uuid) -> Result<Option<PaymentTotals>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // Uma única query = um único snapshot consistente
        let totals = sqlx::query_as::<_, PaymentTotals>(
            r#"
            SELECT
                o.total_amount,
                COALESCE(SUM(p.amount) FILTER (WHERE p.status = 'completed'), 0) AS total_paid,
                COALESCE(SUM(p.amount) FILTER (WHERE p.status = 'pending'), 0) AS pending_amount,
                COUNT(p.id) AS payment_count
            FROM orders o
            LEFT JOIN payments p ON p.order_id = o.id
            WHERE o.id = $1
            GROUP BY o.id, o.total_amount
            "#,
        )
        .bind(order_id)
        .fetch_optional(executor)
        .await?;

        Ok(totals)
    }

    pub async fn list_for_order<'e, E>(&self, executor: E, order_id: Uuid) -> Result<Vec<Payment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payments = sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE order_id = $1 ORDER BY created_at DESC, id",
        )
        .bind(order_id)
        .fetch_all(executor)
        .await?;

        Ok(payments)
    }
}
