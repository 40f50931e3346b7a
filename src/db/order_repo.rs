// src/db/order_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::map_constraint_error, error::AppError, money::OrderTotals},
    models::orders::{Order, OrderItem, OrderStatus, OrderType},
};

/// Dados já calculados de um pedido novo, prontos para o INSERT.
pub struct OrderInsert<'a> {
    pub id: Uuid,
    pub order_number: &'a str,
    pub table_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub customer_name: Option<&'a str>,
    pub order_type: OrderType,
    pub totals: OrderTotals,
    pub notes: Option<&'a str>,
}

pub struct OrderItemInsert<'a> {
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub special_instructions: Option<&'a str>,
}

/// Atualização tipada de status (nada de montar SQL com string).
#[derive(Debug, Clone, Copy)]
pub struct StatusUpdate {
    pub status: OrderStatus,
    pub stamp_served: bool,
    pub stamp_completed: bool,
}

#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  NUMERAÇÃO
    // =========================================================================

    /// Próximo valor da sequência diária. Roda direto na pool (fora da transação
    /// do pedido) para não serializar a criação de pedidos do dia inteiro no lock
    /// da linha do contador; um pedido que falha só deixa um buraco na numeração.
    pub async fn next_order_sequence(&self, business_day: NaiveDate) -> Result<i32, AppError> {
        let value = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO order_number_counters (business_day, last_value)
            VALUES ($1, 1)
            ON CONFLICT (business_day)
            DO UPDATE SET last_value = order_number_counters.last_value + 1
            RETURNING last_value
            "#,
        )
        .bind(business_day)
        .fetch_one(&self.pool)
        .await?;

        Ok(value)
    }

    // =========================================================================
    //  ESCRITA (sempre dentro de uma transação do serviço)
    // =========================================================================

    pub async fn insert_order<'e, E>(&self, executor: E, order: OrderInsert<'_>) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (
                id, order_number, table_id, user_id, customer_name, order_type, status,
                subtotal, tax_amount, discount_amount, total_amount, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, 'pending', $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(order.id)
        .bind(order.order_number)
        .bind(order.table_id)
        .bind(order.user_id)
        .bind(order.customer_name)
        .bind(order.order_type)
        .bind(order.totals.subtotal)
        .bind(order.totals.tax_amount)
        .bind(order.totals.discount_amount)
        .bind(order.totals.total_amount)
        .bind(order.notes)
        .fetch_one(executor)
        .await
        .map_err(map_constraint_error)
    }

    pub async fn insert_item<'e, E>(&self, executor: E, item: OrderItemInsert<'_>) -> Result<OrderItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, OrderItem>(
            r#"
            INSERT INTO order_items (
                id, order_id, product_id, quantity, unit_price, total_price, special_instructions
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(item.order_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.unit_price)
        .bind(item.total_price)
        .bind(item.special_instructions)
        .fetch_one(executor)
        .await
        .map_err(map_constraint_error)
    }

    /// Trava a linha do pedido até o fim da transação. Toda sequência
    /// ler-e-depois-escrever sobre um pedido começa aqui.
    pub async fn lock_order<'e, E>(&self, executor: E, order_id: Uuid) -> Result<Option<Order>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1 FOR UPDATE")
            .bind(order_id)
            .fetch_optional(executor)
            .await?;

        Ok(order)
    }

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        update: StatusUpdate,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // served_at/completed_at só são gravados na primeira vez
        let order = sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders
            SET status = $2,
                updated_at = NOW(),
                served_at = CASE WHEN $3 THEN COALESCE(served_at, NOW()) ELSE served_at END,
                completed_at = CASE WHEN $4 THEN COALESCE(completed_at, NOW()) ELSE completed_at END
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(update.status)
        .bind(update.stamp_served)
        .bind(update.stamp_completed)
        .fetch_one(executor)
        .await?;

        Ok(order)
    }

    // =========================================================================
    //  LEITURA
    // =========================================================================

    pub async fn find_order<'e, E>(&self, executor: E, order_id: Uuid) -> Result<Option<Order>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
            .bind(order_id)
            .fetch_optional(executor)
            .await?;

        Ok(order)
    }

    pub async fn list_items<'e, E>(&self, executor: E, order_id: Uuid) -> Result<Vec<OrderItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT * FROM order_items WHERE order_id = $1 ORDER BY created_at, id",
        )
        .bind(order_id)
        .fetch_all(executor)
        .await?;

        Ok(items)
    }
}
