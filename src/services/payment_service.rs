// src/services/payment_service.rs

use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{error::AppError, money::round_money},
    db::{payment_repo::PaymentInsert, OrderRepository, PaymentRepository},
    models::{
        orders::OrderStatus,
        payments::{BalanceSummary, Payment, PaymentMethod, PaymentStatus},
    },
    services::status_service::OrderStatusMachine,
};

pub const AUTO_COMPLETE_NOTE: &str = "auto-completed by full payment";

#[derive(Debug, Clone)]
pub struct NewPayment {
    pub method: PaymentMethod,
    pub amount: Decimal,
    pub reference_number: Option<String>,
}

/// Arredonda o valor recebido para centavos e rejeita o que não for positivo.
pub fn normalize_amount(amount: Decimal) -> Result<Decimal, AppError> {
    let amount = round_money(amount);
    if amount <= Decimal::ZERO {
        return Err(AppError::InvalidInput("invalid_amount"));
    }
    Ok(amount)
}

/// Regra do pagamento, sem I/O. Devolve quanto fica faltando depois dele.
pub fn check_payment(
    status: OrderStatus,
    total: Decimal,
    paid: Decimal,
    amount: Decimal,
) -> Result<Decimal, AppError> {
    if status.is_terminal() {
        return Err(AppError::Conflict("order_terminal"));
    }

    let remaining = total - paid;
    if remaining <= Decimal::ZERO {
        return Err(AppError::Conflict("order_fully_paid"));
    }
    if amount > remaining {
        return Err(AppError::Conflict("amount_exceeds_balance"));
    }

    Ok(remaining - amount)
}

#[derive(Clone)]
pub struct PaymentLedger {
    order_repo: OrderRepository,
    payment_repo: PaymentRepository,
    status_machine: OrderStatusMachine,
}

impl PaymentLedger {
    pub fn new(order_repo: OrderRepository, payment_repo: PaymentRepository, status_machine: OrderStatusMachine) -> Self {
        Self {
            order_repo,
            payment_repo,
            status_machine,
        }
    }

    pub async fn record_payment<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        payment: NewPayment,
        actor: Uuid,
    ) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let amount = normalize_amount(payment.amount)?;

        let mut tx = executor.begin().await?;

        // 1. Trava o pedido: o "ler saldo e depois inserir" fica serializado por pedido
        let order = self
            .order_repo
            .lock_order(&mut *tx, order_id)
            .await?
            .ok_or(AppError::NotFound("order_not_found"))?;

        // 2. Saldo
        let paid = self.payment_repo.completed_total(&mut *tx, order_id).await?;
        let remaining_after = check_payment(order.status, order.total_amount, paid, amount)?;

        // 3. Grava o pagamento já liquidado
        let recorded = self
            .payment_repo
            .insert_payment(
                &mut *tx,
                PaymentInsert {
                    order_id,
                    method: payment.method,
                    amount,
                    reference_number: payment.reference_number.as_deref(),
                    status: PaymentStatus::Completed,
                    processed_by: Some(actor),
                },
            )
            .await?;

        // 4. Quitou? Finaliza o pedido na mesma transação (libera a mesa junto)
        if remaining_after <= Decimal::ZERO {
            self.status_machine
                .transition(&mut *tx, order_id, OrderStatus::Completed, actor, Some(AUTO_COMPLETE_NOTE))
                .await?;
        }

        tx.commit().await?;

        tracing::info!(
            payment_id = %recorded.id,
            %order_id,
            amount = %recorded.amount,
            method = ?recorded.payment_method,
            remaining = %remaining_after,
            "💰 Pagamento registrado"
        );

        Ok(recorded)
    }

    pub async fn get_balance<'e, E>(&self, executor: E, order_id: Uuid) -> Result<BalanceSummary, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let totals = self
            .payment_repo
            .totals_for_order(executor, order_id)
            .await?
            .ok_or(AppError::NotFound("order_not_found"))?;

        Ok(BalanceSummary::from_totals(order_id, totals))
    }

    pub async fn list_payments<'e, E>(&self, executor: E, order_id: Uuid) -> Result<Vec<Payment>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        self.order_repo
            .find_order(&mut *tx, order_id)
            .await?
            .ok_or(AppError::NotFound("order_not_found"))?;

        let payments = self.payment_repo.list_for_order(&mut *tx, order_id).await?;

        tx.commit().await?;

        Ok(payments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn amounts_are_rounded_and_must_be_positive() {
        assert_eq!(normalize_amount(dec("10.005")).unwrap(), dec("10.01"));
        assert_eq!(normalize_amount(dec("0")).unwrap_err().code(), "invalid_amount");
        assert_eq!(normalize_amount(dec("-5")).unwrap_err().code(), "invalid_amount");
        // arredonda para zero => inválido
        assert_eq!(normalize_amount(dec("0.004")).unwrap_err().code(), "invalid_amount");
    }

    #[test]
    fn partial_and_exact_payments_are_accepted() {
        let total = dec("40.67");
        assert_eq!(
            check_payment(OrderStatus::Served, total, dec("0"), dec("20.00")).unwrap(),
            dec("20.67")
        );
        assert_eq!(
            check_payment(OrderStatus::Served, total, dec("20.00"), dec("20.67")).unwrap(),
            Decimal::ZERO
        );
    }

    #[test]
    fn overpayment_is_rejected() {
        let err = check_payment(OrderStatus::Served, dec("40.67"), dec("20.00"), dec("20.68")).unwrap_err();
        assert_eq!(err.code(), "amount_exceeds_balance");
    }

    #[test]
    fn settled_orders_reject_further_payments() {
        let err = check_payment(OrderStatus::Ready, dec("40.67"), dec("40.67"), dec("1")).unwrap_err();
        assert_eq!(err.code(), "order_fully_paid");
    }

    #[test]
    fn terminal_check_comes_before_balance() {
        let err = check_payment(OrderStatus::Cancelled, dec("40.67"), dec("0"), dec("10")).unwrap_err();
        assert_eq!(err.code(), "order_terminal");

        let err = check_payment(OrderStatus::Completed, dec("40.67"), dec("40.67"), dec("10")).unwrap_err();
        assert_eq!(err.code(), "order_terminal");
    }
}
