// src/models/payments.rs

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::error::AppError;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_method", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    DebitCard,
    DigitalWallet,
}

impl FromStr for PaymentMethod {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(PaymentMethod::Cash),
            "credit_card" => Ok(PaymentMethod::CreditCard),
            "debit_card" => Ok(PaymentMethod::DebitCard),
            "digital_wallet" => Ok(PaymentMethod::DigitalWallet),
            _ => Err(AppError::InvalidInput("invalid_payment_method")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,   // Aguardando processadora
    Completed, // Liquidado (conta no saldo)
    Failed,
    Refunded,
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub order_id: Uuid,
    pub payment_method: PaymentMethod,
    #[schema(example = "20.00")]
    pub amount: Decimal,
    #[schema(example = "NSU-482913")]
    pub reference_number: Option<String>,
    pub status: PaymentStatus,
    pub processed_by: Option<Uuid>,
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Somas brutas lidas do banco para um pedido.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct PaymentTotals {
    pub total_amount: Decimal,
    pub total_paid: Decimal,
    pub pending_amount: Decimal,
    pub payment_count: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSummary {
    pub order_id: Uuid,
    #[schema(example = "40.67")]
    pub total: Decimal,
    #[schema(example = "20.00")]
    pub paid: Decimal,
    #[schema(example = "0.00")]
    pub pending: Decimal,
    #[schema(example = "20.67")]
    pub remaining: Decimal,
    pub is_fully_paid: bool,
    #[schema(example = 1)]
    pub payment_count: i64,
}

impl BalanceSummary {
    pub fn from_totals(order_id: Uuid, totals: PaymentTotals) -> Self {
        let remaining = totals.total_amount - totals.total_paid;
        Self {
            order_id,
            total: totals.total_amount,
            paid: totals.total_paid,
            pending: totals.pending_amount,
            remaining,
            is_fully_paid: remaining <= Decimal::ZERO,
            payment_count: totals.payment_count,
        }
    }
}
