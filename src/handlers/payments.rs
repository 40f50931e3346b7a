// src/handlers/payments.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{actor::Actor, i18n::Locale},
    models::payments::{BalanceSummary, Payment, PaymentMethod},
    services::payment_service::NewPayment,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentPayload {
    /// cash | credit_card | debit_card | digital_wallet
    #[schema(example = "cash")]
    pub payment_method: String,

    #[schema(value_type = f64, example = 20.00)]
    pub amount: Decimal,

    #[validate(length(max = 100, message = "A referência deve ter no máximo 100 caracteres."))]
    #[schema(example = "NSU-482913")]
    pub reference_number: Option<String>,
}

// POST /api/orders/{order_id}/payments
#[utoipa::path(
    post,
    path = "/api/orders/{order_id}/payments",
    tag = "Payments",
    request_body = RecordPaymentPayload,
    responses(
        (status = 201, description = "Pagamento registrado", body = Payment),
        (status = 400, description = "Valor ou forma de pagamento inválidos"),
        (status = 404, description = "Pedido não encontrado"),
        (status = 409, description = "Pedido encerrado, já quitado ou valor acima do saldo")
    ),
    params(
        ("order_id" = Uuid, Path, description = "ID do Pedido")
    ),
    security(("actor_header" = []))
)]
pub async fn record_payment(
    State(app_state): State<AppState>,
    locale: Locale,
    actor: Actor,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<RecordPaymentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate().map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let method: PaymentMethod = payload
        .payment_method
        .trim()
        .parse()
        .map_err(|e: AppError| e.to_api_error(&locale))?;

    tracing::debug!(%order_id, user_id = %actor.user_id, role = ?actor.role, "Pagamento solicitado");

    let payment = app_state
        .payment_service
        .record_payment(
            &app_state.db_pool,
            order_id,
            NewPayment {
                method,
                amount: payload.amount,
                reference_number: payload.reference_number,
            },
            actor.user_id,
        )
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(payment)))
}

// GET /api/orders/{order_id}/payments
#[utoipa::path(
    get,
    path = "/api/orders/{order_id}/payments",
    tag = "Payments",
    responses(
        (status = 200, description = "Pagamentos do pedido (mais recente primeiro)", body = Vec<Payment>),
        (status = 404, description = "Pedido não encontrado")
    ),
    params(
        ("order_id" = Uuid, Path, description = "ID do Pedido")
    )
)]
pub async fn list_payments(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let payments = app_state
        .payment_service
        .list_payments(&app_state.db_pool, order_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(payments))
}

// GET /api/orders/{order_id}/balance
#[utoipa::path(
    get,
    path = "/api/orders/{order_id}/balance",
    tag = "Payments",
    responses(
        (status = 200, description = "Saldo do pedido", body = BalanceSummary),
        (status = 404, description = "Pedido não encontrado")
    ),
    params(
        ("order_id" = Uuid, Path, description = "ID do Pedido")
    )
)]
pub async fn get_balance(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let balance = app_state
        .payment_service
        .get_balance(&app_state.db_pool, order_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(balance))
}
