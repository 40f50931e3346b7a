// src/handlers/orders.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{actor::Actor, i18n::Locale},
    models::orders::{NewOrder, NewOrderItem, OrderDetail, OrderStatus, OrderStatusHistory, OrderType},
};

// ---
// Payloads
// ---

// Serialize: a regra `length` do Vec pai grava o valor como parâmetro do erro
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderItemPayload {
    pub product_id: Uuid,

    #[validate(range(min = 1, max = 1000, message = "A quantidade deve estar entre 1 e 1000."))]
    #[schema(example = 2)]
    pub quantity: i32,

    #[schema(example = "Sem cebola")]
    pub special_instructions: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
    #[validate(length(min = 1, message = "O pedido precisa de pelo menos um item."))]
    #[validate(nested)]
    pub items: Vec<CreateOrderItemPayload>,

    pub table_id: Option<Uuid>,

    /// dine_in | takeout | delivery
    #[schema(example = "dine_in")]
    pub order_type: String,

    #[schema(example = "Maria")]
    pub customer_name: Option<String>,

    pub notes: Option<String>,
}

impl CreateOrderPayload {
    fn into_new_order(self) -> Result<NewOrder, AppError> {
        let order_type: OrderType = self.order_type.trim().parse()?;

        Ok(NewOrder {
            items: self
                .items
                .into_iter()
                .map(|item| NewOrderItem {
                    product_id: item.product_id,
                    quantity: item.quantity,
                    special_instructions: item.special_instructions,
                })
                .collect(),
            table_id: self.table_id,
            order_type,
            customer_name: self.customer_name,
            notes: self.notes,
        })
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusPayload {
    /// pending | confirmed | preparing | ready | served | completed | cancelled
    #[schema(example = "served")]
    pub status: String,

    pub notes: Option<String>,
}

// ---
// Handlers
// ---

// POST /api/orders
#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Orders",
    request_body = CreateOrderPayload,
    responses(
        (status = 201, description = "Pedido criado com itens e totais", body = OrderDetail),
        (status = 400, description = "Pedido vazio, quantidade ou tipo inválido"),
        (status = 404, description = "Produto indisponível ou mesa inexistente")
    ),
    security(("actor_header" = []))
)]
pub async fn create_order(
    State(app_state): State<AppState>,
    locale: Locale,
    actor: Actor,
    Json(payload): Json<CreateOrderPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate().map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let new_order = payload.into_new_order().map_err(|e| e.to_api_error(&locale))?;

    tracing::debug!(user_id = %actor.user_id, role = ?actor.role, "Criação de pedido solicitada");

    let order = app_state
        .order_service
        .create_order(&app_state.db_pool, new_order, actor.user_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(order)))
}

// GET /api/orders/{order_id}
#[utoipa::path(
    get,
    path = "/api/orders/{order_id}",
    tag = "Orders",
    responses(
        (status = 200, description = "Pedido com itens e pagamentos", body = OrderDetail),
        (status = 404, description = "Pedido não encontrado")
    ),
    params(
        ("order_id" = Uuid, Path, description = "ID do Pedido")
    )
)]
pub async fn get_order(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let order = app_state
        .order_service
        .get_order(&app_state.db_pool, order_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(order))
}

// PATCH /api/orders/{order_id}/status
#[utoipa::path(
    patch,
    path = "/api/orders/{order_id}/status",
    tag = "Orders",
    request_body = UpdateOrderStatusPayload,
    responses(
        (status = 200, description = "Status aplicado e registrado no histórico", body = OrderDetail),
        (status = 400, description = "Status desconhecido"),
        (status = 404, description = "Pedido não encontrado"),
        (status = 409, description = "Pedido já finalizado ou cancelado")
    ),
    params(
        ("order_id" = Uuid, Path, description = "ID do Pedido")
    ),
    security(("actor_header" = []))
)]
pub async fn update_order_status(
    State(app_state): State<AppState>,
    locale: Locale,
    actor: Actor,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let new_status: OrderStatus = payload
        .status
        .trim()
        .parse()
        .map_err(|e: AppError| e.to_api_error(&locale))?;

    tracing::debug!(%order_id, ?new_status, user_id = %actor.user_id, role = ?actor.role, "Mudança de status solicitada");

    app_state
        .status_service
        .transition(
            &app_state.db_pool,
            order_id,
            new_status,
            actor.user_id,
            payload.notes.as_deref(),
        )
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let order = app_state
        .order_service
        .get_order(&app_state.db_pool, order_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(order))
}

// GET /api/orders/{order_id}/history
#[utoipa::path(
    get,
    path = "/api/orders/{order_id}/history",
    tag = "Orders",
    responses(
        (status = 200, description = "Histórico de status (mais antigo primeiro)", body = Vec<OrderStatusHistory>),
        (status = 404, description = "Pedido não encontrado")
    ),
    params(
        ("order_id" = Uuid, Path, description = "ID do Pedido")
    )
)]
pub async fn list_order_history(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let history = app_state
        .audit_service
        .list_history(&app_state.db_pool, order_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(history))
}
