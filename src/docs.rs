// src/docs.rs

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::middleware::actor::USER_ID_HEADER;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Orders ---
        handlers::orders::create_order,
        handlers::orders::get_order,
        handlers::orders::update_order_status,
        handlers::orders::list_order_history,

        // --- Payments ---
        handlers::payments::record_payment,
        handlers::payments::list_payments,
        handlers::payments::get_balance,

        // --- Tables ---
        handlers::tables::get_table_status,
        handlers::tables::reconcile_tables,
    ),
    components(
        schemas(
            // --- Orders ---
            models::orders::OrderType,
            models::orders::OrderStatus,
            models::orders::OrderItemStatus,
            models::orders::Order,
            models::orders::OrderItem,
            models::orders::OrderDetail,
            models::orders::OrderStatusHistory,

            // --- Payments ---
            models::payments::PaymentMethod,
            models::payments::PaymentStatus,
            models::payments::Payment,
            models::payments::BalanceSummary,

            // --- Tables ---
            models::tables::LocationOccupancy,
            models::tables::TableStatusSummary,
            models::tables::ReconcileReport,

            // --- Payloads ---
            handlers::orders::CreateOrderPayload,
            handlers::orders::CreateOrderItemPayload,
            handlers::orders::UpdateOrderStatusPayload,
            handlers::payments::RecordPaymentPayload,
        )
    ),
    tags(
        (name = "Orders", description = "Ciclo de vida do pedido"),
        (name = "Payments", description = "Pagamentos e saldo do pedido"),
        (name = "Tables", description = "Ocupação das mesas do salão")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        // Preenchido pelo gateway de autenticação
        components.add_security_scheme(
            "actor_header",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(USER_ID_HEADER))),
        );
    }
}
