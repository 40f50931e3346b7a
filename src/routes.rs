// src/routes.rs

use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers};

pub fn app(app_state: AppState) -> Router {
    let order_routes = Router::new()
        .route("/api/orders", post(handlers::orders::create_order))
        .route("/api/orders/{order_id}", get(handlers::orders::get_order))
        .route("/api/orders/{order_id}/status", patch(handlers::orders::update_order_status))
        .route("/api/orders/{order_id}/history", get(handlers::orders::list_order_history))
        .route(
            "/api/orders/{order_id}/payments",
            post(handlers::payments::record_payment).get(handlers::payments::list_payments),
        )
        .route("/api/orders/{order_id}/balance", get(handlers::payments::get_balance));

    let table_routes = Router::new()
        .route("/api/tables/status", get(handlers::tables::get_table_status))
        .route("/api/tables/reconcile", post(handlers::tables::reconcile_tables));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .merge(order_routes)
        .merge(table_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
