// src/handlers/tables.rs

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{actor::Actor, i18n::Locale},
    models::tables::{ReconcileReport, TableStatusSummary},
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct TableStatusQuery {
    /// Filtro por área (parcial, sem diferenciar maiúsculas)
    pub location: Option<String>,
}

// GET /api/tables/status
#[utoipa::path(
    get,
    path = "/api/tables/status",
    tag = "Tables",
    params(TableStatusQuery),
    responses(
        (status = 200, description = "Ocupação das mesas por área", body = TableStatusSummary)
    )
)]
pub async fn get_table_status(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<TableStatusQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = app_state
        .table_service
        .get_status(&app_state.db_pool, query.location.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(summary))
}

// POST /api/tables/reconcile
#[utoipa::path(
    post,
    path = "/api/tables/reconcile",
    tag = "Tables",
    responses(
        (status = 200, description = "Mesas cujo flag de ocupação foi corrigido", body = ReconcileReport)
    ),
    security(("actor_header" = []))
)]
pub async fn reconcile_tables(
    State(app_state): State<AppState>,
    locale: Locale,
    actor: Actor,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!(user_id = %actor.user_id, role = ?actor.role, "Reconciliação de mesas solicitada");

    let report = app_state
        .table_service
        .reconcile(&app_state.db_pool)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(report))
}
