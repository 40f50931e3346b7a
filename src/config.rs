// src/config.rs

use std::{env, str::FromStr, time::Duration};

use anyhow::{bail, Context};
use rust_decimal::Decimal;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::db_utils::apply_session_timeouts,
    db::{CatalogRepository, HistoryRepository, OrderRepository, PaymentRepository, TableRepository},
    services::{
        audit_service::AuditTrail, order_service::OrderService, payment_service::PaymentLedger,
        status_service::OrderStatusMachine, table_service::TableOccupancyTracker,
    },
};

/// Configuração lida uma única vez na inicialização.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub server_addr: String,
    pub tax_rate: Decimal,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
    pub db_lock_timeout_ms: u64,
    pub db_statement_timeout_ms: u64,
    pub reconcile_tables_on_startup: bool,
}

fn var_or<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{name} inválida: '{raw}'")),
        Err(_) => Ok(default),
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let tax_rate = var_or("TAX_RATE", Decimal::new(10, 2))?;
        if tax_rate.is_sign_negative() || tax_rate > Decimal::ONE {
            bail!("TAX_RATE deve estar entre 0 e 1 (recebido {tax_rate})");
        }

        Ok(Self {
            database_url,
            server_addr,
            tax_rate,
            db_max_connections: var_or("DB_MAX_CONNECTIONS", 10)?,
            db_acquire_timeout: Duration::from_secs(var_or("DB_ACQUIRE_TIMEOUT_SECS", 3)?),
            db_lock_timeout_ms: var_or("DB_LOCK_TIMEOUT_MS", 5_000)?,
            db_statement_timeout_ms: var_or("DB_STATEMENT_TIMEOUT_MS", 30_000)?,
            reconcile_tables_on_startup: var_or("RECONCILE_TABLES_ON_STARTUP", true)?,
        })
    }

    /// Opções da pool com os timeouts de sessão aplicados em cada conexão nova.
    pub fn pool_options(&self) -> PgPoolOptions {
        let lock_ms = self.db_lock_timeout_ms;
        let statement_ms = self.db_statement_timeout_ms;

        PgPoolOptions::new()
            .max_connections(self.db_max_connections)
            .acquire_timeout(self.db_acquire_timeout)
            .after_connect(move |conn, _meta| {
                Box::pin(async move { apply_session_timeouts(conn, lock_ms, statement_ms).await })
            })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: AppConfig,
    pub order_service: OrderService,
    pub status_service: OrderStatusMachine,
    pub payment_service: PaymentLedger,
    pub table_service: TableOccupancyTracker,
    pub audit_service: AuditTrail,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        let db_pool = config
            .pool_options()
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_pool(db_pool, config))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_pool(db_pool: PgPool, config: AppConfig) -> Self {
        let order_repo = OrderRepository::new(db_pool.clone());
        let payment_repo = PaymentRepository::new();

        let table_service = TableOccupancyTracker::new(TableRepository::new());
        let audit_service = AuditTrail::new(HistoryRepository::new(), order_repo.clone());
        let status_service = OrderStatusMachine::new(order_repo.clone(), audit_service.clone(), table_service.clone());
        let payment_service = PaymentLedger::new(order_repo.clone(), payment_repo.clone(), status_service.clone());
        let order_service = OrderService::new(
            order_repo,
            CatalogRepository::new(),
            payment_repo,
            table_service.clone(),
            config.tax_rate,
        );

        Self {
            db_pool,
            config,
            order_service,
            status_service,
            payment_service,
            table_service,
            audit_service,
        }
    }
}
