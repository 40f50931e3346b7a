// src/db/catalog_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, FromRow, Postgres};
use uuid::Uuid;

use crate::common::error::AppError;

// Leitura mínima do catálogo: o CRUD de produtos vive em outro serviço
#[derive(Debug, Clone, FromRow)]
pub struct ProductPrice {
    pub id: Uuid,
    pub price: Decimal,
    pub is_available: bool,
}

#[derive(Clone, Default)]
pub struct CatalogRepository;

impl CatalogRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn find_product_price<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
    ) -> Result<Option<ProductPrice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, ProductPrice>(
            "SELECT id, price, is_available FROM products WHERE id = $1",
        )
        .bind(product_id)
        .fetch_optional(executor)
        .await?;

        Ok(product)
    }
}
