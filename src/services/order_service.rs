// src/services/order_service.rs

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        money::{compute_totals, PricedLine},
    },
    db::{
        order_repo::{OrderInsert, OrderItemInsert},
        CatalogRepository, OrderRepository, PaymentRepository,
    },
    models::orders::{NewOrder, OrderDetail, OrderType},
    services::table_service::TableOccupancyTracker,
};

/// `ORD` + dia (UTC) + sequência diária com 4 dígitos (cresce se passar de 9999).
pub fn format_order_number(business_day: NaiveDate, sequence: i32) -> String {
    format!("ORD{}{:04}", business_day.format("%Y%m%d"), sequence)
}

/// Teto por linha; acima disso o total estoura `NUMERIC(12,2)`.
pub const MAX_ITEM_QUANTITY: i32 = 1_000;

fn validate_new_order(order: &NewOrder) -> Result<(), AppError> {
    if order.items.is_empty() {
        return Err(AppError::InvalidInput("empty_order"));
    }
    if order
        .items
        .iter()
        .any(|item| item.quantity <= 0 || item.quantity > MAX_ITEM_QUANTITY)
    {
        return Err(AppError::InvalidInput("invalid_quantity"));
    }
    Ok(())
}

#[derive(Clone)]
pub struct OrderService {
    order_repo: OrderRepository,
    catalog_repo: CatalogRepository,
    payment_repo: PaymentRepository,
    tables: TableOccupancyTracker,
    tax_rate: Decimal,
}

impl OrderService {
    pub fn new(
        order_repo: OrderRepository,
        catalog_repo: CatalogRepository,
        payment_repo: PaymentRepository,
        tables: TableOccupancyTracker,
        tax_rate: Decimal,
    ) -> Self {
        Self {
            order_repo,
            catalog_repo,
            payment_repo,
            tables,
            tax_rate,
        }
    }

    pub async fn create_order<'e, E>(&self, executor: E, new_order: NewOrder, actor: Uuid) -> Result<OrderDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        validate_new_order(&new_order)?;

        // Numeração fora da transação do pedido (ver OrderRepository::next_order_sequence)
        let business_day = Utc::now().date_naive();
        let sequence = self.order_repo.next_order_sequence(business_day).await?;
        let order_number = format_order_number(business_day, sequence);

        let mut tx = executor.begin().await?;

        // 1. Resolve o preço de cada produto uma única vez, dentro da transação.
        //    Esse mesmo preço alimenta o subtotal e o item gravado.
        let mut prices: HashMap<Uuid, Decimal> = HashMap::new();
        let mut lines = Vec::with_capacity(new_order.items.len());
        for item in &new_order.items {
            let unit_price = match prices.get(&item.product_id) {
                Some(price) => *price,
                None => {
                    let product = self
                        .catalog_repo
                        .find_product_price(&mut *tx, item.product_id)
                        .await?
                        .filter(|p| p.is_available)
                        .ok_or(AppError::NotFound("product_unavailable"))?;
                    prices.insert(product.id, product.price);
                    product.price
                }
            };
            lines.push(PricedLine {
                unit_price,
                quantity: item.quantity,
            });
        }

        // 2. Totais
        let totals = compute_totals(&lines, self.tax_rate);

        // 3. Cabeçalho
        let order = self
            .order_repo
            .insert_order(
                &mut *tx,
                OrderInsert {
                    id: Uuid::new_v4(),
                    order_number: &order_number,
                    table_id: new_order.table_id,
                    user_id: Some(actor),
                    customer_name: new_order.customer_name.as_deref(),
                    order_type: new_order.order_type,
                    totals,
                    notes: new_order.notes.as_deref(),
                },
            )
            .await?;

        // 4. Itens com o preço congelado
        let mut items = Vec::with_capacity(lines.len());
        for (item, line) in new_order.items.iter().zip(&lines) {
            let saved = self
                .order_repo
                .insert_item(
                    &mut *tx,
                    OrderItemInsert {
                        order_id: order.id,
                        product_id: item.product_id,
                        quantity: item.quantity,
                        unit_price: line.unit_price,
                        total_price: line.line_total(),
                        special_instructions: item.special_instructions.as_deref(),
                    },
                )
                .await?;
            items.push(saved);
        }

        // 5. Ocupa a mesa (só consumo no local)
        if order.order_type == OrderType::DineIn {
            if let Some(table_id) = order.table_id {
                self.tables.occupy(&mut *tx, table_id).await?;
            }
        }

        tx.commit().await?;

        tracing::info!(
            order_id = %order.id,
            order_number = %order.order_number,
            items = items.len(),
            total = %order.total_amount,
            "🧾 Pedido criado"
        );

        Ok(OrderDetail {
            header: order,
            items,
            payments: Vec::new(),
        })
    }

    pub async fn get_order<'e, E>(&self, executor: E, order_id: Uuid) -> Result<OrderDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        // Transação só de leitura para que cabeçalho, itens e pagamentos venham da mesma conexão
        let mut tx = executor.begin().await?;

        let header = self
            .order_repo
            .find_order(&mut *tx, order_id)
            .await?
            .ok_or(AppError::NotFound("order_not_found"))?;
        let items = self.order_repo.list_items(&mut *tx, order_id).await?;
        let payments = self.payment_repo.list_for_order(&mut *tx, order_id).await?;

        tx.commit().await?;

        Ok(OrderDetail { header, items, payments })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::orders::NewOrderItem;

    fn order_with(items: Vec<NewOrderItem>) -> NewOrder {
        NewOrder {
            items,
            table_id: None,
            order_type: OrderType::Takeout,
            customer_name: None,
            notes: None,
        }
    }

    fn item(quantity: i32) -> NewOrderItem {
        NewOrderItem {
            product_id: Uuid::new_v4(),
            quantity,
            special_instructions: None,
        }
    }

    #[test]
    fn order_number_is_prefixed_dated_and_padded() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(format_order_number(day, 7), "ORD202406010007");
        assert_eq!(format_order_number(day, 1234), "ORD202406011234");
        assert_eq!(format_order_number(day, 12345), "ORD2024060112345");
    }

    #[test]
    fn rejects_empty_orders_and_non_positive_quantities() {
        assert_eq!(validate_new_order(&order_with(vec![])).unwrap_err().code(), "empty_order");
        assert_eq!(
            validate_new_order(&order_with(vec![item(1), item(0)])).unwrap_err().code(),
            "invalid_quantity"
        );
        assert_eq!(
            validate_new_order(&order_with(vec![item(-2)])).unwrap_err().code(),
            "invalid_quantity"
        );
        assert!(validate_new_order(&order_with(vec![item(1), item(3)])).is_ok());
    }

    #[test]
    fn caps_quantity_per_line() {
        assert!(validate_new_order(&order_with(vec![item(MAX_ITEM_QUANTITY)])).is_ok());
        assert_eq!(
            validate_new_order(&order_with(vec![item(MAX_ITEM_QUANTITY + 1)])).unwrap_err().code(),
            "invalid_quantity"
        );
        assert_eq!(
            validate_new_order(&order_with(vec![item(2), item(i32::MAX)])).unwrap_err().code(),
            "invalid_quantity"
        );
    }
}
