//! `PostgreSQL` implementation of the `OrderRepository` trait.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use courier_core::error::DomainError;
use courier_core::order::{Order, OrderItem, OrderStatus};
use courier_core::repository::{OrderFilter, OrderRepository};

use crate::{infrastructure, unprovisioned_user};

const ORDER_COLUMNS: &str =
    "id, customer_id, delivery_agent_id, status, total, version, created_at, updated_at";

/// Default name of the `orders.customer_id` foreign key.
const CUSTOMER_FKEY: &str = "orders_customer_id_fkey";

#[derive(Debug, FromRow)]
struct OrderRow {
    id: Uuid,
    customer_id: Uuid,
    delivery_agent_id: Option<Uuid>,
    status: String,
    total: Decimal,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Result<Order, DomainError> {
        let status: OrderStatus = self.status.parse().map_err(|_| {
            DomainError::Infrastructure(format!(
                "order {} has unrecognized status '{}'",
                self.id, self.status
            ))
        })?;
        Ok(Order {
            id: self.id,
            customer_id: self.customer_id,
            delivery_agent_id: self.delivery_agent_id,
            status,
            total: self.total,
            items,
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct ItemRow {
    id: Uuid,
    order_id: Uuid,
    product_id: Uuid,
    quantity: i32,
    unit_price: Decimal,
}

impl From<ItemRow> for OrderItem {
    fn from(row: ItemRow) -> Self {
        Self {
            id: row.id,
            order_id: row.order_id,
            product_id: row.product_id,
            quantity: row.quantity,
            unit_price: row.unit_price,
        }
    }
}

/// `PostgreSQL`-backed order repository.
#[derive(Debug, Clone)]
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    /// Creates a new `PgOrderRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_items(&self, order_ids: &[Uuid]) -> Result<Vec<ItemRow>, DomainError> {
        if order_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as(
            "SELECT id, order_id, product_id, quantity, unit_price
             FROM order_items
             WHERE order_id = ANY($1)
             ORDER BY id",
        )
        .bind(order_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| infrastructure(&e))
    }

    async fn order_exists(&self, order_id: Uuid) -> Result<bool, DomainError> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM orders WHERE id = $1)")
            .bind(order_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| infrastructure(&e))
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn insert_order(&self, order: &Order) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| infrastructure(&e))?;

        sqlx::query(
            "INSERT INTO orders
                 (id, customer_id, delivery_agent_id, status, total, version, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(order.id)
        .bind(order.customer_id)
        .bind(order.delivery_agent_id)
        .bind(order.status.as_str())
        .bind(order.total)
        .bind(order.version)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| unprovisioned_user(&e, CUSTOMER_FKEY, order.customer_id))?;

        for item in &order.items {
            sqlx::query(
                "INSERT INTO order_items (id, order_id, product_id, quantity, unit_price)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(item.id)
            .bind(item.order_id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(item.unit_price)
            .execute(&mut *tx)
            .await
            .map_err(|e| infrastructure(&e))?;
        }

        // Dropping `tx` on any error above rolls the whole order back.
        tx.commit().await.map_err(|e| infrastructure(&e))
    }

    async fn find_order(&self, order_id: Uuid) -> Result<Option<Order>, DomainError> {
        let row: Option<OrderRow> =
            sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
                .bind(order_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| infrastructure(&e))?;
        let Some(row) = row else {
            return Ok(None);
        };
        let items = self
            .load_items(&[order_id])
            .await?
            .into_iter()
            .map(OrderItem::from)
            .collect();
        row.into_order(items).map(Some)
    }

    async fn update_status(&self, order: &Order, expected_version: i64) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE orders
             SET status = $1, delivery_agent_id = $2, version = $3, updated_at = $4
             WHERE id = $5 AND version = $6",
        )
        .bind(order.status.as_str())
        .bind(order.delivery_agent_id)
        .bind(order.version)
        .bind(order.updated_at)
        .bind(order.id)
        .bind(expected_version)
        .execute(&self.pool)
        .await
        .map_err(|e| infrastructure(&e))?;

        if result.rows_affected() == 1 {
            return Ok(());
        }
        if self.order_exists(order.id).await? {
            Err(DomainError::ConcurrencyConflict {
                aggregate_id: order.id,
                expected: expected_version,
            })
        } else {
            Err(DomainError::OrderNotFound(order.id))
        }
    }

    async fn list_orders(&self, filter: OrderFilter) -> Result<Vec<Order>, DomainError> {
        let order_by = "ORDER BY created_at DESC, id DESC";
        let rows: Vec<OrderRow> = match filter {
            OrderFilter::Customer(customer_id) => sqlx::query_as(&format!(
                "SELECT {ORDER_COLUMNS} FROM orders WHERE customer_id = $1 {order_by}"
            ))
            .bind(customer_id)
            .fetch_all(&self.pool)
            .await,
            OrderFilter::DeliveryAgent(agent_id) => sqlx::query_as(&format!(
                "SELECT {ORDER_COLUMNS} FROM orders
                 WHERE delivery_agent_id = $1
                    OR (delivery_agent_id IS NULL AND status = $2)
                 {order_by}"
            ))
            .bind(agent_id)
            .bind(OrderStatus::Ready.as_str())
            .fetch_all(&self.pool)
            .await,
            OrderFilter::All => {
                sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders {order_by}"))
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(|e| infrastructure(&e))?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut items_by_order: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
        for item in self.load_items(&ids).await? {
            items_by_order
                .entry(item.order_id)
                .or_default()
                .push(item.into());
        }

        rows.into_iter()
            .map(|row| {
                let items = items_by_order.remove(&row.id).unwrap_or_default();
                row.into_order(items)
            })
            .collect()
    }
}
