//! PostgreSQL implementation of OrderRepository.
//!
//! Orders live in `orders`, their line items in `order_items`. Settlement only
//! touches the `orders` row, guarded by the `version` column.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{
    Amount, DomainError, ErrorCode, OrderGuid, OrderId, Timestamp,
};
use crate::domain::order::{Order, OrderItem, OrderStatus, PaymentStatus};
use crate::ports::OrderRepository;

const SELECT_ORDER: &str = r#"
    SELECT id, order_guid, total, authorization_transaction_id,
           order_status, payment_status, created_at, paid_at, version
    FROM orders
"#;

/// PostgreSQL implementation of OrderRepository.
#[derive(Clone)]
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    /// Creates a new PostgresOrderRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_items(&self, order_id: i64) -> Result<Vec<OrderItem>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT product_name, quantity
            FROM order_items
            WHERE order_id = $1
            ORDER BY position
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch order items", e))?;

        rows.into_iter()
            .map(|row| {
                let product_name: String = get(&row, "product_name")?;
                let quantity: i32 = get(&row, "quantity")?;
                Ok(OrderItem::new(product_name, u32::try_from(quantity).unwrap_or(0)))
            })
            .collect()
    }

    async fn hydrate(&self, row: Option<PgRow>) -> Result<Option<Order>, DomainError> {
        match row {
            Some(row) => {
                let mut order = row_to_order(&row)?;
                order.items = self.load_items(order.id.as_i64()).await?;
                Ok(Some(order))
            }
            None => Ok(None),
        }
    }

    async fn exists(&self, id: OrderId) -> Result<bool, DomainError> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders WHERE id = $1")
            .bind(id.as_i64())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to check order existence", e))?;

        Ok(result.0 > 0)
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, DomainError> {
        let row = sqlx::query(&format!("{} WHERE id = $1", SELECT_ORDER))
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to fetch order", e))?;

        self.hydrate(row).await
    }

    async fn find_by_guid(&self, guid: &OrderGuid) -> Result<Option<Order>, DomainError> {
        let row = sqlx::query(&format!("{} WHERE order_guid = $1", SELECT_ORDER))
            .bind(guid.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to fetch order", e))?;

        self.hydrate(row).await
    }

    async fn update(&self, order: &mut Order) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE orders SET
                authorization_transaction_id = $3,
                order_status = $4,
                payment_status = $5,
                paid_at = $6,
                version = version + 1
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(order.id.as_i64())
        .bind(order.version)
        .bind(order.authorization_transaction_id.as_deref())
        .bind(order_status_to_str(order.order_status))
        .bind(payment_status_to_str(order.payment_status))
        .bind(order.paid_at.map(|t| *t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update order", e))?;

        if result.rows_affected() == 0 {
            if self.exists(order.id).await? {
                return Err(DomainError::new(
                    ErrorCode::ConcurrentModification,
                    format!("Order {} was modified concurrently", order.id),
                )
                .with_detail("expected_version", order.version.to_string()));
            }
            return Err(DomainError::new(
                ErrorCode::OrderNotFound,
                format!("Order not found: {}", order.id),
            ));
        }

        order.version += 1;
        Ok(())
    }
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

fn get<'r, T>(row: &'r PgRow, column: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(column)
        .map_err(|e| db_error(&format!("Failed to get {}", column), e))
}

fn order_status_to_str(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "pending",
        OrderStatus::Processing => "processing",
        OrderStatus::Complete => "complete",
        OrderStatus::Cancelled => "cancelled",
    }
}

fn str_to_order_status(s: &str) -> Result<OrderStatus, DomainError> {
    match s {
        "pending" => Ok(OrderStatus::Pending),
        "processing" => Ok(OrderStatus::Processing),
        "complete" => Ok(OrderStatus::Complete),
        "cancelled" => Ok(OrderStatus::Cancelled),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid order status: {}", s),
        )),
    }
}

fn payment_status_to_str(status: PaymentStatus) -> &'static str {
    match status {
        PaymentStatus::Pending => "pending",
        PaymentStatus::Authorized => "authorized",
        PaymentStatus::Paid => "paid",
        PaymentStatus::PartiallyRefunded => "partially_refunded",
        PaymentStatus::Refunded => "refunded",
        PaymentStatus::Voided => "voided",
    }
}

fn str_to_payment_status(s: &str) -> Result<PaymentStatus, DomainError> {
    match s {
        "pending" => Ok(PaymentStatus::Pending),
        "authorized" => Ok(PaymentStatus::Authorized),
        "paid" => Ok(PaymentStatus::Paid),
        "partially_refunded" => Ok(PaymentStatus::PartiallyRefunded),
        "refunded" => Ok(PaymentStatus::Refunded),
        "voided" => Ok(PaymentStatus::Voided),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid payment status: {}", s),
        )),
    }
}

fn row_to_order(row: &PgRow) -> Result<Order, DomainError> {
    let id: i64 = get(row, "id")?;
    let id = OrderId::new(id).map_err(|e| {
        DomainError::new(ErrorCode::DatabaseError, format!("Invalid order id: {}", e))
    })?;

    let order_guid: uuid::Uuid = get(row, "order_guid")?;
    let total: Decimal = get(row, "total")?;
    let authorization_transaction_id: Option<String> = get(row, "authorization_transaction_id")?;

    let order_status: String = get(row, "order_status")?;
    let payment_status: String = get(row, "payment_status")?;

    let created_at: chrono::DateTime<chrono::Utc> = get(row, "created_at")?;
    let paid_at: Option<chrono::DateTime<chrono::Utc>> = get(row, "paid_at")?;
    let version: i32 = get(row, "version")?;

    Ok(Order {
        id,
        order_guid: OrderGuid::from_uuid(order_guid),
        total: Amount::new(total),
        authorization_transaction_id,
        order_status: str_to_order_status(&order_status)?,
        payment_status: str_to_payment_status(&payment_status)?,
        items: Vec::new(),
        created_at: Timestamp::from_datetime(created_at),
        paid_at: paid_at.map(Timestamp::from_datetime),
        version,
    })
}
