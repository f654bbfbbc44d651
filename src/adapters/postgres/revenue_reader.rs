//! PostgreSQL implementation of RevenueReader.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::db_error;
use crate::domain::billing::{BillingInterval, SubscriptionEventRecord};
use crate::domain::foundation::{DomainError, Timestamp};
use crate::ports::RevenueReader;

pub struct PostgresRevenueReader {
    pool: PgPool,
}

impl PostgresRevenueReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SubscriptionEventRow {
    event_type: String,
    customer_id: String,
    subscription_id: String,
    status: String,
    plan_id: Option<String>,
    amount: Option<i64>,
    billing_interval: Option<String>,
    currency: Option<String>,
    occurred_at: DateTime<Utc>,
}

impl From<SubscriptionEventRow> for SubscriptionEventRecord {
    fn from(row: SubscriptionEventRow) -> Self {
        SubscriptionEventRecord {
            event_type: row.event_type,
            customer_id: row.customer_id,
            subscription_id: row.subscription_id,
            status: row.status,
            plan_id: row.plan_id,
            amount: row.amount,
            interval: row
                .billing_interval
                .as_deref()
                .and_then(|i| i.parse::<BillingInterval>().ok()),
            currency: row.currency,
            occurred_at: Timestamp::from_datetime(row.occurred_at),
        }
    }
}

#[async_trait]
impl RevenueReader for PostgresRevenueReader {
    async fn subscription_created_events(&self) -> Result<Vec<SubscriptionEventRecord>, DomainError> {
        let rows: Vec<SubscriptionEventRow> = sqlx::query_as(
            r#"
            SELECT event_type, customer_id, subscription_id, status, plan_id,
                   amount, billing_interval, currency, occurred_at
            FROM subscription_events
            WHERE event_type = 'customer.subscription.created'
            ORDER BY occurred_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to load subscription events"))?;

        Ok(rows.into_iter().map(SubscriptionEventRecord::from).collect())
    }

    async fn revenue_between(&self, from: Timestamp, to: Timestamp) -> Result<i64, DomainError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(amount), 0)::BIGINT
            FROM revenue
            WHERE occurred_at >= $1 AND occurred_at < $2
            "#,
        )
        .bind(from.as_datetime())
        .bind(to.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to sum revenue"))
    }
}
