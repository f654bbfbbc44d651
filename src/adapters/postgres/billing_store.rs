//! PostgreSQL implementation of BillingStore and SubscriptionReader.
//!
//! A batch is applied inside one transaction; any failing write rolls the
//! whole batch back. Upserts rely on the unique index on
//! `subscriptions.user_id`. Writes against an existing row update only the
//! columns they own, so two deliveries racing on one user cannot write back
//! each other's stale values.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use super::db_error;
use crate::domain::billing::{BillingInterval, Subscription, SubscriptionStatus};
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::{BillingBatch, BillingStore, BillingWrite, SubscriptionReader};

pub struct PostgresBillingStore {
    pool: PgPool,
}

impl PostgresBillingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a subscription.
#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    user_id: String,
    stripe_subscription_id: String,
    stripe_price_id: Option<String>,
    stripe_customer_id: String,
    status: String,
    plan_id: String,
    billing_interval: Option<String>,
    current_period_start: DateTime<Utc>,
    current_period_end: DateTime<Utc>,
    cancel_at_period_end: bool,
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = DomainError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        Ok(Subscription {
            user_id: UserId::new(row.user_id).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid user_id: {}", e))
            })?,
            stripe_subscription_id: row.stripe_subscription_id,
            stripe_price_id: row.stripe_price_id,
            stripe_customer_id: row.stripe_customer_id,
            status: SubscriptionStatus::parse(&row.status),
            plan_id: row.plan_id,
            interval: row
                .billing_interval
                .as_deref()
                .and_then(|i| i.parse::<BillingInterval>().ok()),
            current_period_start: Timestamp::from_datetime(row.current_period_start),
            current_period_end: Timestamp::from_datetime(row.current_period_end),
            cancel_at_period_end: row.cancel_at_period_end,
        })
    }
}

fn interval_str(interval: Option<BillingInterval>) -> Option<&'static str> {
    interval.map(|i| i.as_str())
}

fn subscription_not_found(user_id: &UserId) -> DomainError {
    DomainError::new(ErrorCode::SubscriptionNotFound, "Subscription not found")
        .with_detail("user_id", user_id.as_str())
}

const INSERT_SUBSCRIPTION: &str = r#"
    INSERT INTO subscriptions (
        user_id, stripe_subscription_id, stripe_price_id, stripe_customer_id,
        status, plan_id, billing_interval, current_period_start,
        current_period_end, cancel_at_period_end
    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
"#;

async fn insert_subscription(
    conn: &mut PgConnection,
    sub: &Subscription,
    on_conflict: &str,
) -> Result<(), DomainError> {
    let sql = format!("{} {}", INSERT_SUBSCRIPTION, on_conflict);
    sqlx::query(&sql)
        .bind(sub.user_id.as_str())
        .bind(&sub.stripe_subscription_id)
        .bind(&sub.stripe_price_id)
        .bind(&sub.stripe_customer_id)
        .bind(sub.status.as_str())
        .bind(&sub.plan_id)
        .bind(interval_str(sub.interval))
        .bind(sub.current_period_start.as_datetime())
        .bind(sub.current_period_end.as_datetime())
        .bind(sub.cancel_at_period_end)
        .execute(&mut *conn)
        .await
        .map_err(db_error("Failed to upsert subscription"))?;
    Ok(())
}

async fn apply(conn: &mut PgConnection, write: BillingWrite) -> Result<(), DomainError> {
    match write {
        BillingWrite::LinkCustomer {
            user_id,
            customer_id,
        } => {
            let result = sqlx::query(
                "UPDATE users SET stripe_customer_id = $2, updated_at = now() WHERE id = $1",
            )
            .bind(user_id.as_str())
            .bind(&customer_id)
            .execute(&mut *conn)
            .await
            .map_err(db_error("Failed to link customer"))?;

            if result.rows_affected() == 0 {
                return Err(DomainError::new(ErrorCode::UserNotFound, "User not found")
                    .with_detail("user_id", user_id.as_str()));
            }
        }
        BillingWrite::PutSubscription(sub) => {
            insert_subscription(
                conn,
                &sub,
                r#"
                ON CONFLICT (user_id) DO UPDATE SET
                    stripe_subscription_id = EXCLUDED.stripe_subscription_id,
                    stripe_price_id = EXCLUDED.stripe_price_id,
                    stripe_customer_id = EXCLUDED.stripe_customer_id,
                    status = EXCLUDED.status,
                    plan_id = EXCLUDED.plan_id,
                    billing_interval = EXCLUDED.billing_interval,
                    current_period_start = EXCLUDED.current_period_start,
                    current_period_end = EXCLUDED.current_period_end,
                    cancel_at_period_end = EXCLUDED.cancel_at_period_end,
                    updated_at = now()
                "#,
            )
            .await?;
        }
        BillingWrite::SyncSubscription(sub) => {
            insert_subscription(
                conn,
                &sub,
                r#"
                ON CONFLICT (user_id) DO UPDATE SET
                    stripe_price_id = EXCLUDED.stripe_price_id,
                    status = EXCLUDED.status,
                    plan_id = EXCLUDED.plan_id,
                    current_period_start = EXCLUDED.current_period_start,
                    current_period_end = EXCLUDED.current_period_end,
                    updated_at = now()
                "#,
            )
            .await?;
        }
        BillingWrite::CancelSubscription { user_id } => {
            let result = sqlx::query(
                r#"
                UPDATE subscriptions
                SET status = $2, cancel_at_period_end = TRUE, updated_at = now()
                WHERE user_id = $1
                "#,
            )
            .bind(user_id.as_str())
            .bind(SubscriptionStatus::Cancelled.as_str())
            .execute(&mut *conn)
            .await
            .map_err(db_error("Failed to cancel subscription"))?;

            if result.rows_affected() == 0 {
                return Err(subscription_not_found(&user_id));
            }
        }
        BillingWrite::MarkPastDue { user_id } => {
            sqlx::query(
                r#"
                UPDATE subscriptions
                SET status = $2, updated_at = now()
                WHERE user_id = $1 AND status <> $3
                "#,
            )
            .bind(user_id.as_str())
            .bind(SubscriptionStatus::PastDue.as_str())
            .bind(SubscriptionStatus::Cancelled.as_str())
            .execute(&mut *conn)
            .await
            .map_err(db_error("Failed to mark subscription past due"))?;
        }
        BillingWrite::RefreshSubscription {
            user_id,
            status,
            current_period_end,
        } => {
            let result = sqlx::query(
                r#"
                UPDATE subscriptions
                SET status = $2, current_period_end = $3, updated_at = now()
                WHERE user_id = $1
                "#,
            )
            .bind(user_id.as_str())
            .bind(status.as_str())
            .bind(current_period_end.as_datetime())
            .execute(&mut *conn)
            .await
            .map_err(db_error("Failed to refresh subscription"))?;

            if result.rows_affected() == 0 {
                return Err(subscription_not_found(&user_id));
            }
        }
        BillingWrite::AppendSubscriptionEvent(record) => {
            sqlx::query(
                r#"
                INSERT INTO subscription_events (
                    event_type, customer_id, subscription_id, status, plan_id,
                    amount, billing_interval, currency, occurred_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(&record.event_type)
            .bind(&record.customer_id)
            .bind(&record.subscription_id)
            .bind(&record.status)
            .bind(&record.plan_id)
            .bind(record.amount)
            .bind(interval_str(record.interval))
            .bind(&record.currency)
            .bind(record.occurred_at.as_datetime())
            .execute(&mut *conn)
            .await
            .map_err(db_error("Failed to append subscription event"))?;
        }
        BillingWrite::AppendRevenue(entry) => {
            sqlx::query(
                r#"
                INSERT INTO revenue (customer_id, amount, currency, invoice_id, subscription_id, occurred_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(&entry.customer_id)
            .bind(entry.amount)
            .bind(&entry.currency)
            .bind(&entry.invoice_id)
            .bind(&entry.subscription_id)
            .bind(entry.occurred_at.as_datetime())
            .execute(&mut *conn)
            .await
            .map_err(db_error("Failed to append revenue"))?;
        }
        BillingWrite::AppendCharge(entry) => {
            sqlx::query(
                r#"
                INSERT INTO charges (customer_id, amount, currency, charge_id, occurred_at)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(&entry.customer_id)
            .bind(entry.amount)
            .bind(&entry.currency)
            .bind(&entry.charge_id)
            .bind(entry.occurred_at.as_datetime())
            .execute(&mut *conn)
            .await
            .map_err(db_error("Failed to append charge"))?;
        }
    }
    Ok(())
}

#[async_trait]
impl BillingStore for PostgresBillingStore {
    async fn commit(&self, batch: BillingBatch) -> Result<(), DomainError> {
        if batch.is_empty() {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        for write in batch.into_writes() {
            apply(&mut tx, write).await?;
        }

        tx.commit()
            .await
            .map_err(db_error("Failed to commit billing batch"))
    }
}

#[async_trait]
impl SubscriptionReader for PostgresBillingStore {
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<Subscription>, DomainError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(
            r#"
            SELECT user_id, stripe_subscription_id, stripe_price_id, stripe_customer_id,
                   status, plan_id, billing_interval, current_period_start,
                   current_period_end, cancel_at_period_end
            FROM subscriptions
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find subscription"))?;

        row.map(Subscription::try_from).transpose()
    }
}
