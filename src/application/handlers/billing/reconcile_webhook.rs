//! ReconcileWebhookHandler - Command handler for payment provider webhooks.
//!
//! Verifies the delivery, reads the state each event needs, computes a
//! `BillingBatch` and commits it in one transaction. Any failure aborts the
//! whole event and is surfaced so the provider redelivers.

use std::sync::Arc;

use crate::domain::account::User;
use crate::domain::billing::{
    ChargeEntry, CheckoutCompleted, InvoicePayment, ProviderEvent, RevenueEntry,
    StripeWebhookVerifier, Subscription, SubscriptionEventRecord, SubscriptionSnapshot,
    VerifiedEvent, WebhookError,
};
use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::ports::{
    BillingBatch, BillingStore, BillingWrite, PaymentProvider, SubscriptionReader, UserRepository,
};

/// Command to reconcile one webhook delivery.
#[derive(Debug, Clone)]
pub struct ReconcileWebhookCommand {
    /// Raw request body, exactly as signed.
    pub payload: Vec<u8>,
    /// `Stripe-Signature` header value.
    pub signature: Option<String>,
}

/// Result of webhook reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Writes were committed.
    Applied { event_id: String, writes: usize },
    /// Handled kind that required no change (e.g. one-off checkout).
    Acknowledged { event_id: String },
    /// Unrecognized event type.
    Ignored { event_id: String, event_type: String },
}

pub struct ReconcileWebhookHandler {
    verifier: Arc<StripeWebhookVerifier>,
    users: Arc<dyn UserRepository>,
    subscriptions: Arc<dyn SubscriptionReader>,
    store: Arc<dyn BillingStore>,
    payment_provider: Arc<dyn PaymentProvider>,
}

impl ReconcileWebhookHandler {
    pub fn new(
        verifier: Arc<StripeWebhookVerifier>,
        users: Arc<dyn UserRepository>,
        subscriptions: Arc<dyn SubscriptionReader>,
        store: Arc<dyn BillingStore>,
        payment_provider: Arc<dyn PaymentProvider>,
    ) -> Self {
        Self {
            verifier,
            users,
            subscriptions,
            store,
            payment_provider,
        }
    }

    pub async fn handle(&self, cmd: ReconcileWebhookCommand) -> Result<ReconcileOutcome, WebhookError> {
        let signature = cmd.signature.as_deref().ok_or(WebhookError::MissingSignature)?;

        let event = self
            .verifier
            .verify_and_parse(&cmd.payload, signature)
            .and_then(|raw| raw.into_verified())
            .map_err(|e| {
                tracing::warn!("Rejected webhook delivery: {}", e);
                e
            })?;

        self.apply(event).await
    }

    /// Applies an already verified event.
    pub async fn apply(&self, event: VerifiedEvent) -> Result<ReconcileOutcome, WebhookError> {
        tracing::info!(
            event_id = %event.id,
            event_type = %event.event_type,
            livemode = event.livemode,
            "Processing webhook event"
        );

        if event.kind == ProviderEvent::Unrecognized {
            tracing::debug!(event_type = %event.event_type, "Ignoring unhandled event type");
            return Ok(ReconcileOutcome::Ignored {
                event_id: event.id,
                event_type: event.event_type,
            });
        }

        let batch = self.plan(&event).await.map_err(|e| {
            log_failure(&event, &e);
            e
        })?;

        if batch.is_empty() {
            return Ok(ReconcileOutcome::Acknowledged { event_id: event.id });
        }

        let writes = batch.len();
        self.store.commit(batch).await.map_err(|e| {
            let err = commit_error(e);
            log_failure(&event, &err);
            err
        })?;

        Ok(ReconcileOutcome::Applied {
            event_id: event.id,
            writes,
        })
    }

    async fn plan(&self, event: &VerifiedEvent) -> Result<BillingBatch, WebhookError> {
        let mut batch = BillingBatch::new();

        match &event.kind {
            ProviderEvent::SubscriptionCreated(snapshot)
            | ProviderEvent::SubscriptionUpdated(snapshot) => {
                let user = self.user_for_customer(Some(&snapshot.customer_id)).await?;

                let subscription = Subscription::from_snapshot(user.id, snapshot);
                batch.push(BillingWrite::SyncSubscription(subscription));
                batch.push(audit(event, snapshot));
            }

            ProviderEvent::SubscriptionDeleted(snapshot) => {
                let user = self.user_for_customer(Some(&snapshot.customer_id)).await?;
                self.subscription_of(&user.id)
                    .await?
                    .ok_or(WebhookError::SubscriptionNotFound)?;

                batch.push(BillingWrite::CancelSubscription { user_id: user.id });
                batch.push(audit(event, snapshot));
            }

            ProviderEvent::CheckoutCompleted(checkout) => {
                self.plan_checkout(checkout, &mut batch).await?;
            }

            ProviderEvent::InvoicePaid(invoice) => {
                batch.push(BillingWrite::AppendRevenue(RevenueEntry {
                    customer_id: invoice.customer_id.clone(),
                    amount: invoice.amount_paid,
                    currency: invoice.currency.clone(),
                    invoice_id: invoice.invoice_id.clone(),
                    subscription_id: invoice.subscription_id.clone(),
                    occurred_at: event.created,
                }));
                self.plan_invoice_refresh(invoice, &mut batch).await?;
            }

            ProviderEvent::InvoicePaymentFailed(invoice) => {
                let user = self.user_for_customer(invoice.customer_id.as_deref()).await?;
                let subscription = self
                    .subscription_of(&user.id)
                    .await?
                    .ok_or(WebhookError::SubscriptionNotFound)?;

                if subscription.status.is_terminal() {
                    tracing::info!(
                        user_id = %user.id,
                        "Payment failure for cancelled subscription left unchanged"
                    );
                } else {
                    batch.push(BillingWrite::MarkPastDue { user_id: user.id });
                }
            }

            ProviderEvent::ChargeSucceeded(charge) => {
                batch.push(BillingWrite::AppendCharge(ChargeEntry {
                    customer_id: charge.customer_id.clone(),
                    amount: charge.amount,
                    currency: charge.currency.clone(),
                    charge_id: charge.charge_id.clone(),
                    occurred_at: event.created,
                }));
            }

            ProviderEvent::Unrecognized => {}
        }

        Ok(batch)
    }

    async fn plan_checkout(
        &self,
        checkout: &CheckoutCompleted,
        batch: &mut BillingBatch,
    ) -> Result<(), WebhookError> {
        if !checkout.is_subscription() {
            tracing::debug!(mode = %checkout.mode, "Checkout is not a subscription, nothing to do");
            return Ok(());
        }

        let user_id = checkout
            .user_id
            .as_deref()
            .ok_or(WebhookError::MissingMetadata("userId"))
            .and_then(|id| UserId::new(id).map_err(|_| WebhookError::MissingMetadata("userId")))?;
        let subscription_id = checkout
            .subscription_id
            .as_deref()
            .ok_or(WebhookError::MissingField("subscription"))?;

        let user = self
            .users
            .find_by_id(&user_id)
            .await
            .map_err(database)?
            .ok_or(WebhookError::UserNotFound)?;

        let snapshot = self.retrieve(subscription_id).await?;
        let customer_id = checkout
            .customer_id
            .clone()
            .unwrap_or_else(|| snapshot.customer_id.clone());

        let mut subscription = Subscription::from_snapshot(user.id.clone(), &snapshot);
        subscription.stripe_customer_id = customer_id.clone();

        batch.push(BillingWrite::LinkCustomer {
            user_id: user.id,
            customer_id,
        });
        batch.push(BillingWrite::PutSubscription(subscription));
        Ok(())
    }

    async fn plan_invoice_refresh(
        &self,
        invoice: &InvoicePayment,
        batch: &mut BillingBatch,
    ) -> Result<(), WebhookError> {
        let Some(subscription_id) = invoice.subscription_id.as_deref() else {
            return Ok(());
        };

        let snapshot = self.retrieve(subscription_id).await?;
        let user = self.user_for_customer(invoice.customer_id.as_deref()).await?;
        if self.subscription_of(&user.id).await?.is_none() {
            tracing::debug!(
                user_id = %user.id,
                invoice_id = %invoice.invoice_id,
                "No local subscription yet, recording revenue only"
            );
            return Ok(());
        }

        batch.push(BillingWrite::RefreshSubscription {
            user_id: user.id,
            status: snapshot.status,
            current_period_end: snapshot.current_period_end,
        });
        Ok(())
    }

    async fn user_for_customer(&self, customer_id: Option<&str>) -> Result<User, WebhookError> {
        let Some(customer_id) = customer_id else {
            return Err(WebhookError::UserNotFound);
        };

        self.users
            .find_by_customer_id(customer_id)
            .await
            .map_err(database)?
            .ok_or_else(|| {
                tracing::warn!(customer_id = %customer_id, "No user found for customer");
                WebhookError::UserNotFound
            })
    }

    async fn subscription_of(&self, user_id: &UserId) -> Result<Option<Subscription>, WebhookError> {
        self.subscriptions.find_by_user(user_id).await.map_err(database)
    }

    async fn retrieve(&self, subscription_id: &str) -> Result<SubscriptionSnapshot, WebhookError> {
        self.payment_provider
            .retrieve_subscription(subscription_id)
            .await
            .map_err(|e| WebhookError::Provider(e.to_string()))
    }
}

fn audit(event: &VerifiedEvent, snapshot: &SubscriptionSnapshot) -> BillingWrite {
    BillingWrite::AppendSubscriptionEvent(SubscriptionEventRecord::from_snapshot(
        event.event_type.clone(),
        snapshot,
        event.created,
    ))
}

fn database(err: DomainError) -> WebhookError {
    WebhookError::Database(err.to_string())
}

/// A targeted write that matched no row surfaces as the matching not-found.
fn commit_error(err: DomainError) -> WebhookError {
    match err.code {
        ErrorCode::UserNotFound => WebhookError::UserNotFound,
        ErrorCode::SubscriptionNotFound => WebhookError::SubscriptionNotFound,
        _ => database(err),
    }
}

fn log_failure(event: &VerifiedEvent, err: &WebhookError) {
    if err.status_code().is_server_error() {
        tracing::error!(event_id = %event.id, event_type = %event.event_type, "Webhook processing failed: {}", err);
    } else {
        tracing::warn!(event_id = %event.id, event_type = %event.event_type, "Webhook event rejected: {}", err);
    }
}
