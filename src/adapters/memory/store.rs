//! In-memory credential and billing store.
//!
//! Implements every persistence port over one shared state so tests can
//! exercise handlers and the HTTP layer without PostgreSQL. `commit` applies
//! a batch to a copy of the state and swaps it in, so a failed batch leaves
//! nothing behind.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::domain::account::{ApiKey, Session, User};
use crate::domain::billing::{ChargeEntry, RevenueEntry, Subscription, SubscriptionEventRecord};
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::{
    ApiKeyRepository, BillingBatch, BillingStore, BillingWrite, RevenueReader, SessionStore,
    SubscriptionReader, UserRepository,
};

#[derive(Debug, Clone, Default)]
struct State {
    users: HashMap<UserId, User>,
    subscriptions: HashMap<UserId, Subscription>,
    subscription_events: Vec<SubscriptionEventRecord>,
    revenue: Vec<RevenueEntry>,
    charges: Vec<ChargeEntry>,
    api_keys: HashMap<String, ApiKey>,
    sessions: Vec<Session>,
    commits: usize,
    fail_next_commit: bool,
}

impl State {
    fn apply(&mut self, write: BillingWrite) -> Result<(), DomainError> {
        match write {
            BillingWrite::LinkCustomer {
                user_id,
                customer_id,
            } => {
                let user = self.users.get_mut(&user_id).ok_or_else(|| {
                    DomainError::new(ErrorCode::UserNotFound, "User not found")
                        .with_detail("user_id", user_id.as_str())
                })?;
                user.stripe_customer_id = Some(customer_id);
            }
            BillingWrite::PutSubscription(subscription) => {
                self.subscriptions
                    .insert(subscription.user_id.clone(), subscription);
            }
            BillingWrite::SyncSubscription(incoming) => {
                match self.subscriptions.get_mut(&incoming.user_id) {
                    Some(current) => current.sync_from(&incoming),
                    None => {
                        self.subscriptions.insert(incoming.user_id.clone(), incoming);
                    }
                }
            }
            BillingWrite::CancelSubscription { user_id } => {
                self.subscription_mut(&user_id)?.cancel();
            }
            BillingWrite::MarkPastDue { user_id } => {
                if let Some(subscription) = self.subscriptions.get_mut(&user_id) {
                    subscription.mark_past_due();
                }
            }
            BillingWrite::RefreshSubscription {
                user_id,
                status,
                current_period_end,
            } => {
                self.subscription_mut(&user_id)?
                    .refresh_after_payment(status, current_period_end);
            }
            BillingWrite::AppendSubscriptionEvent(record) => self.subscription_events.push(record),
            BillingWrite::AppendRevenue(entry) => self.revenue.push(entry),
            BillingWrite::AppendCharge(entry) => self.charges.push(entry),
        }
        Ok(())
    }

    fn subscription_mut(&mut self, user_id: &UserId) -> Result<&mut Subscription, DomainError> {
        self.subscriptions.get_mut(user_id).ok_or_else(|| {
            DomainError::new(ErrorCode::SubscriptionNotFound, "Subscription not found")
                .with_detail("user_id", user_id.as_str())
        })
    }
}

/// Shared in-memory store. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    // ══════════════════════════════════════════════════════════════
    // Seeding
    // ══════════════════════════════════════════════════════════════

    pub fn insert_user(&self, user: User) {
        self.write().users.insert(user.id.clone(), user);
    }

    /// Convenience seeding for tests and local runs.
    pub fn add_user(&self, id: &str, email: &str, password_hash: &str, customer_id: Option<&str>) {
        if let Ok(user_id) = UserId::new(id) {
            self.insert_user(User {
                id: user_id,
                email: email.to_string(),
                password_hash: password_hash.to_string(),
                name: None,
                stripe_customer_id: customer_id.map(str::to_string),
            });
        }
    }

    pub fn insert_subscription(&self, subscription: Subscription) {
        self.write()
            .subscriptions
            .insert(subscription.user_id.clone(), subscription);
    }

    pub fn insert_api_key(&self, key: ApiKey) {
        self.write().api_keys.insert(key.key.clone(), key);
    }

    pub fn insert_subscription_event(&self, record: SubscriptionEventRecord) {
        self.write().subscription_events.push(record);
    }

    pub fn insert_revenue(&self, entry: RevenueEntry) {
        self.write().revenue.push(entry);
    }

    /// Makes the next `commit` fail after applying part of its batch.
    pub fn fail_next_commit(&self) {
        self.write().fail_next_commit = true;
    }

    // ══════════════════════════════════════════════════════════════
    // Inspection
    // ══════════════════════════════════════════════════════════════

    pub fn user(&self, id: &UserId) -> Option<User> {
        self.read().users.get(id).cloned()
    }

    pub fn subscription(&self, user_id: &UserId) -> Option<Subscription> {
        self.read().subscriptions.get(user_id).cloned()
    }

    pub fn subscription_events(&self) -> Vec<SubscriptionEventRecord> {
        self.read().subscription_events.clone()
    }

    pub fn revenue_entries(&self) -> Vec<RevenueEntry> {
        self.read().revenue.clone()
    }

    pub fn charges(&self) -> Vec<ChargeEntry> {
        self.read().charges.clone()
    }

    pub fn api_key(&self, key: &str) -> Option<ApiKey> {
        self.read().api_keys.get(key).cloned()
    }

    pub fn sessions(&self) -> Vec<Session> {
        self.read().sessions.clone()
    }

    /// Number of successful commits.
    pub fn commit_count(&self) -> usize {
        self.read().commits
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        Ok(self.read().users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self.read().users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_customer_id(&self, customer_id: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .read()
            .users
            .values()
            .find(|u| u.stripe_customer_id.as_deref() == Some(customer_id))
            .cloned())
    }
}

#[async_trait]
impl SubscriptionReader for InMemoryStore {
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<Subscription>, DomainError> {
        Ok(self.read().subscriptions.get(user_id).cloned())
    }
}

#[async_trait]
impl BillingStore for InMemoryStore {
    async fn commit(&self, batch: BillingBatch) -> Result<(), DomainError> {
        let mut guard = self.write();
        let mut next = guard.clone();

        let fail = std::mem::take(&mut guard.fail_next_commit);
        next.fail_next_commit = false;

        let mut writes = batch.into_writes().into_iter();
        if let Some(first) = writes.next() {
            next.apply(first)?;
        }
        if fail {
            return Err(DomainError::database("injected commit failure"));
        }
        for write in writes {
            next.apply(write)?;
        }

        next.commits += 1;
        *guard = next;
        Ok(())
    }
}

#[async_trait]
impl RevenueReader for InMemoryStore {
    async fn subscription_created_events(&self) -> Result<Vec<SubscriptionEventRecord>, DomainError> {
        Ok(self
            .read()
            .subscription_events
            .iter()
            .filter(|e| e.event_type == "customer.subscription.created")
            .cloned()
            .collect())
    }

    async fn revenue_between(&self, from: Timestamp, to: Timestamp) -> Result<i64, DomainError> {
        Ok(self
            .read()
            .revenue
            .iter()
            .filter(|r| !r.occurred_at.is_before(&from) && r.occurred_at.is_before(&to))
            .map(|r| r.amount)
            .sum())
    }
}

#[async_trait]
impl ApiKeyRepository for InMemoryStore {
    async fn find_by_key(&self, key: &str) -> Result<Option<ApiKey>, DomainError> {
        Ok(self.read().api_keys.get(key).cloned())
    }

    async fn touch_last_used(&self, id: &str, at: Timestamp) -> Result<(), DomainError> {
        let mut state = self.write();
        if let Some(key) = state.api_keys.values_mut().find(|k| k.id == id) {
            key.last_used = Some(at);
        }
        Ok(())
    }
}

#[async_trait]
impl SessionStore for InMemoryStore {
    async fn create(&self, session: &Session) -> Result<(), DomainError> {
        self.write().sessions.push(session.clone());
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Session>, DomainError> {
        Ok(self
            .read()
            .sessions
            .iter()
            .find(|s| s.token == token)
            .cloned())
    }
}
