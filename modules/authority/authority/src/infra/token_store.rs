//! In-process [`TokenStore`] keyed by user id.
//!
//! Each user's tokens live in one `DashMap` entry, so every operation on a
//! user runs under that entry's shard lock. `consume_refresh_token` removes
//! the token while holding it, which makes rotation single-winner.
//!
//! Expired tokens are pruned whenever a user's entry is written or consumed,
//! and [`run_token_sweeper`] drops the entries of users who never come back.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use time::OffsetDateTime;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use crate::domain::error::DomainError;
use crate::domain::repo::TokenStore;

#[derive(Debug, Default)]
struct UserTokens {
    access: HashMap<String, OffsetDateTime>,
    refresh: HashMap<String, OffsetDateTime>,
}

impl UserTokens {
    fn prune(&mut self, now: OffsetDateTime) {
        self.access.retain(|_, exp| *exp > now);
        self.refresh.retain(|_, exp| *exp > now);
    }

    fn is_empty(&self) -> bool {
        self.access.is_empty() && self.refresh.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    users: DashMap<u32, UserTokens>,
}

impl InMemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live refresh tokens recorded for `user_id`.
    #[must_use]
    pub fn refresh_count(&self, user_id: u32) -> usize {
        let now = OffsetDateTime::now_utc();
        self.users.get(&user_id).map_or(0, |tokens| {
            tokens.refresh.values().filter(|exp| **exp > now).count()
        })
    }

    /// Number of users with an entry, live or not.
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Prune expired tokens of every user and drop entries left empty.
    ///
    /// Returns the number of entries dropped.
    pub fn sweep_expired(&self) -> usize {
        let now = OffsetDateTime::now_utc();
        let before = self.users.len();
        self.users.retain(|_, tokens| {
            tokens.prune(now);
            !tokens.is_empty()
        });
        before.saturating_sub(self.users.len())
    }
}

/// Sweep `store` every `every` until `cancel` fires.
pub async fn run_token_sweeper(
    store: Arc<InMemoryTokenStore>,
    every: std::time::Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(every);
    // The first tick completes immediately; there is nothing to sweep yet.
    interval.tick().await;

    loop {
        tokio::select! {
            () = cancel.cancelled() => {
                info!("token sweeper shutting down");
                break;
            }
            _ = interval.tick() => {
                let dropped = store.sweep_expired();
                if dropped > 0 {
                    debug!(dropped, "expired token entries swept");
                }
            }
        }
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn save_access_token(
        &self,
        user_id: u32,
        token: &str,
        expires_at: OffsetDateTime,
    ) -> Result<(), DomainError> {
        let mut entry = self.users.entry(user_id).or_default();
        entry.prune(OffsetDateTime::now_utc());
        entry.access.insert(token.to_owned(), expires_at);
        Ok(())
    }

    async fn save_refresh_token(
        &self,
        user_id: u32,
        token: &str,
        expires_at: OffsetDateTime,
    ) -> Result<(), DomainError> {
        let mut entry = self.users.entry(user_id).or_default();
        entry.prune(OffsetDateTime::now_utc());
        entry.refresh.insert(token.to_owned(), expires_at);
        Ok(())
    }

    async fn refresh_token_exists(&self, user_id: u32, token: &str) -> Result<bool, DomainError> {
        let now = OffsetDateTime::now_utc();
        Ok(self
            .users
            .get(&user_id)
            .and_then(|tokens| tokens.refresh.get(token).copied())
            .is_some_and(|exp| exp > now))
    }

    async fn remove_refresh_token(&self, user_id: u32, token: &str) -> Result<bool, DomainError> {
        Ok(self
            .users
            .get_mut(&user_id)
            .is_some_and(|mut tokens| tokens.refresh.remove(token).is_some()))
    }

    async fn consume_refresh_token(
        &self,
        user_id: u32,
        token: &str,
    ) -> Result<bool, DomainError> {
        let now = OffsetDateTime::now_utc();
        let (consumed, emptied) = self
            .users
            .get_mut(&user_id)
            .map_or((false, false), |mut tokens| {
                let consumed = tokens.refresh.remove(token).is_some_and(|exp| exp > now);
                tokens.prune(now);
                (consumed, tokens.is_empty())
            });
        if emptied {
            // Re-checked under the shard lock; a concurrent save keeps the entry.
            self.users.remove_if(&user_id, |_, tokens| tokens.is_empty());
        }
        trace!(user_id, consumed, "refresh token consume");
        Ok(consumed)
    }

    async fn remove_all(&self, user_id: u32) -> Result<(), DomainError> {
        self.users.remove(&user_id);
        Ok(())
    }
}
