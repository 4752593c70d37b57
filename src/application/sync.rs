//! Optimistic collection synchronizer.
//!
//! One instance per [`CollectionKind`] keeps a client-visible membership
//! set optimistically in sync with the server: load on session change,
//! flip locally before the network settles, roll back on failure.
//!
//! Two deliberate concurrency decisions here:
//! - a second `toggle` for an id whose mutation is still pending fails
//!   fast with [`Error::ToggleInFlight`] instead of racing the server;
//! - every `reload` carries a sequence number, and a completion that is
//!   no longer the newest is discarded so a slow response cannot clobber
//!   fresher data.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::domain::{AuthToken, CollectionKind, Mutation, WineId};
use crate::error::{Error, Result};
use crate::port::outbound::gateway::CatalogGateway;

/// Synchronization state of a collection, for inline display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    Idle,
    Loading,
    /// The last reload failed; the set was reset to empty (fail-safe,
    /// never stale-dangerous).
    Error(String),
}

/// Client-side membership set for one collection kind.
///
/// Holds the session token receiver rather than the session store
/// itself: the token is read-only borrowed state here, and the watch
/// channel is the reload trigger.
pub struct CollectionSync<G> {
    kind: CollectionKind,
    gateway: Arc<G>,
    token_rx: watch::Receiver<Option<AuthToken>>,
    /// Server order is preserved (recency for history); membership is
    /// deduplicated on replace.
    members: RwLock<Vec<WineId>>,
    status: RwLock<SyncStatus>,
    /// Ids with an unsettled mutation.
    pending: Mutex<HashSet<WineId>>,
    reload_seq: AtomicU64,
    last_mutation: RwLock<Option<Mutation>>,
}

impl<G> CollectionSync<G>
where
    G: CatalogGateway,
{
    pub fn new(
        kind: CollectionKind,
        gateway: Arc<G>,
        token_rx: watch::Receiver<Option<AuthToken>>,
    ) -> Self {
        Self {
            kind,
            gateway,
            token_rx,
            members: RwLock::new(Vec::new()),
            status: RwLock::new(SyncStatus::Idle),
            pending: Mutex::new(HashSet::new()),
            reload_seq: AtomicU64::new(0),
            last_mutation: RwLock::new(None),
        }
    }

    #[must_use]
    pub fn kind(&self) -> CollectionKind {
        self.kind
    }

    /// Snapshot of the membership set, in server order.
    #[must_use]
    pub fn member_ids(&self) -> Vec<WineId> {
        self.members.read().clone()
    }

    #[must_use]
    pub fn is_member(&self, id: &WineId) -> bool {
        self.members.read().contains(id)
    }

    #[must_use]
    pub fn status(&self) -> SyncStatus {
        self.status.read().clone()
    }

    /// The most recent mutation and its phase, for observability.
    #[must_use]
    pub fn last_mutation(&self) -> Option<Mutation> {
        self.last_mutation.read().clone()
    }

    fn current_token(&self) -> Option<AuthToken> {
        self.token_rx.borrow().clone()
    }

    /// True when a newer reload has been issued since `seq`.
    fn is_stale(&self, seq: u64) -> bool {
        self.reload_seq.load(Ordering::SeqCst) != seq
    }

    /// Reconcile the local set with the server.
    ///
    /// Without an active session the set is cleared and no network call
    /// is made. On a failed fetch the set is also cleared and the error
    /// recorded in [`status`](Self::status) before being returned, so
    /// callers may render it inline or ignore it.
    pub async fn reload(&self) -> Result<()> {
        let seq = self.reload_seq.fetch_add(1, Ordering::SeqCst) + 1;

        let Some(token) = self.current_token() else {
            self.members.write().clear();
            *self.status.write() = SyncStatus::Idle;
            debug!(kind = %self.kind, "no session, collection cleared");
            return Ok(());
        };

        *self.status.write() = SyncStatus::Loading;
        match self.gateway.fetch_members(self.kind, &token).await {
            Ok(ids) => {
                if self.is_stale(seq) {
                    debug!(kind = %self.kind, seq, "discarding stale reload result");
                    return Ok(());
                }
                let deduped = dedup_preserving_order(ids);
                debug!(kind = %self.kind, count = deduped.len(), "collection reloaded");
                *self.members.write() = deduped;
                *self.status.write() = SyncStatus::Idle;
                Ok(())
            }
            Err(err) => {
                if self.is_stale(seq) {
                    return Ok(());
                }
                warn!(kind = %self.kind, error = %err, "reload failed, collection cleared");
                self.members.write().clear();
                *self.status.write() = SyncStatus::Error(err.to_string());
                Err(err)
            }
        }
    }

    /// Alias for [`reload`](Self::reload), for pull-to-refresh and
    /// focus-triggered resync.
    pub async fn refresh(&self) -> Result<()> {
        self.reload().await
    }

    /// Flip membership of `id`, optimistically.
    ///
    /// The local set reflects the change before the server call settles;
    /// on failure it is reverted and the error propagated. Returns the
    /// new membership value on success.
    ///
    /// # Errors
    ///
    /// [`Error::AuthRequired`] without an active session (no network
    /// call is made), [`Error::ToggleInFlight`] when a mutation for the
    /// same id has not settled, or the gateway's error after rollback.
    pub async fn toggle(&self, id: WineId) -> Result<bool> {
        let Some(token) = self.current_token() else {
            return Err(Error::AuthRequired);
        };

        if !self.pending.lock().insert(id.clone()) {
            return Err(Error::ToggleInFlight { id: id.to_string() });
        }

        let was_member = self.flip(&id);
        *self.last_mutation.write() = Some(Mutation::begin(id.clone(), was_member));

        let result = if was_member {
            self.gateway.remove_member(self.kind, &id, &token).await
        } else {
            self.gateway.add_member(self.kind, &id, &token).await
        };

        let outcome = match result {
            Ok(()) => {
                self.settle(&id, Mutation::commit);
                Ok(!was_member)
            }
            Err(err) => {
                warn!(kind = %self.kind, %id, error = %err, "toggle failed, reverting");
                self.set_membership(&id, was_member);
                self.settle(&id, Mutation::roll_back);
                Err(err)
            }
        };

        self.pending.lock().remove(&id);
        outcome
    }

    /// Reload whenever the session token changes (login, logout, token
    /// rotation). Runs until the session store is dropped. Callers keep
    /// their own handle: `Arc::clone(&sync).spawn_session_watcher()`.
    pub fn spawn_session_watcher(self: Arc<Self>) -> tokio::task::JoinHandle<()>
    where
        G: 'static,
    {
        let sync = self;
        let mut rx = sync.token_rx.clone();
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                if let Err(err) = sync.reload().await {
                    warn!(kind = %sync.kind, error = %err, "reload after session change failed");
                }
            }
        })
    }

    /// Apply the inverse of the current membership. Returns the prior
    /// membership.
    fn flip(&self, id: &WineId) -> bool {
        let mut members = self.members.write();
        if let Some(position) = members.iter().position(|m| m == id) {
            members.remove(position);
            true
        } else {
            members.push(id.clone());
            false
        }
    }

    fn set_membership(&self, id: &WineId, member: bool) {
        let mut members = self.members.write();
        let position = members.iter().position(|m| m == id);
        match (member, position) {
            (true, None) => members.push(id.clone()),
            (false, Some(index)) => {
                members.remove(index);
            }
            _ => {}
        }
    }

    fn settle(&self, id: &WineId, transition: fn(&mut Mutation)) {
        let mut last = self.last_mutation.write();
        if let Some(mutation) = last.as_mut() {
            if mutation.id() == id && !mutation.is_settled() {
                transition(mutation);
            }
        }
    }
}

fn dedup_preserving_order(ids: Vec<WineId>) -> Vec<WineId> {
    let mut seen = HashSet::new();
    ids.into_iter()
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_keeps_first_occurrence() {
        let ids = vec![
            WineId::from("a"),
            WineId::from("b"),
            WineId::from("a"),
            WineId::from("c"),
            WineId::from("b"),
        ];
        let deduped = dedup_preserving_order(ids);
        let as_strings: Vec<_> = deduped.iter().map(WineId::as_str).collect();
        assert_eq!(as_strings, vec!["a", "b", "c"]);
    }
}
