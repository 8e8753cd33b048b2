//! # Collection sync controller
//!
//! [`Collection`] holds the canonical local copy of one remote collection
//! (jobs, applications, applicants) and publishes every change through a
//! `tokio::sync::watch` channel that views subscribe to.
//!
//! ## Loads
//!
//! `Uninitialized → Loading → Ready`. A successful load replaces the whole
//! collection; a failed one empties it and records a load error, so a view
//! never sits on a spinner. Each load takes a ticket from a monotonic counter
//! and only the newest ticket may commit, so overlapping loads resolve
//! last-issued-wins no matter in which order the responses arrive.
//!
//! ## Mutations
//!
//! `update`, `remove` and `create` change local state first, then await the
//! request:
//!
//! | Operation | Optimistic step | On failure |
//! |-----------|-----------------|------------|
//! | `update`  | replace the entry | restore the prior entry, inline error |
//! | `remove`  | drop the entry | reinsert at the prior position, inline error |
//! | `create`  | prepend a placeholder | drop the placeholder |
//!
//! A rollback is skipped when a load committed while the mutation was in
//! flight: the reloaded data is newer than the snapshot.
//!
//! Overlapping updates on one entry settle as a group. The entry stays
//! pending until the last of them settles; if any failed, it then shows the
//! last value the server accepted (or the value before the first update).
//!
//! ## Teardown
//!
//! [`Collection::detach`] marks the controller dead. Anything that settles
//! afterwards is dropped without touching state.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::rc::Rc;

use tokio::sync::watch;

use crate::error::ApiError;

/// Something with a stable identity inside a collection.
pub trait Entity: Clone + PartialEq {
    type Id: Clone + Eq + Hash + fmt::Debug;

    fn id(&self) -> Self::Id;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Uninitialized,
    Loading,
    Ready,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SyncState<E: Entity> {
    pub phase: Phase,
    pub items: Vec<E>,
    pub load_error: Option<String>,
    pub item_errors: HashMap<E::Id, String>,
    pub pending: HashSet<E::Id>,
}

impl<E: Entity> Default for SyncState<E> {
    fn default() -> Self {
        Self {
            phase: Phase::Uninitialized,
            items: Vec::new(),
            load_error: None,
            item_errors: HashMap::new(),
            pending: HashSet::new(),
        }
    }
}

impl<E: Entity> SyncState<E> {
    /// True until the first load settles, and again while a refetch runs.
    pub fn is_loading(&self) -> bool {
        self.phase != Phase::Ready
    }

    pub fn get(&self, id: &E::Id) -> Option<&E> {
        self.items.iter().find(|item| &item.id() == id)
    }

    pub fn item_error(&self, id: &E::Id) -> Option<&str> {
        self.item_errors.get(id).map(String::as_str)
    }

    pub fn is_pending(&self, id: &E::Id) -> bool {
        self.pending.contains(id)
    }

    fn position(&self, id: &E::Id) -> Option<usize> {
        self.items.iter().position(|item| &item.id() == id)
    }
}

/// How a [`Collection::load`] call ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    Failed,
    /// A newer load was issued; this result was dropped.
    Superseded,
    /// The controller was torn down first.
    Detached,
}

/// Updates in flight for one entry.
struct UpdateChain<E> {
    in_flight: usize,
    confirmed: E,
    epoch: u64,
    failed: bool,
}

struct Inner<E: Entity> {
    state: watch::Sender<SyncState<E>>,
    latest: Cell<u64>,
    epoch: Cell<u64>,
    alive: Cell<bool>,
    local_ids: Cell<i64>,
    updates: RefCell<HashMap<E::Id, UpdateChain<E>>>,
}

pub struct Collection<E: Entity> {
    inner: Rc<Inner<E>>,
}

impl<E: Entity> Clone for Collection<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E: Entity> PartialEq for Collection<E> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<E: Entity> Default for Collection<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> Collection<E> {
    pub fn new() -> Self {
        let (state, _) = watch::channel(SyncState::default());
        Self {
            inner: Rc::new(Inner {
                state,
                latest: Cell::new(0),
                epoch: Cell::new(0),
                alive: Cell::new(true),
                local_ids: Cell::new(0),
                updates: RefCell::new(HashMap::new()),
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SyncState<E>> {
        self.inner.state.subscribe()
    }

    pub fn snapshot(&self) -> SyncState<E> {
        self.inner.state.borrow().clone()
    }

    pub fn items(&self) -> Vec<E> {
        self.inner.state.borrow().items.clone()
    }

    pub fn phase(&self) -> Phase {
        self.inner.state.borrow().phase
    }

    pub fn is_attached(&self) -> bool {
        self.inner.alive.get()
    }

    /// Stop applying results. Idempotent.
    pub fn detach(&self) {
        self.inner.alive.set(false);
    }

    /// A fresh id for a placeholder entry. Counts 1, 2, 3, ...
    pub fn next_local_id(&self) -> i64 {
        let next = self.inner.local_ids.get() + 1;
        self.inner.local_ids.set(next);
        next
    }

    fn modify(&self, f: impl FnOnce(&mut SyncState<E>)) {
        self.inner.state.send_modify(f);
    }

    /// Fetch the collection and replace local state with the result.
    pub async fn load<Fut>(&self, request: Fut) -> LoadOutcome
    where
        Fut: Future<Output = Result<Vec<E>, ApiError>>,
    {
        let ticket = self.inner.latest.get() + 1;
        self.inner.latest.set(ticket);
        self.modify(|state| state.phase = Phase::Loading);

        let result = request.await;

        if !self.is_attached() {
            return LoadOutcome::Detached;
        }
        if ticket != self.inner.latest.get() {
            tracing::debug!(ticket, latest = self.inner.latest.get(), "superseded load dropped");
            return LoadOutcome::Superseded;
        }
        self.inner.epoch.set(self.inner.epoch.get() + 1);

        match result {
            Ok(items) => {
                self.modify(|state| {
                    state.phase = Phase::Ready;
                    state.items = items;
                    state.load_error = None;
                    state.item_errors.clear();
                });
                LoadOutcome::Applied
            }
            Err(err) => {
                tracing::warn!(error = %err, "collection load failed");
                self.modify(|state| {
                    state.phase = Phase::Ready;
                    state.items.clear();
                    state.load_error = Some(err.user_message());
                    state.item_errors.clear();
                });
                LoadOutcome::Failed
            }
        }
    }

    /// Replace entry `id` with `apply(current)` right away, then await
    /// `request`. Restores the prior entry when the request fails.
    pub async fn update<Fut>(
        &self,
        id: E::Id,
        apply: impl FnOnce(&E) -> E,
        request: Fut,
    ) -> Result<(), ApiError>
    where
        Fut: Future<Output = Result<(), ApiError>>,
    {
        let (index, prior) = self.find(&id)?;
        let next = apply(&prior);
        let epoch = self.inner.epoch.get();

        {
            let mut updates = self.inner.updates.borrow_mut();
            let chain = updates.entry(id.clone()).or_insert_with(|| UpdateChain {
                in_flight: 0,
                confirmed: prior.clone(),
                epoch,
                failed: false,
            });
            if chain.epoch != epoch {
                chain.confirmed = prior;
                chain.epoch = epoch;
                chain.failed = false;
            }
            chain.in_flight += 1;
        }

        self.modify(|state| {
            state.items[index] = next.clone();
            state.item_errors.remove(&id);
            state.pending.insert(id.clone());
        });

        let result = request.await;
        if !self.is_attached() {
            return result;
        }

        let (last, settled) = {
            let mut updates = self.inner.updates.borrow_mut();
            let last = match updates.get_mut(&id) {
                Some(chain) => {
                    chain.in_flight = chain.in_flight.saturating_sub(1);
                    match &result {
                        Ok(()) => chain.confirmed = next,
                        Err(_) => chain.failed = true,
                    }
                    chain.in_flight == 0
                }
                None => true,
            };
            if last {
                (true, updates.remove(&id))
            } else {
                (false, None)
            }
        };

        if let Err(err) = &result {
            tracing::warn!(?id, error = %err, "update failed");
        }
        let message = result.as_ref().err().map(ApiError::user_message);
        let reloaded = settled
            .as_ref()
            .is_some_and(|chain| chain.epoch != self.inner.epoch.get());

        self.modify(|state| {
            if last {
                state.pending.remove(&id);
            }
            if let Some(chain) = settled {
                if chain.failed && !reloaded {
                    if let Some(pos) = state.position(&id) {
                        state.items[pos] = chain.confirmed;
                    }
                }
            }
            if let Some(message) = message {
                state.item_errors.insert(id, message);
            }
        });
        result
    }

    /// Drop entry `id` right away, then await `request`. Reinserts it at its
    /// prior position when the request fails.
    pub async fn remove<Fut>(&self, id: E::Id, request: Fut) -> Result<(), ApiError>
    where
        Fut: Future<Output = Result<(), ApiError>>,
    {
        let (index, prior) = self.find(&id)?;
        let epoch = self.inner.epoch.get();

        self.modify(|state| {
            state.items.remove(index);
            state.item_errors.remove(&id);
            state.pending.insert(id.clone());
        });

        let result = request.await;
        if !self.is_attached() {
            return result;
        }

        match result {
            Ok(()) => {
                self.modify(|state| {
                    state.pending.remove(&id);
                });
                Ok(())
            }
            Err(err) => {
                tracing::warn!(?id, error = %err, "remove failed, restoring entry");
                let reloaded = self.inner.epoch.get() != epoch;
                let message = err.user_message();
                self.modify(|state| {
                    state.pending.remove(&id);
                    if !reloaded && state.position(&id).is_none() {
                        let at = index.min(state.items.len());
                        state.items.insert(at, prior);
                    }
                    state.item_errors.insert(id, message);
                });
                Err(err)
            }
        }
    }

    /// Prepend `placeholder` right away, then await `request`. On success the
    /// placeholder is replaced by the server's entity; on failure it is
    /// dropped.
    pub async fn create<Fut>(&self, placeholder: E, request: Fut) -> Result<E, ApiError>
    where
        Fut: Future<Output = Result<E, ApiError>>,
    {
        let local = placeholder.id();
        self.modify(|state| {
            state.items.insert(0, placeholder);
            state.pending.insert(local.clone());
        });

        let result = request.await;
        if !self.is_attached() {
            return result;
        }

        match &result {
            Ok(created) => {
                let created_id = created.id();
                self.modify(|state| {
                    state.pending.remove(&local);
                    let placeholder_at = state.position(&local);
                    let already_loaded = state.position(&created_id).is_some();
                    match (placeholder_at, already_loaded) {
                        (Some(pos), false) => state.items[pos] = created.clone(),
                        (Some(pos), true) => {
                            state.items.remove(pos);
                        }
                        (None, _) => {}
                    }
                });
            }
            Err(err) => {
                tracing::warn!(error = %err, "create failed, dropping placeholder");
                self.modify(|state| {
                    state.pending.remove(&local);
                    if let Some(pos) = state.position(&local) {
                        state.items.remove(pos);
                    }
                });
            }
        }
        result
    }

    fn find(&self, id: &E::Id) -> Result<(usize, E), ApiError> {
        let state = self.inner.state.borrow();
        state
            .position(id)
            .map(|index| (index, state.items[index].clone()))
            .ok_or_else(|| ApiError::MissingEntry(format!("{id:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    #[derive(Clone, Debug, PartialEq)]
    struct Row {
        id: i64,
        label: &'static str,
    }

    impl Entity for Row {
        type Id = i64;

        fn id(&self) -> i64 {
            self.id
        }
    }

    fn row(id: i64, label: &'static str) -> Row {
        Row { id, label }
    }

    fn rows() -> Vec<Row> {
        vec![row(7, "new"), row(42, "new"), row(9, "new")]
    }

    fn server_error() -> ApiError {
        ApiError::Status {
            status: 500,
            body: String::new(),
        }
    }

    async fn reply(rx: oneshot::Receiver<Result<(), ApiError>>) -> Result<(), ApiError> {
        rx.await.unwrap_or_else(|_| Err(server_error()))
    }

    async fn settle() {
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }
    }

    async fn loaded() -> Collection<Row> {
        let collection = Collection::new();
        collection.load(async { Ok(rows()) }).await;
        collection
    }

    #[tokio::test]
    async fn test_phases() {
        let collection: Collection<Row> = Collection::new();
        assert_eq!(collection.phase(), Phase::Uninitialized);
        assert!(collection.snapshot().is_loading());

        let probe = collection.clone();
        collection
            .load(async move {
                assert_eq!(probe.phase(), Phase::Loading);
                Ok(rows())
            })
            .await;
        assert_eq!(collection.phase(), Phase::Ready);
        assert!(!collection.snapshot().is_loading());
    }

    #[tokio::test]
    async fn test_failed_load_empties_and_flags() {
        let collection = loaded().await;
        let outcome = collection.load(async { Err(server_error()) }).await;

        assert_eq!(outcome, LoadOutcome::Failed);
        let state = collection.snapshot();
        assert_eq!(state.phase, Phase::Ready);
        assert!(state.items.is_empty());
        assert!(state.load_error.is_some());
    }

    #[tokio::test]
    async fn test_load_is_idempotent() {
        let collection = loaded().await;
        let first = collection.snapshot();
        collection.load(async { Ok(rows()) }).await;
        assert_eq!(collection.snapshot(), first);
    }

    #[tokio::test]
    async fn test_last_issued_load_wins() {
        let collection: Collection<Row> = Collection::new();
        let (slow_tx, slow_rx) = oneshot::channel::<Vec<Row>>();
        let (fast_tx, fast_rx) = oneshot::channel::<Vec<Row>>();

        let slow = collection.load(async move { Ok(slow_rx.await.unwrap_or_default()) });
        let fast = collection.load(async move { Ok(fast_rx.await.unwrap_or_default()) });
        let drive = async move {
            tokio::task::yield_now().await;
            let _ = fast_tx.send(vec![row(2, "rust")]);
            tokio::task::yield_now().await;
            let _ = slow_tx.send(vec![row(1, "stale")]);
        };

        let (slow, fast, ()) = tokio::join!(slow, fast, drive);
        assert_eq!(fast, LoadOutcome::Applied);
        assert_eq!(slow, LoadOutcome::Superseded);
        assert_eq!(collection.items(), vec![row(2, "rust")]);
    }

    #[tokio::test]
    async fn test_update_rolls_back_on_failure() {
        let collection = loaded().await;
        let before = collection.items();
        let probe = collection.clone();

        let result = collection
            .update(
                42,
                |r| row(r.id, "accepted"),
                async move {
                    let state = probe.snapshot();
                    assert_eq!(state.get(&42).map(|r| r.label), Some("accepted"));
                    assert!(state.is_pending(&42));
                    Err(server_error())
                },
            )
            .await;

        assert!(result.is_err());
        let state = collection.snapshot();
        assert_eq!(state.items, before);
        assert!(state.item_error(&42).is_some());
        assert!(!state.is_pending(&42));
    }

    #[tokio::test]
    async fn test_update_commits() {
        let collection = loaded().await;
        collection
            .update(42, |r| row(r.id, "accepted"), async { Ok(()) })
            .await
            .unwrap();
        let state = collection.snapshot();
        assert_eq!(state.get(&42).map(|r| r.label), Some("accepted"));
        assert!(state.item_errors.is_empty());
    }

    #[tokio::test]
    async fn test_overlapping_failed_updates_restore_server_value() {
        let collection = loaded().await;
        let before = collection.items();
        let watcher = collection.clone();
        let (first_tx, first_rx) = oneshot::channel();
        let (second_tx, second_rx) = oneshot::channel();

        let first = collection.update(42, |r| row(r.id, "accepted"), reply(first_rx));
        let second = collection.update(42, |r| row(r.id, "rejected"), reply(second_rx));
        let drive = async move {
            settle().await;
            let _ = first_tx.send(Err(server_error()));
            settle().await;
            let state = watcher.snapshot();
            assert_eq!(state.get(&42).map(|r| r.label), Some("rejected"));
            assert!(state.is_pending(&42));
            let _ = second_tx.send(Err(server_error()));
        };

        let (first, second, ()) = tokio::join!(first, second, drive);
        assert!(first.is_err());
        assert!(second.is_err());
        let state = collection.snapshot();
        assert_eq!(state.items, before);
        assert!(!state.is_pending(&42));
        assert!(state.item_error(&42).is_some());
    }

    #[tokio::test]
    async fn test_overlapping_updates_keep_accepted_value() {
        let collection = loaded().await;
        let (first_tx, first_rx) = oneshot::channel();
        let (second_tx, second_rx) = oneshot::channel();

        let first = collection.update(42, |r| row(r.id, "accepted"), reply(first_rx));
        let second = collection.update(42, |r| row(r.id, "rejected"), reply(second_rx));
        let drive = async move {
            settle().await;
            let _ = second_tx.send(Err(server_error()));
            settle().await;
            let _ = first_tx.send(Ok(()));
        };

        let (first, second, ()) = tokio::join!(first, second, drive);
        assert!(first.is_ok());
        assert!(second.is_err());
        let state = collection.snapshot();
        assert_eq!(state.get(&42).map(|r| r.label), Some("accepted"));
        assert!(!state.is_pending(&42));
    }

    #[tokio::test]
    async fn test_remove_restores_position_on_failure() {
        let collection = loaded().await;
        let before = collection.items();
        let probe = collection.clone();

        collection
            .remove(42, async move {
                assert!(probe.snapshot().get(&42).is_none());
                Err(server_error())
            })
            .await
            .unwrap_err();

        assert_eq!(collection.items(), before);
        assert!(collection.snapshot().item_error(&42).is_some());
    }

    #[tokio::test]
    async fn test_remove_then_reload_agrees() {
        let collection = loaded().await;
        collection.remove(7, async { Ok(()) }).await.unwrap();
        let after_remove = collection.items();

        collection
            .load(async { Ok(vec![row(42, "new"), row(9, "new")]) })
            .await;
        assert_eq!(collection.items(), after_remove);
    }

    #[tokio::test]
    async fn test_rollback_skipped_after_reload() {
        let collection = loaded().await;
        let reloader = collection.clone();

        collection
            .update(42, |r| row(r.id, "accepted"), async move {
                reloader
                    .load(async { Ok(vec![row(42, "rejected")]) })
                    .await;
                Err(server_error())
            })
            .await
            .unwrap_err();

        assert_eq!(collection.items(), vec![row(42, "rejected")]);
    }

    #[tokio::test]
    async fn test_create_replaces_placeholder() {
        let collection = loaded().await;
        let local = -collection.next_local_id();
        let probe = collection.clone();

        let created = collection
            .create(row(local, "draft"), async move {
                assert_eq!(probe.items()[0], row(local, "draft"));
                Ok(row(100, "posted"))
            })
            .await
            .unwrap();

        assert_eq!(created, row(100, "posted"));
        let items = collection.items();
        assert_eq!(items[0], row(100, "posted"));
        assert_eq!(items.len(), 4);
        assert!(collection.snapshot().get(&local).is_none());
    }

    #[tokio::test]
    async fn test_create_failure_drops_placeholder() {
        let collection = loaded().await;
        let before = collection.items();
        collection
            .create(row(-1, "draft"), async { Err(server_error()) })
            .await
            .unwrap_err();
        assert_eq!(collection.items(), before);
    }

    #[tokio::test]
    async fn test_detached_controller_ignores_results() {
        let collection = loaded().await;
        let before = collection.snapshot();
        let handle = collection.clone();

        let outcome = collection
            .load(async move {
                handle.detach();
                Ok(vec![])
            })
            .await;
        assert_eq!(outcome, LoadOutcome::Detached);
        assert_eq!(collection.snapshot().items, before.items);
    }

    #[tokio::test]
    async fn test_mutating_unknown_entry_is_an_error() {
        let collection = loaded().await;
        let err = collection.remove(1000, async { Ok(()) }).await.unwrap_err();
        assert_eq!(err, ApiError::MissingEntry("1000".to_string()));
    }

    #[test]
    fn test_local_ids_count_up() {
        let collection: Collection<Row> = Collection::new();
        assert_eq!(collection.next_local_id(), 1);
        assert_eq!(collection.next_local_id(), 2);
    }
}
