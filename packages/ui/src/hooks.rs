//! Hooks that bridge the `watch`-based controllers in `api` to Dioxus
//! signals.
//!
//! Each hook creates its controller once per component, mirrors the
//! controller's state into a signal that re-renders the component, and
//! detaches the controller when the component unmounts so late responses are
//! dropped.

use std::future::Future;

use api::{
    ApiError, Collection, Entity, FormController, FormState, QueryBinding, SyncState, Upload,
    Validate,
};
use dioxus::html::FileEngine;
use dioxus::prelude::*;
use tokio::sync::watch;

/// Mirror a `watch` channel into a signal. The receiver is created once.
pub fn use_watch<T: Clone + 'static>(subscribe: impl FnOnce() -> watch::Receiver<T>) -> Signal<T> {
    let rx = use_hook(subscribe);
    let mut value = use_signal({
        let rx = rx.clone();
        move || rx.borrow().clone()
    });
    use_hook(move || {
        let mut rx = rx;
        spawn(async move {
            while rx.changed().await.is_ok() {
                let next = rx.borrow_and_update().clone();
                value.set(next);
            }
        });
    });
    value
}

/// A [`Collection`] owned by the calling component.
pub struct UseCollection<E: Entity + 'static> {
    controller: CopyValue<Collection<E>>,
    state: Signal<SyncState<E>>,
}

impl<E: Entity + 'static> Clone for UseCollection<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: Entity + 'static> Copy for UseCollection<E> {}

impl<E: Entity + 'static> PartialEq for UseCollection<E> {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state
    }
}

impl<E: Entity + 'static> UseCollection<E>
where
    E::Id: 'static,
{
    pub fn controller(&self) -> Collection<E> {
        self.controller.read().clone()
    }

    /// Current state; subscribes the reading component.
    pub fn state(&self) -> SyncState<E> {
        self.state.read().clone()
    }
}

pub fn use_collection<E>() -> UseCollection<E>
where
    E: Entity + 'static,
    E::Id: 'static,
{
    let collection = use_hook(Collection::<E>::new);
    let controller = use_hook(|| CopyValue::new(collection.clone()));
    let state = use_watch(|| collection.subscribe());
    use_drop(move || collection.detach());
    UseCollection { controller, state }
}

/// A [`UseCollection`] loaded by one URL search parameter, plus the binding
/// behind the search input.
pub struct UseSearchCollection<E: Entity + 'static> {
    collection: UseCollection<E>,
    binding: Signal<QueryBinding>,
}

impl<E: Entity + 'static> Clone for UseSearchCollection<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: Entity + 'static> Copy for UseSearchCollection<E> {}

impl<E: Entity + 'static> UseSearchCollection<E>
where
    E::Id: 'static,
{
    pub fn collection(&self) -> UseCollection<E> {
        self.collection
    }

    /// What the search input shows.
    pub fn input(&self) -> String {
        self.binding.read().value().to_string()
    }

    /// Record a keystroke; returns the value to put in the URL.
    pub fn edit(&self, input: &str) -> Option<String> {
        let mut binding = self.binding;
        let next = binding.write().edit(input);
        next
    }
}

/// Keep a collection loaded for the current value of a URL parameter.
/// `url_value` is the parameter as the router reports it (empty when
/// absent); `fetch` runs once per committed value.
pub fn use_search_collection<E, F, Fut>(
    param: &'static str,
    url_value: String,
    fetch: F,
) -> UseSearchCollection<E>
where
    E: Entity + 'static,
    E::Id: 'static,
    F: Fn(Option<String>) -> Fut + 'static,
    Fut: Future<Output = Result<Vec<E>, ApiError>> + 'static,
{
    let collection = use_collection::<E>();
    let mut binding = use_signal(|| QueryBinding::new(param));

    // Mirror the route parameter so the effect below re-runs when it changes
    let mut url = use_signal(|| url_value.clone());
    if *url.peek() != url_value {
        url.set(url_value);
    }

    use_effect(move || {
        let value = url();
        let controller = collection.controller();
        let Some(refetch) = binding.write().refetch(Some(&value), controller.phase()) else {
            return;
        };
        let request = fetch(refetch.search.clone());
        spawn(async move {
            let outcome = controller.load(request).await;
            tracing::debug!(param, ?outcome, search = ?refetch.search, "search collection loaded");
        });
    });

    UseSearchCollection {
        collection,
        binding,
    }
}

/// A [`FormController`] owned by the calling component.
pub struct UseForm<D: 'static> {
    controller: CopyValue<FormController<D>>,
    state: Signal<FormState<D>>,
}

impl<D: 'static> Clone for UseForm<D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: 'static> Copy for UseForm<D> {}

impl<D: 'static> PartialEq for UseForm<D> {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state
    }
}

impl<D: Validate + Clone + Default + 'static> UseForm<D> {
    pub fn controller(&self) -> FormController<D> {
        self.controller.read().clone()
    }

    pub fn state(&self) -> FormState<D> {
        self.state.read().clone()
    }

    pub fn update(&self, f: impl FnOnce(&mut D)) {
        self.controller.read().update(f);
    }
}

pub fn use_form<D: Validate + Clone + Default + 'static>(
    init: impl FnOnce() -> FormController<D>,
) -> UseForm<D> {
    let form = use_hook(init);
    let controller = use_hook(|| CopyValue::new(form.clone()));
    let state = use_watch(|| form.subscribe());
    use_drop(move || form.detach());
    UseForm { controller, state }
}

/// The first file picked in a file input.
pub async fn read_upload(evt: &FormEvent) -> Option<Upload> {
    let engine = evt.files()?;
    let name = engine.files().into_iter().next()?;
    let bytes = engine.read_file(&name).await?;
    Some(Upload::new(name, bytes))
}
