//! Subscribe-and-fetch-if-stale hooks over a slice.
//!
//! Creating a hook is the "mount": it issues the hook's fetch once, unless an
//! attempt for the same key is already in flight. Reading views never fetches.

use crate::{
    ApexSlice, ApiError, Reducer, Resource, ResourceId, SliceState, SliceTask, StateStore,
};
use futures_signals::signal::Signal;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::hash::Hash;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct SummariesView<TSummary> {
    pub summaries: Vec<TSummary>,
    pub is_loading: bool,
    pub error: Option<ApiError>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntityView<T> {
    pub entity: Option<T>,
    pub is_loading: bool,
    pub error: Option<ApiError>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateView {
    pub is_submitting: bool,
    pub error: Option<ApiError>,
}

fn summaries_view<T: Clone, TSummary: Clone, TId: Hash + Eq>(
    slice: &SliceState<T, TSummary, TId>,
) -> SummariesView<TSummary> {
    SummariesView {
        summaries: slice.all_summaries(),
        is_loading: slice.summaries_loading(),
        error: slice.summaries_error(),
    }
}

fn entity_view<T: Clone, TSummary: Clone, TId: Hash + Eq>(
    slice: &SliceState<T, TSummary, TId>,
) -> EntityView<T> {
    EntityView {
        entity: slice.entity_data(),
        is_loading: slice.entity_loading(),
        error: slice.entity_error(),
    }
}

fn create_view<T: Clone, TSummary: Clone, TId: Hash + Eq>(
    slice: &SliceState<T, TSummary, TId>,
) -> CreateView {
    CreateView {
        is_submitting: slice.create_submitting(),
        error: slice.create_error(),
    }
}

impl<S, T, TSummary, TId> ApexSlice<S, T, TSummary, TId>
where
    S: Reducer,
    T: Resource + Serialize + DeserializeOwned,
    TSummary: Resource + DeserializeOwned,
    TId: ResourceId,
{
    pub fn use_summaries(&self, store: &Arc<StateStore<S>>) -> SummariesHook<S, T, TSummary, TId> {
        let mount = if self.inner.summaries_requests.is_in_flight(&()) {
            None
        } else {
            Some(self.get_all_summaries(store))
        };
        SummariesHook {
            slice: self.clone(),
            store: store.clone(),
            request: mount,
        }
    }

    pub fn use_entity_by_id(
        &self,
        store: &Arc<StateStore<S>>,
        id: TId,
    ) -> EntityByIdHook<S, T, TSummary, TId> {
        let mut hook = EntityByIdHook {
            slice: self.clone(),
            store: store.clone(),
            id,
            request: None,
        };
        hook.fetch_if_stale();
        hook
    }

    pub fn use_create(&self, store: &Arc<StateStore<S>>) -> CreateHook<S, T, TSummary, TId> {
        CreateHook {
            slice: self.clone(),
            store: store.clone(),
        }
    }
}

pub struct SummariesHook<S: Reducer, T, TSummary, TId: Hash + Eq> {
    slice: ApexSlice<S, T, TSummary, TId>,
    store: Arc<StateStore<S>>,
    request: Option<SliceTask>,
}

impl<S, T, TSummary, TId> SummariesHook<S, T, TSummary, TId>
where
    S: Reducer,
    T: Resource,
    TSummary: Resource,
    TId: ResourceId,
{
    pub fn view(&self) -> SummariesView<TSummary> {
        let select = self.slice.inner.config.select_slice_state;
        self.store.select(|state| summaries_view(select(state)))
    }

    pub fn signal(&self) -> impl Signal<Item = SummariesView<TSummary>> {
        let select = self.slice.inner.config.select_slice_state;
        self.store.signal_ref(move |state| summaries_view(select(state)))
    }

    /// The mount fetch, if this hook issued one and it was not taken yet.
    pub fn take_request(&mut self) -> Option<SliceTask> {
        self.request.take()
    }
}

pub struct EntityByIdHook<S: Reducer, T, TSummary, TId: Hash + Eq> {
    slice: ApexSlice<S, T, TSummary, TId>,
    store: Arc<StateStore<S>>,
    id: TId,
    request: Option<SliceTask>,
}

impl<S, T, TSummary, TId> EntityByIdHook<S, T, TSummary, TId>
where
    S: Reducer,
    T: Resource + Serialize + DeserializeOwned,
    TSummary: Resource + DeserializeOwned,
    TId: ResourceId,
{
    pub fn id(&self) -> &TId {
        &self.id
    }

    /// Re-renders with `id`. Fetches only when the id changed; returns whether it did.
    pub fn set_id(&mut self, id: TId) -> bool {
        if id == self.id {
            return false;
        }
        self.id = id;
        self.fetch_if_stale()
    }

    /// Fetches the current id again, in flight or not.
    pub fn refetch(&self) -> SliceTask {
        self.slice.get_by_id(&self.store, self.id.clone())
    }

    pub fn view(&self) -> EntityView<T> {
        let select = self.slice.inner.config.select_slice_state;
        self.store.select(|state| entity_view(select(state)))
    }

    pub fn signal(&self) -> impl Signal<Item = EntityView<T>> {
        let select = self.slice.inner.config.select_slice_state;
        self.store.signal_ref(move |state| entity_view(select(state)))
    }

    /// The last fetch issued by a mount or an id change, if not taken yet.
    pub fn take_request(&mut self) -> Option<SliceTask> {
        self.request.take()
    }

    fn fetch_if_stale(&mut self) -> bool {
        if self.slice.inner.entity_requests.is_in_flight(&self.id) {
            return false;
        }
        self.request = Some(self.slice.get_by_id(&self.store, self.id.clone()));
        true
    }
}

pub struct CreateHook<S: Reducer, T, TSummary, TId: Hash + Eq> {
    slice: ApexSlice<S, T, TSummary, TId>,
    store: Arc<StateStore<S>>,
}

impl<S, T, TSummary, TId> CreateHook<S, T, TSummary, TId>
where
    S: Reducer,
    T: Resource + Serialize + DeserializeOwned,
    TSummary: Resource + DeserializeOwned,
    TId: ResourceId,
{
    pub fn create(&self, entity: T) -> SliceTask {
        self.slice.create(&self.store, entity)
    }

    pub fn view(&self) -> CreateView {
        let select = self.slice.inner.config.select_slice_state;
        self.store.select(|state| create_view(select(state)))
    }

    pub fn signal(&self) -> impl Signal<Item = CreateView> {
        let select = self.slice.inner.config.select_slice_state;
        self.store.signal_ref(move |state| create_view(select(state)))
    }
}
