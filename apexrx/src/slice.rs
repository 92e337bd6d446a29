//! Resource slices: one REST endpoint bound to a fragment of a root state.
//!
//! A slice owns three request lifecycles (list summaries, get one entity by
//! id, create an entity) and one normalized summary collection. Triggers
//! dispatch a pending action right away, run the request on the tokio
//! runtime, then dispatch the fulfilled or rejected action. Every action
//! carries the token of its attempt and completions from superseded attempts
//! are dropped by the reducer.

use crate::request_tracker::RequestTracker;
use crate::{
    ApiError, Dispatcher, EntityCollection, HttpClient, HttpClientError, Reducer, RequestToken,
    State, StateStore, StoreError,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Display;
use std::hash::Hash;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// Bounds shared by entities and summaries held in slice state.
pub trait Resource: Clone + Send + Sync + 'static {}
impl<T> Resource for T where T: Clone + Send + Sync + 'static {}

/// Identity of a summary record. `Display` renders the URL path segment.
pub trait ResourceId: Clone + Eq + Hash + Display + Send + Sync + 'static {}
impl<T> ResourceId for T where T: Clone + Eq + Hash + Display + Send + Sync + 'static {}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadMeta {
    pub is_loading: bool,
    pub api_error: Option<ApiError>,
    pub latest_request: RequestToken,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmitMeta {
    pub is_submitting: bool,
    pub api_error: Option<ApiError>,
    pub latest_request: RequestToken,
}

impl LoadMeta {
    fn begin(&mut self, token: RequestToken) -> bool {
        if token <= self.latest_request {
            return false;
        }
        self.latest_request = token;
        self.is_loading = true;
        self.api_error = None;
        true
    }

    fn settle(&mut self, token: RequestToken, api_error: Option<ApiError>) -> bool {
        if token != self.latest_request {
            return false;
        }
        self.is_loading = false;
        self.api_error = api_error;
        true
    }
}

impl SubmitMeta {
    fn begin(&mut self, token: RequestToken) -> bool {
        if token <= self.latest_request {
            return false;
        }
        self.latest_request = token;
        self.is_submitting = true;
        self.api_error = None;
        true
    }

    fn settle(&mut self, token: RequestToken, api_error: Option<ApiError>) -> bool {
        if token != self.latest_request {
            return false;
        }
        self.is_submitting = false;
        self.api_error = api_error;
        true
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SliceState<T, TSummary, TId: Hash + Eq> {
    pub entities: EntityCollection<TId, TSummary>,
    pub entities_meta: LoadMeta,
    pub entity: Option<T>,
    pub entity_meta: LoadMeta,
    pub create_entity_meta: SubmitMeta,
}

impl<T, TSummary, TId: Hash + Eq> Default for SliceState<T, TSummary, TId> {
    fn default() -> Self {
        Self {
            entities: EntityCollection::default(),
            entities_meta: LoadMeta::default(),
            entity: None,
            entity_meta: LoadMeta::default(),
            create_entity_meta: SubmitMeta::default(),
        }
    }
}

/// Transitions of a slice. `None` in a rejection means the failure was not a
/// transport failure: the busy flag clears but no error is stored.
#[derive(Debug, Clone, PartialEq)]
pub enum SliceAction<T, TSummary, TId> {
    GetAllSummariesPending {
        token: RequestToken,
    },
    GetAllSummariesFulfilled {
        token: RequestToken,
        summaries: Vec<(TId, TSummary)>,
    },
    GetAllSummariesRejected {
        token: RequestToken,
        api_error: Option<ApiError>,
    },
    GetByIdPending {
        token: RequestToken,
    },
    GetByIdFulfilled {
        token: RequestToken,
        entity: T,
    },
    GetByIdRejected {
        token: RequestToken,
        api_error: Option<ApiError>,
    },
    CreatePending {
        token: RequestToken,
    },
    CreateFulfilled {
        token: RequestToken,
    },
    CreateRejected {
        token: RequestToken,
        api_error: Option<ApiError>,
    },
}

impl<T, TSummary, TId> SliceAction<T, TSummary, TId> {
    pub fn token(&self) -> RequestToken {
        match self {
            SliceAction::GetAllSummariesPending { token }
            | SliceAction::GetAllSummariesFulfilled { token, .. }
            | SliceAction::GetAllSummariesRejected { token, .. }
            | SliceAction::GetByIdPending { token }
            | SliceAction::GetByIdFulfilled { token, .. }
            | SliceAction::GetByIdRejected { token, .. }
            | SliceAction::CreatePending { token }
            | SliceAction::CreateFulfilled { token }
            | SliceAction::CreateRejected { token, .. } => *token,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SliceAction::GetAllSummariesPending { .. } => "getAllSummaries/pending",
            SliceAction::GetAllSummariesFulfilled { .. } => "getAllSummaries/fulfilled",
            SliceAction::GetAllSummariesRejected { .. } => "getAllSummaries/rejected",
            SliceAction::GetByIdPending { .. } => "getById/pending",
            SliceAction::GetByIdFulfilled { .. } => "getById/fulfilled",
            SliceAction::GetByIdRejected { .. } => "getById/rejected",
            SliceAction::CreatePending { .. } => "create/pending",
            SliceAction::CreateFulfilled { .. } => "create/fulfilled",
            SliceAction::CreateRejected { .. } => "create/rejected",
        }
    }
}

impl<T, TSummary, TId> State for SliceState<T, TSummary, TId>
where
    T: Resource,
    TSummary: Resource,
    TId: ResourceId,
{
}

impl<T, TSummary, TId> Reducer for SliceState<T, TSummary, TId>
where
    T: Resource,
    TSummary: Resource,
    TId: ResourceId,
{
    type Action = SliceAction<T, TSummary, TId>;

    fn reduce(mut self, action: Self::Action) -> Self {
        let kind = action.kind();
        let token = action.token();
        let applied = match action {
            SliceAction::GetAllSummariesPending { token } => self.entities_meta.begin(token),
            SliceAction::GetAllSummariesFulfilled { token, summaries } => {
                let applied = self.entities_meta.settle(token, None);
                if applied {
                    self.entities.upsert_many(summaries);
                }
                applied
            }
            SliceAction::GetAllSummariesRejected { token, api_error } => {
                self.entities_meta.settle(token, api_error)
            }
            SliceAction::GetByIdPending { token } => {
                let applied = self.entity_meta.begin(token);
                if applied {
                    self.entity = None;
                }
                applied
            }
            SliceAction::GetByIdFulfilled { token, entity } => {
                let applied = self.entity_meta.settle(token, None);
                if applied {
                    self.entity = Some(entity);
                }
                applied
            }
            SliceAction::GetByIdRejected { token, api_error } => {
                self.entity_meta.settle(token, api_error)
            }
            SliceAction::CreatePending { token } => self.create_entity_meta.begin(token),
            SliceAction::CreateFulfilled { token } => self.create_entity_meta.settle(token, None),
            SliceAction::CreateRejected { token, api_error } => {
                self.create_entity_meta.settle(token, api_error)
            }
        };
        if !applied {
            debug!(action = kind, token = token.value(), "discarded superseded action");
        }
        self
    }
}

impl<T: Clone, TSummary: Clone, TId: Hash + Eq> SliceState<T, TSummary, TId> {
    pub fn all_summaries(&self) -> Vec<TSummary> {
        self.entities.all()
    }

    pub fn summaries_loading(&self) -> bool {
        self.entities_meta.is_loading
    }

    pub fn summaries_error(&self) -> Option<ApiError> {
        self.entities_meta.api_error.clone()
    }

    pub fn entity_data(&self) -> Option<T> {
        self.entity.clone()
    }

    pub fn entity_loading(&self) -> bool {
        self.entity_meta.is_loading
    }

    pub fn entity_error(&self) -> Option<ApiError> {
        self.entity_meta.api_error.clone()
    }

    pub fn create_submitting(&self) -> bool {
        self.create_entity_meta.is_submitting
    }

    pub fn create_error(&self) -> Option<ApiError> {
        self.create_entity_meta.api_error.clone()
    }
}

pub type SliceSelector<S, T, TSummary, TId> = fn(&S) -> &SliceState<T, TSummary, TId>;
pub type ActionWrapper<S, T, TSummary, TId> =
    fn(SliceAction<T, TSummary, TId>) -> <S as Reducer>::Action;

pub struct SliceConfig<S: Reducer, T, TSummary, TId: Hash + Eq> {
    /// Unique within the root state; used in logs.
    pub name: String,
    /// Base URL of the collection, e.g. `http://localhost:3000/fields`.
    pub endpoint: String,
    pub select_summary_id: fn(&TSummary) -> TId,
    pub select_slice_state: SliceSelector<S, T, TSummary, TId>,
    pub wrap_action: ActionWrapper<S, T, TSummary, TId>,
}

#[derive(Error, Debug)]
pub enum SliceError {
    #[error("{0}")]
    Api(ApiError),
    #[error(transparent)]
    Unexpected(HttpClientError),
    /// A newer attempt of the same operation started first; this completion was
    /// not applied.
    #[error("request {} was superseded by a newer attempt", .0.value())]
    Superseded(RequestToken),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct SummarySelectors<S, T, TSummary, TId: Hash + Eq> {
    select_slice_state: SliceSelector<S, T, TSummary, TId>,
}

pub struct EntitySelectors<S, T, TSummary, TId: Hash + Eq> {
    select_slice_state: SliceSelector<S, T, TSummary, TId>,
}

pub struct CreateEntitySelectors<S, T, TSummary, TId: Hash + Eq> {
    select_slice_state: SliceSelector<S, T, TSummary, TId>,
}

/// Selectors reading a slice out of the root state.
pub struct SliceSelectors<S, T, TSummary, TId: Hash + Eq> {
    pub summaries: SummarySelectors<S, T, TSummary, TId>,
    pub entity: EntitySelectors<S, T, TSummary, TId>,
    pub create_entity: CreateEntitySelectors<S, T, TSummary, TId>,
}

impl<S, T, TSummary, TId> SliceSelectors<S, T, TSummary, TId>
where
    T: Clone,
    TSummary: Clone,
    TId: Hash + Eq,
{
    pub fn new(select_slice_state: SliceSelector<S, T, TSummary, TId>) -> Self {
        Self {
            summaries: SummarySelectors { select_slice_state },
            entity: EntitySelectors { select_slice_state },
            create_entity: CreateEntitySelectors { select_slice_state },
        }
    }
}

impl<S, T: Clone, TSummary: Clone, TId: Hash + Eq> SummarySelectors<S, T, TSummary, TId> {
    pub fn all(&self, state: &S) -> Vec<TSummary> {
        (self.select_slice_state)(state).all_summaries()
    }

    pub fn is_loading(&self, state: &S) -> bool {
        (self.select_slice_state)(state).summaries_loading()
    }

    pub fn api_error(&self, state: &S) -> Option<ApiError> {
        (self.select_slice_state)(state).summaries_error()
    }
}

impl<S, T: Clone, TSummary: Clone, TId: Hash + Eq> EntitySelectors<S, T, TSummary, TId> {
    pub fn data(&self, state: &S) -> Option<T> {
        (self.select_slice_state)(state).entity_data()
    }

    pub fn is_loading(&self, state: &S) -> bool {
        (self.select_slice_state)(state).entity_loading()
    }

    pub fn api_error(&self, state: &S) -> Option<ApiError> {
        (self.select_slice_state)(state).entity_error()
    }
}

impl<S, T: Clone, TSummary: Clone, TId: Hash + Eq> CreateEntitySelectors<S, T, TSummary, TId> {
    pub fn is_submitting(&self, state: &S) -> bool {
        (self.select_slice_state)(state).create_submitting()
    }

    pub fn api_error(&self, state: &S) -> Option<ApiError> {
        (self.select_slice_state)(state).create_error()
    }
}

pub(crate) struct SliceInner<S: Reducer, T, TSummary, TId: Hash + Eq> {
    pub(crate) config: SliceConfig<S, T, TSummary, TId>,
    client: HttpClient,
    pub(crate) summaries_requests: RequestTracker<()>,
    pub(crate) entity_requests: RequestTracker<TId>,
    create_requests: RequestTracker<()>,
}

/// Handle to one resource slice. Cheap to clone.
pub struct ApexSlice<S: Reducer, T, TSummary, TId: Hash + Eq> {
    pub(crate) inner: Arc<SliceInner<S, T, TSummary, TId>>,
}

impl<S: Reducer, T, TSummary, TId: Hash + Eq> Clone for ApexSlice<S, T, TSummary, TId> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

pub type SliceTask = JoinHandle<Result<(), SliceError>>;

type LatestToken<T, TSummary, TId> = fn(&SliceState<T, TSummary, TId>) -> RequestToken;

impl<S, T, TSummary, TId> ApexSlice<S, T, TSummary, TId>
where
    S: Reducer,
    T: Resource + Serialize + DeserializeOwned,
    TSummary: Resource + DeserializeOwned,
    TId: ResourceId,
{
    pub fn new(config: SliceConfig<S, T, TSummary, TId>, client: HttpClient) -> Self {
        Self {
            inner: Arc::new(SliceInner {
                config,
                client,
                summaries_requests: RequestTracker::new(),
                entity_requests: RequestTracker::new(),
                create_requests: RequestTracker::new(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.config.name
    }

    pub fn endpoint(&self) -> &str {
        &self.inner.config.endpoint
    }

    pub fn initial_state(&self) -> SliceState<T, TSummary, TId> {
        SliceState::default()
    }

    pub fn selectors(&self) -> SliceSelectors<S, T, TSummary, TId> {
        SliceSelectors::new(self.inner.config.select_slice_state)
    }

    pub fn slice_state<'a>(&self, state: &'a S) -> &'a SliceState<T, TSummary, TId> {
        (self.inner.config.select_slice_state)(state)
    }

    /// `GET endpoint`, upserting every returned summary.
    pub fn get_all_summaries(&self, store: &StateStore<S>) -> SliceTask {
        let token = self.inner.summaries_requests.begin(());
        let dispatcher = store.dispatcher();
        let pending = self.dispatch(&dispatcher, SliceAction::GetAllSummariesPending { token });
        let inner = self.inner.clone();
        tokio::spawn(async move {
            pending?;
            let result = inner
                .client
                .get::<Vec<TSummary>>(&inner.config.endpoint)
                .await;
            inner.summaries_requests.finish(token);
            let select_id = inner.config.select_summary_id;
            inner
                .settle(
                    &dispatcher,
                    result,
                    |slice| slice.entities_meta.latest_request,
                    |summaries| SliceAction::GetAllSummariesFulfilled {
                        token,
                        summaries: summaries
                            .into_iter()
                            .map(|summary| (select_id(&summary), summary))
                            .collect(),
                    },
                    |api_error| SliceAction::GetAllSummariesRejected { token, api_error },
                )
                .await
        })
    }

    /// `GET endpoint/{id}`, replacing the slice's current entity.
    pub fn get_by_id(&self, store: &StateStore<S>, id: TId) -> SliceTask {
        let url = self.entity_url(&id);
        let token = self.inner.entity_requests.begin(id);
        let dispatcher = store.dispatcher();
        let pending = self.dispatch(&dispatcher, SliceAction::GetByIdPending { token });
        let inner = self.inner.clone();
        tokio::spawn(async move {
            pending?;
            let result = inner.client.get::<T>(&url).await;
            inner.entity_requests.finish(token);
            inner
                .settle(
                    &dispatcher,
                    result,
                    |slice| slice.entity_meta.latest_request,
                    |entity| SliceAction::GetByIdFulfilled { token, entity },
                    |api_error| SliceAction::GetByIdRejected { token, api_error },
                )
                .await
        })
    }

    /// `POST endpoint` with `entity` as the body. The summary collection is
    /// left alone; fetch again to see the new record.
    pub fn create(&self, store: &StateStore<S>, entity: T) -> SliceTask {
        let token = self.inner.create_requests.begin(());
        let dispatcher = store.dispatcher();
        let pending = self.dispatch(&dispatcher, SliceAction::CreatePending { token });
        let inner = self.inner.clone();
        tokio::spawn(async move {
            pending?;
            let result = inner.client.post(&inner.config.endpoint, &entity).await;
            inner.create_requests.finish(token);
            inner
                .settle(
                    &dispatcher,
                    result,
                    |slice| slice.create_entity_meta.latest_request,
                    |_| SliceAction::CreateFulfilled { token },
                    |api_error| SliceAction::CreateRejected { token, api_error },
                )
                .await
        })
    }

    fn entity_url(&self, id: &TId) -> String {
        format!("{}/{}", self.inner.config.endpoint.trim_end_matches('/'), id)
    }

    fn dispatch(
        &self,
        dispatcher: &Dispatcher<S>,
        action: SliceAction<T, TSummary, TId>,
    ) -> Result<(), StoreError> {
        self.inner.dispatch(dispatcher, action)
    }
}

impl<S, T, TSummary, TId> SliceInner<S, T, TSummary, TId>
where
    S: Reducer,
    T: Resource,
    TSummary: Resource,
    TId: ResourceId,
{
    fn dispatch(
        &self,
        dispatcher: &Dispatcher<S>,
        action: SliceAction<T, TSummary, TId>,
    ) -> Result<(), StoreError> {
        debug!(
            slice = %self.config.name,
            action = action.kind(),
            token = action.token().value(),
            "dispatch"
        );
        dispatcher.dispatch((self.config.wrap_action)(action))
    }

    /// Queues a completion and resolves with whether the reducer applied it.
    ///
    /// The check runs in the store queue against the same slice state the
    /// completion is reduced into.
    async fn complete(
        &self,
        dispatcher: &Dispatcher<S>,
        action: SliceAction<T, TSummary, TId>,
        latest: LatestToken<T, TSummary, TId>,
    ) -> Result<bool, StoreError> {
        let token = action.token();
        debug!(
            slice = %self.config.name,
            action = action.kind(),
            token = token.value(),
            "dispatch"
        );
        let select_slice_state = self.config.select_slice_state;
        let wrapped = (self.config.wrap_action)(action);
        let (tx, rx) = oneshot::channel();
        dispatcher.set_state(move |state| {
            let _ = tx.send(latest(select_slice_state(&state)) == token);
            state.reduce(wrapped)
        })?;
        rx.await.map_err(|_| StoreError::Closed)
    }

    async fn settle<V>(
        &self,
        dispatcher: &Dispatcher<S>,
        result: Result<V, HttpClientError>,
        latest: LatestToken<T, TSummary, TId>,
        fulfilled: impl FnOnce(V) -> SliceAction<T, TSummary, TId>,
        rejected: impl FnOnce(Option<ApiError>) -> SliceAction<T, TSummary, TId>,
    ) -> Result<(), SliceError> {
        match result {
            Ok(value) => {
                let action = fulfilled(value);
                let token = action.token();
                if self.complete(dispatcher, action, latest).await? {
                    Ok(())
                } else {
                    Err(SliceError::Superseded(token))
                }
            }
            Err(error) => match error.api_error() {
                Some(api_error) => {
                    let action = rejected(Some(api_error.clone()));
                    let token = action.token();
                    if !self.complete(dispatcher, action, latest).await? {
                        debug!(slice = %self.config.name, error = %api_error, "superseded failure");
                        return Err(SliceError::Superseded(token));
                    }
                    warn!(slice = %self.config.name, error = %api_error, "request failed");
                    Err(SliceError::Api(api_error))
                }
                None => {
                    error!(slice = %self.config.name, error = %error, "unexpected failure");
                    self.complete(dispatcher, rejected(None), latest).await?;
                    Err(SliceError::Unexpected(error))
                }
            },
        }
    }
}
