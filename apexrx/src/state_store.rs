use crate::{Reducer, State};
use futures_signals::signal::{
    Mutable, MutableSignalCloned, MutableSignalRef, SignalExt, SignalStream,
};
use thiserror::Error;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::trace;

type BoxedReducer<S> = Box<dyn FnOnce(S) -> S + Send>;
type BoxedObserver<S> = Box<dyn FnOnce(S) + Send>;

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum StoreError {
    #[error("state store queue is closed")]
    Closed,
}

/// Owned, single-writer state container.
///
/// Every mutation is a reducer queued on one channel and applied in order by a
/// single task, so transitions never interleave. Readers get snapshots or a
/// signal of the current state.
pub struct StateStore<S: State> {
    state: Mutable<S>,
    set_state_tx: UnboundedSender<BoxedReducer<S>>,
    with_state_tx: UnboundedSender<BoxedObserver<S>>,
}

impl<S: State> StateStore<S> {
    /// Must be called from within a tokio runtime.
    pub fn new(initial_state: S) -> Self {
        let state = Mutable::new(initial_state);
        let (set_state_tx, set_state_rx) = tokio::sync::mpsc::unbounded_channel();
        let (with_state_tx, with_state_rx) = tokio::sync::mpsc::unbounded_channel();

        let state_clone = state.clone();

        tokio::spawn(async move {
            Self::process_queue(state_clone, set_state_rx, with_state_rx).await;
        });

        StateStore {
            state,
            set_state_tx,
            with_state_tx,
        }
    }

    async fn process_queue(
        state: Mutable<S>,
        mut set_state_rx: UnboundedReceiver<BoxedReducer<S>>,
        mut with_state_rx: UnboundedReceiver<BoxedObserver<S>>,
    ) {
        loop {
            tokio::select! {
                biased;
                Some(reducer) = set_state_rx.recv() => {
                    let new_state = reducer(state.get_cloned());
                    state.set(new_state);
                }
                Some(observer) = with_state_rx.recv() => {
                    observer(state.get_cloned());
                }
                else => break,
            }
        }
        trace!("state store queue drained, stopping");
    }

    pub fn to_stream(&self) -> SignalStream<MutableSignalCloned<S>> {
        self.state.signal_cloned().to_stream()
    }

    pub fn to_signal(&self) -> MutableSignalCloned<S> {
        self.state.signal_cloned()
    }

    /// Signal of a value derived from the state, recomputed on every change.
    pub fn signal_ref<B, F>(&self, f: F) -> MutableSignalRef<S, F>
    where
        F: FnMut(&S) -> B,
    {
        self.state.signal_ref(f)
    }

    pub fn set_state<F>(&self, reducer: F) -> Result<(), StoreError>
    where
        F: FnOnce(S) -> S + Send + 'static,
    {
        self.set_state_tx
            .send(Box::new(reducer))
            .map_err(|_| StoreError::Closed)
    }

    pub fn with_state<F>(&self, observer: F) -> Result<(), StoreError>
    where
        F: FnOnce(S) + Send + 'static,
    {
        self.with_state_tx
            .send(Box::new(observer))
            .map_err(|_| StoreError::Closed)
    }

    pub fn get_state(&self) -> S {
        self.state.get_cloned()
    }

    /// Reads a projection of the current state without cloning all of it.
    pub fn select<R, F>(&self, selector: F) -> R
    where
        F: FnOnce(&S) -> R,
    {
        selector(&self.state.lock_ref())
    }

    /// Resolves with the state once every reducer queued before this call has run.
    pub async fn await_state(&self) -> Result<S, StoreError> {
        let (tx, rx) = tokio::sync::oneshot::channel();
        self.with_state(move |state| {
            let _ = tx.send(state);
        })?;
        rx.await.map_err(|_| StoreError::Closed)
    }

    pub fn dispatcher(&self) -> Dispatcher<S> {
        Dispatcher {
            set_state_tx: self.set_state_tx.clone(),
        }
    }
}

impl<S: Reducer> StateStore<S> {
    pub fn dispatch(&self, action: S::Action) -> Result<(), StoreError> {
        self.set_state(move |state| state.reduce(action))
    }
}

/// Cloneable write half of a [`StateStore`], handed to spawned request tasks.
pub struct Dispatcher<S: State> {
    set_state_tx: UnboundedSender<BoxedReducer<S>>,
}

impl<S: State> Clone for Dispatcher<S> {
    fn clone(&self) -> Self {
        Self {
            set_state_tx: self.set_state_tx.clone(),
        }
    }
}

impl<S: State> Dispatcher<S> {
    pub fn set_state<F>(&self, reducer: F) -> Result<(), StoreError>
    where
        F: FnOnce(S) -> S + Send + 'static,
    {
        self.set_state_tx
            .send(Box::new(reducer))
            .map_err(|_| StoreError::Closed)
    }
}

impl<S: Reducer> Dispatcher<S> {
    pub fn dispatch(&self, action: S::Action) -> Result<(), StoreError> {
        self.set_state(move |state| state.reduce(action))
    }
}
