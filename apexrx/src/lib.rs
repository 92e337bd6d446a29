mod entity_collection;
mod form;
mod hooks;
mod http_client;
mod request_tracker;
mod slice;
mod state_store;
mod stream_ext;
mod transport;
pub mod macros;
pub mod mock;

pub use entity_collection::*;
pub use form::*;
pub use hooks::*;
pub use http_client::*;
pub use request_tracker::RequestToken;
pub use slice::*;
pub use state_store::*;
pub use stream_ext::*;
pub use transport::*;

pub trait State: Clone + Send + Sync + 'static {}

/// A state that knows how to fold its own actions.
///
/// Root states usually get this impl from [`combine_slices!`], which routes
/// each action variant to the slice field that owns it.
pub trait Reducer: State {
    type Action: Send + 'static;

    fn reduce(self, action: Self::Action) -> Self;
}

#[cfg(test)]
mod unit_tests;
