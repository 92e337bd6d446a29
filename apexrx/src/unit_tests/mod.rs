use crate::mock::MockTransport;
use crate::{
    combine_slices, ApexSlice, HttpClient, SliceAction, SliceConfig, SliceState, State, StateStore,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

mod form_test;
mod http_client_test;
mod stream_ext_test;

pub const ENDPOINT: &str = "http://localhost:3000/fields";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSummary {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: String,
    pub label: String,
    pub help_text: String,
}

pub type FieldsState = SliceState<Field, FieldSummary, String>;
pub type FieldsAction = SliceAction<Field, FieldSummary, String>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestState {
    pub count: u32,
    pub fields: FieldsState,
}

pub enum TestAction {
    Fields(FieldsAction),
}

impl State for TestState {}

combine_slices!(TestState, TestAction {
    fields => Fields,
});

impl TestState {
    pub fn add_count(self, amount: u32) -> Self {
        Self {
            count: self.count + amount,
            ..self
        }
    }
}

pub fn summary(id: &str, label: &str) -> FieldSummary {
    FieldSummary {
        id: id.to_string(),
        label: label.to_string(),
    }
}

pub fn field(id: &str, label: &str, help_text: &str) -> Field {
    Field {
        id: id.to_string(),
        label: label.to_string(),
        help_text: help_text.to_string(),
    }
}

fn select_fields(state: &TestState) -> &FieldsState {
    &state.fields
}

fn summary_id(summary: &FieldSummary) -> String {
    summary.id.clone()
}

pub type FieldsSlice = ApexSlice<TestState, Field, FieldSummary, String>;

pub fn fields_slice(transport: &Arc<MockTransport>) -> FieldsSlice {
    ApexSlice::new(
        SliceConfig {
            name: "fields".to_string(),
            endpoint: ENDPOINT.to_string(),
            select_summary_id: summary_id,
            select_slice_state: select_fields,
            wrap_action: TestAction::Fields,
        },
        HttpClient::new(transport.clone()),
    )
}

/// A mock transport, a `fields` slice over it and a fresh store.
pub fn setup() -> (Arc<MockTransport>, FieldsSlice, Arc<StateStore<TestState>>) {
    let transport = Arc::new(MockTransport::new());
    let slice = fields_slice(&transport);
    let store = Arc::new(StateStore::new(TestState::default()));
    (transport, slice, store)
}
