use apexrx::mock::MockTransport;
use apexrx::{
    combine_slices, ApexSlice, HttpClient, SliceAction, SliceConfig, SliceState, State, StateStore,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const FIELDS_ENDPOINT: &str = "http://localhost:3000/fields";

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

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppState {
    pub fields: FieldsState,
}

pub enum AppAction {
    Fields(SliceAction<Field, FieldSummary, String>),
}

impl State for AppState {}

combine_slices!(AppState, AppAction {
    fields => Fields,
});

fn select_fields(state: &AppState) -> &FieldsState {
    &state.fields
}

fn field_id(summary: &FieldSummary) -> String {
    summary.id.clone()
}

pub type FieldsSlice = ApexSlice<AppState, Field, FieldSummary, String>;

pub fn fields_app() -> (Arc<MockTransport>, FieldsSlice, Arc<StateStore<AppState>>) {
    let transport = Arc::new(MockTransport::new());
    let slice = ApexSlice::new(
        SliceConfig {
            name: "fields".to_string(),
            endpoint: FIELDS_ENDPOINT.to_string(),
            select_summary_id: field_id,
            select_slice_state: select_fields,
            wrap_action: AppAction::Fields,
        },
        HttpClient::new(transport.clone()),
    );
    let store = Arc::new(StateStore::new(AppState {
        fields: slice.initial_state(),
    }));
    (transport, slice, store)
}
