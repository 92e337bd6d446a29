use crate::config::FieldsConfig;
use crate::fields::fields_state::{
    field_summary_id, select_fields, AppAction, AppState, Field, FieldSummary,
};
use apexrx::mock::MockTransport;
use apexrx::{
    ApexSlice, CreateHook, EntityByIdHook, HttpClient, HttpMethod, ReqwestTransport, SliceConfig,
    StateStore, StoreError, SummariesHook, Transport,
};
use serde_json::json;
use std::sync::Arc;

pub type FieldsSlice = ApexSlice<AppState, Field, FieldSummary, String>;

pub struct FieldsModel {
    store: Arc<StateStore<AppState>>,
    slice: FieldsSlice,
}

impl FieldsModel {
    pub fn new(config: &FieldsConfig) -> Self {
        let transport: Arc<dyn Transport> = if config.mock {
            Arc::new(seeded_mock(&config.endpoint))
        } else {
            Arc::new(ReqwestTransport::new())
        };
        let slice = ApexSlice::new(
            SliceConfig {
                name: "fields".to_string(),
                endpoint: config.endpoint.clone(),
                select_summary_id: field_summary_id,
                select_slice_state: select_fields,
                wrap_action: AppAction::Fields,
            },
            HttpClient::new(transport),
        );
        let store = Arc::new(StateStore::new(AppState {
            fields: slice.initial_state(),
            exit: false,
        }));
        Self { store, slice }
    }

    pub fn store(&self) -> Arc<StateStore<AppState>> {
        self.store.clone()
    }

    pub fn slice(&self) -> &FieldsSlice {
        &self.slice
    }

    pub fn summaries(&self) -> SummariesHook<AppState, Field, FieldSummary, String> {
        self.slice.use_summaries(&self.store)
    }

    pub fn entity_by_id(&self, id: &str) -> EntityByIdHook<AppState, Field, FieldSummary, String> {
        self.slice.use_entity_by_id(&self.store, id.to_string())
    }

    pub fn creator(&self) -> CreateHook<AppState, Field, FieldSummary, String> {
        self.slice.use_create(&self.store)
    }

    pub fn exit(&self) -> Result<(), StoreError> {
        self.store.set_state(|state| state.set_exit())
    }
}

/// A local stand-in for the fields API: two summaries, one detail, and a
/// create route that accepts anything.
fn seeded_mock(endpoint: &str) -> MockTransport {
    let transport = MockTransport::new();
    transport.respond_json(
        HttpMethod::Get,
        endpoint,
        200,
        json!([{ "id": "abc", "label": "Name" }, { "id": "def", "label": "Email" }]),
    );
    transport.respond_json(
        HttpMethod::Get,
        endpoint,
        200,
        json!([
            { "id": "abc", "label": "Name" },
            { "id": "def", "label": "Email" },
            { "id": "ghi", "label": "Phone" }
        ]),
    );
    transport.always_json(
        HttpMethod::Get,
        format!("{endpoint}/abc"),
        200,
        json!({ "id": "abc", "label": "Name", "helpText": "Your full name" }),
    );
    transport.always_json(HttpMethod::Post, endpoint, 201, json!({}));
    transport
}
