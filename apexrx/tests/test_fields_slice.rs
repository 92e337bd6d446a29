use crate::common::{fields_app, FieldSummary, FIELDS_ENDPOINT};
use apexrx::{ApexStreamExt, HttpMethod, SliceError};
use futures::StreamExt;
use serde_json::json;

mod common;

fn summaries(pairs: &[(&str, &str)]) -> Vec<FieldSummary> {
    pairs
        .iter()
        .map(|(id, label)| FieldSummary {
            id: id.to_string(),
            label: label.to_string(),
        })
        .collect()
}

#[tokio::test]
async fn test_list_then_detail_flow() {
    let (transport, slice, store) = fields_app();
    transport.respond_json(
        HttpMethod::Get,
        FIELDS_ENDPOINT,
        200,
        json!([{ "id": "1", "label": "A" }, { "id": "2", "label": "B" }]),
    );
    transport.respond(HttpMethod::Get, format!("{FIELDS_ENDPOINT}/abc"), 404, "");

    let _summaries = slice.use_summaries(&store);
    let _entity = slice.use_entity_by_id(&store, "abc".to_string());

    let settled = store
        .to_stream()
        .take_through(|state| {
            let fields = &state.fields;
            fields.entities.len() == 2
                && !fields.entities_meta.is_loading
                && fields.entity_meta.api_error.is_some()
        })
        .collect::<Vec<_>>()
        .await
        .pop()
        .expect("store stream ended early");

    let selectors = slice.selectors();
    assert_eq!(
        selectors.summaries.all(&settled),
        summaries(&[("1", "A"), ("2", "B")])
    );
    assert!(selectors.summaries.api_error(&settled).is_none());
    assert!(selectors.entity.data(&settled).is_none());
    assert!(!selectors.entity.is_loading(&settled));
    assert_eq!(
        selectors.entity.api_error(&settled).map(|e| e.error_message),
        Some("Request failed with status code 404.".to_string())
    );
}

#[tokio::test]
async fn test_successive_lists_accumulate() {
    let (transport, slice, store) = fields_app();
    transport.respond_json(
        HttpMethod::Get,
        FIELDS_ENDPOINT,
        200,
        json!([{ "id": "1", "label": "A" }, { "id": "2", "label": "B" }]),
    );
    transport.respond_json(
        HttpMethod::Get,
        FIELDS_ENDPOINT,
        200,
        json!([{ "id": "2", "label": "B2" }, { "id": "3", "label": "C" }]),
    );

    slice.get_all_summaries(&store).await.unwrap().unwrap();
    slice.get_all_summaries(&store).await.unwrap().unwrap();

    let state = store.await_state().await.unwrap();
    assert_eq!(
        state.fields.all_summaries(),
        summaries(&[("1", "A"), ("2", "B2"), ("3", "C")])
    );
}

#[tokio::test]
async fn test_same_payload_twice_is_idempotent() {
    let (transport, slice, store) = fields_app();
    let payload = json!([{ "id": "1", "label": "A" }, { "id": "2", "label": "B" }]);
    transport.always_json(HttpMethod::Get, FIELDS_ENDPOINT, 200, payload);

    slice.get_all_summaries(&store).await.unwrap().unwrap();
    let once = store.await_state().await.unwrap().fields.entities;
    slice.get_all_summaries(&store).await.unwrap().unwrap();
    let twice = store.await_state().await.unwrap().fields.entities;

    assert_eq!(once, twice);
}

#[tokio::test]
async fn test_network_unreachable_during_detail() {
    let (transport, slice, store) = fields_app();
    transport.unreachable(HttpMethod::Get, format!("{FIELDS_ENDPOINT}/abc"));

    let result = slice.get_by_id(&store, "abc".to_string()).await.unwrap();
    assert!(matches!(result, Err(SliceError::Api(ref e)) if e.error_message == "No response received."));

    let state = store.await_state().await.unwrap();
    assert_eq!(
        state.fields.entity_error().map(|e| e.error_message),
        Some("No response received.".to_string())
    );
}
