use crate::unit_tests::TestState;
use crate::{ApexStreamExt, StateStore, StoreError};
use futures::stream::{self, StreamExt};

#[tokio::test]
async fn test_take_through_includes_matching_item() {
    let items: Vec<i32> = stream::iter(1..10)
        .take_through(|value| *value == 3)
        .collect()
        .await;
    assert_eq!(items, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_take_through_passes_short_streams() {
    let items: Vec<i32> = stream::iter(1..3)
        .take_through(|value| *value > 5)
        .collect()
        .await;
    assert_eq!(items, vec![1, 2]);
}

#[tokio::test]
async fn test_take_through_on_store_stream() -> Result<(), StoreError> {
    let store = StateStore::new(TestState::default());
    store.set_state(|state| state.add_count(2))?;

    let last = store
        .to_stream()
        .take_through(|state| state.count == 2)
        .collect::<Vec<_>>()
        .await
        .pop();

    assert_eq!(last.map(|state| state.count), Some(2));
    Ok(())
}
