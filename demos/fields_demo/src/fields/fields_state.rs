use apexrx::{combine_slices, SliceAction, SliceState, State};
use serde::{Deserialize, Serialize};

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

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub fields: FieldsState,
    pub exit: bool,
}

pub enum AppAction {
    Fields(SliceAction<Field, FieldSummary, String>),
}

impl State for AppState {}

combine_slices!(AppState, AppAction {
    fields => Fields,
});

impl AppState {
    pub fn set_exit(self) -> Self {
        Self { exit: true, ..self }
    }
}

pub fn select_fields(state: &AppState) -> &FieldsState {
    &state.fields
}

pub fn field_summary_id(summary: &FieldSummary) -> String {
    summary.id.clone()
}

/// Form labels for a [`Field`], keyed by its wire names.
pub fn field_labels() -> [(&'static str, &'static str); 3] {
    [("id", "Id"), ("label", "Label"), ("helpText", "Help text")]
}
